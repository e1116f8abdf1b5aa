// src/gateway/fake.rs
//
// Scripted in-memory gateway for store and router tests.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use super::{AppointmentGateway, RemoteQueryError};
use crate::models::{Appointment, AppointmentStatus, Doctor, NewFollowUp, Patient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    FetchAppointments,
    FetchPatients,
    FetchDoctors,
    UpdateStatus,
    InsertFollowUp,
}

#[derive(Default)]
struct Script {
    appointments: Vec<Appointment>,
    patients: Vec<Patient>,
    doctors: Vec<Doctor>,
    failing: HashMap<Op, String>,
    status_delays: HashMap<AppointmentStatus, Duration>,
    fetch_delay: Option<Duration>,
    calls: Vec<Op>,
    updates: Vec<(Uuid, AppointmentStatus)>,
    inserts: Vec<NewFollowUp>,
}

#[derive(Default)]
pub struct FakeGateway {
    script: Mutex<Script>,
}

impl FakeGateway {
    pub fn new(appointments: Vec<Appointment>, patients: Vec<Patient>, doctors: Vec<Doctor>) -> Self {
        Self {
            script: Mutex::new(Script {
                appointments,
                patients,
                doctors,
                ..Script::default()
            }),
        }
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }

    pub fn fail(&self, op: Op, message: &str) {
        self.script().failing.insert(op, message.to_string());
    }

    pub fn recover(&self, op: Op) {
        self.script().failing.remove(&op);
    }

    pub fn delay_status(&self, status: AppointmentStatus, delay: Duration) {
        self.script().status_delays.insert(status, delay);
    }

    pub fn delay_fetches(&self, delay: Option<Duration>) {
        self.script().fetch_delay = delay;
    }

    pub fn set_appointments(&self, appointments: Vec<Appointment>) {
        self.script().appointments = appointments;
    }

    pub fn calls(&self) -> Vec<Op> {
        self.script().calls.clone()
    }

    pub fn updates(&self) -> Vec<(Uuid, AppointmentStatus)> {
        self.script().updates.clone()
    }

    pub fn inserts(&self) -> Vec<NewFollowUp> {
        self.script().inserts.clone()
    }

    fn record(&self, op: Op) -> Result<(), RemoteQueryError> {
        let mut script = self.script();
        script.calls.push(op);
        match script.failing.get(&op) {
            Some(message) => Err(RemoteQueryError::new(message.clone())),
            None => Ok(()),
        }
    }

    async fn fetch_pause(&self) {
        let delay = self.script().fetch_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl AppointmentGateway for FakeGateway {
    async fn fetch_appointments(&self) -> Result<Vec<Appointment>, RemoteQueryError> {
        // snapshot before pausing so a slow load returns what was current when it started
        let rows = self.script().appointments.clone();
        self.fetch_pause().await;
        self.record(Op::FetchAppointments)?;
        Ok(rows)
    }

    async fn fetch_patients(&self) -> Result<Vec<Patient>, RemoteQueryError> {
        self.record(Op::FetchPatients)?;
        Ok(self.script().patients.clone())
    }

    async fn fetch_doctors(&self) -> Result<Vec<Doctor>, RemoteQueryError> {
        self.record(Op::FetchDoctors)?;
        Ok(self.script().doctors.clone())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<(), RemoteQueryError> {
        let delay = self.script().status_delays.get(&status).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record(Op::UpdateStatus)?;

        let mut script = self.script();
        script.updates.push((id, status));
        if let Some(row) = script.appointments.iter_mut().find(|a| a.id == id) {
            row.status = status;
        }
        Ok(())
    }

    async fn insert_follow_up(
        &self,
        follow_up: &NewFollowUp,
    ) -> Result<Appointment, RemoteQueryError> {
        self.record(Op::InsertFollowUp)?;

        let row = Appointment {
            id: Uuid::new_v4(),
            patient_id: follow_up.patient_id,
            doctor_id: follow_up.doctor_id,
            appointment_date: follow_up.appointment_date,
            status: follow_up.status,
            notes: follow_up.notes.clone(),
            follow_up_date: None,
            created_at: Utc::now(),
        };

        let mut script = self.script();
        script.inserts.push(follow_up.clone());
        script.appointments.push(row.clone());
        Ok(row)
    }
}

/* -------------------------
   Fixtures
--------------------------*/

pub fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub fn patient(n: u128, first: &str, last: &str) -> Patient {
    Patient {
        id: id(n),
        first_name: first.into(),
        last_name: last.into(),
        email: format!("{}@example.com", first.to_lowercase()),
        phone: "555-0100".into(),
        created_at: ts(2024, 1, 1, 8, 0),
    }
}

pub fn doctor(n: u128, first: &str, last: &str, specialty: &str) -> Doctor {
    Doctor {
        id: id(n),
        first_name: first.into(),
        last_name: last.into(),
        email: format!("dr.{}@example.com", last.to_lowercase()),
        specialty: specialty.into(),
        created_at: ts(2024, 1, 1, 8, 0),
    }
}

pub fn appointment(n: u128, patient_id: Uuid, doctor_id: Uuid, date: DateTime<Utc>) -> Appointment {
    Appointment {
        id: id(n),
        patient_id,
        doctor_id,
        appointment_date: date,
        status: AppointmentStatus::Scheduled,
        notes: String::new(),
        follow_up_date: None,
        created_at: ts(2024, 1, 2, 8, 0),
    }
}
