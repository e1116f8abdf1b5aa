// src/store.rs
//
// In-memory view-model for the appointment page. Owns the snapshot of
// appointments, the patient/doctor lookups, the follow-up dialog and the
// toast queue. Mutated only from the completion of a gateway call (or a
// purely local intent), always under one short lock that is never held
// across an await on the gateway.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::gateway::AppointmentGateway;
use crate::models::{Appointment, AppointmentStatus, Doctor, NewFollowUp, Patient};

pub const LOAD_FAILED: &str = "Failed to load appointments";
pub const STATUS_UPDATED: &str = "Appointment status updated";
pub const STATUS_UPDATE_FAILED: &str = "Failed to update appointment status";
pub const FOLLOW_UP_SCHEDULED: &str = "Follow-up appointment scheduled";
pub const FOLLOW_UP_FAILED: &str = "Failed to schedule follow-up appointment";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A toast. Shown once, on the next render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum FollowUpDialog {
    #[default]
    Closed,
    Open { target: Appointment },
}

impl FollowUpDialog {
    pub fn is_open(&self) -> bool {
        matches!(self, FollowUpDialog::Open { .. })
    }

    pub fn target(&self) -> Option<&Appointment> {
        match self {
            FollowUpDialog::Open { target } => Some(target),
            FollowUpDialog::Closed => None,
        }
    }
}

/// Consistent copy of the store for rendering.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub appointments: Vec<Appointment>,
    pub patients: HashMap<Uuid, Patient>,
    pub doctors: HashMap<Uuid, Doctor>,
    pub dialog: FollowUpDialog,
}

impl StoreSnapshot {
    pub fn patient_for(&self, appointment: &Appointment) -> Option<&Patient> {
        self.patients.get(&appointment.patient_id)
    }

    pub fn doctor_for(&self, appointment: &Appointment) -> Option<&Doctor> {
        self.doctors.get(&appointment.doctor_id)
    }
}

#[derive(Default)]
struct StoreState {
    view: StoreSnapshot,
    notifications: Vec<Notification>,

    // Staleness tags. A completion is applied only if its tag is newer than
    // the last one applied for the same target.
    next_load: u64,
    applied_load: u64,
    next_status: u64,
    applied_status: HashMap<Uuid, u64>,
    dialog_session: u64,
}

impl StoreState {
    fn notify(&mut self, level: NotificationLevel, message: &str) {
        self.notifications.push(Notification {
            level,
            message: message.to_string(),
        });
    }

    fn close_dialog(&mut self) {
        self.view.dialog = FollowUpDialog::Closed;
        self.dialog_session += 1;
    }
}

pub struct AppointmentStore {
    gateway: Arc<dyn AppointmentGateway>,
    state: Mutex<StoreState>,
}

impl AppointmentStore {
    pub fn new(gateway: Arc<dyn AppointmentGateway>) -> Self {
        Self {
            gateway,
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Fetches the three tables concurrently. The first failure aborts the
    /// whole load and nothing is committed.
    pub async fn load(&self) {
        let generation = {
            let mut state = self.state.lock().await;
            state.next_load += 1;
            state.next_load
        };

        let fetched = tokio::try_join!(
            self.gateway.fetch_appointments(),
            self.gateway.fetch_patients(),
            self.gateway.fetch_doctors(),
        );

        let mut state = self.state.lock().await;
        if generation <= state.applied_load {
            tracing::debug!(generation, "discarding stale load result");
            return;
        }

        match fetched {
            Ok((appointments, patients, doctors)) => {
                state.applied_load = generation;
                state.view.patients = index_by_id(patients, |p| p.id);
                state.view.doctors = index_by_id(doctors, |d| d.id);
                state.view.appointments = appointments;
                tracing::info!(
                    appointments = state.view.appointments.len(),
                    patients = state.view.patients.len(),
                    doctors = state.view.doctors.len(),
                    "appointments loaded"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "error fetching data");
                state.notify(NotificationLevel::Error, LOAD_FAILED);
            }
        }
    }

    pub async fn change_status(&self, id: Uuid, status: AppointmentStatus) {
        let seq = {
            let mut state = self.state.lock().await;
            state.next_status += 1;
            state.next_status
        };

        let result = self.gateway.update_status(id, status).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(()) => {
                let applied = state.applied_status.get(&id).copied().unwrap_or(0);
                if seq > applied {
                    state.applied_status.insert(id, seq);
                    if let Some(apt) = state.view.appointments.iter_mut().find(|a| a.id == id) {
                        apt.status = status;
                    }
                } else {
                    tracing::debug!(%id, %status, seq, applied, "newer status already applied, skipping local update");
                }
                tracing::info!(%id, %status, "appointment status updated");
                state.notify(NotificationLevel::Success, STATUS_UPDATED);
            }
            Err(e) => {
                tracing::error!(%id, %status, error = %e, "error updating status");
                state.notify(NotificationLevel::Error, STATUS_UPDATE_FAILED);
            }
        }
    }

    /// Selects `appointment` as the follow-up target and opens the dialog.
    pub async fn request_follow_up(&self, appointment: Appointment) {
        let mut state = self.state.lock().await;
        tracing::debug!(id = %appointment.id, "follow-up dialog opened");
        state.dialog_session += 1;
        state.view.dialog = FollowUpDialog::Open { target: appointment };
    }

    /// Closes the dialog and forgets the target. Purely local.
    pub async fn cancel_follow_up(&self) {
        let mut state = self.state.lock().await;
        if state.view.dialog.is_open() {
            tracing::debug!("follow-up dialog cancelled");
            state.close_dialog();
        }
    }

    pub async fn submit_follow_up(&self, date: DateTime<Utc>, notes: String) {
        let (target, session) = {
            let state = self.state.lock().await;
            match state.view.dialog.target() {
                Some(target) => (target.clone(), state.dialog_session),
                None => return,
            }
        };

        let follow_up = NewFollowUp::for_appointment(&target, date, notes);
        let result = self.gateway.insert_follow_up(&follow_up).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(row) => {
                tracing::info!(id = %row.id, source = %target.id, "follow-up appointment scheduled");
                // The row exists remotely, so it is shown even if the dialog
                // has moved on since this submit was issued.
                state.view.appointments.push(row);
                if state.dialog_session == session {
                    state.close_dialog();
                }
                state.notify(NotificationLevel::Success, FOLLOW_UP_SCHEDULED);
            }
            Err(e) => {
                tracing::error!(source = %target.id, error = %e, "error scheduling follow-up");
                state.notify(NotificationLevel::Error, FOLLOW_UP_FAILED);
            }
        }
    }

    pub async fn find_appointment(&self, id: Uuid) -> Option<Appointment> {
        let state = self.state.lock().await;
        state.view.appointments.iter().find(|a| a.id == id).cloned()
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.lock().await.view.clone()
    }

    pub async fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.state.lock().await.notifications)
    }

    /// Drops everything held for the session. Called once on shutdown.
    pub async fn teardown(&self) {
        let mut state = self.state.lock().await;
        tracing::info!(
            appointments = state.view.appointments.len(),
            pending_notifications = state.notifications.len(),
            "appointment store torn down"
        );
        *state = StoreState::default();
    }
}

/// Builds an id lookup. Rows are inserted in fetch order, so when the same
/// id appears twice the later row wins.
fn index_by_id<T>(rows: Vec<T>, key: impl Fn(&T) -> Uuid) -> HashMap<Uuid, T> {
    let mut map = HashMap::with_capacity(rows.len());
    for row in rows {
        map.insert(key(&row), row);
    }
    map
}
