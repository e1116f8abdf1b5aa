use std::{fmt, str::FromStr, sync::Arc};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::store::AppointmentStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<AppointmentStore>,
}

/* -------------------------
   Table rows
--------------------------*/

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub first_name: String,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub last_name: String,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub first_name: String,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub last_name: String,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub specialty: String,
    pub created_at: DateTime<Utc>,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: DateTime<Utc>,
    pub status: AppointmentStatus,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub notes: String,
    #[serde(default, deserialize_with = "deserialize_follow_up_date")]
    pub follow_up_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a follow-up appointment. `id` and `created_at`
/// are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFollowUp {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: DateTime<Utc>,
    pub notes: String,
    pub status: AppointmentStatus,
}

impl NewFollowUp {
    pub fn for_appointment(target: &Appointment, date: DateTime<Utc>, notes: String) -> Self {
        Self {
            patient_id: target.patient_id,
            doctor_id: target.doctor_id,
            appointment_date: date,
            notes,
            status: AppointmentStatus::Scheduled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Selector options, in display order.
    pub const ALL: [AppointmentStatus; 3] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(format!("unknown appointment status: {other}")),
        }
    }
}

/* -------------------------
   Helpers
--------------------------*/

fn deserialize_null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    // nullable text columns; null renders the same as ""
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_follow_up_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    // Accept both a `date` column ("2024-06-01") and a `timestamptz` one.
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| Some(ts.with_timezone(&Utc).date_naive()))
        .map_err(serde::de::Error::custom)
}
