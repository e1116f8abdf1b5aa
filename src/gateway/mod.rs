// src/gateway/mod.rs
//
// Every read and write of the three remote tables goes through
// `AppointmentGateway`. The store only ever sees this trait.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Appointment, AppointmentStatus, Doctor, NewFollowUp, Patient};

pub mod rest;

#[cfg(test)]
pub mod fake;

pub use rest::RestGateway;

/// The single failure kind of the gateway: whatever the backing store (or
/// the transport in front of it) reported.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RemoteQueryError {
    pub status: Option<u16>,
    pub code: Option<String>,
    pub message: String,
    /// Raw response body, unchanged.
    pub payload: Option<String>,
}

/// PostgREST error body: `{ "code", "message", "details", "hint" }`.
#[derive(Debug, Deserialize)]
struct StoreErrorBody {
    code: Option<String>,
    message: Option<String>,
}

impl RemoteQueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            code: None,
            message: message.into(),
            payload: None,
        }
    }

    pub fn from_response(status: u16, body: String) -> Self {
        let parsed = serde_json::from_str::<StoreErrorBody>(&body).ok();
        let (code, message) = match parsed {
            Some(StoreErrorBody { code, message: Some(message) }) => (code, message),
            Some(StoreErrorBody { code, message: None }) => (code, body.clone()),
            None if body.trim().is_empty() => (None, format!("request failed with status {status}")),
            None => (None, body.clone()),
        };

        Self {
            status: Some(status),
            code,
            message,
            payload: Some(body),
        }
    }
}

impl From<reqwest::Error> for RemoteQueryError {
    fn from(e: reqwest::Error) -> Self {
        Self {
            status: e.status().map(|s| s.as_u16()),
            code: None,
            message: e.to_string(),
            payload: None,
        }
    }
}

#[async_trait]
pub trait AppointmentGateway: Send + Sync {
    /// All appointments, ascending by `appointment_date`.
    async fn fetch_appointments(&self) -> Result<Vec<Appointment>, RemoteQueryError>;

    async fn fetch_patients(&self) -> Result<Vec<Patient>, RemoteQueryError>;

    async fn fetch_doctors(&self) -> Result<Vec<Doctor>, RemoteQueryError>;

    /// Partial update of `status` only. No version check: last writer wins.
    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<(), RemoteQueryError>;

    /// Inserts one row and returns it as stored (server id and timestamps).
    async fn insert_follow_up(
        &self,
        follow_up: &NewFollowUp,
    ) -> Result<Appointment, RemoteQueryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_message_is_surfaced() {
        let body = r#"{"code":"23503","details":"Key is not present in table \"patients\".","hint":null,"message":"insert or update on table \"appointments\" violates foreign key constraint"}"#;
        let err = RemoteQueryError::from_response(409, body.to_string());

        assert_eq!(err.status, Some(409));
        assert_eq!(err.code.as_deref(), Some("23503"));
        assert_eq!(
            err.to_string(),
            "insert or update on table \"appointments\" violates foreign key constraint"
        );
        assert_eq!(err.payload.as_deref(), Some(body));
    }

    #[test]
    fn non_json_body_is_kept_verbatim() {
        let err = RemoteQueryError::from_response(502, "Bad Gateway".to_string());
        assert_eq!(err.message, "Bad Gateway");
        assert_eq!(err.code, None);
    }

    #[test]
    fn empty_body_falls_back_to_status() {
        let err = RemoteQueryError::from_response(401, String::new());
        assert_eq!(err.message, "request failed with status 401");
        assert_eq!(err.payload.as_deref(), Some(""));
    }
}
