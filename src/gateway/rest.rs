// src/gateway/rest.rs

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, header};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::{AppointmentGateway, RemoteQueryError};
use crate::models::{Appointment, AppointmentStatus, Doctor, NewFollowUp, Patient};

const APPOINTMENTS: &str = "appointments";
const PATIENTS: &str = "patients";
const DOCTORS: &str = "doctors";

/// Talks to the hosted store's table API (`/rest/v1/{table}`).
/// One instance is built at startup and shared by every call.
pub struct RestGateway {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl RestGateway {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn select_all<T: DeserializeOwned>(
        &self,
        table: &str,
        order: Option<&str>,
    ) -> Result<Vec<T>, RemoteQueryError> {
        let mut query = vec![("select", "*")];
        if let Some(order) = order {
            query.push(("order", order));
        }

        tracing::debug!(table, ?order, "select");
        let resp = self
            .request(Method::GET, table)
            .query(&query)
            .send()
            .await
            .map_err(|e| log_failure(table, e.into()))?;

        decode_json(resp).await.map_err(|e| log_failure(table, e))
    }
}

#[async_trait]
impl AppointmentGateway for RestGateway {
    async fn fetch_appointments(&self) -> Result<Vec<Appointment>, RemoteQueryError> {
        self.select_all(APPOINTMENTS, Some("appointment_date.asc")).await
    }

    async fn fetch_patients(&self) -> Result<Vec<Patient>, RemoteQueryError> {
        self.select_all(PATIENTS, None).await
    }

    async fn fetch_doctors(&self) -> Result<Vec<Doctor>, RemoteQueryError> {
        self.select_all(DOCTORS, None).await
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<(), RemoteQueryError> {
        tracing::debug!(%id, %status, "update appointment status");

        let resp = self
            .request(Method::PATCH, APPOINTMENTS)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=minimal")
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await
            .map_err(|e| log_failure(APPOINTMENTS, e.into()))?;

        ensure_success(resp)
            .await
            .map(|_| ())
            .map_err(|e| log_failure(APPOINTMENTS, e))
    }

    async fn insert_follow_up(
        &self,
        follow_up: &NewFollowUp,
    ) -> Result<Appointment, RemoteQueryError> {
        tracing::debug!(
            patient_id = %follow_up.patient_id,
            doctor_id = %follow_up.doctor_id,
            "insert follow-up appointment"
        );

        // object+json makes the store answer with the single inserted row
        // instead of a one-element array.
        let resp = self
            .request(Method::POST, APPOINTMENTS)
            .header("Prefer", "return=representation")
            .header(header::ACCEPT, "application/vnd.pgrst.object+json")
            .json(follow_up)
            .send()
            .await
            .map_err(|e| log_failure(APPOINTMENTS, e.into()))?;

        decode_json(resp).await.map_err(|e| log_failure(APPOINTMENTS, e))
    }
}

async fn ensure_success(resp: Response) -> Result<Response, RemoteQueryError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    match resp.text().await {
        Ok(body) => Err(RemoteQueryError::from_response(status.as_u16(), body)),
        Err(e) => Err(RemoteQueryError {
            status: Some(status.as_u16()),
            code: None,
            message: format!("request failed with status {status}; error body unreadable: {e}"),
            payload: None,
        }),
    }
}

async fn decode_json<T: DeserializeOwned>(resp: Response) -> Result<T, RemoteQueryError> {
    let resp = ensure_success(resp).await?;
    let status = resp.status().as_u16();
    let body = resp.text().await?;

    serde_json::from_str(&body).map_err(|e| RemoteQueryError {
        status: Some(status),
        code: None,
        message: format!("row decode error: {e}"),
        payload: Some(body),
    })
}

fn log_failure(table: &str, e: RemoteQueryError) -> RemoteQueryError {
    tracing::warn!(table, status = ?e.status, error = %e, "remote query failed");
    e
}
