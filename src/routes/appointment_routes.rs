// src/routes/appointment_routes.rs

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    response::Redirect,
    routing::{get, post},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{AppState, Appointment, AppointmentStatus},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/appointments/{appointment_id}/status", post(change_status))
        .route("/appointments/{appointment_id}/follow-up", post(request_follow_up))
        .route("/follow-up", post(submit_follow_up))
        .route("/follow-up/cancel", post(cancel_follow_up))
        .route("/api/v1/appointments", get(list_appointments))
}

/* ============================================================
   Form intents (post/redirect/get back to the page)
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

pub async fn change_status(
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect, ApiError> {
    let status: AppointmentStatus = form
        .status
        .parse()
        .map_err(|e: String| ApiError::BadRequest("VALIDATION_ERROR", e))?;

    state.store.change_status(appointment_id, status).await;
    Ok(Redirect::to("/"))
}

pub async fn request_follow_up(
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Redirect, ApiError> {
    let appointment = state
        .store
        .find_appointment(appointment_id)
        .await
        .ok_or_else(ApiError::appointment_not_found)?;

    state.store.request_follow_up(appointment).await;
    Ok(Redirect::to("/"))
}

#[derive(Debug, Deserialize)]
pub struct FollowUpForm {
    pub date: String,
    #[serde(default)]
    pub notes: String,
}

pub async fn submit_follow_up(
    State(state): State<AppState>,
    Form(form): Form<FollowUpForm>,
) -> Result<Redirect, ApiError> {
    let date = parse_local_datetime(&form.date)?;
    state.store.submit_follow_up(date, form.notes).await;
    Ok(Redirect::to("/"))
}

pub async fn cancel_follow_up(State(state): State<AppState>) -> Redirect {
    state.store.cancel_follow_up().await;
    Redirect::to("/")
}

/// `datetime-local` value ("2024-06-01T10:00", seconds optional), read as UTC.
fn parse_local_datetime(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            ApiError::BadRequest("VALIDATION_ERROR", "date must be YYYY-MM-DDTHH:MM".into())
        })
}

/* ============================================================
   GET /api/v1/appointments
   ============================================================ */

#[derive(Debug, Serialize)]
pub struct ApiOk<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct PersonBrief {
    pub id: Uuid,
    pub display: String,
}

#[derive(Debug, Serialize)]
pub struct AppointmentViewDto {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub patient: Option<PersonBrief>,
    pub doctor: Option<PersonBrief>,
    pub specialty: Option<String>,
}

pub async fn list_appointments(State(state): State<AppState>) -> Json<ApiOk<Vec<AppointmentViewDto>>> {
    let snapshot = state.store.snapshot().await;

    let data = snapshot
        .appointments
        .iter()
        .map(|apt| {
            let patient = snapshot.patient_for(apt);
            let doctor = snapshot.doctor_for(apt);
            AppointmentViewDto {
                appointment: apt.clone(),
                patient: patient.map(|p| PersonBrief {
                    id: p.id,
                    display: p.full_name(),
                }),
                doctor: doctor.map(|d| PersonBrief {
                    id: d.id,
                    display: format!("Dr. {}", d.full_name()),
                }),
                specialty: doctor.map(|d| d.specialty.clone()),
            }
        })
        .collect();

    Json(ApiOk { data })
}
