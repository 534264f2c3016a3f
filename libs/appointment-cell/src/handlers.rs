// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{
    Appointment, AvailabilityQuery, AvailabilityResponse, BookSlotRequest, CancelAppointmentRequest,
};
use crate::services::SchedulingEngine;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct PatientAppointmentsQuery {
    #[serde(default)]
    pub active_only: bool,
}

// ==============================================================================
// HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_availability(
    State(engine): State<Arc<SchedulingEngine>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let report = engine
        .check_availability(query.doctor_id, query.workplace_id, query.date)
        .await?;

    Ok(Json(AvailabilityResponse::new(&query, report)))
}

#[axum::debug_handler]
pub async fn book_slot(
    State(engine): State<Arc<SchedulingEngine>>,
    Json(request): Json<BookSlotRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let appointment = engine.book_slot(request).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(engine): State<Arc<SchedulingEngine>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = engine.lifecycle.get_appointment(appointment_id).await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(engine): State<Arc<SchedulingEngine>>,
    Path(appointment_id): Path<Uuid>,
    body: Option<Json<CancelAppointmentRequest>>,
) -> Result<Json<Appointment>, AppError> {
    let reason = body.and_then(|Json(request)| request.reason);
    let appointment = engine.cancel_appointment(appointment_id, reason).await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn confirm_appointment(
    State(engine): State<Arc<SchedulingEngine>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = engine.lifecycle.confirm_appointment(appointment_id).await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(engine): State<Arc<SchedulingEngine>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = engine.lifecycle.complete_appointment(appointment_id).await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn get_patient_appointments(
    State(engine): State<Arc<SchedulingEngine>>,
    Path(patient_id): Path<Uuid>,
    Query(query): Query<PatientAppointmentsQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = engine
        .lifecycle
        .list_patient_appointments(patient_id, query.active_only)
        .await?;
    Ok(Json(appointments))
}
