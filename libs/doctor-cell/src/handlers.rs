use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{SetWorkingHoursRequest, SlotGridResponse, WorkingHoursConfig};
use crate::services::WorkingHoursService;

#[derive(Debug, Deserialize)]
pub struct SlotGridQuery {
    pub date: NaiveDate,
}

#[axum::debug_handler]
pub async fn set_working_hours(
    State(service): State<Arc<WorkingHoursService>>,
    Path((doctor_id, workplace_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<SetWorkingHoursRequest>,
) -> Result<Json<WorkingHoursConfig>, AppError> {
    let config = service
        .set_working_hours(doctor_id, workplace_id, request)
        .await?;

    Ok(Json(config))
}

#[axum::debug_handler]
pub async fn get_working_hours(
    State(service): State<Arc<WorkingHoursService>>,
    Path((doctor_id, workplace_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<WorkingHoursConfig>, AppError> {
    let config = service.get_working_hours(doctor_id, workplace_id).await?;
    Ok(Json(config))
}

#[axum::debug_handler]
pub async fn list_doctor_workplaces(
    State(service): State<Arc<WorkingHoursService>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Vec<WorkingHoursConfig>>, AppError> {
    let configs = service.list_workplaces_for_doctor(doctor_id).await?;
    Ok(Json(configs))
}

#[axum::debug_handler]
pub async fn get_slot_grid(
    State(service): State<Arc<WorkingHoursService>>,
    Path((doctor_id, workplace_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<SlotGridQuery>,
) -> Result<Json<SlotGridResponse>, AppError> {
    let (config, slots) = service.slot_grid(doctor_id, workplace_id, query.date).await?;

    Ok(Json(SlotGridResponse {
        doctor_id,
        workplace_id,
        date: query.date,
        slot_duration_minutes: config.slot_duration_minutes,
        slots,
    }))
}
