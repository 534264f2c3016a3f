use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use shared_models::error::AppError;

use crate::models::{ChatReply, IncomingMessage, StartBookingRequest, StartCancellationRequest};
use crate::services::ChatBookingFlow;

#[axum::debug_handler]
pub async fn start_booking(
    State(flow): State<Arc<ChatBookingFlow>>,
    Path(phone): Path<String>,
    Json(request): Json<StartBookingRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let reply = flow.start_booking(&phone, request).await?;
    Ok(Json(reply))
}

#[axum::debug_handler]
pub async fn start_cancellation(
    State(flow): State<Arc<ChatBookingFlow>>,
    Path(phone): Path<String>,
    Json(request): Json<StartCancellationRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let reply = flow.start_cancellation(&phone, request.patient_id).await?;
    Ok(Json(reply))
}

#[axum::debug_handler]
pub async fn handle_message(
    State(flow): State<Arc<ChatBookingFlow>>,
    Path(phone): Path<String>,
    Json(message): Json<IncomingMessage>,
) -> Result<Json<ChatReply>, AppError> {
    let today = message.today.unwrap_or_else(|| Utc::now().date_naive());
    let reply = flow.handle_message(&phone, &message.body, today).await?;
    Ok(Json(reply))
}
