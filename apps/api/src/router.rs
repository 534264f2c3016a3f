use std::sync::Arc;

use anyhow::{bail, Context};
use axum::{
    Json, Router,
    routing::get,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use appointment_cell::router::appointment_routes;
use appointment_cell::services::SchedulingEngine;
use appointment_cell::store::{AppointmentStore, InMemoryAppointmentStore, SupabaseAppointmentStore};
use chat_booking_cell::router::chat_routes;
use chat_booking_cell::services::{ChatBookingFlow, InMemorySessionStore, RedisSessionStore, SessionStore};
use doctor_cell::router::doctor_routes;
use doctor_cell::services::WorkingHoursService;
use doctor_cell::store::{InMemoryWorkingHoursStore, SupabaseWorkingHoursStore, WorkingHoursStore};
use shared_config::{AppConfig, SessionBackend, StorageBackend};

/// Services shared by every cell router.
pub struct Services {
    pub working_hours: Arc<WorkingHoursService>,
    pub engine: Arc<SchedulingEngine>,
    pub chat: Arc<ChatBookingFlow>,
}

impl Services {
    pub async fn build(config: &AppConfig) -> anyhow::Result<Self> {
        let (working_hours_store, appointment_store): (Arc<dyn WorkingHoursStore>, Arc<dyn AppointmentStore>) =
            match config.storage_backend {
                StorageBackend::Supabase => {
                    if !config.is_configured() {
                        bail!("STORAGE_BACKEND=supabase requires SUPABASE_URL and SUPABASE_ANON_PUBLIC_KEY");
                    }
                    (
                        Arc::new(SupabaseWorkingHoursStore::new(config)),
                        Arc::new(SupabaseAppointmentStore::new(config)),
                    )
                }
                StorageBackend::Memory => {
                    warn!("Using in-memory storage; data is lost on restart");
                    (
                        Arc::new(InMemoryWorkingHoursStore::new()),
                        Arc::new(InMemoryAppointmentStore::new()),
                    )
                }
            };

        let sessions: Arc<dyn SessionStore> = match config.session_backend {
            SessionBackend::Redis => {
                let url = config
                    .redis_url
                    .as_deref()
                    .context("SESSION_BACKEND=redis requires REDIS_URL")?;
                Arc::new(RedisSessionStore::new(url).await?)
            }
            SessionBackend::Memory => Arc::new(InMemorySessionStore::new()),
        };

        let working_hours = Arc::new(WorkingHoursService::new(working_hours_store));
        let engine = Arc::new(SchedulingEngine::new(working_hours.clone(), appointment_store));
        let chat = Arc::new(ChatBookingFlow::new(sessions, engine.clone(), config)?);

        info!("Scheduling services ready");

        Ok(Self { working_hours, engine, chat })
    }
}

pub fn create_router(services: Services) -> Router {
    Router::new()
        .route("/", get(status))
        .nest("/doctors", doctor_routes(services.working_hours))
        .nest("/appointments", appointment_routes(services.engine))
        .nest("/chat", chat_routes(services.chat))
}

async fn status() -> Json<Value> {
    Json(json!({
        "service": "clinic-booking-api",
        "status": "ok"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{Request, StatusCode}};
    use tower::ServiceExt;

    #[tokio::test]
    async fn memory_backends_serve_status_route() {
        let services = Services::build(&AppConfig::default()).await.unwrap();
        let response = create_router(services)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
