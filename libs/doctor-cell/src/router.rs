use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use crate::handlers;
use crate::services::WorkingHoursService;

pub fn doctor_routes(service: Arc<WorkingHoursService>) -> Router {
    Router::new()
        .route("/{doctor_id}/workplaces", get(handlers::list_doctor_workplaces))
        .route(
            "/{doctor_id}/workplaces/{workplace_id}/working-hours",
            get(handlers::get_working_hours).put(handlers::set_working_hours),
        )
        .route(
            "/{doctor_id}/workplaces/{workplace_id}/slots",
            get(handlers::get_slot_grid),
        )
        .with_state(service)
}
