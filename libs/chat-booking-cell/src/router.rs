use std::sync::Arc;

use axum::{routing::post, Router};

use crate::handlers;
use crate::services::ChatBookingFlow;

pub fn chat_routes(flow: Arc<ChatBookingFlow>) -> Router {
    Router::new()
        .route("/{phone}/booking", post(handlers::start_booking))
        .route("/{phone}/cancellation", post(handlers::start_cancellation))
        .route("/{phone}/messages", post(handlers::handle_message))
        .with_state(flow)
}
