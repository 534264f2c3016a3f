use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use appointment_cell::models::AppointmentError;
use shared_models::error::AppError;

/// Conversation state for one phone number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub step: ChatStep,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(step: ChatStep) -> Self {
        Self {
            step,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ChatStep {
    #[default]
    Idle,
    AwaitingDate {
        patient_id: Uuid,
        doctor_id: Uuid,
        workplace_id: Uuid,
    },
    AwaitingSlot {
        patient_id: Uuid,
        doctor_id: Uuid,
        workplace_id: Uuid,
        date: NaiveDate,
        offered: Vec<NaiveTime>,
    },
    AwaitingCancellation {
        patient_id: Uuid,
        appointment_ids: Vec<Uuid>,
    },
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartBookingRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub workplace_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartCancellationRequest {
    pub patient_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub body: String,
    /// Local date of the sender; defaults to the server's UTC date.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub step: ChatStep,
}

impl ChatReply {
    pub fn new(reply: impl Into<String>, step: ChatStep) -> Self {
        Self {
            reply: reply.into(),
            step,
        }
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Session store error: {0}")]
    SessionStore(String),

    #[error(transparent)]
    Appointment(#[from] AppointmentError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<redis::RedisError> for ChatError {
    fn from(err: redis::RedisError) -> Self {
        ChatError::SessionStore(err.to_string())
    }
}

impl From<deadpool_redis::PoolError> for ChatError {
    fn from(err: deadpool_redis::PoolError) -> Self {
        ChatError::SessionStore(format!("Failed to get Redis connection: {}", err))
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::SessionStore(format!("Corrupt session payload: {}", err))
    }
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::SessionStore(msg) => AppError::ServiceUnavailable(msg),
            ChatError::Appointment(inner) => inner.into(),
            ChatError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_serialize_with_explicit_tag() {
        let step = ChatStep::AwaitingCancellation {
            patient_id: Uuid::nil(),
            appointment_ids: vec![],
        };
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["step"], "awaiting_cancellation");

        let idle: ChatStep = serde_json::from_value(serde_json::json!({ "step": "idle" })).unwrap();
        assert_eq!(idle, ChatStep::Idle);
    }
}
