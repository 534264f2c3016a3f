use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde_json::json;
use uuid::Uuid;

use shared_config::{AppConfig, SessionBackend, StorageBackend};

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_token: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            supabase_service_token: "test-service-token".to_string(),
        }
    }
}

impl TestConfig {
    /// Point the Supabase client at a wiremock server.
    pub fn with_supabase_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_service_token: self.supabase_service_token.clone(),
            redis_url: None,
            storage_backend: StorageBackend::Memory,
            session_backend: SessionBackend::Memory,
            chat_session_ttl_seconds: 1800,
            chat_slot_preview_limit: 6,
            port: 0,
        }
    }
}

/// First date on or after `from` that falls on `weekday`.
pub fn next_weekday(from: NaiveDate, weekday: Weekday) -> NaiveDate {
    let offset = (7 + weekday.num_days_from_monday() as i64
        - from.weekday().num_days_from_monday() as i64)
        % 7;
    from + Duration::days(offset)
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn working_hours_response(doctor_id: Uuid, workplace_id: Uuid) -> serde_json::Value {
        json!({
            "doctor_id": doctor_id,
            "workplace_id": workplace_id,
            "slot_duration_minutes": 30,
            "working_hours": {
                "monday": { "start": "09:00", "end": "17:00" },
                "wednesday": { "start": "09:00:00", "end": "12:00:00" }
            }
        })
    }

    pub fn appointment_response(
        id: Uuid,
        doctor_id: Uuid,
        patient_id: Uuid,
        workplace_id: Uuid,
        date: NaiveDate,
        time: &str,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "doctor_id": doctor_id,
            "patient_id": patient_id,
            "workplace_id": workplace_id,
            "appointment_date": date,
            "appointment_time": time,
            "status": status,
            "notes": null,
            "cancellation_reason": null,
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        })
    }

    pub fn unique_violation() -> serde_json::Value {
        json!({
            "code": "23505",
            "details": "Key (doctor_id, appointment_date, appointment_time) already exists.",
            "hint": null,
            "message": "duplicate key value violates unique constraint \"appointments_active_slot_key\""
        })
    }
}
