use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_utils::wall_clock;

use crate::models::{Appointment, AppointmentStatus, NewAppointment};
use super::{AppointmentStore, StoreError};

const TABLE_PATH: &str = "/rest/v1/appointments";

/// Appointments table behind PostgREST. Uniqueness of active slots is the
/// partial unique index from `migrations/0001_appointments.sql`.
pub struct SupabaseAppointmentStore {
    supabase: SupabaseClient,
}

impl SupabaseAppointmentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    fn parse_rows(rows: Vec<Value>) -> Result<Vec<Appointment>, StoreError> {
        rows.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| StoreError::Backend(format!("Failed to parse appointment: {}", e)))
    }
}

#[async_trait]
impl AppointmentStore for SupabaseAppointmentStore {
    async fn find_active_appointments(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, StoreError> {
        let path = format!(
            "{}?doctor_id=eq.{}&appointment_date=eq.{}&status=neq.{}&order=appointment_time.asc",
            TABLE_PATH,
            doctor_id,
            date,
            AppointmentStatus::Cancelled
        );
        let rows: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;
        Self::parse_rows(rows)
    }

    async fn insert_if_absent(&self, new: NewAppointment) -> Result<Appointment, StoreError> {
        debug!("Inserting appointment for doctor {} on {} at {}", new.doctor_id, new.date, new.time);

        let body = json!({
            "doctor_id": new.doctor_id,
            "patient_id": new.patient_id,
            "workplace_id": new.workplace_id,
            "appointment_date": new.date,
            "appointment_time": wall_clock::format(&new.time),
            "status": new.status,
            "notes": new.notes,
        });

        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                TABLE_PATH,
                Some(body),
                Some(SupabaseClient::return_representation()),
            )
            .await?;

        Self::parse_rows(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Backend("Insert returned no appointment".to_string()))
    }

    async fn get_appointment(&self, appointment_id: Uuid) -> Result<Option<Appointment>, StoreError> {
        let path = format!("{}?id=eq.{}&limit=1", TABLE_PATH, appointment_id);
        let rows: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(Self::parse_rows(rows)?.into_iter().next())
    }

    async fn transition_status(
        &self,
        appointment_id: Uuid,
        from: AppointmentStatus,
        to: AppointmentStatus,
        reason: Option<String>,
    ) -> Result<Option<Appointment>, StoreError> {
        let mut body = json!({
            "status": to,
            "updated_at": Utc::now().to_rfc3339(),
        });
        if to == AppointmentStatus::Cancelled {
            body["cancellation_reason"] = json!(reason);
        }

        let path = format!("{}?id=eq.{}&status=eq.{}", TABLE_PATH, appointment_id, from);
        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(body),
                Some(SupabaseClient::return_representation()),
            )
            .await?;

        let mut updated = Self::parse_rows(rows)?;
        if updated.len() > 1 {
            warn!("Status update matched {} rows for appointment {}", updated.len(), appointment_id);
        }
        Ok(updated.pop())
    }

    async fn find_patient_appointments(&self, patient_id: Uuid) -> Result<Vec<Appointment>, StoreError> {
        let path = format!(
            "{}?patient_id=eq.{}&order=appointment_date.asc,appointment_time.asc",
            TABLE_PATH, patient_id
        );
        let rows: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;
        Self::parse_rows(rows)
    }
}
