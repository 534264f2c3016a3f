use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{DoctorError, WorkingHoursConfig};
use super::WorkingHoursStore;

const TABLE_PATH: &str = "/rest/v1/doctor_working_hours";

pub struct SupabaseWorkingHoursStore {
    supabase: SupabaseClient,
}

impl SupabaseWorkingHoursStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    fn parse_rows(rows: Vec<Value>) -> Result<Vec<WorkingHoursConfig>, DoctorError> {
        rows.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<WorkingHoursConfig>, _>>()
            .map_err(|e| DoctorError::Database(format!("Failed to parse working hours: {}", e)))
    }
}

#[async_trait]
impl WorkingHoursStore for SupabaseWorkingHoursStore {
    async fn get_config(
        &self,
        doctor_id: Uuid,
        workplace_id: Uuid,
    ) -> Result<Option<WorkingHoursConfig>, DoctorError> {
        debug!("Fetching working hours for doctor {} at workplace {}", doctor_id, workplace_id);

        let path = format!(
            "{}?doctor_id=eq.{}&workplace_id=eq.{}&limit=1",
            TABLE_PATH, doctor_id, workplace_id
        );
        let rows: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;

        Ok(Self::parse_rows(rows)?.into_iter().next())
    }

    async fn upsert_config(&self, config: WorkingHoursConfig) -> Result<WorkingHoursConfig, DoctorError> {
        debug!("Upserting working hours for doctor {} at workplace {}", config.doctor_id, config.workplace_id);

        let body = json!(config);
        let mut headers = HeaderMap::new();
        headers.insert(
            "Prefer",
            HeaderValue::from_static("resolution=merge-duplicates,return=representation"),
        );

        let path = format!("{}?on_conflict=doctor_id,workplace_id", TABLE_PATH);
        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(Method::POST, &path, Some(body), Some(headers))
            .await?;

        Self::parse_rows(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| DoctorError::Database("Failed to store working hours".to_string()))
    }

    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<WorkingHoursConfig>, DoctorError> {
        let path = format!("{}?doctor_id=eq.{}&order=workplace_id.asc", TABLE_PATH, doctor_id);
        let rows: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;
        Self::parse_rows(rows)
    }
}
