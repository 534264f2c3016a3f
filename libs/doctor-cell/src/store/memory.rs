use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{DoctorError, WorkingHoursConfig};
use super::WorkingHoursStore;

#[derive(Default)]
pub struct InMemoryWorkingHoursStore {
    configs: RwLock<HashMap<(Uuid, Uuid), WorkingHoursConfig>>,
}

impl InMemoryWorkingHoursStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkingHoursStore for InMemoryWorkingHoursStore {
    async fn get_config(
        &self,
        doctor_id: Uuid,
        workplace_id: Uuid,
    ) -> Result<Option<WorkingHoursConfig>, DoctorError> {
        let configs = self.configs.read().await;
        Ok(configs.get(&(doctor_id, workplace_id)).cloned())
    }

    async fn upsert_config(&self, config: WorkingHoursConfig) -> Result<WorkingHoursConfig, DoctorError> {
        let mut configs = self.configs.write().await;
        configs.insert((config.doctor_id, config.workplace_id), config.clone());
        Ok(config)
    }

    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<WorkingHoursConfig>, DoctorError> {
        let configs = self.configs.read().await;
        let mut found: Vec<WorkingHoursConfig> = configs
            .values()
            .filter(|config| config.doctor_id == doctor_id)
            .cloned()
            .collect();
        found.sort_by_key(|config| config.workplace_id);
        Ok(found)
    }
}
