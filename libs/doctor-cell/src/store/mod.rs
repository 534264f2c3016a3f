pub mod memory;
pub mod supabase;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{DoctorError, WorkingHoursConfig};

pub use memory::InMemoryWorkingHoursStore;
pub use supabase::SupabaseWorkingHoursStore;

/// Doctor-profile collaborator holding per doctor/workplace working hours.
#[async_trait]
pub trait WorkingHoursStore: Send + Sync {
    async fn get_config(
        &self,
        doctor_id: Uuid,
        workplace_id: Uuid,
    ) -> Result<Option<WorkingHoursConfig>, DoctorError>;

    async fn upsert_config(&self, config: WorkingHoursConfig) -> Result<WorkingHoursConfig, DoctorError>;

    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<WorkingHoursConfig>, DoctorError>;
}
