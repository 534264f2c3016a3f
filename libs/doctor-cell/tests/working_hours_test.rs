// libs/doctor-cell/tests/working_hours_test.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::models::{DayOfWeek, DoctorError, SetWorkingHoursRequest, TimeWindow};
use doctor_cell::services::WorkingHoursService;
use doctor_cell::store::{InMemoryWorkingHoursStore, SupabaseWorkingHoursStore, WorkingHoursStore};
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

fn at(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn weekday_request(duration: u32) -> SetWorkingHoursRequest {
    let mut working_hours = BTreeMap::new();
    working_hours.insert(DayOfWeek::Monday, Some(TimeWindow::new(at(9, 0), at(17, 0))));
    working_hours.insert(DayOfWeek::Sunday, None);
    SetWorkingHoursRequest {
        slot_duration_minutes: duration,
        working_hours,
    }
}

fn memory_service() -> WorkingHoursService {
    WorkingHoursService::new(Arc::new(InMemoryWorkingHoursStore::new()))
}

#[tokio::test]
async fn stores_and_returns_working_hours() {
    let service = memory_service();
    let (doctor_id, workplace_id) = (Uuid::new_v4(), Uuid::new_v4());

    let stored = service
        .set_working_hours(doctor_id, workplace_id, weekday_request(30))
        .await
        .unwrap();
    let fetched = service.get_working_hours(doctor_id, workplace_id).await.unwrap();

    assert_eq!(stored, fetched);
    assert_eq!(fetched.slot_duration_minutes, 30);
}

#[tokio::test]
async fn missing_config_is_config_not_found() {
    let service = memory_service();
    let result = service.get_working_hours(Uuid::new_v4(), Uuid::new_v4()).await;
    assert_matches!(result, Err(DoctorError::ConfigNotFound { .. }));
}

#[tokio::test]
async fn invalid_config_is_never_stored() {
    let store = Arc::new(InMemoryWorkingHoursStore::new());
    let service = WorkingHoursService::new(store.clone());
    let (doctor_id, workplace_id) = (Uuid::new_v4(), Uuid::new_v4());

    let result = service
        .set_working_hours(doctor_id, workplace_id, weekday_request(0))
        .await;

    assert_matches!(result, Err(DoctorError::InvalidConfig(_)));
    assert!(store.get_config(doctor_id, workplace_id).await.unwrap().is_none());
}

#[tokio::test]
async fn lists_every_workplace_of_a_doctor() {
    let service = memory_service();
    let doctor_id = Uuid::new_v4();

    for _ in 0..3 {
        service
            .set_working_hours(doctor_id, Uuid::new_v4(), weekday_request(30))
            .await
            .unwrap();
    }
    service
        .set_working_hours(Uuid::new_v4(), Uuid::new_v4(), weekday_request(30))
        .await
        .unwrap();

    let workplaces = service.list_workplaces_for_doctor(doctor_id).await.unwrap();
    assert_eq!(workplaces.len(), 3);
}

#[tokio::test]
async fn slot_grid_uses_stored_config() {
    let service = memory_service();
    let (doctor_id, workplace_id) = (Uuid::new_v4(), Uuid::new_v4());
    service
        .set_working_hours(doctor_id, workplace_id, weekday_request(60))
        .await
        .unwrap();

    let monday = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();
    let (_, slots) = service.slot_grid(doctor_id, workplace_id, monday).await.unwrap();
    assert_eq!(slots.len(), 8);
}

#[tokio::test]
async fn supabase_store_reads_working_hours_rows() {
    let mock_server = MockServer::start().await;
    let (doctor_id, workplace_id) = (Uuid::new_v4(), Uuid::new_v4());

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_working_hours"))
        .and(query_param("doctor_id", format!("eq.{}", doctor_id)))
        .and(query_param("workplace_id", format!("eq.{}", workplace_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::working_hours_response(doctor_id, workplace_id)
        ])))
        .mount(&mock_server)
        .await;

    let store = SupabaseWorkingHoursStore::new(&TestConfig::with_supabase_url(&mock_server.uri()).to_app_config());
    let config = store.get_config(doctor_id, workplace_id).await.unwrap().unwrap();

    assert_eq!(config.slot_duration_minutes, 30);
    assert_eq!(
        config.window_for(DayOfWeek::Wednesday),
        Some(&TimeWindow::new(at(9, 0), at(12, 0)))
    );
}

#[tokio::test]
async fn supabase_store_returns_none_for_empty_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_working_hours"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let store = SupabaseWorkingHoursStore::new(&TestConfig::with_supabase_url(&mock_server.uri()).to_app_config());
    let result = store.get_config(Uuid::new_v4(), Uuid::new_v4()).await;

    tokio_test::assert_ok!(&result);
    assert!(result.unwrap().is_none());
}

#[tokio::test]
async fn supabase_failures_surface_as_database_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctor_working_hours"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let store = Arc::new(SupabaseWorkingHoursStore::new(
        &TestConfig::with_supabase_url(&mock_server.uri()).to_app_config(),
    ));
    let service = WorkingHoursService::new(store);

    let result = service
        .set_working_hours(Uuid::new_v4(), Uuid::new_v4(), weekday_request(30))
        .await;
    assert_matches!(result, Err(DoctorError::Database(_)));
}

#[tokio::test]
async fn supabase_upsert_merges_on_doctor_and_workplace() {
    let mock_server = MockServer::start().await;
    let (doctor_id, workplace_id) = (Uuid::new_v4(), Uuid::new_v4());

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctor_working_hours"))
        .and(query_param("on_conflict", "doctor_id,workplace_id"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::working_hours_response(doctor_id, workplace_id)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(SupabaseWorkingHoursStore::new(
        &TestConfig::with_supabase_url(&mock_server.uri()).to_app_config(),
    ));
    let service = WorkingHoursService::new(store);

    let stored = service
        .set_working_hours(doctor_id, workplace_id, weekday_request(30))
        .await
        .unwrap();
    assert_eq!(stored.doctor_id, doctor_id);

    let requests = mock_server.received_requests().await.unwrap();
    let prefer: Vec<_> = requests[0].headers.get_all("Prefer").iter().collect();
    assert_eq!(prefer.len(), 1);
    assert_eq!(prefer[0], "resolution=merge-duplicates,return=representation");
}
