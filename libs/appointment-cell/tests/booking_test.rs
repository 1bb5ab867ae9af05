use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_models::account::AccountType;
use shared_utils::test_utils::{MockStoreResponses, TestConfig, TestUser};

use appointment_cell::router::appointment_routes;

// 2026-08-31 is a Monday; 2026-09-06 is a Sunday.
const MONDAY: &str = "2026-08-31";
const SUNDAY: &str = "2026-09-06";

struct BookingFixture {
    server: MockServer,
    config: TestConfig,
    patient: TestUser,
    doctor_id: Uuid,
}

impl BookingFixture {
    async fn new() -> Self {
        let server = MockServer::start().await;
        let config = TestConfig::with_store_url(&server.uri());
        let patient = TestUser::new("patient@example.com", AccountType::Patient);
        Self {
            server,
            config,
            patient,
            doctor_id: Uuid::new_v4(),
        }
    }

    /// The doctor lookup used by every booking attempt: stock
    /// Monday-Friday 09:00-17:00 schedule.
    async fn mount_doctor(&self) {
        Mock::given(method("POST"))
            .and(path("/action/findOne"))
            .and(body_partial_json(json!({ "collection": "doctors" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                MockStoreResponses::found_one(MockStoreResponses::doctor_doc(
                    &self.doctor_id,
                    &Uuid::new_v4(),
                )),
            ))
            .mount(&self.server)
            .await;
    }

    /// Lock acquisition and release around the overlap check.
    async fn mount_lock(&self) {
        Mock::given(method("POST"))
            .and(path("/action/insertOne"))
            .and(body_partial_json(json!({ "collection": "booking_locks" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                MockStoreResponses::inserted("booking:lock"),
            ))
            .mount(&self.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/action/deleteOne"))
            .and(body_partial_json(json!({ "collection": "booking_locks" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(MockStoreResponses::deleted(1)),
            )
            .mount(&self.server)
            .await;
    }

    async fn mount_existing_appointments(&self, documents: Vec<Value>) {
        Mock::given(method("POST"))
            .and(path("/action/find"))
            .and(body_partial_json(json!({ "collection": "appointments" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(MockStoreResponses::found(documents)),
            )
            .mount(&self.server)
            .await;
    }

    async fn mount_insert_and_populate(&self) {
        Mock::given(method("POST"))
            .and(path("/action/insertOne"))
            .and(body_partial_json(json!({ "collection": "appointments" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                MockStoreResponses::inserted(&Uuid::new_v4().to_string()),
            ))
            .mount(&self.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/action/findOne"))
            .and(body_partial_json(json!({ "collection": "users" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                MockStoreResponses::found_one(MockStoreResponses::user_doc(
                    &self.patient.id,
                    "Pat",
                    &self.patient.email,
                    "Patient",
                )),
            ))
            .mount(&self.server)
            .await;
    }

    fn book_request(&self, date: &str, start: &str, end: &str) -> Request<Body> {
        let token = self.patient.token(&self.config.jwt_secret);
        Request::builder()
            .method("POST")
            .uri("/book-appointment")
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", token))
            .body(Body::from(
                json!({
                    "user": self.patient.id.to_string(),
                    "doctor": self.doctor_id.to_string(),
                    "date": date,
                    "timeSlot": { "start": start, "end": end },
                })
                .to_string(),
            ))
            .unwrap()
    }

    async fn book(&self, date: &str, start: &str, end: &str) -> (StatusCode, Value) {
        let app = appointment_routes(self.config.to_arc());
        let response = app
            .oneshot(self.book_request(date, start, end))
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        (status, json)
    }
}

#[tokio::test]
async fn booking_a_free_slot_is_created() {
    let fixture = BookingFixture::new().await;
    fixture.mount_doctor().await;
    fixture.mount_lock().await;
    fixture.mount_existing_appointments(vec![]).await;
    fixture.mount_insert_and_populate().await;

    let (status, body) = fixture.book(MONDAY, "10:00", "10:30").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["appointment"]["timeSlot"]["start"], "10:00");
    assert_eq!(body["appointment"]["patient"]["email"], fixture.patient.email);
}

#[tokio::test]
async fn overlapping_slot_is_rejected_with_conflict() {
    let fixture = BookingFixture::new().await;
    fixture.mount_doctor().await;
    fixture.mount_lock().await;
    fixture
        .mount_existing_appointments(vec![MockStoreResponses::appointment_doc(
            &Uuid::new_v4(),
            &Uuid::new_v4(),
            &fixture.doctor_id,
            MONDAY,
            "10:00",
            "10:30",
        )])
        .await;

    let (status, body) = fixture.book(MONDAY, "10:15", "10:45").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "This time slot is already booked for the selected doctor."
    );
}

#[tokio::test]
async fn touching_slot_is_not_an_overlap() {
    let fixture = BookingFixture::new().await;
    fixture.mount_doctor().await;
    fixture.mount_lock().await;
    fixture
        .mount_existing_appointments(vec![MockStoreResponses::appointment_doc(
            &Uuid::new_v4(),
            &Uuid::new_v4(),
            &fixture.doctor_id,
            MONDAY,
            "10:00",
            "10:30",
        )])
        .await;
    fixture.mount_insert_and_populate().await;

    // Starts exactly where the existing booking ends.
    let (status, _) = fixture.book(MONDAY, "10:30", "10:50").await;

    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn booking_on_an_unavailable_day_is_rejected() {
    let fixture = BookingFixture::new().await;
    fixture.mount_doctor().await;

    let (status, body) = fixture.book(SUNDAY, "10:00", "10:30").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Sunday"));
}

#[tokio::test]
async fn booking_outside_the_doctors_window_is_rejected() {
    let fixture = BookingFixture::new().await;
    fixture.mount_doctor().await;

    let (status, body) = fixture.book(MONDAY, "08:00", "08:30").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("09:00"));
}

#[tokio::test]
async fn forty_five_minute_slot_is_accepted_at_the_upper_bound() {
    let fixture = BookingFixture::new().await;
    fixture.mount_doctor().await;
    fixture.mount_lock().await;
    fixture.mount_existing_appointments(vec![]).await;
    fixture.mount_insert_and_populate().await;

    let (status, body) = fixture.book(MONDAY, "10:00", "10:45").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["appointment"]["timeSlot"]["end"], "10:45");
}

#[tokio::test]
async fn fifteen_minute_slot_is_accepted_at_the_lower_bound() {
    let fixture = BookingFixture::new().await;
    fixture.mount_doctor().await;
    fixture.mount_lock().await;
    fixture.mount_existing_appointments(vec![]).await;
    fixture.mount_insert_and_populate().await;

    let (status, _) = fixture.book(MONDAY, "10:00", "10:15").await;

    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn duration_outside_fifteen_to_forty_five_minutes_is_rejected() {
    let fixture = BookingFixture::new().await;
    fixture.mount_doctor().await;

    let (too_long, _) = fixture.book(MONDAY, "10:00", "10:46").await;
    assert_eq!(too_long, StatusCode::BAD_REQUEST);

    let (too_short, _) = fixture.book(MONDAY, "10:00", "10:10").await;
    assert_eq!(too_short, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_fields_are_a_validation_error() {
    let fixture = BookingFixture::new().await;
    let token = fixture.patient.token(&fixture.config.jwt_secret);

    let app = appointment_routes(fixture.config.to_arc());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/book-appointment")
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::from(
                    json!({ "doctor": fixture.doctor_id.to_string() }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn booking_for_another_patient_is_forbidden() {
    let fixture = BookingFixture::new().await;
    let other = TestUser::new("other@example.com", AccountType::Patient);
    let token = other.token(&fixture.config.jwt_secret);

    let app = appointment_routes(fixture.config.to_arc());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/book-appointment")
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::from(
                    json!({
                        "user": fixture.patient.id.to_string(),
                        "doctor": fixture.doctor_id.to_string(),
                        "date": MONDAY,
                        "timeSlot": { "start": "10:00", "end": "10:30" },
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn booking_requires_a_token() {
    let fixture = BookingFixture::new().await;

    let app = appointment_routes(fixture.config.to_arc());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/book-appointment")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_doctor_is_not_found() {
    let fixture = BookingFixture::new().await;
    Mock::given(method("POST"))
        .and(path("/action/findOne"))
        .and(body_partial_json(json!({ "collection": "doctors" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockStoreResponses::found_none()),
        )
        .mount(&fixture.server)
        .await;

    let (status, body) = fixture.book(MONDAY, "10:00", "10:30").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn booked_slots_are_grouped_by_date() {
    let fixture = BookingFixture::new().await;
    let tuesday = "2026-09-01";
    fixture
        .mount_existing_appointments(vec![
            MockStoreResponses::appointment_doc(
                &Uuid::new_v4(),
                &Uuid::new_v4(),
                &fixture.doctor_id,
                MONDAY,
                "10:00",
                "10:30",
            ),
            MockStoreResponses::appointment_doc(
                &Uuid::new_v4(),
                &Uuid::new_v4(),
                &fixture.doctor_id,
                MONDAY,
                "11:00",
                "11:30",
            ),
            MockStoreResponses::appointment_doc(
                &Uuid::new_v4(),
                &Uuid::new_v4(),
                &fixture.doctor_id,
                tuesday,
                "09:00",
                "09:30",
            ),
        ])
        .await;

    let app = appointment_routes(fixture.config.to_arc());
    let response = app
        .oneshot(
            Request::builder()
                .uri(&format!("/available-appointment/{}", fixture.doctor_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    let slots = &json["bookedTimeSlots"];
    assert!(json.get("bookedTimeSlots").is_some());
    assert_eq!(slots[MONDAY]["timeSlots"].as_array().unwrap().len(), 2);
    assert_eq!(slots[tuesday]["timeSlots"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_an_unknown_appointment_is_not_found() {
    let fixture = BookingFixture::new().await;
    Mock::given(method("POST"))
        .and(path("/action/findOne"))
        .and(body_partial_json(json!({ "collection": "appointments" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockStoreResponses::found_none()),
        )
        .mount(&fixture.server)
        .await;

    let token = fixture.patient.token(&fixture.config.jwt_secret);
    let app = appointment_routes(fixture.config.to_arc());
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/delete-appointment/{}", Uuid::new_v4()))
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
