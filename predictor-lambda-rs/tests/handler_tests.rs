use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;
use serde_json::{json, Value};

use cost_model::PredictionRequest;
use predictor_lambda::{
    EndpointError, HandlerContext, PredictionEndpoint, PredictionRecord, RecordStore,
    RequestHandler, StoreError,
};

mock! {
    pub Store {}

    #[async_trait]
    impl RecordStore for Store {
        async fn put(&self, record: &PredictionRecord) -> Result<(), StoreError>;
    }
}

/// Endpoint that answers every call the same way and counts calls
struct StubEndpoint {
    answer: Result<f64, String>,
    calls: AtomicUsize,
    last_request: std::sync::Mutex<Option<PredictionRequest>>,
}

impl StubEndpoint {
    fn answering(value: f64) -> Arc<Self> {
        Arc::new(Self {
            answer: Ok(value),
            calls: AtomicUsize::new(0),
            last_request: std::sync::Mutex::new(None),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            last_request: std::sync::Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PredictionEndpoint for StubEndpoint {
    fn name(&self) -> &str {
        "stub"
    }

    async fn invoke(&self, request: &PredictionRequest) -> Result<f64, EndpointError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.answer.clone().map_err(EndpointError::Invocation)
    }
}

fn handler(endpoint: Arc<StubEndpoint>, store: MockStore) -> RequestHandler {
    RequestHandler::new(HandlerContext::new(endpoint, Arc::new(store)))
}

fn post(body: Value) -> Value {
    json!({
        "httpMethod": "POST",
        "headers": { "Content-Type": "application/json" },
        "body": body.to_string()
    })
}

#[tokio::test]
async fn test_missing_headcount_is_rejected() {
    let endpoint = StubEndpoint::answering(1.0);
    let mut store = MockStore::new();
    store.expect_put().never();

    let response = handler(endpoint.clone(), store)
        .handle(post(json!({ "avg_salary": 85000, "turnover_rate": 0.15 })))
        .await;

    assert_eq!(response.status_code, 400);
    let body = response.body_json().unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Missing required field: headcount"));
    assert_eq!(endpoint.calls(), 0);
}

#[tokio::test]
async fn test_defaults_are_applied_and_persisted() {
    let endpoint = StubEndpoint::answering(100000.0);
    let mut store = MockStore::new();
    store
        .expect_put()
        .withf(|record: &PredictionRecord| {
            record.department == "General"
                && record.benefits_multiplier == 1.35
                && record.headcount == 1500
                && record.predicted_cost == 100000.0
                && record.confidence_interval_low == 95000.0
                && record.confidence_interval_high == 105000.0
                && record.prediction_id.starts_with("pred_")
        })
        .times(1)
        .returning(|_| Ok(()));

    let input = json!({ "headcount": 1500, "avg_salary": 85000, "turnover_rate": 0.15 });
    let response = handler(endpoint.clone(), store).handle(post(input.clone())).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.headers["Content-Type"], "application/json");

    let body = response.body_json().unwrap();
    assert_eq!(body["predicted_annual_cost"], json!(100000.0));
    assert_eq!(body["confidence_interval"], json!([95000.0, 105000.0]));
    assert_eq!(body["input_parameters"], input);
    assert!(body["prediction_id"].as_str().unwrap().starts_with("pred_"));
    assert!(body["timestamp"].as_i64().unwrap() > 0);

    let sent = endpoint.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(sent.department.as_deref(), Some("General"));
    assert_eq!(sent.benefits_multiplier, 1.35);
}

#[tokio::test]
async fn test_remote_failure_persists_nothing() {
    let endpoint = StubEndpoint::failing("connection reset by peer");
    let mut store = MockStore::new();
    store.expect_put().never();

    let response = handler(endpoint.clone(), store)
        .handle(post(json!({ "headcount": 10, "avg_salary": 50000, "turnover_rate": 0.1 })))
        .await;

    assert_eq!(response.status_code, 500);
    assert_eq!(
        response.body_json().unwrap(),
        json!({ "error": "Internal server error" })
    );
    assert_eq!(endpoint.calls(), 1);
}

#[tokio::test]
async fn test_store_failure_is_server_error() {
    let mut store = MockStore::new();
    store
        .expect_put()
        .times(1)
        .returning(|_| Err(StoreError::Write("throughput exceeded".to_string())));

    let response = handler(StubEndpoint::answering(5000.0), store)
        .handle(post(json!({ "headcount": 10, "avg_salary": 50000, "turnover_rate": 0.1 })))
        .await;

    assert_eq!(response.status_code, 500);
    assert!(!response.body.contains("throughput"));
}

#[tokio::test]
async fn test_non_post_method_is_rejected() {
    let endpoint = StubEndpoint::answering(1.0);
    let mut store = MockStore::new();
    store.expect_put().never();

    let response = handler(endpoint.clone(), store)
        .handle(json!({ "httpMethod": "GET" }))
        .await;

    assert_eq!(response.status_code, 405);
    assert_eq!(
        response.body_json().unwrap(),
        json!({ "error": "Method not allowed" })
    );
    assert_eq!(endpoint.calls(), 0);
}

#[tokio::test]
async fn test_structured_body_without_method() {
    let mut store = MockStore::new();
    store
        .expect_put()
        .withf(|record: &PredictionRecord| record.department == "Sales")
        .times(1)
        .returning(|_| Ok(()));

    let response = handler(StubEndpoint::answering(2500.555), store)
        .handle(json!({
            "body": {
                "headcount": 3,
                "avg_salary": 40000.0,
                "turnover_rate": 0.3,
                "department": "Sales",
                "benefits_multiplier": 1.2
            }
        }))
        .await;

    assert_eq!(response.status_code, 200);
    let body = response.body_json().unwrap();
    let cost = body["predicted_annual_cost"].as_f64().unwrap();
    let band = body["confidence_interval"].as_array().unwrap();
    assert!(band[0].as_f64().unwrap() <= cost);
    assert!(cost <= band[1].as_f64().unwrap());
}

#[tokio::test]
async fn test_invalid_json_body_is_server_error() {
    let endpoint = StubEndpoint::answering(1.0);
    let mut store = MockStore::new();
    store.expect_put().never();

    let response = handler(endpoint.clone(), store)
        .handle(json!({ "httpMethod": "POST", "body": "{\"headcount\": " }))
        .await;

    assert_eq!(response.status_code, 500);
    assert_eq!(endpoint.calls(), 0);
}

#[tokio::test]
async fn test_wrong_field_type_is_client_error() {
    let mut store = MockStore::new();
    store.expect_put().never();

    let response = handler(StubEndpoint::answering(1.0), store)
        .handle(post(json!({ "headcount": "ten", "avg_salary": 50000, "turnover_rate": 0.1 })))
        .await;

    assert_eq!(response.status_code, 400);
    assert_eq!(
        response.body_json().unwrap(),
        json!({ "error": "Invalid value for field: headcount" })
    );
}

#[tokio::test]
async fn test_non_positive_salary_is_client_error() {
    let endpoint = StubEndpoint::answering(1.0);
    let mut store = MockStore::new();
    store.expect_put().never();

    let response = handler(endpoint.clone(), store)
        .handle(post(json!({ "headcount": 12, "avg_salary": 0, "turnover_rate": 0.1 })))
        .await;

    assert_eq!(response.status_code, 400);
    assert_eq!(
        response.body_json().unwrap(),
        json!({ "error": "Invalid value for field: avg_salary" })
    );
    assert_eq!(endpoint.calls(), 0);
}

#[tokio::test]
async fn test_whole_float_headcount_is_served() {
    let mut store = MockStore::new();
    store
        .expect_put()
        .withf(|record: &PredictionRecord| record.headcount == 1500)
        .times(1)
        .returning(|_| Ok(()));

    let response = handler(StubEndpoint::answering(1000.0), store)
        .handle(post(json!({ "headcount": 1500.0, "avg_salary": 85000, "turnover_rate": 0.15 })))
        .await;

    assert_eq!(response.status_code, 200);
}

#[tokio::test]
async fn test_unencodable_prediction_is_server_error_without_record() {
    let mut store = MockStore::new();
    store.expect_put().never();

    let response = handler(StubEndpoint::answering(f64::NAN), store)
        .handle(post(json!({ "headcount": 10, "avg_salary": 50000, "turnover_rate": 0.1 })))
        .await;

    assert_eq!(response.status_code, 500);
    assert_eq!(
        response.body_json().unwrap(),
        json!({ "error": "Internal server error" })
    );
}
