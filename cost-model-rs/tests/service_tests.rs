//! Prediction service behaviour against a loaded artifact pair

use std::sync::Arc;
use std::thread;

use cost_model::{
    ArtifactStore, BoosterParams, CategoricalEncoder, FeatureEncoder, FeatureSchema,
    PredictionRequest, PredictionService, RegressionModel, round2,
};

fn departments() -> Vec<&'static str> {
    vec!["Engineering", "Finance", "Operations", "Sales"]
}

fn trained_service() -> PredictionService {
    let encoder = CategoricalEncoder::fit(departments());
    let schema = FeatureSchema::with_department();
    let features = FeatureEncoder::new(&schema, &encoder);

    let mut rows = Vec::new();
    let mut targets = Vec::new();
    for i in 0..60u64 {
        let department = departments()[(i % 4) as usize];
        let headcount = 20 + i * 7;
        let salary = 45000.0 + (i % 9) as f64 * 5000.0;
        let turnover = 0.05 + (i % 5) as f64 * 0.03;
        let request = PredictionRequest::new(headcount, salary, turnover).with_department(department);
        rows.push(features.encode(&request).unwrap());
        targets.push(headcount as f64 * salary * 1.35 * (1.0 + turnover * 0.5));
    }

    let model = RegressionModel::fit(schema.clone(), &rows, &targets, BoosterParams::default())
        .unwrap();
    PredictionService::new(model, encoder)
}

#[test]
fn test_unseen_department_still_predicts() {
    let service = trained_service();
    let known = PredictionRequest::new(200, 60000.0, 0.1).with_department("Engineering");
    let unseen = PredictionRequest::new(200, 60000.0, 0.1).with_department("Astronautics");

    let prediction = service.predict(&unseen).unwrap();
    assert!(prediction.predicted_cost.is_finite());

    // "Engineering" sorts first, so it shares the fallback code
    assert_eq!(service.predict_raw(&unseen).unwrap(), service.predict_raw(&known).unwrap());
}

#[test]
fn test_band_matches_rounded_prediction() {
    let service = trained_service();
    let prediction = service
        .predict(&PredictionRequest::new(350, 72000.0, 0.18).with_department("Sales"))
        .unwrap();

    let cost = prediction.predicted_cost;
    assert_eq!(prediction.confidence_interval.low, round2(cost * 0.95));
    assert_eq!(prediction.confidence_interval.high, round2(cost * 1.05));
    assert!(cost >= 0.0);
    assert!(prediction.confidence_interval.low <= cost && cost <= prediction.confidence_interval.high);
}

#[test]
fn test_loaded_service_matches_trained_service() {
    let service = trained_service();
    let tmp_dir = tempfile::tempdir().expect("tempdir");
    ArtifactStore::new(tmp_dir.path())
        .save(service.model(), service.encoder())
        .unwrap();

    let loaded = PredictionService::load(tmp_dir.path()).unwrap();
    let request = PredictionRequest::new(120, 58000.0, 0.2).with_department("Finance");

    assert_eq!(
        loaded.predict_raw(&request).unwrap(),
        service.predict_raw(&request).unwrap()
    );
}

#[test]
fn test_concurrent_reads_leave_state_untouched() {
    let service = Arc::new(trained_service());
    let schema_before = service.model().schema().clone();
    let encoder_before = service.encoder().clone();

    let request = PredictionRequest::new(500, 90000.0, 0.12).with_department("Operations");
    let expected = service.predict_raw(&request).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let service = Arc::clone(&service);
            let request = request.clone();
            thread::spawn(move || {
                (0..50)
                    .map(|i| {
                        // interleave other departments so threads hit different paths
                        let other = PredictionRequest::new(10 + worker * 10 + i, 40000.0, 0.3)
                            .with_department(if i % 2 == 0 { "Sales" } else { "Unknown" });
                        service.predict_raw(&other).unwrap();
                        service.predict_raw(&request).unwrap()
                    })
                    .collect::<Vec<f64>>()
            })
        })
        .collect();

    for handle in handles {
        for value in handle.join().expect("worker panicked") {
            assert_eq!(value, expected);
        }
    }

    assert_eq!(service.model().schema(), &schema_before);
    assert_eq!(service.encoder(), &encoder_before);
}
