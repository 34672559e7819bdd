//! End-to-end properties of the risk engine: bounded probabilities, tier
//! consistency, persistence round-trips and load-failure recovery.

use fire_risk_core::model::{self, Regressor, TrainOptions};
use fire_risk_core::{
    EngineConfig, FeatureVector, ForestParams, Impact, ModelKind, ModelSource, RiskEngine,
    RiskLevel, SyntheticGenerator,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fs;
use std::path::Path;

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Smaller forest so each engine builds quickly in debug test runs
fn quick_config(path: &Path) -> EngineConfig {
    EngineConfig {
        model: ModelKind::Forest(ForestParams {
            n_trees: 20,
            ..ForestParams::default()
        }),
        ..EngineConfig::with_model_path(path)
    }
}

#[test]
fn test_predictions_are_bounded_and_tiers_consistent() {
    let dir = tempfile::tempdir().unwrap();
    let engine = RiskEngine::initialize(quick_config(&dir.path().join("model.bin"))).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(99);
    for _ in 0..500 {
        // Deliberately wider than the sensor ranges
        let features = FeatureVector::new(
            rng.random_range(-20.0..70.0),
            rng.random_range(-10.0..120.0),
            rng.random_range(0.0..150.0),
            rng.random_range(0.0..60.0),
            rng.random_range(-0.5..1.5),
        );
        let result = engine.predict(&features).unwrap();

        assert!(
            (0.0..=1.0).contains(&result.probability),
            "probability {} out of range for {:?}",
            result.probability,
            features
        );
        assert_eq!(result.risk_level, RiskLevel::from_probability(result.probability));
        assert_eq!(
            result.alert,
            matches!(result.risk_level, RiskLevel::High | RiskLevel::Critical)
        );
        assert_eq!(result.analysis.len(), 5);
    }
}

#[test]
fn test_extreme_conditions_rank_above_benign() {
    let dir = tempfile::tempdir().unwrap();
    let engine = RiskEngine::initialize(quick_config(&dir.path().join("model.bin"))).unwrap();

    let extreme = engine
        .predict(&FeatureVector::new(44.0, 12.0, 48.0, 0.5, 0.95))
        .unwrap();
    let benign = engine
        .predict(&FeatureVector::new(12.0, 85.0, 3.0, 18.0, 0.1))
        .unwrap();

    assert!(extreme.probability > benign.probability);
    assert!(extreme.alert, "extreme conditions should alert: {extreme:?}");
    assert_eq!(benign.risk_level, RiskLevel::Low);
}

#[test]
fn test_maximal_inputs_are_all_high_impact() {
    let features = FeatureVector::new(45.0, 10.0, 50.0, 0.0, 1.0);
    let analysis = fire_risk_core::analyze(&features);

    assert!(analysis.iter().all(|entry| entry.impact == Impact::High));

    let total: f64 = analysis.iter().map(|entry| entry.contribution).sum();
    let formula = fire_risk_core::normalize(&features).weighted_sum();
    assert!(
        (total - formula).abs() < 0.025,
        "rounded contributions {total} should match formula {formula}"
    );
}

#[test]
fn test_forest_reaches_r2_threshold() {
    let corpus = SyntheticGenerator::default().generate(1000).unwrap();
    let (_, report) = model::train(
        &corpus,
        &TrainOptions {
            kind: ModelKind::default(),
            test_fraction: 0.2,
            seed: 42,
        },
    )
    .unwrap();

    assert_eq!(report.n_test, 200);
    let r2 = report.r2.unwrap();
    assert!(r2 >= 0.8, "held-out R^2 {r2} below 0.8");
}

#[test]
fn test_generation_is_reproducible() {
    let a = SyntheticGenerator::default().generate(1000).unwrap();
    let b = SyntheticGenerator::default().generate(1000).unwrap();

    let bits = |corpus: &fire_risk_core::TrainingCorpus| -> Vec<u64> {
        corpus
            .features
            .iter()
            .flat_map(FeatureVector::as_array)
            .chain(corpus.labels.iter().copied())
            .map(f64::to_bits)
            .collect()
    };
    assert_eq!(bits(&a), bits(&b));
}

#[test]
fn test_persistence_round_trip_preserves_predictions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.bin");
    let corpus = SyntheticGenerator::default().generate(400).unwrap();
    let (trained, _) = model::train(
        &corpus,
        &TrainOptions {
            kind: ModelKind::Forest(ForestParams {
                n_trees: 10,
                ..ForestParams::default()
            }),
            test_fraction: 0.2,
            seed: 42,
        },
    )
    .unwrap();

    let probe = FeatureVector::new(33.0, 28.0, 22.0, 4.0, 0.7);
    let before = trained.predict(&probe);

    model::save(&trained, &path).unwrap();
    let loaded = model::load(&path).unwrap();

    assert!((loaded.predict(&probe) - before).abs() < 1e-12);
}

#[test]
fn test_initialize_reuses_persisted_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let config = quick_config(&dir.path().join("model.bin"));

    let first = RiskEngine::initialize(config.clone()).unwrap();
    assert!(matches!(first.source(), ModelSource::Trained(_)));
    assert!(config.model_path.exists());

    let second = RiskEngine::initialize(config).unwrap();
    assert_eq!(second.source(), ModelSource::Loaded);
    assert_eq!(second.model(), first.model());
}

#[test]
fn test_corrupt_artifact_falls_back_to_training() {
    let dir = tempfile::tempdir().unwrap();
    let config = quick_config(&dir.path().join("model.bin"));
    fs::write(&config.model_path, b"\x00\x01 not a model \xff").unwrap();

    let engine = RiskEngine::initialize(config.clone()).unwrap();
    assert!(matches!(engine.source(), ModelSource::Trained(_)));

    // The corrupt file was replaced with a loadable artifact
    assert!(model::load(&config.model_path).is_ok());
    let result = engine
        .predict(&FeatureVector::new(30.0, 40.0, 20.0, 5.0, 0.5))
        .unwrap();
    assert!((0.0..=1.0).contains(&result.probability));
}

#[test]
fn test_deleted_artifact_falls_back_to_training() {
    let dir = tempfile::tempdir().unwrap();
    let config = quick_config(&dir.path().join("model.bin"));

    RiskEngine::initialize(config.clone()).unwrap();
    fs::remove_file(&config.model_path).unwrap();

    let engine = RiskEngine::initialize(config.clone()).unwrap();
    assert!(matches!(engine.source(), ModelSource::Trained(_)));
    assert!(config.model_path.exists());
}

#[test]
fn test_unwritable_path_still_serves_from_memory() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where a directory is expected makes persisting fail
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"").unwrap();
    let config = quick_config(&blocker.join("model.bin"));

    let engine = RiskEngine::initialize(config).unwrap();
    assert!(matches!(engine.source(), ModelSource::Trained(_)));
    assert!(engine
        .predict(&FeatureVector::new(25.0, 50.0, 10.0, 5.0, 0.5))
        .is_ok());
}

#[test]
fn test_retrain_replaces_model_and_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let config = quick_config(&dir.path().join("model.bin"));
    fs::write(&config.model_path, b"stale").unwrap();

    let mut engine = RiskEngine::initialize(config.clone()).unwrap();
    let report = engine.retrain().unwrap();

    assert_eq!(engine.source(), ModelSource::Trained(report));
    assert_eq!(&model::load(&config.model_path).unwrap(), engine.model());
}

#[test]
fn test_zero_samples_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig {
        n_samples: 0,
        ..quick_config(&dir.path().join("model.bin"))
    };
    assert!(RiskEngine::initialize(config).is_err());
}

#[test]
fn test_engine_shared_across_threads() {
    let dir = tempfile::tempdir().unwrap();
    let engine = RiskEngine::initialize(quick_config(&dir.path().join("model.bin"))).unwrap();
    let probe = FeatureVector::new(35.0, 20.0, 30.0, 2.0, 0.6);
    let expected = engine.predict(&probe).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| engine.predict(&probe).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
