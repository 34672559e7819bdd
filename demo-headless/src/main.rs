use clap::Parser;
use fire_risk_core::{
    EngineConfig, FeatureVector, ForestParams, ModelKind, ModelSource, PredictionResult,
    RiskEngine,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Wildfire risk scoring demo
#[derive(Parser, Debug)]
#[command(name = "fire-risk-demo")]
#[command(about = "Score wildfire risk from environmental readings", long_about = None)]
struct Args {
    /// Temperature in °C
    #[arg(short, long, default_value_t = 30.0, allow_negative_numbers = true)]
    temperature: f64,

    /// Relative humidity in %
    #[arg(long, default_value_t = 30.0)]
    humidity: f64,

    /// Wind speed in km/h
    #[arg(short, long, default_value_t = 20.0)]
    wind_speed: f64,

    /// Rainfall in mm
    #[arg(short, long, default_value_t = 2.0)]
    rainfall: f64,

    /// Vegetation density (0-1)
    #[arg(short, long, default_value_t = 0.5)]
    vegetation: f64,

    /// Model artifact path
    #[arg(short, long, env = "FIRE_RISK_MODEL_PATH", default_value = "forest_fire_model.bin")]
    model_path: PathBuf,

    /// Train a new model and overwrite the artifact before predicting
    #[arg(long)]
    retrain: bool,

    /// Use the least squares backend instead of the random forest
    #[arg(long)]
    linear: bool,

    /// Number of trees in the forest
    #[arg(long, default_value_t = 100)]
    trees: usize,

    /// Synthetic training corpus size
    #[arg(long, default_value_t = 1000)]
    samples: usize,

    /// Seed for corpus generation and the train/test split
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        let model = if self.linear {
            ModelKind::Linear
        } else {
            ModelKind::Forest(ForestParams {
                n_trees: self.trees,
                ..ForestParams::default()
            })
        };
        EngineConfig {
            n_samples: self.samples,
            seed: self.seed,
            model,
            ..EngineConfig::with_model_path(&self.model_path)
        }
    }

    fn features(&self) -> FeatureVector {
        FeatureVector::new(
            self.temperature,
            self.humidity,
            self.wind_speed,
            self.rainfall,
            self.vegetation,
        )
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut engine = match RiskEngine::initialize(args.engine_config()) {
        Ok(engine) => engine,
        Err(e) => {
            error!("No usable model: {e}");
            return ExitCode::FAILURE;
        }
    };

    // A freshly trained engine already wrote its artifact
    if args.retrain && engine.source() == ModelSource::Loaded {
        if let Err(e) = engine.retrain() {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    }

    let result = match engine.predict(&args.features()) {
        Ok(result) => result,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("Failed to encode result: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_report(&args, &engine, &result);
    }

    ExitCode::SUCCESS
}

fn print_report(args: &Args, engine: &RiskEngine, result: &PredictionResult) {
    println!("=== Wildfire Risk Assessment ===\n");
    println!(
        "Temp: {:.1}°C, Humidity: {:.1}%, Wind: {:.1} km/h, Rain: {:.1} mm, Vegetation: {:.2}",
        args.temperature, args.humidity, args.wind_speed, args.rainfall, args.vegetation
    );
    match engine.source() {
        ModelSource::Loaded => println!(
            "Model: {} (loaded from {})\n",
            engine.model().kind_name(),
            engine.config().model_path.display()
        ),
        ModelSource::Trained(report) => println!(
            "Model: {} (trained on {} examples, R^2 {})\n",
            engine.model().kind_name(),
            report.n_train,
            report
                .r2
                .map_or_else(|| "n/a".to_string(), |r2| format!("{r2:.4}"))
        ),
    }

    println!("Risk probability: {:.3}", result.probability);
    println!("Risk level:       {}", result.risk_level);
    if result.alert {
        println!("ALERT: elevated fire danger");
    }

    println!("\nFeature          | Contribution | Impact");
    println!("-----------------|--------------|---------");
    for entry in &result.analysis {
        println!(
            "{:16} | {:12.2} | {}",
            entry.feature.label(),
            entry.contribution,
            entry.impact
        );
    }
}
