use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use solarcool::application::dataset::{
    ClassCounts, DatasetAssembler, DatasetSummary, balance_classes,
};
use solarcool::application::ml::{ModelTrainer, TrainingConfig};
use solarcool::config::Config;
use solarcool::domain::config::LabelProfile;
use solarcool::domain::cooling::regions::TRAINING_REGION_KEYS;
use solarcool::domain::ml::feature_registry::canonical_name;
use solarcool::infrastructure::persistence::{load_observations, read_labeled_dataset};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Train the cooling classifier")]
struct Args {
    /// Directory holding <region>_data.csv files (defaults to SOLARCOOL_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Train on an already labeled CSV instead of labeling raw region files
    #[arg(long)]
    labeled: Option<PathBuf>,

    /// Path to output model file (defaults to SOLARCOOL_MODEL_PATH)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Label profile used when labeling raw data
    #[arg(long, default_value = "high_irradiance")]
    profile: LabelProfile,

    /// Number of trees in the random forest
    #[arg(long, default_value_t = 100)]
    n_trees: u16,

    /// Maximum depth of trees
    #[arg(long, default_value_t = 10)]
    max_depth: u16,

    /// Minimum samples required to split an internal node
    #[arg(long, default_value_t = 2)]
    min_split: usize,

    /// Share of each class held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    test_fraction: f64,

    /// Random seed (defaults to SOLARCOOL_SEED)
    #[arg(long)]
    seed: Option<u64>,

    /// Comma separated feature order persisted with the model
    #[arg(long, default_value = "ambient_temp_c,irradiance_wm2,panel_temp_c,hour")]
    features: String,

    /// Skip minority upsampling before the split
    #[arg(long)]
    no_balance: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let args = Args::parse();
    let config = Config::from_env()
        .context("Failed to load configuration")?
        .with_label_profile(args.profile)?;
    let seed = args.seed.unwrap_or(config.seed);
    let model_path = args.output.unwrap_or_else(|| config.model_path.clone());
    let mut rng = StdRng::seed_from_u64(seed);

    let samples = match &args.labeled {
        Some(path) => {
            println!("Loading labeled data from {:?}", path);
            read_labeled_dataset(path)?
        }
        None => {
            let data_dir = args.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());
            println!("Loading raw region data from {:?}", data_dir);
            let observations = load_observations(&data_dir, TRAINING_REGION_KEYS)?;
            let assembler = DatasetAssembler::new(config.constants, config.label_config);
            assembler.build(&observations, &mut rng)
        }
    };

    println!("\n{}\n", DatasetSummary::from_samples(&samples));

    let samples = if args.no_balance {
        samples
    } else {
        let before = ClassCounts::of(&samples);
        let balanced = balance_classes(samples, &mut rng)?;
        let after = ClassCounts::of(&balanced);
        info!(
            "Balanced classes: {}/{} -> {}/{}",
            before.negative, before.positive, after.negative, after.positive
        );
        balanced
    };

    let feature_names: Vec<String> = args
        .features
        .split(',')
        .map(|s| canonical_name(s.trim()).to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let training_config = TrainingConfig {
        n_trees: args.n_trees,
        max_depth: args.max_depth,
        min_samples_split: args.min_split,
        test_fraction: args.test_fraction,
        seed,
        class_balanced: !args.no_balance,
        feature_names,
    };
    println!(
        "Training random forest ({} trees, depth {}) on {} samples...",
        training_config.n_trees,
        training_config.max_depth,
        samples.len()
    );

    let outcome = ModelTrainer::new(training_config).train(&samples)?;
    println!(
        "Train size: {}, Test size: {}",
        outcome.train_size, outcome.test_size
    );

    match &outcome.report {
        Some(report) => {
            println!("\n══════════════════════════════════════════════════════");
            println!("  MODEL PERFORMANCE");
            println!("══════════════════════════════════════════════════════");
            println!("{}", report);
            println!("══════════════════════════════════════════════════════\n");
        }
        None => println!("No held-out split; skipping evaluation."),
    }

    outcome.classifier.save(&model_path)?;
    println!(
        "Model (features: {}) saved to {:?}",
        outcome.classifier.feature_names().join(", "),
        model_path
    );

    Ok(())
}
