use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use solarcool::application::dataset::{DatasetAssembler, DatasetSummary};
use solarcool::config::Config;
use solarcool::domain::config::LabelProfile;
use solarcool::domain::cooling::regions::select_regions;
use solarcool::domain::ports::WeatherProvider;
use solarcool::infrastructure::NasaPowerClient;
use solarcool::infrastructure::persistence::{
    LABELED_DATASET_FILE, load_observations, raw_data_path, write_labeled_dataset,
    write_region_records,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch regional weather and build a labeled cooling dataset")]
struct Args {
    /// Regions to include: "all" or comma separated keys (e.g. phoenix,miami)
    #[arg(short, long, default_value = "all")]
    regions: String,

    /// Start date (YYYY-MM-DD)
    #[arg(long, default_value = "2022-06-01")]
    start: NaiveDate,

    /// End date (YYYY-MM-DD)
    #[arg(long, default_value = "2022-06-30")]
    end: NaiveDate,

    /// Output directory (defaults to SOLARCOOL_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Label profile: regional or high_irradiance (defaults to SOLARCOOL_LABEL_PROFILE)
    #[arg(long)]
    profile: Option<LabelProfile>,

    /// Random seed for the synthetic labels (defaults to SOLARCOOL_SEED)
    #[arg(long)]
    seed: Option<u64>,

    /// Label from existing <region>_data.csv files instead of fetching
    #[arg(long)]
    skip_fetch: bool,

    /// Label rows in parallel with per-row seeds
    #[arg(long)]
    parallel: bool,

    /// Pause between region requests (milliseconds)
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let args = Args::parse();
    if args.end < args.start {
        anyhow::bail!("End date {} is before start date {}", args.end, args.start);
    }

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(profile) = args.profile {
        config = config.with_label_profile(profile)?;
    }
    let data_dir = args.data_dir.unwrap_or_else(|| config.data_dir.clone());
    let seed = args.seed.unwrap_or(config.seed);

    let regions = select_regions(&args.regions).map_err(anyhow::Error::msg)?;
    info!(
        "Building dataset for {} regions, {} -> {} (profile: {}, seed: {})",
        regions.len(),
        args.start,
        args.end,
        config.label_profile,
        seed
    );

    if !args.skip_fetch {
        let client = NasaPowerClient::new();
        let mut fetched = 0usize;
        for (i, region) in regions.iter().enumerate() {
            if i > 0 && args.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(args.delay_ms)).await;
            }
            info!("Fetching {} ({})", region.name, region.description);
            match client
                .fetch_range(region.latitude, region.longitude, args.start, args.end)
                .await
            {
                Ok(records) if records.is_empty() => {
                    warn!("No data returned for {}", region.name);
                }
                Ok(records) => {
                    write_region_records(&raw_data_path(&data_dir, region.key), &records)?;
                    fetched += 1;
                }
                // One failed region does not abort the run.
                Err(e) => error!("Failed to fetch {}: {}", region.name, e),
            }
        }
        info!("Fetched {}/{} regions", fetched, regions.len());
    }

    let keys: Vec<&str> = regions.iter().map(|r| r.key).collect();
    let observations = load_observations(&data_dir, &keys)
        .with_context(|| format!("No usable raw data in {}", data_dir.display()))?;

    let assembler = DatasetAssembler::new(config.constants, config.label_config);
    let samples = if args.parallel {
        assembler.build_parallel(&observations, seed)
    } else {
        let mut rng = StdRng::seed_from_u64(seed);
        assembler.build(&observations, &mut rng)
    };
    if samples.is_empty() {
        anyhow::bail!("Pre-filter removed every row; nothing to label");
    }

    let summary = DatasetSummary::from_samples(&samples);
    println!("\n══════════════════════════════════════════════════════");
    println!("  DATASET SUMMARY");
    println!("══════════════════════════════════════════════════════");
    println!("{}", summary);
    println!("══════════════════════════════════════════════════════\n");

    let output = data_dir.join(LABELED_DATASET_FILE);
    write_labeled_dataset(&output, &samples)?;
    println!("Dataset saved to {:?}", output);

    Ok(())
}
