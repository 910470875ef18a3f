use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Timelike};
use clap::{Parser, Subcommand};
use solarcool::application::cooling_advisor::{CoolingAdvisor, CoolingReport};
use solarcool::application::ml::{CoolingPredictor, ModelVerdict, SmartCorePredictor};
use solarcool::config::Config;
use solarcool::domain::cooling::decision::break_even_irradiance;
use solarcool::infrastructure::{NasaPowerClient, NominatimGeocoder};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Should the panel be cooled right now?")]
struct Cli {
    /// Model file (defaults to SOLARCOOL_MODEL_PATH)
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a place and evaluate one hour of its weather
    Check {
        /// Place name, e.g. "Phoenix, AZ"
        #[arg(long)]
        place: String,

        /// Date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Hour of day 0-23; defaults to the current hour
        #[arg(long)]
        hour: Option<u32>,
    },
    /// Evaluate manually entered conditions
    Manual {
        /// Ambient temperature (°C)
        #[arg(long, allow_hyphen_values = true)]
        ambient: f64,

        /// Solar irradiance (W/m²)
        #[arg(long, allow_hyphen_values = true)]
        irradiance: f64,

        /// Hour of day 0-23
        #[arg(long, default_value_t = 12)]
        hour: u32,
    },
    /// Irradiance above which cooling pays off, per ambient temperature
    BreakEven {
        #[arg(long, value_delimiter = ',', default_value = "10,20,25,30,35,40,45")]
        ambient: Vec<f64>,
    },
}

fn print_report(report: &CoolingReport) {
    println!("\n══════════════════════════════════════════════════════");
    match (&report.location, report.date) {
        (Some(loc), Some(date)) => {
            println!("  {} on {} at {:02}:00", loc.display_name, date, report.hour)
        }
        _ => println!("  Manual input at {:02}:00", report.hour),
    }
    println!("══════════════════════════════════════════════════════");
    println!("  Ambient temperature: {:.2} °C", report.reading.ambient_temp_c);
    println!("  Irradiance:          {:.1} W/m²", report.reading.irradiance_wm2);

    let state = &report.physics.state;
    let decision = &report.physics.decision;
    println!("\n  Panel temperature:   {:.2} °C", state.panel_temp_c);
    println!("  Power (no cooling):  {:.3} W", state.uncooled_power_w);
    println!("  Power (cooled):      {:.3} W", state.cooled_power_w);
    println!("  Energy gain:         {:.3} W", decision.energy_gain_w);
    println!("  Pump cost:           {:.3} W", decision.cooling_cost_w);
    println!("  Net gain:            {:+.3} W", decision.net_gain_w());

    let verdict = |cool: bool| if cool { "COOL" } else { "DO NOT COOL" };
    println!("\n  Physics decision:    {}", verdict(decision.should_cool));
    match &report.model {
        ModelVerdict::Predicted(cool) => println!("  ML prediction:       {}", verdict(*cool)),
        ModelVerdict::Unavailable(reason) => {
            println!("  ML prediction:       unavailable ({})", reason)
        }
    }
    match report.model_agrees() {
        Some(true) => println!("  Model agrees with physics."),
        Some(false) => println!("  Model DISAGREES with physics."),
        None => {}
    }
    println!("══════════════════════════════════════════════════════\n");
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

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    if let Command::BreakEven { ambient } = &cli.command {
        println!("Ambient (°C)  Break-even irradiance (W/m²)");
        for t in ambient {
            match break_even_irradiance(&config.constants, *t, 1400.0) {
                Some(g) => println!("{:>10.1}    {:.1}", t, g),
                None => println!("{:>10.1}    never (below 1400 W/m²)", t),
            }
        }
        return Ok(());
    }

    let model_path = cli.model.clone().unwrap_or_else(|| config.model_path.clone());
    let predictor = SmartCorePredictor::new(model_path, config.constants);
    if predictor.is_available() {
        info!("Loaded {}", predictor.name());
    }
    let predictor: Arc<dyn CoolingPredictor> = Arc::new(predictor);

    let advisor = CoolingAdvisor::new(
        Arc::new(NominatimGeocoder::new()),
        Arc::new(NasaPowerClient::new()),
        Some(predictor),
        config.constants,
    );

    let result = match cli.command {
        Command::Check { place, date, hour } => {
            let now = Local::now();
            let date = date.unwrap_or_else(|| now.date_naive());
            let hour = hour.unwrap_or_else(|| now.hour());
            advisor.check_place(&place, date, hour).await
        }
        Command::Manual {
            ambient,
            irradiance,
            hour,
        } => advisor.check_manual(ambient, irradiance, hour),
        Command::BreakEven { .. } => return Ok(()),
    };

    match result {
        Ok(report) => print_report(&report),
        // Lookup failures are reported, not propagated as a crash.
        Err(e) => {
            error!("{}", e);
            println!("Could not evaluate cooling: {}", e);
        }
    }

    Ok(())
}
