use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use viability::config::MeteomaticsConfig;
use viability::export::write_monthly_csv;
use viability::meteomatics::{
    BoundingBox, GridQuery, MeteomaticsClient, ResponseFormat, TimeseriesQuery, default_time_range,
};
use viability::{
    AnalysisConfig, AnnualViabilityAnalyzer, FullAnalysis, RawPayload, ViabilityConfig,
    ViabilityError, logging,
};

#[derive(Parser, Debug)]
#[command(name = "viability")]
#[command(about = "Wind and solar viability analysis from a year of weather samples", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Meteomatics username
    #[arg(long, global = true, env = "MM_USER")]
    user: Option<String>,

    /// Meteomatics password
    #[arg(long, global = true, env = "MM_PASS", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a saved timeseries payload (JSON)
    Analyze {
        /// Payload file
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,

        /// Fail on unknown parameters and missing values
        #[arg(long)]
        strict: bool,
    },

    /// Download a year of samples for a point and analyze them
    Fetch {
        #[command(flatten)]
        point: PointArgs,

        /// Days to look back from now
        #[arg(long)]
        days_back: Option<u32>,

        /// Time step between samples (ISO-8601 duration)
        #[arg(long)]
        step: Option<String>,

        /// Weather model
        #[arg(long)]
        model: Option<String>,

        /// Keep the downloaded payload in this file
        #[arg(long)]
        save_payload: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,

        /// Fail on unknown parameters and missing values
        #[arg(long)]
        strict: bool,
    },

    /// Download a raster grid around a point
    Grid {
        #[command(flatten)]
        grid: GridArgs,

        /// Destination file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print a request URL without sending it
    Url {
        #[command(subcommand)]
        target: UrlTarget,
    },
}

#[derive(Subcommand, Debug)]
enum UrlTarget {
    /// Point timeseries URL
    Timeseries {
        #[command(flatten)]
        point: PointArgs,

        /// ISO-8601 start (defaults to one year ago)
        #[arg(long)]
        start: Option<String>,

        /// ISO-8601 end (defaults to now)
        #[arg(long)]
        end: Option<String>,

        /// Time step between samples (ISO-8601 duration)
        #[arg(long, default_value = "PT1H")]
        step: String,

        /// Comma-separated parameter identifiers
        #[arg(long, default_value = "t_2m:C")]
        params: String,

        /// Response format
        #[arg(long, default_value = "json")]
        format: ResponseFormat,

        /// Weather model
        #[arg(long)]
        model: Option<String>,
    },

    /// Raster grid URL
    Grid {
        #[command(flatten)]
        grid: GridArgs,
    },
}

#[derive(Args, Debug)]
struct PointArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,
}

#[derive(Args, Debug)]
struct GridArgs {
    #[command(flatten)]
    point: PointArgs,

    /// Half side of the box around the point, in degrees
    #[arg(long)]
    half_span: Option<f64>,

    /// Latitude resolution in degrees
    #[arg(long)]
    res_lat: Option<f64>,

    /// Longitude resolution in degrees
    #[arg(long)]
    res_lon: Option<f64>,

    /// `now` or an ISO-8601 timestamp
    #[arg(long, default_value = "now")]
    valid_time: String,

    /// Comma-separated parameter identifiers
    #[arg(long, default_value = "t_2m:C")]
    params: String,

    /// Response format
    #[arg(long, default_value = "png")]
    format: ResponseFormat,

    /// Weather model
    #[arg(long)]
    model: Option<String>,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Also write the monthly results as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    Pretty,
    /// JSON document
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ViabilityError>() {
                Some(viability_err) => eprintln!("Error: {}", viability_err.user_message()),
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Some(path) = &cli.config {
        if !path.exists() {
            bail!("Config file not found: {}", path.display());
        }
    }

    let mut config = ViabilityConfig::load_from_path(cli.config.clone())?;
    config.apply_credentials(cli.user.clone(), cli.password.clone());
    logging::init_logging(&config.logging, cli.verbose)?;

    match cli.command {
        Commands::Analyze {
            input,
            output,
            strict,
        } => analyze_file(&config, &input, &output, strict),
        Commands::Fetch {
            point,
            days_back,
            step,
            model,
            save_payload,
            output,
            strict,
        } => {
            if let Some(days_back) = days_back {
                config.meteomatics.days_back = days_back;
            }
            if let Some(step) = step {
                config.meteomatics.annual_step = step;
            }
            if model.is_some() {
                config.meteomatics.model = model;
            }
            config.validate()?;
            fetch_and_analyze(&config, &point, save_payload.as_deref(), &output, strict).await
        }
        Commands::Grid { grid, output } => download_grid(&config, &grid, &output).await,
        Commands::Url { target } => print_url(&config, target),
    }
}

fn analysis_config(config: &ViabilityConfig, strict: bool) -> AnalysisConfig {
    if strict {
        config.analysis.clone().strict()
    } else {
        config.analysis.clone()
    }
}

fn analyze_file(
    config: &ViabilityConfig,
    input: &Path,
    output: &OutputArgs,
    strict: bool,
) -> Result<()> {
    let json = fs::read_to_string(input)
        .with_context(|| format!("Failed to read payload file: {}", input.display()))?;
    let payload = RawPayload::from_json_str(&json)?;

    let analysis = AnnualViabilityAnalyzer::new(analysis_config(config, strict)).run(&payload)?;
    emit(&analysis, output)
}

async fn fetch_and_analyze(
    config: &ViabilityConfig,
    point: &PointArgs,
    save_payload: Option<&Path>,
    output: &OutputArgs,
    strict: bool,
) -> Result<()> {
    warn_without_credentials(&config.meteomatics);
    let client = MeteomaticsClient::new(config.meteomatics.clone())?;
    let payload = client
        .fetch_annual_payload(point.lat, point.lon, Utc::now())
        .await?;

    if let Some(path) = save_payload {
        let json = serde_json::to_string_pretty(&payload)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write payload file: {}", path.display()))?;
        info!("Saved payload to {}", path.display());
    }

    let analysis = AnnualViabilityAnalyzer::new(analysis_config(config, strict)).run(&payload)?;
    emit(&analysis, output)
}

async fn download_grid(config: &ViabilityConfig, args: &GridArgs, output: &Path) -> Result<()> {
    warn_without_credentials(&config.meteomatics);
    let query = grid_query(&config.meteomatics, args);
    let client = MeteomaticsClient::new(config.meteomatics.clone())?;
    let response = client.grid(&query).await?;

    fs::write(output, &response.bytes)
        .with_context(|| format!("Failed to write grid file: {}", output.display()))?;
    println!(
        "Saved {} bytes ({}) to {}",
        response.bytes.len(),
        response.content_type,
        output.display()
    );
    Ok(())
}

fn print_url(config: &ViabilityConfig, target: UrlTarget) -> Result<()> {
    let client = MeteomaticsClient::new(config.meteomatics.clone())?;

    let path = match target {
        UrlTarget::Timeseries {
            point,
            start,
            end,
            step,
            params,
            format,
            model,
        } => {
            let (default_start, default_end) =
                default_time_range(Utc::now(), config.meteomatics.days_back)?;
            let query = TimeseriesQuery {
                step,
                params,
                format,
                model: model.or_else(|| config.meteomatics.model.clone()),
                ..TimeseriesQuery::new(
                    point.lat,
                    point.lon,
                    start.unwrap_or(default_start),
                    end.unwrap_or(default_end),
                )
            };
            query.path()?
        }
        UrlTarget::Grid { grid } => grid_query(&config.meteomatics, &grid).path()?,
    };

    println!("{}", client.url_for(&path));
    Ok(())
}

fn grid_query(mm: &MeteomaticsConfig, args: &GridArgs) -> GridQuery {
    let bbox = BoundingBox::around(
        args.point.lat,
        args.point.lon,
        args.half_span.unwrap_or(mm.grid_half_span),
    );
    GridQuery {
        res_lat: args.res_lat.unwrap_or(mm.grid_resolution),
        res_lon: args.res_lon.unwrap_or(mm.grid_resolution),
        valid_time: args.valid_time.clone(),
        params: args.params.clone(),
        format: args.format,
        model: args.model.clone().or_else(|| mm.model.clone()),
        ..GridQuery::new(bbox)
    }
}

fn warn_without_credentials(mm: &MeteomaticsConfig) {
    if mm.username.is_none() {
        warn!("No Meteomatics credentials configured (set MM_USER/MM_PASS); the request will likely be rejected");
    }
}

fn emit(analysis: &FullAnalysis, output: &OutputArgs) -> Result<()> {
    match output.format {
        OutputFormat::Pretty => print!("{}", analysis.format_report()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(analysis)?),
    }

    if let Some(path) = &output.csv {
        let file = File::create(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
        write_monthly_csv(BufWriter::new(file), &analysis.months)?;
        info!("Wrote monthly CSV to {}", path.display());
    }

    Ok(())
}
