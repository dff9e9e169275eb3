use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rent_rank::areas;
use rent_rank::config::{self, Config};
use rent_rank::metrics::{self, AreaMetrics};
use rent_rank::output::{self, OutputFormat};
use rent_rank::ranking::{self, RankFilters, RankOptions};
use rent_rank::scoring;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_OUTPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

/// Zip codes analyzed when neither an input file nor a selection is given
const DEFAULT_SAMPLE_SIZE: usize = 50;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score and rank areas (default if no subcommand)
    Rank(RankArgs),
    /// Score a single zip code and explain the result
    Score {
        /// Zip code to score
        zipcode: String,

        /// Metrics file (.json or .csv); demo data is used when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the built-in metro areas
    Metros,
    /// Create a config file interactively
    Init,
}

#[derive(Args, Debug, Default)]
struct RankArgs {
    /// Metrics file (.json or .csv); demo data is used when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Comma-separated zip codes to analyze
    #[arg(long, conflicts_with_all = ["metro", "zipcode_file"])]
    zipcodes: Option<String>,

    /// Analyze a built-in metro (see `rent-rank metros`)
    #[arg(long, conflicts_with = "zipcode_file")]
    metro: Option<String>,

    /// File with zip codes, one per line or a CSV `zipcode` column
    #[arg(long)]
    zipcode_file: Option<PathBuf>,

    /// Analyze at most this many areas
    #[arg(long)]
    limit: Option<usize>,

    /// Minimum population
    #[arg(long)]
    min_population: Option<u64>,

    /// Maximum number of rental listings
    #[arg(long)]
    max_listings: Option<u64>,

    /// Minimum investment score
    #[arg(long)]
    min_score: Option<f64>,

    /// Keep only the best N areas in the table, summary and reports
    #[arg(short, long)]
    top: Option<usize>,

    /// Report file format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Report path without extension
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Score areas on a single thread
    #[arg(long)]
    sequential: bool,
}

#[derive(Parser, Debug)]
#[command(name = "rent-rank")]
#[command(about = "Rank zip codes by rental investment potential", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/rent-rank/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    } else {
        let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
        builder.parse_filters(&filters);
    }
    builder.init();
}

/// Print an error with its context chain and exit.
fn fail(code: i32, what: &str, err: anyhow::Error) -> ! {
    eprintln!("{}: {:#}", what, err);
    std::process::exit(code);
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Rank(RankArgs::default()));
    let config_path = cli.config.map(PathBuf::from);

    // Commands that do not need a loaded config
    match command {
        Commands::Init => {
            if let Err(e) = config::run_init_wizard(config_path) {
                fail(EXIT_CONFIG, "Init failed", e);
            }
            std::process::exit(EXIT_SUCCESS);
        }
        Commands::Metros => {
            print_metros();
            std::process::exit(EXIT_SUCCESS);
        }
        _ => {}
    }

    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => fail(EXIT_CONFIG, "Config error", e),
    };

    // Validate config at startup
    if let Err(errors) = config.validate() {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    if let Some(warning) = scoring::weight_sum_warning(&config.weights) {
        log::warn!("{}", warning);
    }

    match command {
        Commands::Rank(args) => run_rank(&config, args, cli.verbose),
        Commands::Score {
            zipcode,
            input,
            json,
        } => run_score(&config, &zipcode, input.as_deref(), json),
        Commands::Metros | Commands::Init => {}
    }

    std::process::exit(EXIT_SUCCESS);
}

fn print_metros() {
    for name in areas::metro_names() {
        let count = areas::get_metro_zipcodes(name).map_or(0, |zipcodes| zipcodes.len());
        println!("{:<10} {} zip codes", name, count);
    }
}

/// Resolve `--zipcodes`, `--metro` or `--zipcode-file`, if any was given.
fn select_zipcodes(args: &RankArgs) -> Result<Option<Vec<String>>> {
    if let Some(list) = &args.zipcodes {
        return Ok(Some(areas::parse_zipcode_list(list)));
    }
    if let Some(metro) = &args.metro {
        let Some(zipcodes) = areas::get_metro_zipcodes(metro) else {
            bail!(
                "Unknown metro '{}'. Available: {}",
                metro,
                areas::metro_names().join(", ")
            );
        };
        return Ok(Some(zipcodes.iter().map(|z| z.to_string()).collect()));
    }
    if let Some(path) = &args.zipcode_file {
        return areas::load_zipcodes_from_file(path).map(Some);
    }
    Ok(None)
}

fn load_input_file(path: &Path) -> Result<Vec<(String, AreaMetrics)>> {
    let loaded = metrics::load_metrics_file(path)?;
    for rejected in &loaded.rejected {
        log::warn!("Skipping row in {}: {}", path.display(), rejected);
    }
    log::info!(
        "Loaded {} areas from {} ({} rejected)",
        loaded.areas.len(),
        path.display(),
        loaded.rejected.len()
    );
    Ok(loaded.areas)
}

/// Build the batch of areas to rank from the input file or demo data.
fn load_areas(args: &RankArgs) -> Result<Vec<(String, AreaMetrics)>> {
    let selection = select_zipcodes(args)?;

    let mut areas = match &args.input {
        Some(path) => {
            let mut areas = load_input_file(path)?;
            if let Some(selection) = &selection {
                let wanted: HashSet<&str> = selection.iter().map(String::as_str).collect();
                areas.retain(|(zipcode, _)| wanted.contains(zipcode.as_str()));
                if areas.len() < wanted.len() {
                    log::warn!(
                        "{} of {} selected zip codes have no metrics in {}",
                        wanted.len() - areas.len(),
                        wanted.len(),
                        path.display()
                    );
                }
            }
            areas
        }
        None => {
            log::warn!("No --input given; using generated demo data");
            let zipcodes =
                selection.unwrap_or_else(|| areas::sample_zipcodes(DEFAULT_SAMPLE_SIZE));
            metrics::demo_areas(&zipcodes)
        }
    };

    if let Some(limit) = args.limit {
        areas.truncate(limit);
    }
    if areas.is_empty() {
        bail!("No areas to analyze");
    }
    Ok(areas)
}

/// Ranking options from config, with CLI flags taking precedence.
fn rank_options(config: &Config, args: &RankArgs) -> RankOptions {
    let cli_filters = RankFilters {
        min_population: args.min_population,
        max_listings: args.max_listings,
        min_score: args.min_score,
    };
    RankOptions {
        filters: config.filters.merged(&cli_filters),
        top: Some(args.top.unwrap_or(config.top)),
        parallel: !args.sequential,
    }
}

fn run_rank(config: &Config, args: RankArgs, verbose: bool) {
    let areas = match load_areas(&args) {
        Ok(areas) => areas,
        Err(e) => fail(EXIT_INPUT, "Input error", e),
    };

    let options = rank_options(config, &args);
    let format = args.format.unwrap_or(config.output.format);
    let report_base = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.path));

    let start_time = Instant::now();
    let ranked = ranking::rank_areas(&areas, &config.weights, &options);
    log::info!(
        "Scored {} areas in {:?}",
        areas.len(),
        start_time.elapsed()
    );

    let use_colors = output::should_use_colors();
    let summary = ranking::summarize(&ranked);

    println!("{}", output::format_ranked_table(&ranked, use_colors));
    if let Some(summary) = &summary {
        println!();
        println!("{}", output::format_summary(summary, use_colors));
    }

    if verbose {
        for area in &ranked {
            let breakdown = scoring::explain_score(&area.metrics, &config.weights);
            println!();
            println!(
                "{}",
                output::format_area_detail(&area.zipcode, &area.metrics, use_colors)
            );
            println!("{}", output::format_breakdown(&breakdown, use_colors));
        }
    }

    match output::write_reports(&report_base, format, &ranked, summary.as_ref()) {
        Ok(written) => {
            for path in written {
                eprintln!("Report saved to {}", path.display());
            }
        }
        Err(e) => fail(EXIT_OUTPUT, "Failed to write report", e),
    }
}

fn find_area(path: &Path, zipcode: &str) -> Result<AreaMetrics> {
    load_input_file(path)?
        .into_iter()
        .find(|(z, _)| z == zipcode)
        .map(|(_, metrics)| metrics)
        .with_context(|| format!("No metrics for {} in {}", zipcode, path.display()))
}

fn run_score(config: &Config, zipcode: &str, input: Option<&Path>, json: bool) {
    let zipcode = areas::normalize_zipcode(zipcode);
    let metrics = match input {
        Some(path) => match find_area(path, &zipcode) {
            Ok(metrics) => metrics,
            Err(e) => fail(EXIT_INPUT, "Input error", e),
        },
        None => {
            log::warn!("No --input given; using generated demo data");
            metrics::demo_metrics(&zipcode)
        }
    };

    let breakdown = scoring::explain_score(&metrics, &config.weights);

    if json {
        let value = serde_json::json!({
            "zipcode": zipcode,
            "metrics": metrics,
            "breakdown": breakdown,
        });
        match serde_json::to_string_pretty(&value) {
            Ok(text) => println!("{}", text),
            Err(e) => fail(EXIT_OUTPUT, "Failed to serialize breakdown", e.into()),
        }
    } else {
        let use_colors = output::should_use_colors();
        println!("{}", output::format_area_detail(&zipcode, &metrics, use_colors));
        println!();
        println!("{}", output::format_breakdown(&breakdown, use_colors));
    }
}
