use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{get_config_path, save_config, Config, OutputConfig};
use crate::output::OutputFormat;
use crate::ranking::RankFilters;
use crate::scoring::{validate_weights, weight_sum_warning, ScoreWeights};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    Ok(parse_yes_no(&input, default_yes))
}

fn parse_yes_no(input: &str, default_yes: bool) -> bool {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        default_yes
    } else {
        input == "y" || input == "yes"
    }
}

/// Parse an optional threshold. Empty input or "none" means unset.
fn parse_optional<T: FromStr>(input: &str) -> Result<Option<T>, String> {
    let input = input.trim();
    if input.is_empty() || input.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    input
        .parse::<T>()
        .map(Some)
        .map_err(|_| format!("'{}' is not a valid number", input))
}

fn parse_weight(input: &str) -> Result<f64, String> {
    match input.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        Ok(_) => Err("must be a non-negative number".to_string()),
        Err(_) => Err(format!("'{}' is not a valid number", input.trim())),
    }
}

fn parse_format(input: &str) -> Result<OutputFormat, String> {
    match input.trim().to_lowercase().as_str() {
        "csv" => Ok(OutputFormat::Csv),
        "json" => Ok(OutputFormat::Json),
        "all" => Ok(OutputFormat::All),
        "none" => Ok(OutputFormat::None),
        other => Err(format!("unknown format '{}' (csv, json, all, none)", other)),
    }
}

/// Keep prompting until `parse` accepts the input.
fn prompt_until<T>(
    message: &str,
    default: &str,
    parse: impl Fn(&str) -> Result<T, String>,
) -> Result<T> {
    loop {
        let input = prompt_with_default(message, default)?;
        match parse(&input) {
            Ok(value) => return Ok(value),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    }
}

fn prompt_weights() -> Result<ScoreWeights> {
    let defaults = ScoreWeights::default();
    println!("Weights control how much each component counts toward the investment score.");
    println!("They should sum to 1.0.");

    loop {
        let weights = ScoreWeights::new(
            prompt_until("Population weight", &defaults.population.to_string(), parse_weight)?,
            prompt_until("Supply weight", &defaults.supply.to_string(), parse_weight)?,
            prompt_until("Demand weight", &defaults.demand.to_string(), parse_weight)?,
        );

        if let Err(errors) = validate_weights(&weights) {
            for error in errors {
                println!("  {}", error);
            }
            continue;
        }
        match weight_sum_warning(&weights) {
            Some(warning) => {
                println!("  Warning: {}", warning);
                if prompt_yes_no("Keep these weights anyway?", false)? {
                    return Ok(weights);
                }
            }
            None => return Ok(weights),
        }
    }
}

fn prompt_filters() -> Result<RankFilters> {
    println!("Filters drop areas from the ranking. Leave blank for no limit.");
    Ok(RankFilters {
        min_population: prompt_until("Minimum population", "none", parse_optional::<u64>)?,
        max_listings: prompt_until("Maximum rental listings", "none", parse_optional::<u64>)?,
        min_score: prompt_until("Minimum investment score", "none", |input| {
            parse_optional::<f64>(input)
        })?,
    })
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Rent Rank Configuration Wizard");
    println!("==============================");
    println!();

    let defaults = Config::default();

    // 1. Weights
    let weights = if prompt_yes_no("Configure score weights? (n accepts 0.30/0.35/0.35)", false)? {
        println!();
        prompt_weights()?
    } else {
        defaults.weights
    };

    // 2. Filters
    println!();
    let filters = if prompt_yes_no("Configure ranking filters?", false)? {
        println!();
        prompt_filters()?
    } else {
        defaults.filters.clone()
    };

    // 3. Output
    println!();
    let top = prompt_until("Areas to show in the ranking", &defaults.top.to_string(), |input| {
        match input.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err("must be a positive whole number".to_string()),
        }
    })?;
    let format = prompt_until("Report format (csv, json, all, none)", "csv", parse_format)?;
    let path = prompt_with_default("Report path (without extension)", &defaults.output.path)?;

    // 4. Config path
    let default_config_path = match default_path {
        Some(path) => path,
        None => get_config_path()?,
    };
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    // Check if file already exists
    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 5. Write config
    let config = Config {
        weights,
        filters,
        top,
        output: OutputConfig { format, path },
    };
    save_config(&config, &config_path)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `rent-rank` to get started.");

    Ok(())
}
