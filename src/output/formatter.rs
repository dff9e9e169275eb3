use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::metrics::AreaMetrics;
use crate::ranking::{RankedArea, Summary};
use crate::scoring::{Rating, ScoreBreakdown};

/// Below this terminal width the table drops its market columns
const WIDE_TABLE_MIN_WIDTH: usize = 100;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Format a score with one decimal place ("61.5")
pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

/// Format an integer with thousands separators (1234567 -> "1,234,567")
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a dollar amount rounded to whole dollars, "-" when absent
pub fn format_currency(amount: Option<f64>) -> String {
    match amount {
        Some(value) => format!("${}", format_thousands(value.max(0.0).round() as u64)),
        None => "-".to_string(),
    }
}

/// Format a fraction as a percentage ("0.623" -> "62.3%")
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

fn format_optional(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(v) => format!("{:.0}{}", v, suffix),
        None => "-".to_string(),
    }
}

fn paint_rating(rating: Rating, text: &str, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match rating {
        Rating::Excellent => text.green().bold().to_string(),
        Rating::VeryGood => text.green().to_string(),
        Rating::Good => text.cyan().to_string(),
        Rating::Fair => text.yellow().to_string(),
        Rating::Poor => text.red().to_string(),
        Rating::VeryPoor => text.red().dimmed().to_string(),
    }
}

/// Format ranked areas as an aligned table.
///
/// Wide terminals (and pipes) get population, renter share, listings and
/// rent columns; narrow terminals get rank, zip code, score and rating only.
pub fn format_ranked_table(ranked: &[RankedArea], use_colors: bool) -> String {
    if ranked.is_empty() {
        return "No areas matched.".to_string();
    }

    let wide = get_terminal_width()
        .map(|width| width >= WIDE_TABLE_MIN_WIDTH)
        .unwrap_or(true);

    let header = if wide {
        format!(
            "{:>4}  {:<7} {:>6}  {:<10} {:>11} {:>7} {:>8} {:>8}",
            "#", "Zip", "Score", "Rating", "Population", "Renters", "Listings", "Rent"
        )
    } else {
        format!("{:>4}  {:<7} {:>6}  {:<10}", "#", "Zip", "Score", "Rating")
    };

    let mut lines = Vec::with_capacity(ranked.len() + 1);
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for area in ranked {
        let index_str = format!("{:>3}.", area.rank);
        let score_str = format!("{:>6}", format_score(area.result.investment_score));
        let rating_str = paint_rating(
            area.result.rating,
            &format!("{:<10}", area.result.rating.label()),
            use_colors,
        );
        let index_str = if use_colors {
            index_str.dimmed().to_string()
        } else {
            index_str
        };

        let mut line = format!("{}  {:<7} {}  {}", index_str, area.zipcode, score_str, rating_str);
        if wide {
            line.push_str(&format!(
                " {:>11} {:>7} {:>8} {:>8}",
                format_thousands(area.metrics.population),
                format_percent(area.renter_ratio),
                format_thousands(area.metrics.total_listings),
                format_currency(area.metrics.average_rent),
            ));
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// Format the summary block printed after the table
pub fn format_summary(summary: &Summary, use_colors: bool) -> String {
    let title = if use_colors {
        "Summary".bold().to_string()
    } else {
        "Summary".to_string()
    };

    let ratings = summary
        .rating_counts
        .iter()
        .map(|(rating, count)| format!("{}: {}", rating.label(), count))
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = vec![
        title,
        format!("  Areas ranked: {}", summary.total_areas),
        format!(
            "  Top area: {} ({})",
            summary.top_zipcode,
            format_score(summary.top_score)
        ),
        format!(
            "  Average score: {}",
            format_score(summary.avg_investment_score)
        ),
        format!(
            "  Average population: {}",
            format_thousands(summary.avg_population.round() as u64)
        ),
        format!("  Average renter share: {}", format_percent(summary.avg_renter_ratio)),
        format!("  Average listings: {:.0}", summary.avg_listings),
    ];
    if summary.avg_rent.is_some() {
        lines.push(format!("  Average rent: {}", format_currency(summary.avg_rent)));
    }
    lines.push(format!("  Ratings: {}", ratings));

    lines.join("\n")
}

/// Format one area's raw metrics as a multi-line report
pub fn format_area_detail(zipcode: &str, metrics: &AreaMetrics, use_colors: bool) -> String {
    let heading = format!("ZIP {}", zipcode);
    let heading = if use_colors {
        heading.bold().to_string()
    } else {
        heading
    };

    let mut lines = vec![
        heading,
        format!("  Population: {}", format_thousands(metrics.population)),
        format!(
            "  Households: {} renter / {} owner ({} renters)",
            format_thousands(metrics.renter_occupied),
            format_thousands(metrics.owner_occupied),
            format_percent(metrics.renter_ratio()),
        ),
        format!("  Median income: {}", format_currency(metrics.median_income)),
        format!("  Rental listings: {}", format_thousands(metrics.total_listings)),
        format!("  Average rent: {}", format_currency(metrics.average_rent)),
        format!(
            "  Days on market: {}",
            format_optional(metrics.days_on_market, " days")
        ),
        format!(
            "  Rent growth: {}",
            metrics
                .rent_growth_yoy
                .map(format_percent)
                .unwrap_or_else(|| "-".to_string())
        ),
        format!(
            "  Data quality: {} ({} of 4 demand signals)",
            metrics.data_quality(),
            metrics.demand_signal_count()
        ),
    ];
    if let Some(source) = &metrics.data_source {
        lines.push(format!("  Source: {}", source));
    }

    lines.join("\n")
}

/// Format a score breakdown showing each weighted component
pub fn format_breakdown(breakdown: &ScoreBreakdown, use_colors: bool) -> String {
    let result = &breakdown.result;
    let score = format_score(result.investment_score);
    let rating = result.rating.label();

    let headline = if use_colors {
        format!(
            "Investment score: {} ({})",
            score.bold(),
            paint_rating(result.rating, rating, true)
        )
    } else {
        format!("Investment score: {} ({})", score, rating)
    };

    let mut lines = vec![headline];
    for factor in &breakdown.factors {
        lines.push(format!(
            "  {:<11} {:>6} x {:.2} = {:>6}  {}",
            factor.label,
            format_score(factor.score),
            factor.weight,
            format_score(factor.weighted),
            factor.description,
        ));
    }

    let demand = &breakdown.demand;
    lines.push(format!(
        "  Demand signals: days on market {}, rent growth {}, search volume {}, direct demand {}",
        format_score(demand.days_on_market),
        format_score(demand.rent_growth),
        format_score(demand.search_volume),
        format_score(demand.direct_demand),
    ));

    lines.join("\n")
}
