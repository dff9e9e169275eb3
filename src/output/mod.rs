pub mod formatter;
pub mod report;

pub use formatter::{
    format_area_detail, format_breakdown, format_currency, format_percent, format_ranked_table,
    format_score, format_summary, format_thousands, should_use_colors,
};
pub use report::{
    report_rows, write_csv, write_json, write_reports, OutputFormat, ReportRow, DEFAULT_REPORT_NAME,
};
