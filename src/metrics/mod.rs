pub mod demo;
pub mod loader;
pub mod record;
pub mod types;

pub use demo::{demo_areas, demo_metrics};
pub use loader::{load_metrics_file, parse_metrics_csv, parse_metrics_json, LoadedMetrics};
pub use record::{MetricsError, MetricsRecord};
pub use types::{AreaMetrics, DataQuality};
