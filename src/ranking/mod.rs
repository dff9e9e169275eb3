pub mod filter;
pub mod ranker;
pub mod summary;

pub use filter::RankFilters;
pub use ranker::{compare_ranked, rank_areas, score_areas, RankOptions, RankedArea};
pub use summary::{summarize, Summary};
