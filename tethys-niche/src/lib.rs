//! Thermal niche aggregation and cohort comparison
//!
//! Consumes the joined table and produces the per-stage genus niches, the
//! per-genus lifetime niches, the windowed cohort trend, and the rank-sum
//! comparison of the two cohorts.

pub mod aggregate;
pub mod ranksum;
pub mod window;

pub use aggregate::{lifetime_niches, median, stage_niches, LifetimeNiche, StageNiche};
pub use ranksum::{rank_sum_test, RankSumTest};
pub use window::{windowed_trend, WindowedTrend};
