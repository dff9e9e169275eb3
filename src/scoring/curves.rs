//! Piecewise score curves.
//!
//! Every curve is an ordered table of segments. A raw value is scored by the
//! first segment whose upper bound admits it, and the result is clamped to
//! `0..=100`. Keeping the boundaries in a table makes the open/closed edges
//! visible in one place.

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Substituted for a missing demand signal.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Points added to the population curve for a fully renter-occupied area.
pub const RENTER_BONUS_SCALE: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpperBound {
    LessThan(f64),
    LessEqual(f64),
    Unbounded,
}

impl UpperBound {
    pub fn admits(&self, value: f64) -> bool {
        match self {
            UpperBound::LessThan(n) => value < *n,
            UpperBound::LessEqual(n) => value <= *n,
            UpperBound::Unbounded => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub upper: UpperBound,
    pub formula: fn(f64) -> f64,
}

#[derive(Debug, Clone, Copy)]
pub struct Curve {
    pub name: &'static str,
    pub segments: &'static [Segment],
}

impl Curve {
    /// Score `value` with the first matching segment. NaN, and a table that
    /// admits nothing, score 0.
    pub fn evaluate(&self, value: f64) -> f64 {
        if value.is_nan() {
            log::debug!("{} curve got NaN, scoring {}", self.name, MIN_SCORE);
            return MIN_SCORE;
        }
        self.segments
            .iter()
            .find(|segment| segment.upper.admits(value))
            .map(|segment| clamp_score((segment.formula)(value)))
            .unwrap_or(MIN_SCORE)
    }
}

/// Clamp into `0..=100`. NaN maps to 0 so nothing out of range escapes.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        MIN_SCORE
    } else {
        value.clamp(MIN_SCORE, MAX_SCORE)
    }
}

pub static POPULATION_CURVE: Curve = Curve {
    name: "population",
    segments: &[
        Segment {
            upper: UpperBound::LessEqual(0.0),
            formula: |_| 0.0,
        },
        Segment {
            upper: UpperBound::LessThan(5_000.0),
            formula: |x| x / 5_000.0 * 30.0,
        },
        Segment {
            upper: UpperBound::LessThan(50_000.0),
            formula: |x| 30.0 + (x - 5_000.0) / 45_000.0 * 50.0,
        },
        Segment {
            upper: UpperBound::Unbounded,
            formula: |x| 80.0 + ((x - 50_000.0) / 100_000.0 * 20.0).min(20.0),
        },
    ],
};

/// Input is listings per 100 renter households; lower is tighter.
pub static SUPPLY_CURVE: Curve = Curve {
    name: "supply",
    segments: &[
        Segment {
            upper: UpperBound::LessThan(1.0),
            formula: |_| 100.0,
        },
        Segment {
            upper: UpperBound::LessThan(3.0),
            formula: |r| 90.0 - (r - 1.0) * 20.0,
        },
        Segment {
            upper: UpperBound::LessThan(5.0),
            formula: |r| 70.0 - (r - 3.0) * 15.0,
        },
        Segment {
            upper: UpperBound::LessThan(10.0),
            formula: |r| 40.0 - (r - 5.0) * 5.0,
        },
        Segment {
            upper: UpperBound::Unbounded,
            formula: |r| (10.0 - r).max(0.0),
        },
    ],
};

pub static DAYS_ON_MARKET_CURVE: Curve = Curve {
    name: "days_on_market",
    segments: &[
        Segment {
            upper: UpperBound::LessThan(10.0),
            formula: |_| 100.0,
        },
        Segment {
            upper: UpperBound::LessThan(20.0),
            formula: |d| 90.0 - (d - 10.0) * 3.0,
        },
        Segment {
            upper: UpperBound::LessThan(40.0),
            formula: |d| 60.0 - (d - 20.0) * 2.0,
        },
        Segment {
            upper: UpperBound::Unbounded,
            formula: |d| (20.0 - (d - 40.0)).max(0.0),
        },
    ],
};

/// Input is a year-over-year fraction (0.08 = 8%).
pub static RENT_GROWTH_CURVE: Curve = Curve {
    name: "rent_growth",
    segments: &[
        Segment {
            upper: UpperBound::LessThan(-0.05),
            formula: |g| (50.0 + g * 500.0).max(0.0),
        },
        Segment {
            upper: UpperBound::LessEqual(0.15),
            formula: |g| 50.0 + g * 333.0,
        },
        Segment {
            upper: UpperBound::Unbounded,
            formula: |_| 100.0,
        },
    ],
};

pub fn population_curve(population: f64) -> f64 {
    POPULATION_CURVE.evaluate(population)
}

/// Share of occupied households that rent. Zero occupied households gives 0.
pub fn renter_ratio(renter_occupied: u64, owner_occupied: u64) -> f64 {
    let occupied = renter_occupied.saturating_add(owner_occupied);
    if occupied == 0 {
        0.0
    } else {
        renter_occupied as f64 / occupied as f64
    }
}

pub fn renter_bonus(renter_ratio: f64) -> f64 {
    renter_ratio * RENTER_BONUS_SCALE
}

/// Listings per 100 renter households. No renters means no absorbing
/// demand at all, which is scored as infinitely loose supply.
pub fn listings_per_100(total_listings: u64, renter_occupied: u64) -> f64 {
    if renter_occupied == 0 {
        f64::INFINITY
    } else {
        total_listings as f64 / renter_occupied as f64 * 100.0
    }
}

pub fn supply_curve(listings_per_100: f64) -> f64 {
    SUPPLY_CURVE.evaluate(listings_per_100)
}

pub fn days_on_market_curve(days: Option<f64>) -> f64 {
    days.map_or(NEUTRAL_SCORE, |d| DAYS_ON_MARKET_CURVE.evaluate(d))
}

pub fn rent_growth_curve(growth: Option<f64>) -> f64 {
    growth.map_or(NEUTRAL_SCORE, |g| RENT_GROWTH_CURVE.evaluate(g))
}

/// Search volume is already on the 0-100 scale.
pub fn search_volume_score(index: Option<f64>) -> f64 {
    index.map_or(NEUTRAL_SCORE, clamp_score)
}

/// Direct demand arrives as a 0-1 fraction.
pub fn direct_demand_score(index: Option<f64>) -> f64 {
    index.map_or(NEUTRAL_SCORE, |v| clamp_score(v * 100.0))
}
