use serde::{Deserialize, Serialize};

/// Half-day readings per week: 6 days x AM/PM.
pub const SLOT_COUNT: usize = 12;

/// Valid anchor (Sunday buy) price bounds, inclusive. All pattern bands are
/// ratios of the anchor, so values outside this range make them meaningless.
pub const MIN_ANCHOR_PRICE: u32 = 90;
pub const MAX_ANCHOR_PRICE: u32 = 110;

/// Weekly market pattern. Closed set: the transition table and the scorers
/// are exhaustive over these four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pattern {
    Fluctuating,
    LargeSpike,
    Decreasing,
    SmallSpike,
}

impl Pattern {
    /// Canonical order: used for iteration, table indexing, and breaking
    /// exact probability ties.
    pub const ALL: [Pattern; 4] = [
        Pattern::LargeSpike,
        Pattern::SmallSpike,
        Pattern::Fluctuating,
        Pattern::Decreasing,
    ];

    /// Index into the canonical order.
    pub fn idx(self) -> usize {
        match self {
            Pattern::LargeSpike => 0,
            Pattern::SmallSpike => 1,
            Pattern::Fluctuating => 2,
            Pattern::Decreasing => 3,
        }
    }

    /// Multiplier bounds of the pattern's sell-price range, as ratios of the
    /// anchor price.
    pub fn multipliers(self) -> (f64, f64) {
        match self {
            Pattern::LargeSpike => (2.0, 6.0),
            Pattern::SmallSpike => (1.4, 2.0),
            Pattern::Fluctuating => (0.6, 1.4),
            Pattern::Decreasing => (0.3, 0.9),
        }
    }

    /// Expected sell range for a given anchor price.
    pub fn expected_range(self, anchor_price: u32) -> PriceRange {
        let (lo, hi) = self.multipliers();
        PriceRange {
            min: (anchor_price as f64 * lo).round() as u32,
            max: (anchor_price as f64 * hi).round() as u32,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Pattern::LargeSpike => {
                "Prices decrease then spike dramatically (200-600% of buy price)"
            }
            Pattern::SmallSpike => "Prices decrease then have a moderate spike (140-200%)",
            Pattern::Fluctuating => "Random ups and downs between 60-140% of buy price",
            Pattern::Decreasing => {
                "Prices only go down all week - no profit possible on your island"
            }
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            Pattern::LargeSpike => "Wait for the spike! Could reach 300-600+ bells",
            Pattern::SmallSpike => "Sell at the peak, usually 4th price after increase starts",
            Pattern::Fluctuating => "Sell when you see 120%+ or on any profit opportunity",
            Pattern::Decreasing => "Sell immediately or find a friend's island with better prices!",
        }
    }

    /// Human-readable label for report output.
    pub fn label(self) -> &'static str {
        match self {
            Pattern::LargeSpike => "Large Spike",
            Pattern::SmallSpike => "Small Spike",
            Pattern::Fluctuating => "Fluctuating",
            Pattern::Decreasing => "Decreasing",
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Pattern::Fluctuating => "fluctuating",
            Pattern::LargeSpike => "large-spike",
            Pattern::Decreasing => "decreasing",
            Pattern::SmallSpike => "small-spike",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for Pattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fluctuating" => Ok(Pattern::Fluctuating),
            "large-spike" => Ok(Pattern::LargeSpike),
            "decreasing" => Ok(Pattern::Decreasing),
            "small-spike" => Ok(Pattern::SmallSpike),
            other => Err(format!(
                "unknown pattern '{}' (expected fluctuating, large-spike, decreasing or small-spike)",
                other
            )),
        }
    }
}

/// One week of entered turnip data; this is what gets persisted between
/// runs and fed to the engine. Slot 2k is the morning reading of day k,
/// slot 2k+1 the afternoon reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub anchor_price: Option<u32>,
    pub slots: [Option<u32>; SLOT_COUNT],
    pub prior_pattern: Option<Pattern>,
}

impl Default for Observation {
    fn default() -> Self {
        Self {
            anchor_price: None,
            slots: [None; SLOT_COUNT],
            prior_pattern: None,
        }
    }
}

impl Observation {
    /// Number of half-day readings actually entered.
    pub fn observed_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.anchor_price.is_none() && self.prior_pattern.is_none() && self.observed_count() == 0
    }
}

/// Inclusive expected sell range in bells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u32,
    pub max: u32,
}

/// One ranked forecast entry. Pure value; the engine returns all four,
/// sorted descending by probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub pattern: Pattern,
    pub probability: f64,
    pub expected_range: PriceRange,
    pub description: &'static str,
    pub recommendation: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictError {
    #[error("anchor price {0} outside valid range 90-110")]
    InvalidAnchorPrice(u32),
}
