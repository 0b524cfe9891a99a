use crate::domain::Pattern;

/// Stationary pattern distribution, used when last week's pattern is
/// unknown. Canonical order (LargeSpike, SmallSpike, Fluctuating,
/// Decreasing). Published equilibrium values, used as given, never
/// renormalized.
const STATIONARY: [f64; 4] = [0.2475, 0.2588, 0.3461, 0.1476];

/// Row-stochastic transition matrix: row = last week's pattern, column =
/// this week's pattern, both in canonical order.
const TRANSITIONS: [[f64; 4]; 4] = [
    // from LargeSpike
    [0.05, 0.25, 0.50, 0.20],
    // from SmallSpike
    [0.25, 0.15, 0.45, 0.15],
    // from Fluctuating
    [0.30, 0.35, 0.20, 0.15],
    // from Decreasing
    [0.45, 0.25, 0.25, 0.05],
];

/// Prior lookup over the four patterns, optionally conditioned on last
/// week's pattern. Pure table, total domain.
#[derive(Debug, Clone)]
pub struct PriorTable {
    stationary: [f64; 4],
    transitions: [[f64; 4]; 4],
}

impl PriorTable {
    /// The standard table. Transition rows are checked to be stochastic
    /// here, once, so call sites never re-validate.
    pub fn standard() -> Self {
        let table = Self {
            stationary: STATIONARY,
            transitions: TRANSITIONS,
        };
        for (i, row) in table.transitions.iter().enumerate() {
            let sum: f64 = row.iter().sum();
            assert!(
                (sum - 1.0).abs() < 1e-9,
                "transition row {} sums to {}, expected 1.0",
                i,
                sum
            );
        }
        table
    }

    /// Prior probabilities in canonical order. With no previous pattern the
    /// stationary distribution is returned; otherwise the matching
    /// transition row.
    pub fn priors(&self, previous: Option<Pattern>) -> [f64; 4] {
        match previous {
            Some(p) => self.transitions[p.idx()],
            None => self.stationary,
        }
    }

    /// Prior for a single pattern.
    pub fn prior(&self, previous: Option<Pattern>, pattern: Pattern) -> f64 {
        self.priors(previous)[pattern.idx()]
    }
}

impl Default for PriorTable {
    fn default() -> Self {
        Self::standard()
    }
}
