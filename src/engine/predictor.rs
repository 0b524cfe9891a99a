use crate::domain::{
    Pattern, PredictError, PredictionResult, MAX_ANCHOR_PRICE, MIN_ANCHOR_PRICE, SLOT_COUNT,
};
use crate::model::{likelihood, PriorTable};

/// Posterior distribution used if every unnormalized posterior collapses to
/// exactly 0 (canonical order). Kept as documented constants, not
/// re-derived; with positive priors and soft penalties the total can't
/// actually reach 0.
const FALLBACK_POSTERIOR: [f64; 4] = [0.25, 0.26, 0.35, 0.15];

/// Rank the four patterns by posterior probability given this week's
/// readings.
///
/// Pure function: prior (conditioned on last week's pattern when known)
/// times per-pattern likelihood, normalized over the four candidates.
/// Returns all four patterns, sorted descending by probability with the
/// canonical order breaking exact ties. The only rejectable input is an
/// anchor price outside 90-110.
pub fn predict(
    anchor_price: u32,
    slots: &[Option<u32>; SLOT_COUNT],
    previous: Option<Pattern>,
) -> Result<Vec<PredictionResult>, PredictError> {
    if !(MIN_ANCHOR_PRICE..=MAX_ANCHOR_PRICE).contains(&anchor_price) {
        return Err(PredictError::InvalidAnchorPrice(anchor_price));
    }

    let priors = PriorTable::standard().priors(previous);

    let mut posteriors = [0.0f64; 4];
    for pattern in Pattern::ALL {
        let i = pattern.idx();
        posteriors[i] = priors[i] * likelihood(pattern, anchor_price, slots);
    }

    let total: f64 = posteriors.iter().sum();
    tracing::debug!(total, ?posteriors, "unnormalized posteriors");

    let mut results: Vec<PredictionResult> = Pattern::ALL
        .iter()
        .map(|&pattern| {
            let i = pattern.idx();
            let probability = if total > 0.0 {
                posteriors[i] / total
            } else {
                FALLBACK_POSTERIOR[i]
            };
            PredictionResult {
                pattern,
                probability,
                expected_range: pattern.expected_range(anchor_price),
                description: pattern.description(),
                recommendation: pattern.recommendation(),
            }
        })
        .collect();

    // Stable sort over the canonically-ordered candidates keeps ties in
    // canonical order
    results.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceRange;

    fn slots(values: &[Option<u32>]) -> [Option<u32>; SLOT_COUNT] {
        let mut out = [None; SLOT_COUNT];
        out[..values.len()].copy_from_slice(values);
        out
    }

    fn probability_of(results: &[PredictionResult], pattern: Pattern) -> f64 {
        results
            .iter()
            .find(|r| r.pattern == pattern)
            .map(|r| r.probability)
            .unwrap()
    }

    #[test]
    fn test_rejects_anchor_below_range() {
        let empty = [None; SLOT_COUNT];
        assert_eq!(
            predict(89, &empty, None),
            Err(PredictError::InvalidAnchorPrice(89))
        );
    }

    #[test]
    fn test_rejects_anchor_above_range() {
        let empty = [None; SLOT_COUNT];
        assert_eq!(
            predict(111, &empty, None),
            Err(PredictError::InvalidAnchorPrice(111))
        );
    }

    #[test]
    fn test_accepts_boundary_anchors() {
        let empty = [None; SLOT_COUNT];
        assert!(predict(90, &empty, None).is_ok());
        assert!(predict(110, &empty, None).is_ok());
    }

    #[test]
    fn test_no_evidence_returns_stationary_priors() {
        // All likelihoods are 1.0, and the stationary values sum to 1.0, so
        // the posteriors come out as the priors themselves
        let results = predict(100, &[None; SLOT_COUNT], None).unwrap();
        assert!((probability_of(&results, Pattern::Fluctuating) - 0.3461).abs() < 1e-9);
        assert!((probability_of(&results, Pattern::LargeSpike) - 0.2475).abs() < 1e-9);
        assert!((probability_of(&results, Pattern::SmallSpike) - 0.2588).abs() < 1e-9);
        assert!((probability_of(&results, Pattern::Decreasing) - 0.1476).abs() < 1e-9);
        assert_eq!(results[0].pattern, Pattern::Fluctuating);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let weeks = [
            [None; SLOT_COUNT],
            slots(&[Some(550)]),
            slots(&[Some(88), Some(85), Some(80), Some(76), Some(70), Some(65)]),
            slots(&[Some(100), Some(130), Some(65), None, Some(90)]),
        ];
        for week in &weeks {
            for previous in [None, Some(Pattern::Decreasing), Some(Pattern::LargeSpike)] {
                let results = predict(100, week, previous).unwrap();
                let sum: f64 = results.iter().map(|r| r.probability).sum();
                assert!((sum - 1.0).abs() < 1e-6, "sum {}", sum);
            }
        }
    }

    #[test]
    fn test_single_spike_reading_ranks_large_spike_first() {
        let results = predict(100, &slots(&[Some(550)]), None).unwrap();
        assert_eq!(results[0].pattern, Pattern::LargeSpike);
        assert!(results[0].probability > 0.5);
    }

    #[test]
    fn test_steady_decline_ranks_decreasing_first() {
        let week = slots(&[Some(88), Some(85), Some(80), Some(76), Some(70), Some(65)]);
        let results = predict(100, &week, None).unwrap();
        assert_eq!(results[0].pattern, Pattern::Decreasing);
    }

    #[test]
    fn test_previous_pattern_shifts_posterior() {
        let week = slots(&[Some(100), Some(110)]);
        let base = predict(100, &week, None).unwrap();
        let conditioned = predict(100, &week, Some(Pattern::LargeSpike)).unwrap();
        // Prior for Fluctuating jumps from 0.3461 to 0.50
        assert!(
            probability_of(&conditioned, Pattern::Fluctuating)
                > probability_of(&base, Pattern::Fluctuating)
        );
        // Back-to-back large spikes are rare (prior 0.05)
        assert!(
            probability_of(&conditioned, Pattern::LargeSpike)
                < probability_of(&base, Pattern::LargeSpike)
        );
    }

    #[test]
    fn test_results_sorted_descending() {
        let results = predict(105, &slots(&[Some(90), Some(140)]), None).unwrap();
        for pair in results.windows(2) {
            assert!(pair[0].probability >= pair[1].probability);
        }
        assert_eq!(results.len(), 4);
    }

    #[test]
    fn test_exact_ties_follow_canonical_order() {
        // Force all posteriors equal by making all likelihoods equal and
        // flattening the prior is impossible with these tables, so check
        // the tie rule directly at the fallback path shape instead: equal
        // probabilities keep canonical order under the stable sort.
        let mut results: Vec<PredictionResult> = Pattern::ALL
            .iter()
            .map(|&pattern| PredictionResult {
                pattern,
                probability: 0.25,
                expected_range: pattern.expected_range(100),
                description: pattern.description(),
                recommendation: pattern.recommendation(),
            })
            .collect();
        results.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let order: Vec<Pattern> = results.iter().map(|r| r.pattern).collect();
        assert_eq!(order, Pattern::ALL.to_vec());
    }

    #[test]
    fn test_ranges_and_advice_attached() {
        let results = predict(100, &[None; SLOT_COUNT], None).unwrap();
        let spike = results
            .iter()
            .find(|r| r.pattern == Pattern::LargeSpike)
            .unwrap();
        assert_eq!(spike.expected_range, PriceRange { min: 200, max: 600 });
        assert_eq!(
            spike.recommendation,
            "Wait for the spike! Could reach 300-600+ bells"
        );
        for r in &results {
            assert!(r.expected_range.min <= r.expected_range.max);
            assert!(!r.description.is_empty());
        }
    }

    #[test]
    fn test_predict_is_deterministic() {
        let week = slots(&[Some(95), None, Some(130), Some(88)]);
        let a = predict(102, &week, Some(Pattern::SmallSpike)).unwrap();
        let b = predict(102, &week, Some(Pattern::SmallSpike)).unwrap();
        assert_eq!(a, b);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.probability.to_bits(), y.probability.to_bits());
        }
    }

    #[test]
    fn test_sparse_noisy_week_degrades_gracefully() {
        // One absurd reading must not zero anything out
        let week = slots(&[Some(5000)]);
        let results = predict(100, &week, None).unwrap();
        for r in &results {
            assert!(r.probability > 0.0, "{} got zeroed", r.pattern);
        }
        let sum: f64 = results.iter().map(|r| r.probability).sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }
}
