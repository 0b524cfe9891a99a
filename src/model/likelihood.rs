use crate::domain::{Pattern, SLOT_COUNT};

/// Soft penalty for a reading clearly outside a pattern's legitimate band.
/// Never a hard zero: a single noisy or rounded reading must not eliminate
/// a pattern outright.
pub const OUT_OF_BAND_PENALTY: f64 = 0.1;

/// Weak positive signal (e.g. a small-spike rise that has not peaked yet).
pub const WEAK_SIGNAL_BOOST: f64 = 1.2;

/// Strong positive signal (a reading at or above the large-spike floor).
pub const SPIKE_SIGNAL_BOOST: f64 = 2.0;

/// Absolute tolerance in bells around the decreasing band, absorbing
/// in-game rounding.
const BAND_TOLERANCE: f64 = 5.0;

/// Consecutive falling steps that count as a sustained slide. Fluctuating
/// alternates direction every few half-days, and a slide this long with no
/// spike evidence points at the decreasing pattern instead.
const SUSTAINED_SLIDE_STEPS: usize = 4;

/// Compatibility score in [0, 1] of the observed slots with one pattern's
/// generative shape. Unknown slots are skipped entirely; they neither
/// raise nor lower the score. Heuristic scorer, not a probability density.
pub fn likelihood(pattern: Pattern, anchor_price: u32, slots: &[Option<u32>; SLOT_COUNT]) -> f64 {
    match pattern {
        Pattern::Decreasing => decreasing_score(anchor_price, slots),
        Pattern::Fluctuating => fluctuating_score(anchor_price, slots),
        Pattern::SmallSpike => small_spike_score(anchor_price, slots),
        Pattern::LargeSpike => large_spike_score(anchor_price, slots),
    }
}

/// Decreasing: starts at 85-90% of anchor and narrows 3-5% per half-day,
/// bottoming out around 30%.
fn decreasing_score(anchor_price: u32, slots: &[Option<u32>; SLOT_COUNT]) -> f64 {
    let anchor = anchor_price as f64;
    let mut score = 1.0;

    for (i, slot) in slots.iter().enumerate() {
        let Some(price) = slot else { continue };
        let min_expected = (anchor * (0.85 - 0.05 * i as f64)).floor();
        let max_expected = (anchor * (0.90 - 0.03 * i as f64)).ceil();

        let price = *price as f64;
        if price < min_expected - BAND_TOLERANCE || price > max_expected + BAND_TOLERANCE {
            score *= OUT_OF_BAND_PENALTY;
        }

        // Band floor: prices don't drop below ~30% of anchor
        if min_expected < anchor * 0.3 {
            break;
        }
    }

    score.clamp(0.0, 1.0)
}

/// Fluctuating: random ups and downs inside a wide 60-140% band, with
/// rising and falling phases only a few half-days long.
fn fluctuating_score(anchor_price: u32, slots: &[Option<u32>; SLOT_COUNT]) -> f64 {
    let anchor = anchor_price as f64;
    let min_expected = (anchor * 0.6).floor();
    let max_expected = (anchor * 1.4).ceil();
    let mut score = 1.0;

    for price in slots.iter().flatten() {
        let price = *price as f64;
        if price < min_expected || price > max_expected {
            score *= OUT_OF_BAND_PENALTY;
        }
    }

    if longest_slide(slots) >= SUSTAINED_SLIDE_STEPS {
        score *= OUT_OF_BAND_PENALTY;
    }

    score.clamp(0.0, 1.0)
}

/// Small spike: decreasing phase, then a run of increases peaking at
/// 140-200% of anchor.
fn small_spike_score(anchor_price: u32, slots: &[Option<u32>; SLOT_COUNT]) -> f64 {
    let anchor = anchor_price as f64;
    let mut score = 1.0;
    let mut rise_seen = false;
    let mut peak_seen = false;

    for i in 0..SLOT_COUNT {
        let Some(price) = slots[i] else { continue };

        // A rise between consecutive observed slots hints the spike started
        if i > 0 {
            if let Some(prev) = slots[i - 1] {
                if price > prev {
                    rise_seen = true;
                }
            }
        }

        let price = price as f64;
        if price >= anchor * 1.4 && price <= anchor * 2.0 {
            peak_seen = true;
        }
        if price > anchor * 2.1 {
            score *= OUT_OF_BAND_PENALTY;
        }
    }

    // Rising but not yet peaked: might still be building toward the peak
    if rise_seen && !peak_seen {
        score *= WEAK_SIGNAL_BOOST;
    }

    // A long uninterrupted slide with no rise or peak evidence looks like
    // the decreasing pattern, not a spike waiting to happen
    if !rise_seen && !peak_seen && longest_slide(slots) >= SUSTAINED_SLIDE_STEPS {
        score *= OUT_OF_BAND_PENALTY;
    }

    score.clamp(0.0, 1.0)
}

/// Large spike: decreasing phase, then a dramatic spike to 200-600% of
/// anchor.
fn large_spike_score(anchor_price: u32, slots: &[Option<u32>; SLOT_COUNT]) -> f64 {
    let anchor = anchor_price as f64;
    let mut score = 1.0;
    let mut spike_seen = false;

    for price in slots.iter().flatten() {
        let price = *price as f64;
        if price >= anchor * 2.0 {
            spike_seen = true;
            if price > anchor * 6.0 {
                // Too high even for a large spike
                score *= OUT_OF_BAND_PENALTY;
            }
        }
    }

    if spike_seen {
        score *= SPIKE_SIGNAL_BOOST;
    } else if longest_slide(slots) >= SUSTAINED_SLIDE_STEPS {
        score *= OUT_OF_BAND_PENALTY;
    }

    score.clamp(0.0, 1.0)
}

/// Longest run of strictly falling steps between consecutive observed
/// slots. An unknown slot or a flat/rising step breaks the run.
fn longest_slide(slots: &[Option<u32>; SLOT_COUNT]) -> usize {
    let mut best = 0;
    let mut run = 0;

    for i in 1..SLOT_COUNT {
        match (slots[i - 1], slots[i]) {
            (Some(prev), Some(cur)) if cur < prev => {
                run += 1;
                best = best.max(run);
            }
            _ => run = 0,
        }
    }

    best
}
