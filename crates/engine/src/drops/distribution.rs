use crate::god::FragmentNumber;

/// Cumulative thresholds for fragments 1..=7. Low numbers are common, the
/// seventh fragment drops one time in twenty.
pub const CUMULATIVE_WEIGHTS: [f64; 7] = [0.30, 0.50, 0.65, 0.78, 0.88, 0.95, 1.00];

/// Map a uniform roll in `[0, 1)` to a fragment number.
pub fn weighted_fragment_number(roll: f64) -> FragmentNumber {
    let index = CUMULATIVE_WEIGHTS
        .iter()
        .position(|&threshold| roll < threshold)
        .unwrap_or(CUMULATIVE_WEIGHTS.len() - 1);
    FragmentNumber::saturating(index as u8 + 1)
}

/// Probability of each fragment number, derived from the cumulative table.
pub fn expected_share(number: FragmentNumber) -> f64 {
    let i = usize::from(number.get()) - 1;
    let lower = if i == 0 { 0.0 } else { CUMULATIVE_WEIGHTS[i - 1] };
    CUMULATIVE_WEIGHTS[i] - lower
}
