//! Distribution statistics for the economic census

/// Arithmetic mean; `None` for no values
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> f64 {
    let Some(mu) = mean(values) else {
        return 0.0;
    };
    let variance = values.iter().map(|x| (x - mu).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Gini coefficient: half the relative mean absolute difference
///
/// Zero for an empty sample or a zero mean.
pub fn gini(values: &[f64]) -> f64 {
    let n = values.len();
    let total: f64 = values.iter().sum();
    if n == 0 || total == 0.0 {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    // sum_i sum_j |x_i - x_j| = 2 * sum_k (2k - n - 1) x_(k), k = 1..n
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(k, x)| (2.0 * (k as f64 + 1.0) - n as f64 - 1.0) * x)
        .sum();
    weighted / (n as f64 * total)
}

/// Percentile of already sorted values, interpolating linearly between ranks
pub fn percentile(sorted: &[f64], pct: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = pct.clamp(0.0, 100.0) / 100.0 * last as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Quintile boundaries (0th..100th percentile) and the mean of each quintile
///
/// A value belongs to the quintile whose lower boundary it reaches; the
/// maximum is counted in the top quintile. Empty quintiles have no mean.
pub fn quintiles(values: &[f64]) -> ([f64; 6], [Option<f64>; 5]) {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut boundaries = [0.0; 6];
    for (k, boundary) in boundaries.iter_mut().enumerate() {
        *boundary = percentile(&sorted, 20.0 * k as f64).unwrap_or(0.0);
    }

    let mut means = [None; 5];
    for (k, slot) in means.iter_mut().enumerate() {
        let (lo, hi) = (boundaries[k], boundaries[k + 1]);
        let members: Vec<f64> = sorted
            .iter()
            .copied()
            .filter(|&x| x >= lo && (x < hi || (k == 4 && x <= hi)))
            .collect();
        *slot = mean(&members);
    }

    (boundaries, means)
}

/// `numerator / denominator`, or `None` when the denominator is zero
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator != 0.0).then(|| numerator / denominator)
}
