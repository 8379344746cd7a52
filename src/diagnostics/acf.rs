//! Sample autocorrelation.
use ndarray::{s, Array1, ArrayView1};

/// Sample autocorrelations `r_1..=r_max_lag`.
///
/// `r_k = Σ_{t ≥ k} (x_t − x̄)(x_{t−k} − x̄) / Σ_t (x_t − x̄)²`, the usual
/// biased estimator. Lags at or beyond the series length, and every lag of a
/// zero-variance series, are reported as `0`.
pub fn sample_acf(data: ArrayView1<f64>, max_lag: usize) -> Array1<f64> {
    let n = data.len();
    let mut out = Array1::<f64>::zeros(max_lag);
    if n == 0 {
        return out;
    }
    let mean = data.sum() / n as f64;
    let centered = data.mapv(|x| x - mean);
    let denom = centered.dot(&centered);
    if denom <= 0.0 || !denom.is_finite() {
        return out;
    }
    for k in 1..=max_lag.min(n.saturating_sub(1)) {
        let num: f64 = centered
            .slice(s![k..])
            .iter()
            .zip(centered.iter())
            .map(|(x_t, x_t_min_k)| x_t * x_t_min_k)
            .sum();
        out[k - 1] = num / denom;
    }
    out
}

/// Whether the series has positive sample variance.
pub fn has_variance(data: ArrayView1<f64>) -> bool {
    data.get(0).is_some_and(|&x0| data.iter().any(|&x| x != x0))
}
