//! Binomial thinning: the law of the retained part of past counts.
//!
//! Order 1 retains `K ~ Bin(y, a)` of the previous count `y`.
//!
//! Order 2 conditions on `(z, y) = (x_{t−2}, x_{t−1})` and retains
//! `K1 + K2 + K3` with independent `K1 ~ Bin(y, a1)`, `K2 ~ Bin(z, a2)` and
//! `K3 ~ Bin(y + z, a3 / 2)`. The conditional mean is
//! `a1 y + a2 z + a3 (y + z) / 2`, so stationarity is `a1 + a2 + a3 < 1`, and
//! `a2 = a3 = 0` recovers order 1.
//!
//! This sum of independent binomials is a modelling choice. It is not a
//! mixture over "which lag is thinned" weighted by `(a1, a2, a3, 1 − Σa)`;
//! the residual weight `1 − Σa` enters only through the stationarity bound.
//!
//! Retained laws are returned as dense pmf vectors over `0..=max`, optionally
//! with their derivatives in each thinning probability, ready to be
//! convolved with the innovation law.
use crate::counts::errors::{CountError, CountResult};
use rand::Rng;
use rand_distr::{Binomial, Distribution};
use statrs::function::factorial::ln_binomial;

/// Retained-count pmf and its derivatives.
#[derive(Debug, Clone, PartialEq)]
pub struct Retained {
    /// `pmf[i] = P(K = i)`.
    pub pmf: Vec<f64>,
    /// `grad[j][i] = ∂P(K = i)/∂a_{j+1}`; empty unless requested.
    pub grad: Vec<Vec<f64>>,
}

/// `P(Bin(n, p) = i)` for `i = 0..=n`.
pub fn binomial_pmf(n: u64, p: f64) -> Vec<f64> {
    if p <= 0.0 {
        return point_mass(n as usize + 1, 0);
    }
    if p >= 1.0 {
        return point_mass(n as usize + 1, n as usize);
    }
    let (ln_p, ln_q) = (p.ln(), (-p).ln_1p());
    (0..=n)
        .map(|i| (ln_binomial(n, i) + i as f64 * ln_p + (n - i) as f64 * ln_q).exp())
        .collect()
}

/// `∂P(Bin(n, p) = i)/∂p = n [P(Bin(n−1, p) = i−1) − P(Bin(n−1, p) = i)]`.
pub fn binomial_pmf_deriv(n: u64, p: f64) -> Vec<f64> {
    if n == 0 {
        return vec![0.0];
    }
    let lower = binomial_pmf(n - 1, p);
    let nf = n as f64;
    (0..=n as usize)
        .map(|i| {
            let prev = if i > 0 { lower[i - 1] } else { 0.0 };
            let same = lower.get(i).copied().unwrap_or(0.0);
            nf * (prev - same)
        })
        .collect()
}

/// Discrete convolution of two pmf vectors.
pub fn convolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &ai) in a.iter().enumerate() {
        if ai == 0.0 {
            continue;
        }
        for (j, &bj) in b.iter().enumerate() {
            out[i + j] += ai * bj;
        }
    }
    out
}

fn point_mass(len: usize, at: usize) -> Vec<f64> {
    let mut v = vec![0.0; len];
    v[at] = 1.0;
    v
}

/// Order-1 retained law of `y` with thinning probability `a`.
pub fn retained_ar1(y: u64, a: f64, with_grad: bool) -> Retained {
    let pmf = binomial_pmf(y, a);
    let grad = if with_grad { vec![binomial_pmf_deriv(y, a)] } else { Vec::new() };
    Retained { pmf, grad }
}

/// Order-2 retained law of `(z, y) = (x_{t−2}, x_{t−1})`.
pub fn retained_ar2(z: u64, y: u64, a: &[f64; 3], with_grad: bool) -> Retained {
    let b1 = binomial_pmf(y, a[0]);
    let b2 = binomial_pmf(z, a[1]);
    let b3 = binomial_pmf(y + z, 0.5 * a[2]);
    let b12 = convolve(&b1, &b2);
    let pmf = convolve(&b12, &b3);
    if !with_grad {
        return Retained { pmf, grad: Vec::new() };
    }
    let d1 = convolve(&convolve(&binomial_pmf_deriv(y, a[0]), &b2), &b3);
    let d2 = convolve(&convolve(&b1, &binomial_pmf_deriv(z, a[1])), &b3);
    let d3 = convolve(&b12, &binomial_pmf_deriv(y + z, 0.5 * a[2]))
        .into_iter()
        .map(|v| 0.5 * v)
        .collect();
    Retained { pmf, grad: vec![d1, d2, d3] }
}

/// Draw the retained count for `history` (oldest first).
///
/// # Errors
/// - [`CountError::HistoryLengthMismatch`] unless `history` holds one or two
///   counts.
/// - Binomial sampler construction failures.
pub fn sample_retained<R: Rng + ?Sized>(
    history: &[u64], thinning: &[f64; 3], rng: &mut R,
) -> CountResult<u64> {
    match *history {
        [y] => Ok(Binomial::new(y, thinning[0])?.sample(rng)),
        [z, y] => {
            let k1 = Binomial::new(y, thinning[0])?.sample(rng);
            let k2 = Binomial::new(z, thinning[1])?.sample(rng);
            let k3 = Binomial::new(y + z, 0.5 * thinning[2])?.sample(rng);
            Ok(k1 + k2 + k3)
        }
        _ => Err(CountError::HistoryLengthMismatch {
            expected: if history.is_empty() { 1 } else { 2 },
            actual: history.len(),
        }),
    }
}
