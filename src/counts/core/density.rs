//! Transition density engine: conditional pmf/cdf of the next count.
//!
//! Purpose
//! -------
//! Evaluate `P(X_t = x | history)` for convolution-closed count models by
//! convolving the retained-count law (binomial thinning of the lagged
//! counts, see [`thinning`](super::thinning)) with the innovation law:
//!
//! `pmf(x | h) = Σ_{i=0}^{min(x, R)} P(K = i | h) · g(x − i)`.
//!
//! Key behaviors
//! -------------
//! - [`TransitionDensity`] is the polymorphic seam. There is one
//!   implementation per `(family, order)` pair, [`Ar1Density<F>`] and
//!   [`Ar2Density<F>`] over an [`InnovationFamily`], and
//!   [`ModelSpec::density`] picks it once.
//! - [`ConditionalPmf`] holds one conditional law and answers repeated
//!   pmf/cdf queries, growing its innovation table lazily.
//! - [`TransitionDensity::pmf_grad`] returns the pmf together with its
//!   derivatives in `(rate, thinning, dispersion)` for the analytic score.
//! - [`TransitionDensity::sample`] is the generative analog used by the
//!   simulator.
//! - [`TransitionEngine`] is the public facade taking a [`CountParams`] and an
//!   optional covariate row.
//!
//! Invariants & assumptions
//! ------------------------
//! - Histories are typed `&[u64]` of length `order`, oldest first; negative
//!   or fractional histories are unrepresentable.
//! - `pmf(x) = 0` and `cdf(x) = 0` for `x < 0`.
//! - `cdf(x) − cdf(x − 1) = pmf(x)` up to rounding; `cdf ≤ 1`.
use std::{fmt::Debug, marker::PhantomData};

use crate::counts::{
    core::{
        innovations::Innovation,
        params::CountParams,
        spec::{Family, ModelSpec, Order},
        thinning::{retained_ar1, retained_ar2, sample_retained, Retained},
        truncation::{sum_until_converged, SupportTerm, TruncatedSum},
        validation::validate_history,
    },
    errors::{CountResult, ParamError},
};
use ndarray::ArrayView1;
use rand::RngCore;

/// Transition-law parameters at one time point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionalLaw {
    pub rate: f64,
    /// `(a1, a2, a3)`; order 1 uses `a1` only.
    pub thinning: [f64; 3],
    pub dispersion: f64,
}

/// Derivatives of a conditional pmf value in the law's parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LawGrad {
    pub rate: f64,
    pub thinning: [f64; 3],
    pub dispersion: f64,
}

/// Maps a [`ConditionalLaw`] to its innovation law.
pub trait InnovationFamily: Debug + Default + Send + Sync + 'static {
    const FAMILY: Family;

    fn innovation(law: &ConditionalLaw) -> CountResult<Innovation>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoissonFamily;

impl InnovationFamily for PoissonFamily {
    const FAMILY: Family = Family::Poisson;

    fn innovation(law: &ConditionalLaw) -> CountResult<Innovation> {
        Innovation::poisson(law.rate)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenPoissonFamily;

impl InnovationFamily for GenPoissonFamily {
    const FAMILY: Family = Family::GeneralizedPoisson;

    fn innovation(law: &ConditionalLaw) -> CountResult<Innovation> {
        Innovation::generalized_poisson(law.rate, law.dispersion)
    }
}

/// Conditional law of one count given its history.
///
/// Point masses are `Σ_i r[i] g[x − i]` with `r` the retained pmf and `g`
/// the innovation pmf; cdfs use the innovation cdf `G` in the same sum.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalPmf {
    retained: Vec<f64>,
    innovation: Innovation,
    innov_pmf: Vec<f64>,
    innov_cdf: Vec<f64>,
}

impl ConditionalPmf {
    pub fn new(retained: Vec<f64>, innovation: Innovation) -> Self {
        ConditionalPmf { retained, innovation, innov_pmf: Vec::new(), innov_cdf: Vec::new() }
    }

    fn extend_to(&mut self, k: usize) {
        while self.innov_pmf.len() <= k {
            let p = self.innovation.ln_pmf(self.innov_pmf.len() as u64).exp();
            let c = self.innov_cdf.last().copied().unwrap_or(0.0) + p;
            self.innov_pmf.push(p);
            self.innov_cdf.push(c);
        }
    }

    pub fn pmf(&mut self, x: i64) -> f64 {
        if x < 0 {
            return 0.0;
        }
        let x = x as usize;
        self.extend_to(x);
        let upper = x.min(self.retained.len().saturating_sub(1));
        (0..=upper).map(|i| self.retained[i] * self.innov_pmf[x - i]).sum()
    }

    pub fn cdf(&mut self, x: i64) -> f64 {
        if x < 0 {
            return 0.0;
        }
        let x = x as usize;
        self.extend_to(x);
        let upper = x.min(self.retained.len().saturating_sub(1));
        let c: f64 = (0..=upper).map(|i| self.retained[i] * self.innov_cdf[x - i]).sum();
        c.min(1.0)
    }

    /// `E[X_t | history] = E[K] + E[ε]`.
    pub fn mean(&self) -> f64 {
        let retained: f64 = self.retained.iter().enumerate().map(|(i, p)| i as f64 * p).sum();
        retained + self.innovation.mean()
    }

    pub fn retained(&self) -> &[f64] {
        &self.retained
    }

    pub fn innovation(&self) -> &Innovation {
        &self.innovation
    }
}

/// One transition density per `(family, order)` pair.
pub trait TransitionDensity: Debug + Send + Sync {
    fn family(&self) -> Family;

    fn order(&self) -> Order;

    /// Retained-count law for `history`, with thinning derivatives when
    /// `with_grad` is set.
    ///
    /// # Errors
    /// [`HistoryLengthMismatch`](crate::counts::errors::CountError) for a wrong-length history.
    fn retained(
        &self, history: &[u64], law: &ConditionalLaw, with_grad: bool,
    ) -> CountResult<Retained>;

    fn innovation(&self, law: &ConditionalLaw) -> CountResult<Innovation>;

    /// Conditional law of the next count.
    fn conditional(&self, history: &[u64], law: &ConditionalLaw) -> CountResult<ConditionalPmf> {
        let retained = self.retained(history, law, false)?;
        Ok(ConditionalPmf::new(retained.pmf, self.innovation(law)?))
    }

    /// `pmf(x | history)` and its derivatives in `(rate, thinning, dispersion)`.
    fn pmf_grad(
        &self, x: u64, history: &[u64], law: &ConditionalLaw,
    ) -> CountResult<(f64, LawGrad)> {
        let retained = self.retained(history, law, true)?;
        let innovation = self.innovation(law)?;
        let x = x as usize;
        let upper = x.min(retained.pmf.len().saturating_sub(1));
        let mut pmf = 0.0;
        let mut grad = LawGrad::default();
        for i in 0..=upper {
            let k = (x - i) as u64;
            let g = innovation.ln_pmf(k).exp();
            let (dl_rate, dl_disp) = innovation.ln_pmf_grad(k);
            let joint = retained.pmf[i] * g;
            pmf += joint;
            grad.rate += joint * dl_rate;
            grad.dispersion += joint * dl_disp;
            for (slot, d_retained) in grad.thinning.iter_mut().zip(&retained.grad) {
                *slot += d_retained[i] * g;
            }
        }
        Ok((pmf, grad))
    }

    /// Draw the next count: retained binomial draws plus one innovation.
    fn sample(
        &self, history: &[u64], law: &ConditionalLaw, rng: &mut dyn RngCore,
    ) -> CountResult<u64> {
        validate_history(history, self.order().lags())?;
        let innovation = self.innovation(law)?;
        let kept = sample_retained(history, &law.thinning, rng)?;
        Ok(kept + innovation.sample(rng)?)
    }
}

/// Order-1 transition density.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ar1Density<F: InnovationFamily> {
    _family: PhantomData<F>,
}

impl<F: InnovationFamily> TransitionDensity for Ar1Density<F> {
    fn family(&self) -> Family {
        F::FAMILY
    }

    fn order(&self) -> Order {
        Order::One
    }

    fn retained(
        &self, history: &[u64], law: &ConditionalLaw, with_grad: bool,
    ) -> CountResult<Retained> {
        validate_history(history, 1)?;
        Ok(retained_ar1(history[0], law.thinning[0], with_grad))
    }

    fn innovation(&self, law: &ConditionalLaw) -> CountResult<Innovation> {
        F::innovation(law)
    }
}

/// Order-2 transition density.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ar2Density<F: InnovationFamily> {
    _family: PhantomData<F>,
}

impl<F: InnovationFamily> TransitionDensity for Ar2Density<F> {
    fn family(&self) -> Family {
        F::FAMILY
    }

    fn order(&self) -> Order {
        Order::Two
    }

    fn retained(
        &self, history: &[u64], law: &ConditionalLaw, with_grad: bool,
    ) -> CountResult<Retained> {
        validate_history(history, 2)?;
        Ok(retained_ar2(history[0], history[1], &law.thinning, with_grad))
    }

    fn innovation(&self, law: &ConditionalLaw) -> CountResult<Innovation> {
        F::innovation(law)
    }
}

/// Public pmf/cdf facade over a [`ModelSpec`]'s transition density.
#[derive(Debug)]
pub struct TransitionEngine {
    spec: ModelSpec,
    density: Box<dyn TransitionDensity>,
}

impl TransitionEngine {
    pub fn new(spec: ModelSpec) -> Self {
        TransitionEngine { spec, density: spec.density() }
    }

    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    pub fn density(&self) -> &dyn TransitionDensity {
        self.density.as_ref()
    }

    /// Law parameters at one time point, checking the params belong to this spec.
    pub fn law(
        &self, params: &CountParams, covariate_row: Option<ArrayView1<f64>>,
    ) -> CountResult<ConditionalLaw> {
        if params.spec() != &self.spec {
            return Err(ParamError::SpecMismatch.into());
        }
        params.law_at(covariate_row)
    }

    /// Conditional law of the next count given `history` (oldest first).
    ///
    /// # Errors
    /// History length, parameter/spec mismatch, covariate or rate errors.
    pub fn conditional(
        &self, history: &[u64], params: &CountParams, covariate_row: Option<ArrayView1<f64>>,
    ) -> CountResult<ConditionalPmf> {
        let law = self.law(params, covariate_row)?;
        self.density.conditional(history, &law)
    }

    /// `P(X_t = x | history)`; zero for `x < 0`.
    pub fn pmf(
        &self, x: i64, history: &[u64], params: &CountParams,
        covariate_row: Option<ArrayView1<f64>>,
    ) -> CountResult<f64> {
        Ok(self.conditional(history, params, covariate_row)?.pmf(x))
    }

    /// `P(X_t ≤ x | history)`; zero for `x < 0`.
    pub fn cdf(
        &self, x: i64, history: &[u64], params: &CountParams,
        covariate_row: Option<ArrayView1<f64>>,
    ) -> CountResult<f64> {
        Ok(self.conditional(history, params, covariate_row)?.cdf(x))
    }

    /// Truncated total mass `Σ_x pmf(x | history)`.
    pub fn total_mass(
        &self, history: &[u64], params: &CountParams, covariate_row: Option<ArrayView1<f64>>,
        tolerance: f64,
    ) -> CountResult<TruncatedSum> {
        let mut law = self.conditional(history, params, covariate_row)?;
        sum_until_converged(tolerance, 0, |j| {
            let mass = law.pmf(j as i64);
            Ok(SupportTerm { mass, value: mass })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counts::{
        core::spec::Family,
        errors::{CountError, ParamError},
    };
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::{rngs::StdRng, SeedableRng};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The closed-form anchor pmf(0 | 0) = e^{−λ}.
    // - Total mass, cdf monotonicity and pmf/cdf consistency for all four
    //   `(family, order)` engines.
    // - Analytic pmf derivatives against finite differences.
    // - Seeded sampling against the conditional mean.
    // - History and spec mismatches.
    // -------------------------------------------------------------------------

    fn all_params() -> Vec<CountParams> {
        vec![
            CountParams::new(ModelSpec::new(Family::Poisson, Order::One), array![1.3, 0.4]),
            CountParams::new(
                ModelSpec::new(Family::GeneralizedPoisson, Order::One),
                array![1.1, 0.5, 0.3],
            ),
            CountParams::new(
                ModelSpec::new(Family::Poisson, Order::Two),
                array![0.8, 0.3, 0.2, 0.1],
            ),
            CountParams::new(
                ModelSpec::new(Family::GeneralizedPoisson, Order::Two),
                array![0.9, 0.25, 0.15, 0.2, 0.35],
            ),
        ]
        .into_iter()
        .map(|p| p.expect("valid parameters"))
        .collect()
    }

    fn history_for(params: &CountParams) -> Vec<u64> {
        match params.spec().order {
            Order::One => vec![4],
            Order::Two => vec![2, 5],
        }
    }

    #[test]
    // Purpose
    // -------
    // With zero history nothing is retained, so pmf(0 | 0) is the innovation
    // mass at zero.
    //
    // Given
    // -----
    // - Poisson order 1, rate 1, thinning 0.4, history [0].
    //
    // Expect
    // ------
    // - pmf(0 | 0) = e^{−1}.
    fn pmf_at_zero_history_is_pure_innovation() {
        // Arrange
        let spec = ModelSpec::new(Family::Poisson, Order::One);
        let params = CountParams::new(spec, array![1.0, 0.4]).expect("valid");
        let engine = TransitionEngine::new(spec);

        // Act
        let p = engine.pmf(0, &[0], &params, None).expect("valid history");

        // Assert
        assert_abs_diff_eq!(p, (-1.0_f64).exp(), epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Every engine defines a proper distribution.
    //
    // Given
    // -----
    // - The four `(family, order)` parameter sets and non-trivial histories.
    //
    // Expect
    // ------
    // - Truncated mass within 1e-10 of one.
    fn total_mass_is_one_for_all_engines() {
        for params in all_params() {
            // Arrange
            let engine = TransitionEngine::new(*params.spec());
            let history = history_for(&params);

            // Act
            let out = engine.total_mass(&history, &params, None, 1e-10).expect("converges");

            // Assert
            assert!(out.mass > 1.0 - 1e-10);
            assert!(out.mass < 1.0 + 1e-10);
        }
    }

    #[test]
    // Purpose
    // -------
    // cdf is non-decreasing, starts at zero below the support, and its
    // increments are the pmf.
    //
    // Given
    // -----
    // - The four engines, x = −1..25.
    //
    // Expect
    // ------
    // - cdf(−1) = 0, pmf(−1) = 0, cdf(x) − cdf(x−1) = pmf(x).
    fn cdf_is_monotone_and_consistent_with_pmf() {
        for params in all_params() {
            // Arrange
            let engine = TransitionEngine::new(*params.spec());
            let history = history_for(&params);
            let mut law = engine.conditional(&history, &params, None).expect("valid");

            // Act / Assert
            assert_eq!(law.cdf(-1), 0.0);
            assert_eq!(law.pmf(-1), 0.0);
            let mut prev = 0.0;
            for x in 0..25 {
                let c = law.cdf(x);
                assert!(c >= prev);
                assert_abs_diff_eq!(c - prev, law.pmf(x), epsilon = 1e-12);
                prev = c;
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // `pmf_grad` matches finite differences in every law component.
    //
    // Given
    // -----
    // - GP order 2, history [2, 5], x = 4.
    //
    // Expect
    // ------
    // - Agreement to 1e-7 for rate, a1..a3 and dispersion.
    fn pmf_grad_matches_finite_differences() {
        // Arrange
        let density = Ar2Density::<GenPoissonFamily>::default();
        let law = ConditionalLaw { rate: 0.9, thinning: [0.25, 0.15, 0.2], dispersion: 0.35 };
        let history = [2, 5];
        let h = 1e-6;
        let eval = |l: &ConditionalLaw| density.conditional(&history, l).expect("valid").pmf(4);

        // Act
        let (pmf, grad) = density.pmf_grad(4, &history, &law).expect("valid");

        // Assert
        assert_abs_diff_eq!(pmf, eval(&law), epsilon = 1e-14);
        let mut up = law;
        let mut down = law;
        up.rate += h;
        down.rate -= h;
        assert_abs_diff_eq!(grad.rate, (eval(&up) - eval(&down)) / (2.0 * h), epsilon = 1e-7);
        for j in 0..3 {
            let mut up = law;
            let mut down = law;
            up.thinning[j] += h;
            down.thinning[j] -= h;
            let fd = (eval(&up) - eval(&down)) / (2.0 * h);
            assert_abs_diff_eq!(grad.thinning[j], fd, epsilon = 1e-7);
        }
        let mut up = law;
        let mut down = law;
        up.dispersion += h;
        down.dispersion -= h;
        let fd = (eval(&up) - eval(&down)) / (2.0 * h);
        assert_abs_diff_eq!(grad.dispersion, fd, epsilon = 1e-7);
    }

    #[test]
    // Purpose
    // -------
    // Seeded draws average to the conditional mean.
    //
    // Given
    // -----
    // - Poisson order 2, rate 0.8, a = (0.3, 0.2, 0.1), history [2, 5];
    //   20 000 draws.
    //
    // Expect
    // ------
    // - Sample mean within 0.1 of 0.8 + 1.5 + 0.4 + 0.35 = 3.05.
    fn sample_matches_conditional_mean() {
        // Arrange
        let density = Ar2Density::<PoissonFamily>::default();
        let law = ConditionalLaw { rate: 0.8, thinning: [0.3, 0.2, 0.1], dispersion: 0.0 };
        let mut rng = StdRng::seed_from_u64(3);
        let expected = density.conditional(&[2, 5], &law).expect("valid").mean();

        // Act
        let total: u64 =
            (0..20_000).map(|_| density.sample(&[2, 5], &law, &mut rng).expect("draw")).sum();

        // Assert
        assert_abs_diff_eq!(expected, 3.05, epsilon = 1e-12);
        assert_abs_diff_eq!(total as f64 / 20_000.0, expected, epsilon = 0.1);
    }

    #[test]
    // Purpose
    // -------
    // Wrong history length and foreign parameters are domain errors.
    //
    // Given
    // -----
    // - An order-1 engine queried with two lags, and with order-2 params.
    //
    // Expect
    // ------
    // - `HistoryLengthMismatch` and `ParamError::SpecMismatch`.
    fn mismatches_are_rejected() {
        // Arrange
        let params = all_params();
        let engine = TransitionEngine::new(*params[0].spec());

        // Act
        let bad_history = engine.pmf(1, &[1, 2], &params[0], None);
        let foreign = engine.pmf(1, &[1], &params[2], None);

        // Assert
        assert_eq!(bad_history, Err(CountError::HistoryLengthMismatch { expected: 1, actual: 2 }));
        assert_eq!(foreign, Err(CountError::Param(ParamError::SpecMismatch)));
    }
}
