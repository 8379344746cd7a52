//! Model specification: innovation family, autoregressive order, link.
//!
//! [`ModelSpec`] is the single tagged description of a count model. It fixes
//! the parameter-vector layout ([`ParamLayout`]) and selects the transition
//! density implementation once, through [`ModelSpec::density`], so no other
//! code branches on `(family, order)`.
//!
//! Layout of the parameter vector:
//! - without covariates: `(rate, thinning…, [dispersion])`;
//! - with covariates: `(thinning…, [dispersion], β₀, …, β_{p−1})`.
//!
//! Lag selection is fixed by the order: lag 1 for order 1, lags 1 and 2 for
//! order 2.
use std::{fmt, ops::Range, str::FromStr};

use crate::counts::{
    core::density::{Ar1Density, Ar2Density, GenPoissonFamily, PoissonFamily, TransitionDensity},
    errors::CountError,
};

/// Innovation distribution family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Poisson,
    GeneralizedPoisson,
}

impl FromStr for Family {
    type Err = CountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "poisson" | "pois" => Ok(Family::Poisson),
            "generalizedpoisson" | "generalized_poisson" | "genpois" | "gp" => {
                Ok(Family::GeneralizedPoisson)
            }
            _ => Err(CountError::UnknownModelName { kind: "family", name: s.to_string() }),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Poisson => write!(f, "Poisson"),
            Family::GeneralizedPoisson => write!(f, "GeneralizedPoisson"),
        }
    }
}

/// Autoregressive order of the thinning operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    One,
    Two,
}

impl Order {
    /// Number of lagged counts the transition law conditions on.
    pub const fn lags(self) -> usize {
        match self {
            Order::One => 1,
            Order::Two => 2,
        }
    }

    /// Number of thinning probabilities in the parameter vector.
    pub const fn n_thinning(self) -> usize {
        match self {
            Order::One => 1,
            Order::Two => 3,
        }
    }
}

impl FromStr for Order {
    type Err = CountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Order::One),
            "2" => Ok(Order::Two),
            _ => Err(CountError::UnknownModelName { kind: "order", name: s.to_string() }),
        }
    }
}

/// Link between the linear predictor `xᵀβ` and the innovation rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Link {
    #[default]
    Log,
    Identity,
}

impl Link {
    /// `rate = link⁻¹(eta)`.
    pub fn inverse(self, eta: f64) -> f64 {
        match self {
            Link::Log => eta.exp(),
            Link::Identity => eta,
        }
    }

    /// `d rate / d eta` at `eta`.
    pub fn inverse_deriv(self, eta: f64) -> f64 {
        match self {
            Link::Log => eta.exp(),
            Link::Identity => 1.0,
        }
    }

    /// `eta = link(rate)`; used for initialization.
    pub fn apply(self, rate: f64) -> f64 {
        match self {
            Link::Log => rate.ln(),
            Link::Identity => rate,
        }
    }
}

impl FromStr for Link {
    type Err = CountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "log" => Ok(Link::Log),
            "identity" | "id" => Ok(Link::Identity),
            _ => Err(CountError::UnknownModelName { kind: "link", name: s.to_string() }),
        }
    }
}

/// Index ranges of each block inside a parameter vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamLayout {
    pub rate: Option<usize>,
    pub thinning: Range<usize>,
    pub dispersion: Option<usize>,
    pub coefficients: Range<usize>,
    pub len: usize,
}

/// Tagged model description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelSpec {
    pub family: Family,
    pub order: Order,
    /// Number of regression coefficients; `0` means a constant rate.
    pub n_covariates: usize,
    pub link: Link,
}

impl ModelSpec {
    /// Constant-rate model.
    pub const fn new(family: Family, order: Order) -> Self {
        ModelSpec { family, order, n_covariates: 0, link: Link::Log }
    }

    /// Regression model with `n_covariates` coefficients.
    pub const fn with_covariates(
        family: Family, order: Order, n_covariates: usize, link: Link,
    ) -> Self {
        ModelSpec { family, order, n_covariates, link }
    }

    pub const fn has_covariates(&self) -> bool {
        self.n_covariates > 0
    }

    pub const fn has_dispersion(&self) -> bool {
        matches!(self.family, Family::GeneralizedPoisson)
    }

    pub const fn lags(&self) -> usize {
        self.order.lags()
    }

    pub fn layout(&self) -> ParamLayout {
        let mut next = 0;
        let rate = if self.has_covariates() {
            None
        } else {
            next += 1;
            Some(0)
        };
        let thinning = next..next + self.order.n_thinning();
        next = thinning.end;
        let dispersion = if self.has_dispersion() {
            next += 1;
            Some(next - 1)
        } else {
            None
        };
        let coefficients = next..next + self.n_covariates;
        let len = coefficients.end;
        ParamLayout { rate, thinning, dispersion, coefficients, len }
    }

    /// Length of the parameter vector.
    pub fn n_params(&self) -> usize {
        self.layout().len
    }

    /// Human-readable parameter names in layout order.
    pub fn param_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.n_params());
        if !self.has_covariates() {
            names.push("lambda".to_string());
        }
        match self.order {
            Order::One => names.push("alpha".to_string()),
            Order::Two => names.extend((1..=3).map(|i| format!("alpha{i}"))),
        }
        if self.has_dispersion() {
            names.push("eta".to_string());
        }
        names.extend((0..self.n_covariates).map(|i| format!("beta{i}")));
        names
    }

    /// The transition density for this `(family, order)` pair.
    pub fn density(&self) -> Box<dyn TransitionDensity> {
        match (self.family, self.order) {
            (Family::Poisson, Order::One) => Box::new(Ar1Density::<PoissonFamily>::default()),
            (Family::Poisson, Order::Two) => Box::new(Ar2Density::<PoissonFamily>::default()),
            (Family::GeneralizedPoisson, Order::One) => {
                Box::new(Ar1Density::<GenPoissonFamily>::default())
            }
            (Family::GeneralizedPoisson, Order::Two) => {
                Box::new(Ar2Density::<GenPoissonFamily>::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Parameter layouts with and without covariates.
    // - Name parsing for family, order and link.
    // - Density selection by `(family, order)`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Layouts put the rate first without covariates and the coefficients last
    // with covariates.
    //
    // Given
    // -----
    // - GP order 2 without covariates; Poisson order 1 with two covariates.
    //
    // Expect
    // ------
    // - (lambda, alpha1..3, eta) and (alpha, beta0, beta1).
    fn layouts_follow_family_order_and_covariates() {
        // Arrange
        let gp2 = ModelSpec::new(Family::GeneralizedPoisson, Order::Two);
        let reg = ModelSpec::with_covariates(Family::Poisson, Order::One, 2, Link::Log);

        // Act
        let a = gp2.layout();
        let b = reg.layout();

        // Assert
        assert_eq!(a.rate, Some(0));
        assert_eq!(a.thinning, 1..4);
        assert_eq!(a.dispersion, Some(4));
        assert_eq!(a.len, 5);
        assert_eq!(gp2.param_names(), vec!["lambda", "alpha1", "alpha2", "alpha3", "eta"]);
        assert_eq!(b.rate, None);
        assert_eq!(b.thinning, 0..1);
        assert_eq!(b.coefficients, 1..3);
        assert_eq!(reg.param_names(), vec!["alpha", "beta0", "beta1"]);
    }

    #[test]
    // Purpose
    // -------
    // Names parse case-insensitively and unknown names are configuration errors.
    //
    // Given
    // -----
    // - "GP", "2", "Identity" and "negbin".
    //
    // Expect
    // ------
    // - Parsed variants and `UnknownModelName` for "negbin".
    fn names_parse_from_strings() {
        assert_eq!("GP".parse::<Family>(), Ok(Family::GeneralizedPoisson));
        assert_eq!("2".parse::<Order>(), Ok(Order::Two));
        assert_eq!("Identity".parse::<Link>(), Ok(Link::Identity));
        assert!(matches!(
            "negbin".parse::<Family>(),
            Err(CountError::UnknownModelName { kind: "family", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // The density is selected once and reports the spec's order.
    //
    // Given
    // -----
    // - Poisson order 2.
    //
    // Expect
    // ------
    // - A density with `order() == Order::Two`.
    fn density_matches_order() {
        let spec = ModelSpec::new(Family::Poisson, Order::Two);
        assert_eq!(spec.density().order(), Order::Two);
        assert_eq!(spec.density().family(), Family::Poisson);
    }
}
