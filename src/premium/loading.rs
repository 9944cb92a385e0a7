//! Loading parameters by policy kind and tier

use serde::{Deserialize, Serialize};

use crate::policy::{LoadingTier, PolicyKind};

/// Expense loadings applied to the net premium
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadingParameters {
    /// Flat policy fee (always 0 in the current tariff)
    pub alpha: f64,
    /// Administration rate per unit sum insured, per year of coverage
    pub gamma: f64,
    /// Collection expense as a fraction of each gross premium
    pub beta: f64,
    /// Acquisition expense factor
    pub k: f64,
}

impl LoadingParameters {
    /// Tariff lookup
    ///
    /// | kind                  | tier    | γ     | β    | k                     |
    /// |-----------------------|---------|-------|------|-----------------------|
    /// | whole life, endowment | Minimum | 0.005 | 0.05 | min(0.05·m, 1.0)      |
    /// | whole life, endowment | Maximum | 0.007 | 0.07 | min(0.05·m, 1.0)      |
    /// | term                  | Minimum | 0.002 | 0.05 | min(0.03·m, 0.6)      |
    /// | term                  | Maximum | 0.003 | 0.07 | min(0.03·m, 0.6)      |
    ///
    /// where m is the premium paying period in years.
    pub fn for_policy(kind: PolicyKind, tier: LoadingTier, premium_paying_years: u32) -> Self {
        let m = premium_paying_years as f64;

        let (gamma, beta) = match (kind, tier) {
            (PolicyKind::WholeLife | PolicyKind::Endowment, LoadingTier::Minimum) => (0.005, 0.05),
            (PolicyKind::WholeLife | PolicyKind::Endowment, LoadingTier::Maximum) => (0.007, 0.07),
            (PolicyKind::Term, LoadingTier::Minimum) => (0.002, 0.05),
            (PolicyKind::Term, LoadingTier::Maximum) => (0.003, 0.07),
        };

        let k = match kind {
            PolicyKind::WholeLife | PolicyKind::Endowment => (m * 0.05).min(1.0),
            PolicyKind::Term => (m * 0.03).min(0.6),
        };

        Self {
            alpha: 0.0,
            gamma,
            beta,
            k,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_whole_life_and_endowment_tariff() {
        let l = LoadingParameters::for_policy(PolicyKind::WholeLife, LoadingTier::Minimum, 20);
        assert_eq!(l.alpha, 0.0);
        assert_eq!(l.gamma, 0.005);
        assert_eq!(l.beta, 0.05);
        assert_abs_diff_eq!(l.k, 1.0, epsilon = 1e-12);

        let l = LoadingParameters::for_policy(PolicyKind::Endowment, LoadingTier::Maximum, 10);
        assert_eq!(l.gamma, 0.007);
        assert_eq!(l.beta, 0.07);
        assert_abs_diff_eq!(l.k, 0.5, epsilon = 1e-12);

        // Capped at 1.0
        let l = LoadingParameters::for_policy(PolicyKind::WholeLife, LoadingTier::Maximum, 45);
        assert_eq!(l.k, 1.0);
    }

    #[test]
    fn test_term_tariff() {
        let l = LoadingParameters::for_policy(PolicyKind::Term, LoadingTier::Minimum, 15);
        assert_eq!(l.gamma, 0.002);
        assert_eq!(l.beta, 0.05);
        assert_abs_diff_eq!(l.k, 0.45, epsilon = 1e-12);

        let l = LoadingParameters::for_policy(PolicyKind::Term, LoadingTier::Maximum, 30);
        assert_eq!(l.gamma, 0.003);
        assert_eq!(l.beta, 0.07);
        assert_eq!(l.k, 0.6);
    }
}
