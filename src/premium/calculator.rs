//! Net level and commercial premium calculation

use serde::{Deserialize, Serialize};

use super::LoadingParameters;
use crate::commutation::ActuarialFormulas;
use crate::error::{ComputationWarning, Quantity};
use crate::policy::{PolicyKind, PolicyParameters};

/// Premium figures at issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumResult {
    /// Net single premium per unit sum insured
    pub net_single_premium: f64,

    /// Annuity-due over the premium paying period (ä_pay)
    pub paying_annuity: f64,

    /// Annuity-due over the coverage period (ä_cov), used for administration loading
    pub coverage_annuity: f64,

    /// Net level annual premium per unit
    pub net_level_premium: f64,

    /// Commercial annual premium per unit (B)
    pub gross_premium_rate: f64,

    /// Commercial annual premium in currency (B × sum insured)
    pub gross_annual_premium: f64,

    pub loading: LoadingParameters,

    #[serde(default)]
    pub warnings: Vec<ComputationWarning>,
}

impl PremiumResult {
    /// True if any premium quantity fell back to zero
    pub fn is_degenerate(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Commercial premium per unit, or `None` when the loading denominator
/// `ä_pay·(1 − k/ä_pay − β)` is not positive
pub fn gross_premium_rate(
    net_level_premium: f64,
    paying_annuity: f64,
    coverage_annuity: f64,
    loading: &LoadingParameters,
) -> Option<f64> {
    if paying_annuity == 0.0 {
        return None;
    }

    let numerator =
        net_level_premium * paying_annuity + loading.alpha + loading.gamma * coverage_annuity;
    let denominator = paying_annuity * (1.0 - loading.k / paying_annuity - loading.beta);

    if denominator > 0.0 && denominator.is_finite() {
        Some(numerator / denominator)
    } else {
        None
    }
}

/// Computes premiums from a commutation table
#[derive(Debug, Clone, Copy)]
pub struct PremiumCalculator<'a> {
    formulas: ActuarialFormulas<'a>,
}

impl<'a> PremiumCalculator<'a> {
    pub fn new(formulas: ActuarialFormulas<'a>) -> Self {
        Self { formulas }
    }

    /// Premiums for a validated policy
    ///
    /// Whole life uses the whole-life annuity-due for both the paying and
    /// coverage annuities; term and endowment use temporary annuities over
    /// the paying period and the term respectively.
    pub fn calculate(&self, policy: &PolicyParameters) -> PremiumResult {
        let f = &self.formulas;
        let age = policy.issue_age;
        let term_years = policy.term_years();
        let loading = LoadingParameters::for_policy(
            policy.kind,
            policy.loading_tier,
            policy.premium_paying_years,
        );
        let mut warnings = Vec::new();

        if !f.is_defined_at(age) {
            warnings.push(ComputationWarning::DegenerateComputation {
                quantity: Quantity::NetSinglePremium,
                age,
            });
        }

        let net_single_premium = f.net_single_premium(policy.kind, age, term_years);
        let (paying_annuity, coverage_annuity) = match policy.kind {
            PolicyKind::WholeLife => {
                let annuity = f.whole_life_annuity_due(age);
                (annuity, annuity)
            }
            PolicyKind::Term | PolicyKind::Endowment => (
                f.temporary_annuity_due(age, policy.premium_paying_years),
                f.temporary_annuity_due(age, term_years),
            ),
        };

        let net_level_premium = if paying_annuity != 0.0 {
            net_single_premium / paying_annuity
        } else {
            warnings.push(ComputationWarning::DegenerateComputation {
                quantity: Quantity::NetLevelPremium,
                age,
            });
            0.0
        };

        let gross_premium_rate =
            match gross_premium_rate(net_level_premium, paying_annuity, coverage_annuity, &loading) {
                Some(rate) => rate,
                None => {
                    log::warn!(
                        "Gross premium denominator not positive (ä_pay={:.6}, k={:.4}, β={:.2}); premium set to 0",
                        paying_annuity,
                        loading.k,
                        loading.beta
                    );
                    warnings.push(ComputationWarning::DegenerateComputation {
                        quantity: Quantity::GrossPremium,
                        age,
                    });
                    0.0
                }
            };

        log::debug!(
            "{} age {}: NSP={:.10} ä_pay={:.6} P={:.10} B={:.10}",
            policy.kind,
            age,
            net_single_premium,
            paying_annuity,
            net_level_premium,
            gross_premium_rate
        );

        PremiumResult {
            net_single_premium,
            paying_annuity,
            coverage_annuity,
            net_level_premium,
            gross_premium_rate,
            gross_annual_premium: gross_premium_rate * policy.sum_insured,
            loading,
            warnings,
        }
    }
}
