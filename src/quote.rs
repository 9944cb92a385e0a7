//! Quote engine: one full calculation from policy parameters
//!
//! Holds the mortality table and builds a fresh commutation table per call,
//! so every quote is a pure function of its inputs.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::commutation::{ActuarialFormulas, CommutationTable};
use crate::error::Result;
use crate::guaranteed::{GuaranteedValueEngine, GuaranteedValueResult};
use crate::mortality::MortalityTable;
use crate::policy::{LoadedRequest, PolicyParameters, QuoteRequest};
use crate::premium::{PremiumCalculator, PremiumResult};

/// Premium and guaranteed values for one policy at one valuation year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quotation {
    pub policy: PolicyParameters,
    pub premium: PremiumResult,
    pub guaranteed: GuaranteedValueResult,
}

/// Outcome of one row of a batch
#[derive(Debug)]
pub struct BatchOutcome {
    pub policy_id: u32,
    pub result: Result<Quotation>,
}

/// Quote engine over the shipped mortality table
///
/// # Example
/// ```
/// use guaranteed_values::{LoadingTier, PolicyParameters, QuoteEngine};
///
/// let engine = QuoteEngine::new();
/// let policy = PolicyParameters::whole_life(40, 100_000.0, 0.04, 20, LoadingTier::Minimum);
/// let quote = engine.quote(&policy, 10)?;
/// assert!(quote.premium.gross_annual_premium > 0.0);
/// # Ok::<(), guaranteed_values::GuaranteeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct QuoteEngine {
    mortality: MortalityTable,
}

impl QuoteEngine {
    pub fn new() -> Self {
        Self {
            mortality: MortalityTable::mexican_2000_i(),
        }
    }

    pub fn mortality(&self) -> &MortalityTable {
        &self.mortality
    }

    /// Commutation table at `interest_rate`
    pub fn commutation(&self, interest_rate: f64) -> CommutationTable {
        CommutationTable::build(&self.mortality, interest_rate)
    }

    /// Premiums at issue for a policy
    pub fn premium(&self, policy: &PolicyParameters) -> Result<PremiumResult> {
        policy.validate()?;
        let table = self.commutation(policy.interest_rate);
        Ok(PremiumCalculator::new(ActuarialFormulas::new(&table)).calculate(policy))
    }

    /// Premium and guaranteed values at `valuation_year`
    ///
    /// Parameter violations are returned before anything is computed.
    pub fn quote(&self, policy: &PolicyParameters, valuation_year: u32) -> Result<Quotation> {
        policy.validate()?;
        policy.validate_valuation_year(valuation_year)?;

        let table = self.commutation(policy.interest_rate);
        let formulas = ActuarialFormulas::new(&table);
        let premium = PremiumCalculator::new(formulas).calculate(policy);
        let guaranteed =
            GuaranteedValueEngine::new(formulas, policy, &premium).try_evaluate(valuation_year)?;

        log::info!(
            "Quoted {} age {} SA {:.2} at year {}: premium {:.2}, surrender {:.2}",
            policy.kind,
            policy.issue_age,
            policy.sum_insured,
            valuation_year,
            premium.gross_annual_premium,
            guaranteed.cash_surrender_value
        );

        Ok(Quotation {
            policy: policy.clone(),
            premium,
            guaranteed,
        })
    }

    /// Like [`QuoteEngine::quote`], but parameter violations come back as a
    /// zero-filled result with a reason code instead of an error
    pub fn quote_or_zero(&self, policy: &PolicyParameters, valuation_year: u32) -> Quotation {
        match self.quote(policy, valuation_year) {
            Ok(quotation) => quotation,
            Err(err) => {
                log::warn!("Policy not computable: {}", err);
                Quotation {
                    policy: policy.clone(),
                    premium: self.premium(policy).unwrap_or_else(|_| zero_premium(policy)),
                    guaranteed: GuaranteedValueResult::not_computable(
                        valuation_year,
                        policy.attained_age(valuation_year),
                        &err,
                    ),
                }
            }
        }
    }

    pub fn quote_request(&self, request: &QuoteRequest) -> Result<Quotation> {
        self.quote(&request.policy, request.valuation_year)
    }

    /// Guaranteed values for every year of the term
    pub fn schedule(&self, policy: &PolicyParameters) -> Result<(PremiumResult, Vec<GuaranteedValueResult>)> {
        policy.validate()?;

        let table = self.commutation(policy.interest_rate);
        let formulas = ActuarialFormulas::new(&table);
        let premium = PremiumCalculator::new(formulas).calculate(policy);
        let schedule = GuaranteedValueEngine::new(formulas, policy, &premium).schedule();

        Ok((premium, schedule))
    }

    /// Quote every request in parallel; a failing row does not stop the
    /// batch and outcomes keep the input order
    pub fn quote_batch(&self, requests: &[QuoteRequest]) -> Vec<BatchOutcome> {
        requests
            .par_iter()
            .map(|request| BatchOutcome {
                policy_id: request.policy_id,
                result: self.quote_request(request),
            })
            .collect()
    }

    /// Quote rows loaded from a request CSV; rows that failed to parse come
    /// back with their parse error, in input order
    pub fn quote_loaded(&self, rows: Vec<LoadedRequest>) -> Vec<BatchOutcome> {
        rows.into_par_iter()
            .map(|row| BatchOutcome {
                policy_id: row.policy_id,
                result: row.request.and_then(|request| self.quote_request(&request)),
            })
            .collect()
    }
}

impl Default for QuoteEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Zero premium for policies that fail validation outright
fn zero_premium(policy: &PolicyParameters) -> PremiumResult {
    PremiumResult {
        net_single_premium: 0.0,
        paying_annuity: 0.0,
        coverage_annuity: 0.0,
        net_level_premium: 0.0,
        gross_premium_rate: 0.0,
        gross_annual_premium: 0.0,
        loading: crate::premium::LoadingParameters::for_policy(
            policy.kind,
            policy.loading_tier,
            policy.premium_paying_years,
        ),
        warnings: Vec::new(),
    }
}

/// Quote with a default engine
pub fn quote(policy: &PolicyParameters, valuation_year: u32) -> Result<Quotation> {
    QuoteEngine::new().quote(policy, valuation_year)
}
