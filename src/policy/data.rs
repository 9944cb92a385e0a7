//! Policy parameter structures and domain validation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GuaranteeError, Result};
use crate::mortality::{MAX_AGE, MIN_AGE};

/// Oldest issue age accepted
pub const MAX_ISSUE_AGE: u32 = 99;

/// Upper bound (inclusive) of the technical interest rate
pub const MAX_INTEREST_RATE: f64 = 0.10;

/// Minimum sum insured in currency units
pub const MIN_SUM_INSURED: f64 = 10_000.0;

/// Shape of the insurance benefit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyKind {
    /// Death benefit payable whenever death occurs, to the end of the table
    WholeLife,
    /// Death benefit payable within the term only
    Term,
    /// Death benefit within the term, sum insured paid at maturity on survival
    Endowment,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::WholeLife => "WholeLife",
            PolicyKind::Term => "Term",
            PolicyKind::Endowment => "Endowment",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = GuaranteeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "wholelife" | "whole" => Ok(PolicyKind::WholeLife),
            "term" => Ok(PolicyKind::Term),
            "endowment" => Ok(PolicyKind::Endowment),
            _ => Err(GuaranteeError::UnknownVariant {
                field: "policy kind",
                value: s.to_string(),
            }),
        }
    }
}

/// Expense loading tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadingTier {
    Minimum,
    Maximum,
}

impl LoadingTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadingTier::Minimum => "Minimum",
            LoadingTier::Maximum => "Maximum",
        }
    }
}

impl fmt::Display for LoadingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoadingTier {
    type Err = GuaranteeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "minimum" | "min" => Ok(LoadingTier::Minimum),
            "maximum" | "max" => Ok(LoadingTier::Maximum),
            _ => Err(GuaranteeError::UnknownVariant {
                field: "loading tier",
                value: s.to_string(),
            }),
        }
    }
}

/// Inputs describing one policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyParameters {
    pub kind: PolicyKind,

    /// Age at issue
    pub issue_age: u32,

    /// Sum insured in currency units
    pub sum_insured: f64,

    /// Annual effective technical rate (0.04 = 4%)
    pub interest_rate: f64,

    /// Coverage term in years. Ignored for whole life, which always runs to
    /// the end of the table.
    #[serde(default)]
    pub term_years: u32,

    /// Years over which level premiums are paid
    pub premium_paying_years: u32,

    pub loading_tier: LoadingTier,
}

impl PolicyParameters {
    /// Whole-life policy; the term is derived from the issue age
    pub fn whole_life(
        issue_age: u32,
        sum_insured: f64,
        interest_rate: f64,
        premium_paying_years: u32,
        loading_tier: LoadingTier,
    ) -> Self {
        Self {
            kind: PolicyKind::WholeLife,
            issue_age,
            sum_insured,
            interest_rate,
            term_years: MAX_AGE.saturating_sub(issue_age),
            premium_paying_years,
            loading_tier,
        }
    }

    pub fn term(
        issue_age: u32,
        sum_insured: f64,
        interest_rate: f64,
        term_years: u32,
        premium_paying_years: u32,
        loading_tier: LoadingTier,
    ) -> Self {
        Self {
            kind: PolicyKind::Term,
            issue_age,
            sum_insured,
            interest_rate,
            term_years,
            premium_paying_years,
            loading_tier,
        }
    }

    pub fn endowment(
        issue_age: u32,
        sum_insured: f64,
        interest_rate: f64,
        term_years: u32,
        premium_paying_years: u32,
        loading_tier: LoadingTier,
    ) -> Self {
        Self {
            kind: PolicyKind::Endowment,
            ..Self::term(
                issue_age,
                sum_insured,
                interest_rate,
                term_years,
                premium_paying_years,
                loading_tier,
            )
        }
    }

    /// Effective coverage term (100 - issue age for whole life)
    pub fn term_years(&self) -> u32 {
        match self.kind {
            PolicyKind::WholeLife => MAX_AGE.saturating_sub(self.issue_age),
            PolicyKind::Term | PolicyKind::Endowment => self.term_years,
        }
    }

    /// Age at the end of the coverage term
    pub fn maturity_age(&self) -> u32 {
        self.issue_age + self.term_years()
    }

    /// Attained age at valuation year `t`
    pub fn attained_age(&self, valuation_year: u32) -> u32 {
        self.issue_age + valuation_year
    }

    /// Check the domain constraints on every field
    pub fn validate(&self) -> Result<()> {
        if self.issue_age < MIN_AGE || self.issue_age > MAX_ISSUE_AGE {
            return Err(GuaranteeError::IssueAgeOutOfRange {
                age: self.issue_age,
                min: MIN_AGE,
                max: MAX_ISSUE_AGE,
            });
        }

        // Written so that NaN fails too
        if !(self.interest_rate > 0.0 && self.interest_rate <= MAX_INTEREST_RATE) {
            return Err(GuaranteeError::InterestRateOutOfRange {
                rate: self.interest_rate,
                max: MAX_INTEREST_RATE,
            });
        }

        if !(self.sum_insured >= MIN_SUM_INSURED) {
            return Err(GuaranteeError::SumInsuredBelowMinimum {
                amount: self.sum_insured,
                min: MIN_SUM_INSURED,
            });
        }

        let term_years = self.term_years();
        if term_years == 0 {
            return Err(GuaranteeError::ZeroPeriod { field: "term_years" });
        }
        if self.premium_paying_years == 0 {
            return Err(GuaranteeError::ZeroPeriod { field: "premium_paying_years" });
        }
        if self.premium_paying_years > term_years {
            return Err(GuaranteeError::PayingPeriodExceedsTerm {
                paying_years: self.premium_paying_years,
                term_years,
            });
        }
        if self.issue_age + term_years > MAX_AGE {
            return Err(GuaranteeError::TermExceedsTable {
                issue_age: self.issue_age,
                term_years,
                max_age: MAX_AGE,
            });
        }

        Ok(())
    }

    /// Valuation years run from 0 (issue) to term - 1
    pub fn validate_valuation_year(&self, valuation_year: u32) -> Result<()> {
        let term_years = self.term_years();
        if valuation_year >= term_years {
            return Err(GuaranteeError::ValuationYearOutOfRange {
                year: valuation_year,
                term_years,
            });
        }
        Ok(())
    }
}

/// A policy together with the year at which guaranteed values are wanted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Caller-supplied identifier, carried through to outputs
    #[serde(default)]
    pub policy_id: u32,

    pub policy: PolicyParameters,

    pub valuation_year: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> PolicyParameters {
        PolicyParameters::whole_life(40, 100_000.0, 0.04, 20, LoadingTier::Minimum)
    }

    #[test]
    fn test_whole_life_term_derived() {
        let policy = base();
        assert_eq!(policy.term_years(), 60);
        assert_eq!(policy.maturity_age(), 100);
        assert_eq!(policy.attained_age(10), 50);

        // A stale stored term does not matter for whole life
        let stale = PolicyParameters { term_years: 5, ..base() };
        assert_eq!(stale.term_years(), 60);
        assert!(stale.validate().is_ok());
    }

    #[test]
    fn test_valid_policies() {
        assert!(base().validate().is_ok());
        assert!(PolicyParameters::term(40, 10_000.0, 0.10, 20, 15, LoadingTier::Maximum)
            .validate()
            .is_ok());
        assert!(PolicyParameters::endowment(12, 50_000.0, 0.0001, 88, 88, LoadingTier::Minimum)
            .validate()
            .is_ok());
        assert!(PolicyParameters::whole_life(99, 10_000.0, 0.04, 1, LoadingTier::Minimum)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_invalid_issue_age() {
        let policy = PolicyParameters { issue_age: 11, ..base() };
        assert!(matches!(
            policy.validate(),
            Err(GuaranteeError::IssueAgeOutOfRange { age: 11, .. })
        ));

        let policy = PolicyParameters::whole_life(100, 100_000.0, 0.04, 1, LoadingTier::Minimum);
        assert!(matches!(
            policy.validate(),
            Err(GuaranteeError::IssueAgeOutOfRange { age: 100, .. })
        ));
    }

    #[test]
    fn test_invalid_interest_rate() {
        for rate in [0.0, -0.01, 0.1001, f64::NAN] {
            let policy = PolicyParameters { interest_rate: rate, ..base() };
            assert!(
                matches!(policy.validate(), Err(GuaranteeError::InterestRateOutOfRange { .. })),
                "rate {} accepted",
                rate
            );
        }
    }

    #[test]
    fn test_invalid_sum_insured() {
        let policy = PolicyParameters { sum_insured: 9_999.99, ..base() };
        assert!(matches!(
            policy.validate(),
            Err(GuaranteeError::SumInsuredBelowMinimum { .. })
        ));
    }

    #[test]
    fn test_invalid_periods() {
        let policy = PolicyParameters::term(40, 100_000.0, 0.04, 20, 25, LoadingTier::Minimum);
        assert!(matches!(
            policy.validate(),
            Err(GuaranteeError::PayingPeriodExceedsTerm { paying_years: 25, term_years: 20 })
        ));

        let policy = PolicyParameters::term(40, 100_000.0, 0.04, 0, 0, LoadingTier::Minimum);
        assert!(matches!(policy.validate(), Err(GuaranteeError::ZeroPeriod { .. })));

        let policy = PolicyParameters::endowment(90, 100_000.0, 0.04, 20, 10, LoadingTier::Minimum);
        assert!(matches!(policy.validate(), Err(GuaranteeError::TermExceedsTable { .. })));
    }

    #[test]
    fn test_valuation_year_bounds() {
        let policy = PolicyParameters::term(40, 100_000.0, 0.04, 20, 15, LoadingTier::Minimum);
        assert!(policy.validate_valuation_year(0).is_ok());
        assert!(policy.validate_valuation_year(19).is_ok());
        assert!(matches!(
            policy.validate_valuation_year(20),
            Err(GuaranteeError::ValuationYearOutOfRange { year: 20, term_years: 20 })
        ));
        assert!(policy.validate_valuation_year(25).is_err());
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!("whole-life".parse::<PolicyKind>().unwrap(), PolicyKind::WholeLife);
        assert_eq!("WholeLife".parse::<PolicyKind>().unwrap(), PolicyKind::WholeLife);
        assert_eq!("term".parse::<PolicyKind>().unwrap(), PolicyKind::Term);
        assert_eq!("Endowment".parse::<PolicyKind>().unwrap(), PolicyKind::Endowment);
        assert!("annuity".parse::<PolicyKind>().is_err());

        assert_eq!("min".parse::<LoadingTier>().unwrap(), LoadingTier::Minimum);
        assert_eq!("Maximum".parse::<LoadingTier>().unwrap(), LoadingTier::Maximum);
        assert!("medium".parse::<LoadingTier>().is_err());
    }

    #[test]
    fn test_json_round_trip_without_term() {
        let json = r#"{
            "kind": "WholeLife",
            "issue_age": 40,
            "sum_insured": 100000.0,
            "interest_rate": 0.04,
            "premium_paying_years": 20,
            "loading_tier": "Minimum"
        }"#;
        let policy: PolicyParameters = serde_json::from_str(json).unwrap();
        assert_eq!(policy.term_years, 0);
        assert_eq!(policy.term_years(), 60);
        assert!(policy.validate().is_ok());
    }
}
