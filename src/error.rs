//! Error types for guaranteed-value calculations
//!
//! Only parameter validation and I/O are errors. Degenerate formulas and an
//! exhausted extended-term search are reported as data on the results
//! through [`ComputationWarning`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A specialized Result type for guaranteed-value operations.
pub type Result<T> = std::result::Result<T, GuaranteeError>;

/// Invalid inputs and I/O failures.
#[derive(Error, Debug)]
pub enum GuaranteeError {
    #[error("Issue age {age} outside supported range [{min}, {max}]")]
    IssueAgeOutOfRange { age: u32, min: u32, max: u32 },

    #[error("Interest rate {rate} outside (0, {max}]")]
    InterestRateOutOfRange { rate: f64, max: f64 },

    #[error("Sum insured {amount} below minimum {min}")]
    SumInsuredBelowMinimum { amount: f64, min: f64 },

    #[error("Premium paying period {paying_years} exceeds policy term {term_years}")]
    PayingPeriodExceedsTerm { paying_years: u32, term_years: u32 },

    #[error("Policy term {term_years} from issue age {issue_age} runs past table age {max_age}")]
    TermExceedsTable {
        issue_age: u32,
        term_years: u32,
        max_age: u32,
    },

    #[error("{field} must be at least one year")]
    ZeroPeriod { field: &'static str },

    #[error("Valuation year {year} must be below policy term {term_years}")]
    ValuationYearOutOfRange { year: u32, term_years: u32 },

    #[error("Unknown {field}: {value}")]
    UnknownVariant { field: &'static str, value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GuaranteeError {
    /// True for the input-validation family (as opposed to I/O failures)
    pub fn is_invalid_parameter(&self) -> bool {
        !matches!(
            self,
            GuaranteeError::Csv(_) | GuaranteeError::Json(_) | GuaranteeError::Io(_)
        )
    }

    /// Short machine-readable reason code used on not-computable results
    pub fn reason_code(&self) -> &'static str {
        match self {
            GuaranteeError::IssueAgeOutOfRange { .. } => "issue_age_out_of_range",
            GuaranteeError::InterestRateOutOfRange { .. } => "interest_rate_out_of_range",
            GuaranteeError::SumInsuredBelowMinimum { .. } => "sum_insured_below_minimum",
            GuaranteeError::PayingPeriodExceedsTerm { .. } => "paying_period_exceeds_term",
            GuaranteeError::TermExceedsTable { .. } => "term_exceeds_table",
            GuaranteeError::ZeroPeriod { .. } => "zero_period",
            GuaranteeError::ValuationYearOutOfRange { .. } => "valuation_year_out_of_range",
            GuaranteeError::UnknownVariant { .. } => "unknown_variant",
            GuaranteeError::Csv(_) => "csv",
            GuaranteeError::Json(_) => "json",
            GuaranteeError::Io(_) => "io",
        }
    }
}

/// Quantity whose formula was degenerate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quantity {
    NetSinglePremium,
    NetLevelPremium,
    GrossPremium,
    CashSurrenderValue,
    PaidUpAmount,
    ExtendedTerm,
    MaturityReturn,
}

/// Recoverable condition attached to a computed result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComputationWarning {
    /// A denominator was zero (or non-positive for the gross premium); the
    /// quantity was set to 0
    DegenerateComputation { quantity: Quantity, age: u32 },
    /// The extended-term search reached the end of the table without a bracket
    TableExhausted { attained_age: u32 },
}
