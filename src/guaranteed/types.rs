//! Result types for guaranteed values

use serde::{Deserialize, Serialize};

use crate::error::{ComputationWarning, GuaranteeError};

/// Days in a year for the interpolated fraction of the extension
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Days per month bucket; months are fixed 30-day buckets, not calendar months
pub const DAYS_PER_MONTH: u32 = 30;

/// Duration in years, months and days
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermDuration {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl TermDuration {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn years(years: u32) -> Self {
        Self { years, months: 0, days: 0 }
    }

    /// Normalize whole years plus a fractional number of days
    ///
    /// Days split into 30-day months; the remainder rounds half to even and
    /// carries into a month at 30, and months carry into years at 12.
    pub fn from_years_and_days(whole_years: u32, fractional_days: f64) -> Self {
        let days_total = fractional_days.max(0.0);
        let mut months = (days_total / DAYS_PER_MONTH as f64).trunc() as u32;
        let mut days = (days_total - (months * DAYS_PER_MONTH) as f64).round_ties_even() as u32;

        if days >= DAYS_PER_MONTH {
            months += 1;
            days -= DAYS_PER_MONTH;
        }

        Self {
            years: whole_years + months / 12,
            months: months % 12,
            days,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }
}

/// How the extended-term figure was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtendedTermStatus {
    /// Search found a bracket; the duration is the extension
    Extended,
    /// Endowment: the value covers the remaining term, cover runs to maturity
    ToMaturity,
    /// Surrender value is not positive (or D_x is zero); nothing to extend
    NoValue,
    /// Search reached the end of the table without a bracket
    Exhausted,
    /// Valuation year outside the policy term
    NotComputable,
}

/// Extended-term insurance outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtendedTerm {
    pub status: ExtendedTermStatus,
    pub duration: TermDuration,
}

impl ExtendedTerm {
    pub fn zero(status: ExtendedTermStatus) -> Self {
        Self {
            status,
            duration: TermDuration::zero(),
        }
    }
}

/// Guaranteed values at one valuation year
///
/// Per-unit values are per 1 of sum insured; amounts are in currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuaranteedValueResult {
    /// Policy year t (0 = issue)
    pub valuation_year: u32,

    /// Issue age + t
    pub attained_age: u32,

    /// Net single premium for the remaining coverage at the attained age
    pub current_net_single_premium: f64,

    /// Annuity-due over the remaining premium paying years (0 once paid up)
    pub remaining_premium_annuity: f64,

    /// Cash surrender value per unit
    pub cash_value_per_unit: f64,

    /// Cash surrender value in currency
    pub cash_surrender_value: f64,

    /// Reduced paid-up sum insured in currency
    pub reduced_paid_up_amount: f64,

    /// Years the reduced paid-up cover remains in force
    pub paid_up_coverage_years: u32,

    pub extended_term: ExtendedTerm,

    /// Endowment running to maturity: survival return, reported only when positive
    pub optional_return_amount: Option<f64>,

    #[serde(default)]
    pub warnings: Vec<ComputationWarning>,

    /// Reason code when the values could not be computed
    #[serde(default)]
    pub not_computable: Option<String>,
}

impl GuaranteedValueResult {
    /// Zero-filled result carrying the reason code of `reason`
    pub fn not_computable(valuation_year: u32, attained_age: u32, reason: &GuaranteeError) -> Self {
        Self {
            valuation_year,
            attained_age,
            current_net_single_premium: 0.0,
            remaining_premium_annuity: 0.0,
            cash_value_per_unit: 0.0,
            cash_surrender_value: 0.0,
            reduced_paid_up_amount: 0.0,
            paid_up_coverage_years: 0,
            extended_term: ExtendedTerm::zero(ExtendedTermStatus::NotComputable),
            optional_return_amount: None,
            warnings: Vec::new(),
            not_computable: Some(reason.reason_code().to_string()),
        }
    }

    pub fn is_computed(&self) -> bool {
        self.not_computable.is_none()
    }

    /// True if any quantity fell back to a zero or exhausted value
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_normalization() {
        // 23.51 days -> 0 months, 24 days
        assert_eq!(
            TermDuration::from_years_and_days(28, 23.509_590_876),
            TermDuration { years: 28, months: 0, days: 24 }
        );

        // 160.66 days -> 5 months, 11 days
        assert_eq!(
            TermDuration::from_years_and_days(5, 160.657_670_81),
            TermDuration { years: 5, months: 5, days: 11 }
        );

        // 29.6 days rounds to 30 and carries into a month
        assert_eq!(
            TermDuration::from_years_and_days(1, 29.6),
            TermDuration { years: 1, months: 1, days: 0 }
        );

        // A full year of days is 12 months and 5 days; months carry into years
        assert_eq!(
            TermDuration::from_years_and_days(0, 365.0),
            TermDuration { years: 1, months: 0, days: 5 }
        );

        assert!(TermDuration::from_years_and_days(0, 0.0).is_zero());
    }

    #[test]
    fn test_half_day_rounds_to_even() {
        assert_eq!(
            TermDuration::from_years_and_days(3, 40.5),
            TermDuration { years: 3, months: 1, days: 10 }
        );
        assert_eq!(
            TermDuration::from_years_and_days(3, 41.5),
            TermDuration { years: 3, months: 1, days: 12 }
        );
        assert_eq!(
            TermDuration::from_years_and_days(0, 0.5),
            TermDuration { years: 0, months: 0, days: 0 }
        );
    }

    #[test]
    fn test_not_computable_result() {
        let err = GuaranteeError::ValuationYearOutOfRange { year: 25, term_years: 20 };
        let result = GuaranteedValueResult::not_computable(25, 65, &err);

        assert!(!result.is_computed());
        assert_eq!(result.not_computable.as_deref(), Some("valuation_year_out_of_range"));
        assert_eq!(result.cash_surrender_value, 0.0);
        assert_eq!(result.extended_term.status, ExtendedTermStatus::NotComputable);
        assert!(result.extended_term.duration.is_zero());
    }
}
