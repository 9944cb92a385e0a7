//! Report payload for rendering/export collaborators
//!
//! The payload mirrors the fixed sections of the guaranteed-values document:
//! general data, commercial premium, cash surrender value, reduced paid-up,
//! extended term and the optional maturity return. Rendering to PDF or any
//! other format is left to the consumer; this module only provides JSON,
//! CSV (schedules) and a plain-text view.

use std::fmt;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ComputationWarning, Result};
use crate::guaranteed::{ExtendedTermStatus, GuaranteedValueResult};
use crate::policy::{LoadingTier, PolicyKind, PolicyParameters};
use crate::quote::Quotation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSection {
    pub kind: PolicyKind,
    pub sum_insured: f64,
    /// Technical rate in percent
    pub interest_rate_pct: f64,
    pub issue_age: u32,
    pub term_years: u32,
    pub premium_paying_years: u32,
    pub loading_tier: LoadingTier,
    pub valuation_year: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumSection {
    pub net_single_premium: f64,
    pub net_level_premium: f64,
    pub gross_annual_premium: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashSurrenderSection {
    pub attained_age: u32,
    pub cash_surrender_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaidUpSection {
    pub reduced_sum_insured: f64,
    /// `None` for whole life (cover is lifelong)
    pub remaining_years: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedTermSection {
    pub sum_insured: f64,
    pub status: ExtendedTermStatus,
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaturityReturnSection {
    /// Cover runs to the original maturity, this many years away
    pub remaining_years: u32,
    /// Survival return, present only when positive
    pub amount: Option<f64>,
}

/// Full report payload for one quotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuaranteedValueReport {
    pub generated_at: DateTime<Utc>,
    pub general: GeneralSection,
    pub commercial_premium: PremiumSection,
    pub cash_surrender: CashSurrenderSection,
    pub reduced_paid_up: PaidUpSection,
    pub extended_term: ExtendedTermSection,
    pub maturity_return: Option<MaturityReturnSection>,
    pub warnings: Vec<ComputationWarning>,
}

impl GuaranteedValueReport {
    /// Build the payload; the timestamp is supplied by the caller
    pub fn new(quotation: &Quotation, generated_at: DateTime<Utc>) -> Self {
        let policy = &quotation.policy;
        let premium = &quotation.premium;
        let values = &quotation.guaranteed;
        let duration = values.extended_term.duration;

        let maturity_return = match values.extended_term.status {
            ExtendedTermStatus::ToMaturity => Some(MaturityReturnSection {
                remaining_years: duration.years,
                amount: values.optional_return_amount,
            }),
            _ => None,
        };

        let mut warnings = premium.warnings.clone();
        warnings.extend(values.warnings.iter().cloned());

        Self {
            generated_at,
            general: GeneralSection {
                kind: policy.kind,
                sum_insured: policy.sum_insured,
                interest_rate_pct: policy.interest_rate * 100.0,
                issue_age: policy.issue_age,
                term_years: policy.term_years(),
                premium_paying_years: policy.premium_paying_years,
                loading_tier: policy.loading_tier,
                valuation_year: values.valuation_year,
            },
            commercial_premium: PremiumSection {
                net_single_premium: premium.net_single_premium,
                net_level_premium: premium.net_level_premium,
                gross_annual_premium: premium.gross_annual_premium,
            },
            cash_surrender: CashSurrenderSection {
                attained_age: values.attained_age,
                cash_surrender_value: values.cash_surrender_value,
            },
            reduced_paid_up: PaidUpSection {
                reduced_sum_insured: values.reduced_paid_up_amount,
                remaining_years: match policy.kind {
                    PolicyKind::WholeLife => None,
                    PolicyKind::Term | PolicyKind::Endowment => Some(values.paid_up_coverage_years),
                },
            },
            extended_term: ExtendedTermSection {
                sum_insured: policy.sum_insured,
                status: values.extended_term.status,
                years: duration.years,
                months: duration.months,
                days: duration.days,
            },
            maturity_return,
            warnings,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// File name for an exported document, e.g.
    /// `guaranteed_values_endowment_20261016_093000.json`
    pub fn file_name(&self, extension: &str) -> String {
        format!(
            "guaranteed_values_{}_{}.{}",
            self.general.kind.as_str().to_ascii_lowercase(),
            self.generated_at.format("%Y%m%d_%H%M%S"),
            extension
        )
    }
}

impl fmt::Display for GuaranteedValueReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = &self.general;
        writeln!(f, "GUARANTEED VALUES REPORT")?;
        writeln!(f, "Generated: {}", self.generated_at.format("%d/%m/%Y %H:%M"))?;
        writeln!(f)?;

        writeln!(f, "GENERAL DATA")?;
        writeln!(f, "  Policy kind:        {}", g.kind)?;
        writeln!(f, "  Sum insured:        {:.2}", g.sum_insured)?;
        writeln!(f, "  Interest rate:      {}%", g.interest_rate_pct)?;
        writeln!(f, "  Issue age:          {}", g.issue_age)?;
        writeln!(f, "  Term:               {} years", g.term_years)?;
        writeln!(f, "  Premium paying:     {} years", g.premium_paying_years)?;
        writeln!(f, "  Loading tier:       {}", g.loading_tier)?;
        writeln!(f, "  Valuation year:     {}", g.valuation_year)?;
        writeln!(f)?;

        let p = &self.commercial_premium;
        writeln!(f, "COMMERCIAL PREMIUM")?;
        writeln!(f, "  Net single premium: {:.10}", p.net_single_premium)?;
        writeln!(f, "  Net level premium:  {:.10}", p.net_level_premium)?;
        writeln!(f, "  Annual premium:     {:.2}", p.gross_annual_premium)?;
        writeln!(f)?;

        writeln!(f, "CASH SURRENDER VALUE AT YEAR {}", g.valuation_year)?;
        writeln!(f, "  Attained age:       {}", self.cash_surrender.attained_age)?;
        writeln!(f, "  Surrender value:    {:.2}", self.cash_surrender.cash_surrender_value)?;
        writeln!(f)?;

        writeln!(f, "REDUCED PAID-UP AT YEAR {}", g.valuation_year)?;
        writeln!(f, "  New sum insured:    {:.2}", self.reduced_paid_up.reduced_sum_insured)?;
        match self.reduced_paid_up.remaining_years {
            Some(years) => writeln!(f, "  Remaining cover:    {} years", years)?,
            None => writeln!(f, "  Remaining cover:    whole life")?,
        }
        writeln!(f)?;

        let e = &self.extended_term;
        writeln!(f, "EXTENDED TERM AT YEAR {}", g.valuation_year)?;
        writeln!(f, "  Sum insured kept:   {:.2}", e.sum_insured)?;
        match e.status {
            ExtendedTermStatus::ToMaturity => {
                writeln!(f, "  Extension:          to original maturity ({} years)", e.years)?
            }
            ExtendedTermStatus::Exhausted => {
                writeln!(f, "  Extension:          beyond the end of the mortality table")?
            }
            _ => writeln!(
                f,
                "  Extension:          {} years, {} months, {} days",
                e.years, e.months, e.days
            )?,
        }
        if let Some(ret) = &self.maturity_return {
            if let Some(amount) = ret.amount {
                writeln!(f, "  Return on survival: {:.2}", amount)?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "WARNINGS")?;
            for warning in &self.warnings {
                writeln!(f, "  {:?}", warning)?;
            }
        }

        Ok(())
    }
}

/// One row of the guaranteed-value schedule CSV
#[derive(Debug, Serialize)]
struct ScheduleRow {
    #[serde(rename = "Year")]
    year: u32,
    #[serde(rename = "Age")]
    age: u32,
    #[serde(rename = "CashSurrenderValue")]
    cash_surrender_value: f64,
    #[serde(rename = "ReducedPaidUp")]
    reduced_paid_up: f64,
    #[serde(rename = "PaidUpYears")]
    paid_up_years: u32,
    #[serde(rename = "ExtStatus")]
    status: ExtendedTermStatus,
    #[serde(rename = "ExtYears")]
    years: u32,
    #[serde(rename = "ExtMonths")]
    months: u32,
    #[serde(rename = "ExtDays")]
    days: u32,
    #[serde(rename = "MaturityReturn")]
    maturity_return: Option<f64>,
}

/// Write a guaranteed-value schedule as CSV
pub fn write_schedule_csv<W: Write>(schedule: &[GuaranteedValueResult], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for values in schedule {
        csv_writer.serialize(ScheduleRow {
            year: values.valuation_year,
            age: values.attained_age,
            cash_surrender_value: values.cash_surrender_value,
            reduced_paid_up: values.reduced_paid_up_amount,
            paid_up_years: values.paid_up_coverage_years,
            status: values.extended_term.status,
            years: values.extended_term.duration.years,
            months: values.extended_term.duration.months,
            days: values.extended_term.duration.days,
            maturity_return: values.optional_return_amount,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// One row of the batch output CSV
#[derive(Debug, Serialize)]
struct BatchRow<'a> {
    #[serde(rename = "PolicyID")]
    policy_id: u32,
    #[serde(rename = "Kind")]
    kind: Option<PolicyKind>,
    #[serde(rename = "GrossAnnualPremium")]
    gross_annual_premium: Option<f64>,
    #[serde(rename = "CashSurrenderValue")]
    cash_surrender_value: Option<f64>,
    #[serde(rename = "ReducedPaidUp")]
    reduced_paid_up: Option<f64>,
    #[serde(rename = "ExtYears")]
    years: Option<u32>,
    #[serde(rename = "ExtMonths")]
    months: Option<u32>,
    #[serde(rename = "ExtDays")]
    days: Option<u32>,
    #[serde(rename = "MaturityReturn")]
    maturity_return: Option<f64>,
    #[serde(rename = "Error")]
    error: Option<&'a str>,
}

/// Write batch outcomes as CSV; failed rows carry their reason code
pub fn write_batch_csv<W: Write>(
    outcomes: &[crate::quote::BatchOutcome],
    writer: W,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for outcome in outcomes {
        let row = match &outcome.result {
            Ok(q) => BatchRow {
                policy_id: outcome.policy_id,
                kind: Some(q.policy.kind),
                gross_annual_premium: Some(q.premium.gross_annual_premium),
                cash_surrender_value: Some(q.guaranteed.cash_surrender_value),
                reduced_paid_up: Some(q.guaranteed.reduced_paid_up_amount),
                years: Some(q.guaranteed.extended_term.duration.years),
                months: Some(q.guaranteed.extended_term.duration.months),
                days: Some(q.guaranteed.extended_term.duration.days),
                maturity_return: q.guaranteed.optional_return_amount,
                error: None,
            },
            Err(err) => BatchRow {
                policy_id: outcome.policy_id,
                kind: None,
                gross_annual_premium: None,
                cash_surrender_value: None,
                reduced_paid_up: None,
                years: None,
                months: None,
                days: None,
                maturity_return: None,
                error: Some(err.reason_code()),
            },
        };
        csv_writer.serialize(row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Policy summary line used by the CLI headers
pub fn describe_policy(policy: &PolicyParameters) -> String {
    format!(
        "{} | age {} | SA {:.2} | i {}% | term {} | paying {} | {} loadings",
        policy.kind,
        policy.issue_age,
        policy.sum_insured,
        policy.interest_rate * 100.0,
        policy.term_years(),
        policy.premium_paying_years,
        policy.loading_tier
    )
}
