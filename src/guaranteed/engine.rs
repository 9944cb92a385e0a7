//! Guaranteed value engine

use super::extended::{find_bracket, target_mx};
use super::types::{ExtendedTerm, ExtendedTermStatus, GuaranteedValueResult, TermDuration};
use crate::commutation::ActuarialFormulas;
use crate::error::{ComputationWarning, Quantity, Result};
use crate::mortality::MAX_AGE;
use crate::policy::{PolicyKind, PolicyParameters};
use crate::premium::PremiumResult;

/// Evaluates guaranteed values for one policy against its issue premiums
///
/// Holds no mutable state; evaluating the same year twice gives identical
/// results.
#[derive(Debug, Clone, Copy)]
pub struct GuaranteedValueEngine<'a> {
    formulas: ActuarialFormulas<'a>,
    policy: &'a PolicyParameters,
    premium: &'a PremiumResult,
}

/// Cash value pieces at one valuation year
#[derive(Debug, Clone, Copy)]
struct CashValue {
    net_single_premium: f64,
    remaining_annuity: f64,
    per_unit: f64,
}

impl<'a> GuaranteedValueEngine<'a> {
    pub fn new(
        formulas: ActuarialFormulas<'a>,
        policy: &'a PolicyParameters,
        premium: &'a PremiumResult,
    ) -> Self {
        Self {
            formulas,
            policy,
            premium,
        }
    }

    /// Values at `valuation_year`, or an error if the year is outside the term
    pub fn try_evaluate(&self, valuation_year: u32) -> Result<GuaranteedValueResult> {
        self.policy.validate_valuation_year(valuation_year)?;
        Ok(self.compute(valuation_year))
    }

    /// Values at `valuation_year`; a year outside the term gives the
    /// zero-filled not-computable result
    pub fn evaluate(&self, valuation_year: u32) -> GuaranteedValueResult {
        match self.policy.validate_valuation_year(valuation_year) {
            Ok(()) => self.compute(valuation_year),
            Err(err) => GuaranteedValueResult::not_computable(
                valuation_year,
                self.policy.attained_age(valuation_year),
                &err,
            ),
        }
    }

    /// Values for every year from issue to the last year of the term
    pub fn schedule(&self) -> Vec<GuaranteedValueResult> {
        (0..self.policy.term_years())
            .map(|year| self.compute(year))
            .collect()
    }

    fn compute(&self, valuation_year: u32) -> GuaranteedValueResult {
        let policy = self.policy;
        let age = policy.attained_age(valuation_year);
        let mut warnings = Vec::new();

        let cash = self.cash_value(valuation_year, &mut warnings);
        let (paid_up_per_unit, paid_up_coverage_years) =
            self.reduced_paid_up(valuation_year, cash.per_unit, &mut warnings);
        let (extended_term, optional_return) =
            self.extended_term(valuation_year, cash.per_unit, &mut warnings);

        log::debug!(
            "{} year {} age {}: V={:.10} S={:.10} extension {:?}",
            policy.kind,
            valuation_year,
            age,
            cash.per_unit,
            paid_up_per_unit,
            extended_term
        );

        GuaranteedValueResult {
            valuation_year,
            attained_age: age,
            current_net_single_premium: cash.net_single_premium,
            remaining_premium_annuity: cash.remaining_annuity,
            cash_value_per_unit: cash.per_unit,
            cash_surrender_value: cash.per_unit * policy.sum_insured,
            reduced_paid_up_amount: paid_up_per_unit * policy.sum_insured,
            paid_up_coverage_years,
            extended_term,
            optional_return_amount: optional_return,
            warnings,
            not_computable: None,
        }
    }

    /// `V = A_{x+t} − P·ä_rem − k·B·ä_rem/ä_pay`
    ///
    /// The acquisition term is dropped when the issue paying annuity is zero.
    fn cash_value(&self, t: u32, warnings: &mut Vec<ComputationWarning>) -> CashValue {
        let f = &self.formulas;
        let policy = self.policy;
        let premium = self.premium;
        let age = policy.attained_age(t);
        let remaining_term = policy.term_years() - t;

        if !f.is_defined_at(age) {
            warnings.push(ComputationWarning::DegenerateComputation {
                quantity: Quantity::CashSurrenderValue,
                age,
            });
        }

        let net_single_premium = f.net_single_premium(policy.kind, age, remaining_term);
        let remaining_annuity = if t < policy.premium_paying_years {
            f.temporary_annuity_due(age, policy.premium_paying_years - t)
        } else {
            0.0
        };

        let reserve = net_single_premium - premium.net_level_premium * remaining_annuity;
        let per_unit = if premium.paying_annuity == 0.0 {
            reserve
        } else {
            let acquisition = premium.loading.k * premium.gross_premium_rate;
            reserve - acquisition * remaining_annuity / premium.paying_annuity
        };

        CashValue {
            net_single_premium,
            remaining_annuity,
            per_unit,
        }
    }

    /// Paid-up sum insured per unit `S = V / A_new`, and its coverage period
    fn reduced_paid_up(
        &self,
        t: u32,
        cash_value: f64,
        warnings: &mut Vec<ComputationWarning>,
    ) -> (f64, u32) {
        let policy = self.policy;
        let age = policy.attained_age(t);

        let coverage_years = match policy.kind {
            PolicyKind::WholeLife => MAX_AGE.saturating_sub(age),
            PolicyKind::Term | PolicyKind::Endowment => policy.term_years() - t,
        };

        let nsp_new = self
            .formulas
            .net_single_premium(policy.kind, age, policy.term_years() - t);

        if nsp_new == 0.0 {
            log::warn!("Paid-up single premium is zero at age {}; paid-up amount set to 0", age);
            warnings.push(ComputationWarning::DegenerateComputation {
                quantity: Quantity::PaidUpAmount,
                age,
            });
            return (0.0, coverage_years);
        }

        (cash_value / nsp_new, coverage_years)
    }

    /// Extended-term duration, and the maturity return for endowments that
    /// run to maturity
    fn extended_term(
        &self,
        t: u32,
        cash_value: f64,
        warnings: &mut Vec<ComputationWarning>,
    ) -> (ExtendedTerm, Option<f64>) {
        let policy = self.policy;
        let table = self.formulas.table();
        let age = policy.attained_age(t);

        if !self.formulas.is_defined_at(age) {
            warnings.push(ComputationWarning::DegenerateComputation {
                quantity: Quantity::ExtendedTerm,
                age,
            });
            return (ExtendedTerm::zero(ExtendedTermStatus::NoValue), None);
        }
        if cash_value <= 0.0 {
            return (ExtendedTerm::zero(ExtendedTermStatus::NoValue), None);
        }

        let target = target_mx(table, age, cash_value);

        match find_bracket(table, age, target) {
            Some(bracket) => {
                let duration =
                    TermDuration::from_years_and_days(bracket.whole_years(age), bracket.fractional_days);
                let remaining_years = policy.term_years() - t;

                // Endowment: extension reaches the original maturity
                if policy.kind == PolicyKind::Endowment && duration.years >= remaining_years {
                    return (
                        ExtendedTerm {
                            status: ExtendedTermStatus::ToMaturity,
                            duration: TermDuration::years(remaining_years),
                        },
                        self.maturity_return(age, cash_value),
                    );
                }

                (
                    ExtendedTerm {
                        status: ExtendedTermStatus::Extended,
                        duration,
                    },
                    None,
                )
            }
            None => {
                log::warn!(
                    "Extended-term search exhausted the table from age {} (V={:.6})",
                    age,
                    cash_value
                );
                warnings.push(ComputationWarning::TableExhausted { attained_age: age });
                (ExtendedTerm::zero(ExtendedTermStatus::Exhausted), None)
            }
        }
    }

    /// `V·SA − SA·D_{maturity}/D_{x+t}`, reported only when positive
    fn maturity_return(&self, age: u32, cash_value: f64) -> Option<f64> {
        let policy = self.policy;
        let table = self.formulas.table();
        let dx = table.d(age);
        if dx == 0.0 {
            return None;
        }

        let amount = cash_value * policy.sum_insured
            - policy.sum_insured * (table.d(policy.maturity_age()) / dx);
        (amount > 0.0).then_some(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commutation::CommutationTable;
    use crate::error::GuaranteeError;
    use crate::mortality::MortalityTable;
    use crate::policy::LoadingTier;
    use crate::premium::PremiumCalculator;
    use approx::assert_relative_eq;

    fn evaluate(policy: &PolicyParameters, year: u32) -> GuaranteedValueResult {
        let table = CommutationTable::build(&MortalityTable::mexican_2000_i(), policy.interest_rate);
        let formulas = ActuarialFormulas::new(&table);
        let premium = PremiumCalculator::new(formulas).calculate(policy);
        GuaranteedValueEngine::new(formulas, policy, &premium).evaluate(year)
    }

    fn whole_life() -> PolicyParameters {
        PolicyParameters::whole_life(40, 100_000.0, 0.04, 20, LoadingTier::Minimum)
    }

    #[test]
    fn test_whole_life_year_ten() {
        let result = evaluate(&whole_life(), 10);

        assert!(result.is_computed());
        assert_eq!(result.attained_age, 50);
        assert_relative_eq!(result.cash_value_per_unit, 0.235_701_434_688, max_relative = 1e-9);
        assert_relative_eq!(result.cash_surrender_value, 23_570.143_469, max_relative = 1e-9);
        assert_relative_eq!(result.reduced_paid_up_amount, 65_666.945_375, max_relative = 1e-9);
        assert_eq!(result.paid_up_coverage_years, 50);
        assert_eq!(result.extended_term.status, ExtendedTermStatus::Extended);
        assert_eq!(
            result.extended_term.duration,
            TermDuration { years: 28, months: 0, days: 24 }
        );
        assert_eq!(result.optional_return_amount, None);
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_whole_life_at_issue() {
        let result = evaluate(&whole_life(), 0);
        assert_relative_eq!(result.cash_surrender_value, 6_188.086_216, max_relative = 1e-9);
        assert_relative_eq!(result.reduced_paid_up_amount, 23_187.908_190, max_relative = 1e-9);
        assert_eq!(
            result.extended_term.duration,
            TermDuration { years: 16, months: 0, days: 20 }
        );
    }

    #[test]
    fn test_whole_life_paid_up_exhausts_table() {
        // Past the paying period the value equals the whole-life single premium,
        // which buys cover beyond the end of the table
        let result = evaluate(&whole_life(), 25);

        assert_eq!(result.remaining_premium_annuity, 0.0);
        assert_relative_eq!(result.cash_value_per_unit, result.current_net_single_premium, max_relative = 1e-15);
        assert_relative_eq!(result.reduced_paid_up_amount, 100_000.0, max_relative = 1e-12);
        assert_eq!(result.extended_term.status, ExtendedTermStatus::Exhausted);
        assert!(result.extended_term.duration.is_zero());
        assert!(result
            .warnings
            .contains(&ComputationWarning::TableExhausted { attained_age: 65 }));
    }

    #[test]
    fn test_term_year_ten() {
        let policy = PolicyParameters::term(40, 100_000.0, 0.04, 20, 15, LoadingTier::Minimum);
        let result = evaluate(&policy, 10);

        assert_relative_eq!(result.cash_surrender_value, 3_694.067_026, max_relative = 1e-9);
        assert_relative_eq!(result.reduced_paid_up_amount, 51_293.548_456, max_relative = 1e-9);
        assert_eq!(result.paid_up_coverage_years, 10);
        assert_eq!(
            result.extended_term.duration,
            TermDuration { years: 5, months: 5, days: 11 }
        );
    }

    #[test]
    fn test_negative_value_has_nothing_to_extend() {
        // Full acquisition load at issue pushes the value below zero
        let policy = PolicyParameters::term(40, 100_000.0, 0.04, 20, 20, LoadingTier::Minimum);
        let result = evaluate(&policy, 0);

        assert_relative_eq!(result.cash_surrender_value, -531.048_199, max_relative = 1e-8);
        assert_eq!(result.extended_term.status, ExtendedTermStatus::NoValue);
        assert!(result.extended_term.duration.is_zero());
    }

    #[test]
    fn test_endowment_short_extension() {
        let policy = PolicyParameters::endowment(40, 100_000.0, 0.04, 20, 15, LoadingTier::Minimum);
        let result = evaluate(&policy, 1);

        assert_relative_eq!(result.cash_surrender_value, 200.076_188, max_relative = 1e-7);
        assert_eq!(result.extended_term.status, ExtendedTermStatus::Extended);
        assert_eq!(
            result.extended_term.duration,
            TermDuration { years: 0, months: 7, days: 13 }
        );
        assert_eq!(result.optional_return_amount, None);
    }

    #[test]
    fn test_endowment_to_maturity_with_return() {
        // Bracket at 24y 2m 10d covers the 24 remaining years
        let policy = PolicyParameters::endowment(50, 100_000.0, 0.04, 30, 10, LoadingTier::Minimum);
        let result = evaluate(&policy, 6);

        assert_relative_eq!(result.cash_surrender_value, 28_353.981_519, max_relative = 1e-9);
        assert_eq!(result.extended_term.status, ExtendedTermStatus::ToMaturity);
        assert_eq!(result.extended_term.duration, TermDuration::years(24));
        let amount = result.optional_return_amount.unwrap();
        assert_relative_eq!(amount, 8_174.651_237, max_relative = 1e-8);
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_endowment_extension_short_of_maturity() {
        // 20y 6m 0d against 25 remaining years stays an ordinary extension
        let policy = PolicyParameters::endowment(50, 100_000.0, 0.04, 30, 10, LoadingTier::Minimum);
        let result = evaluate(&policy, 5);

        assert_eq!(result.extended_term.status, ExtendedTermStatus::Extended);
        assert_eq!(
            result.extended_term.duration,
            TermDuration { years: 20, months: 6, days: 0 }
        );
        assert_eq!(result.optional_return_amount, None);
    }

    #[test]
    fn test_endowment_to_maturity_negative_return_suppressed() {
        // 30y 4m 10d bracket against 15 remaining years; return is negative
        let policy = PolicyParameters::endowment(40, 100_000.0, 0.04, 20, 15, LoadingTier::Minimum);
        let result = evaluate(&policy, 5);

        assert_relative_eq!(result.cash_surrender_value, 19_206.738_529, max_relative = 1e-9);
        assert_eq!(result.extended_term.status, ExtendedTermStatus::ToMaturity);
        assert_eq!(result.extended_term.duration, TermDuration::years(15));
        assert_eq!(result.optional_return_amount, None);
    }

    #[test]
    fn test_endowment_search_exhausted() {
        // V above the whole-life single premium: no bracket, no maturity branch
        let policy = PolicyParameters::endowment(40, 100_000.0, 0.04, 20, 15, LoadingTier::Minimum);

        for year in [10, 15] {
            let result = evaluate(&policy, year);
            assert_eq!(result.extended_term.status, ExtendedTermStatus::Exhausted);
            assert!(result.extended_term.duration.is_zero());
            assert_eq!(result.optional_return_amount, None);
            assert!(result
                .warnings
                .contains(&ComputationWarning::TableExhausted { attained_age: 40 + year }));
        }

        let result = evaluate(&policy, 10);
        assert_relative_eq!(result.cash_surrender_value, 47_543.954_364, max_relative = 1e-9);
    }

    #[test]
    fn test_last_year_still_computes() {
        let policy = PolicyParameters::term(40, 100_000.0, 0.04, 20, 15, LoadingTier::Minimum);
        let result = evaluate(&policy, 19);

        assert!(result.is_computed());
        assert_eq!(result.attained_age, 59);
        assert_eq!(result.paid_up_coverage_years, 1);
        assert_relative_eq!(result.cash_surrender_value, 1_238.366_809, max_relative = 1e-8);
    }

    #[test]
    fn test_year_past_term_rejected() {
        let policy = PolicyParameters::term(40, 100_000.0, 0.04, 20, 15, LoadingTier::Minimum);
        let table = CommutationTable::build(&MortalityTable::mexican_2000_i(), 0.04);
        let formulas = ActuarialFormulas::new(&table);
        let premium = PremiumCalculator::new(formulas).calculate(&policy);
        let engine = GuaranteedValueEngine::new(formulas, &policy, &premium);

        assert!(matches!(
            engine.try_evaluate(25),
            Err(GuaranteeError::ValuationYearOutOfRange { year: 25, term_years: 20 })
        ));
        assert!(engine.try_evaluate(20).is_err());

        let zeroed = engine.evaluate(25);
        assert!(!zeroed.is_computed());
        assert_eq!(zeroed.reduced_paid_up_amount, 0.0);
    }

    #[test]
    fn test_schedule_and_idempotence() {
        let policy = PolicyParameters::endowment(30, 250_000.0, 0.06, 20, 10, LoadingTier::Maximum);
        let table = CommutationTable::build(&MortalityTable::mexican_2000_i(), 0.06);
        let formulas = ActuarialFormulas::new(&table);
        let premium = PremiumCalculator::new(formulas).calculate(&policy);
        let engine = GuaranteedValueEngine::new(formulas, &policy, &premium);

        let schedule = engine.schedule();
        assert_eq!(schedule.len(), 20);
        assert_eq!(schedule[0].valuation_year, 0);
        assert_eq!(schedule[19].valuation_year, 19);

        // Values grow while premiums are being paid
        for pair in schedule[..10].windows(2) {
            assert!(pair[1].cash_surrender_value > pair[0].cash_surrender_value);
        }

        for (year, row) in schedule.iter().enumerate() {
            assert_eq!(*row, engine.evaluate(year as u32));
        }
    }
}
