//! Annuity-due and net single premium formulas per unit sum insured
//!
//! Every formula divides by `D_x`. When `D_x` is zero or the age is outside
//! the table the formula evaluates to zero; callers that need to know use
//! [`ActuarialFormulas::is_defined_at`].

use super::CommutationTable;
use crate::policy::PolicyKind;

/// Formulas read from a commutation table
#[derive(Debug, Clone, Copy)]
pub struct ActuarialFormulas<'a> {
    table: &'a CommutationTable,
}

impl<'a> ActuarialFormulas<'a> {
    pub fn new(table: &'a CommutationTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a CommutationTable {
        self.table
    }

    /// False when `D_x` is zero or missing, i.e. every formula at `age` reads 0
    pub fn is_defined_at(&self, age: u32) -> bool {
        self.table.d(age) != 0.0
    }

    fn per_dx(&self, age: u32, numerator: f64) -> f64 {
        let dx = self.table.d(age);
        if dx == 0.0 {
            0.0
        } else {
            numerator / dx
        }
    }

    /// Whole-life annuity-due: N_x / D_x
    pub fn whole_life_annuity_due(&self, age: u32) -> f64 {
        self.per_dx(age, self.table.n(age))
    }

    /// n-year temporary annuity-due: (N_x - N_{x+n}) / D_x
    pub fn temporary_annuity_due(&self, age: u32, years: u32) -> f64 {
        self.per_dx(age, self.table.n(age) - self.table.n(age + years))
    }

    /// Whole-life insurance: M_x / D_x
    pub fn whole_life_insurance(&self, age: u32) -> f64 {
        self.per_dx(age, self.table.m(age))
    }

    /// n-year term insurance: (M_x - M_{x+n}) / D_x
    pub fn term_insurance(&self, age: u32, years: u32) -> f64 {
        self.per_dx(age, self.table.m(age) - self.table.m(age + years))
    }

    /// n-year pure endowment: D_{x+n} / D_x
    pub fn pure_endowment(&self, age: u32, years: u32) -> f64 {
        self.per_dx(age, self.table.d(age + years))
    }

    /// n-year endowment insurance: term insurance plus pure endowment
    pub fn endowment_insurance(&self, age: u32, years: u32) -> f64 {
        self.per_dx(
            age,
            self.table.m(age) - self.table.m(age + years) + self.table.d(age + years),
        )
    }

    /// Net single premium for a policy shape. `years` is ignored for whole life.
    pub fn net_single_premium(&self, kind: PolicyKind, age: u32, years: u32) -> f64 {
        match kind {
            PolicyKind::WholeLife => self.whole_life_insurance(age),
            PolicyKind::Term => self.term_insurance(age, years),
            PolicyKind::Endowment => self.endowment_insurance(age, years),
        }
    }
}
