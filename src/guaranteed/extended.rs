//! Inverse lookup of the M_x column for extended-term insurance
//!
//! Spending a surrender value V (per unit) on term insurance at age x buys
//! cover until the age y where `M_x − M_y = V·D_x`. The search walks the
//! column upward for the pair of ages that brackets the target and
//! interpolates linearly inside the year.

use super::types::DAYS_PER_YEAR;
use crate::commutation::CommutationTable;
use crate::mortality::MAX_AGE;

/// Exclusive upper bound of the bracket's upper age; the last bracket tried is (98, 99)
pub const SEARCH_END_AGE: u32 = MAX_AGE;

/// Bracket found by the search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    /// Lower age of the bracket (where cover is still in force at its start)
    pub lower_age: u32,
    /// Interpolated fraction of the bracket year, in days
    pub fractional_days: f64,
}

impl Bracket {
    /// Whole years of extension from `attained_age`
    pub fn whole_years(&self, attained_age: u32) -> u32 {
        self.lower_age.saturating_sub(attained_age)
    }
}

/// Target `M_x − V·D_x` the extension must reach
pub fn target_mx(table: &CommutationTable, attained_age: u32, value_per_unit: f64) -> f64 {
    table.m(attained_age) - value_per_unit * table.d(attained_age)
}

/// Find `(age−1, age)` with `M_{age−1} ≥ target ≥ M_age`, scanning from
/// `attained_age + 1` up to age 99
///
/// Returns `None` when no bracket exists before the table closes.
pub fn find_bracket(table: &CommutationTable, attained_age: u32, target: f64) -> Option<Bracket> {
    for age in (attained_age + 1)..SEARCH_END_AGE {
        let m_lower = table.m(age - 1);
        let m_upper = table.m(age);

        if m_lower >= target && target >= m_upper {
            let fractional_days = if m_lower != m_upper {
                (m_lower - target) / (m_lower - m_upper) * DAYS_PER_YEAR
            } else {
                0.0
            };
            return Some(Bracket {
                lower_age: age - 1,
                fractional_days,
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mortality::MortalityTable;
    use approx::assert_relative_eq;

    fn table() -> CommutationTable {
        CommutationTable::build(&MortalityTable::mexican_2000_i(), 0.04)
    }

    #[test]
    fn test_bracket_on_column_value() {
        let table = table();

        // Target exactly at M_55 from age 50: five whole years, no fraction
        let bracket = find_bracket(&table, 50, table.m(55)).unwrap();
        assert!(bracket.lower_age == 54 || bracket.lower_age == 55);
        let years = bracket.whole_years(50) as f64 + bracket.fractional_days / 365.0;
        assert_relative_eq!(years, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bracket_midpoint() {
        let table = table();
        let target = 0.5 * (table.m(60) + table.m(61));

        let bracket = find_bracket(&table, 50, target).unwrap();
        assert_eq!(bracket.lower_age, 60);
        assert_eq!(bracket.whole_years(50), 10);
        assert_relative_eq!(bracket.fractional_days, 182.5, epsilon = 1e-6);
    }

    #[test]
    fn test_no_bracket_past_table() {
        let table = table();

        // Below M_99: the cover would outlast the table
        assert_eq!(find_bracket(&table, 50, table.m(99) * 0.5), None);
        // Above M_x: negative value
        assert_eq!(find_bracket(&table, 50, table.m(50) * 1.01), None);
        // No ages left to scan
        assert_eq!(find_bracket(&table, 99, 0.0), None);
    }

    #[test]
    fn test_target_mx() {
        let table = table();
        assert_eq!(target_mx(&table, 40, 0.0), table.m(40));
        assert_relative_eq!(
            target_mx(&table, 40, 0.1),
            table.m(40) - 0.1 * table.d(40),
            max_relative = 1e-15
        );
    }
}
