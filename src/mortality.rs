//! Mortality table for guaranteed-value calculations
//!
//! The table is the Mexican 2000-I experience table (ages 12-100), shipped
//! with the crate as an ordered sequence of `(age, l_x, d_x)` records.
//! The final row at age 100 is a synthetic closing row where every survivor
//! dies, so `d_100 = l_100`.

use serde::{Deserialize, Serialize};

/// Youngest age in the table
pub const MIN_AGE: u32 = 12;

/// Terminal age of the table
pub const MAX_AGE: u32 = 100;

/// One record of the life table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MortalityRow {
    /// Age x
    pub age: u32,
    /// Survivors l_x
    pub survivors: f64,
    /// Deaths d_x between ages x and x+1
    pub deaths: f64,
}

const fn row(age: u32, survivors: f64, deaths: f64) -> MortalityRow {
    MortalityRow { age, survivors, deaths }
}

/// Immutable life table keyed by age
#[derive(Debug, Clone, Copy)]
pub struct MortalityTable {
    rows: &'static [MortalityRow],
}

impl MortalityTable {
    /// The Mexican 2000-I table used for all calculations
    pub fn mexican_2000_i() -> Self {
        Self { rows: &MEXICAN_2000_I }
    }

    /// All rows, ordered by age
    pub fn rows(&self) -> &[MortalityRow] {
        self.rows
    }

    pub fn min_age(&self) -> u32 {
        self.rows.first().map(|r| r.age).unwrap_or(MIN_AGE)
    }

    pub fn max_age(&self) -> u32 {
        self.rows.last().map(|r| r.age).unwrap_or(MAX_AGE)
    }

    /// Row for an age, or `None` outside the table
    pub fn row(&self, age: u32) -> Option<&MortalityRow> {
        let idx = age.checked_sub(self.min_age())? as usize;
        self.rows.get(idx)
    }

    pub fn exists(&self, age: u32) -> bool {
        self.row(age).is_some()
    }

    /// l_x, or `None` when the age is not in the table
    pub fn survivors(&self, age: u32) -> Option<f64> {
        self.row(age).map(|r| r.survivors)
    }

    /// d_x, or `None` when the age is not in the table
    pub fn deaths(&self, age: u32) -> Option<f64> {
        self.row(age).map(|r| r.deaths)
    }
}

impl Default for MortalityTable {
    fn default() -> Self {
        Self::mexican_2000_i()
    }
}

/// Mexican 2000-I: (age, l_x, d_x)
static MEXICAN_2000_I: [MortalityRow; 89] = [
    row(12, 10000000.0, 3960.0), row(13, 9996040.0, 4268.0), row(14, 9991772.0, 4596.0),
    row(15, 9987175.0, 4944.0), row(16, 9982232.0, 5321.0), row(17, 9976911.0, 5737.0),
    row(18, 9971175.0, 6172.0), row(19, 9965002.0, 6647.0), row(20, 9958356.0, 7150.0),
    row(21, 9951206.0, 7692.0), row(22, 9943513.0, 8283.0), row(23, 9935230.0, 8912.0),
    row(24, 9926319.0, 9589.0), row(25, 9916730.0, 10323.0), row(26, 9906406.0, 11105.0),
    row(27, 9895301.0, 11944.0), row(28, 9883358.0, 12848.0), row(29, 9870509.0, 13819.0),
    row(30, 9856691.0, 14864.0), row(31, 9841827.0, 15983.0), row(32, 9825844.0, 17185.0),
    row(33, 9808658.0, 18480.0), row(34, 9790179.0, 19864.0), row(35, 9770314.0, 21358.0),
    row(36, 9748956.0, 22949.0), row(37, 9726007.0, 24655.0), row(38, 9701352.0, 26485.0),
    row(39, 9674867.0, 28444.0), row(40, 9646423.0, 30541.0), row(41, 9615883.0, 32790.0),
    row(42, 9583092.0, 35189.0), row(43, 9547903.0, 37752.0), row(44, 9510151.0, 40494.0),
    row(45, 9469657.0, 43418.0), row(46, 9426238.0, 46547.0), row(47, 9379692.0, 49872.0),
    row(48, 9329820.0, 53413.0), row(49, 9276407.0, 57180.0), row(50, 9219227.0, 61188.0),
    row(51, 9158039.0, 65434.0), row(52, 9092605.0, 69949.0), row(53, 9022655.0, 74726.0),
    row(54, 8947930.0, 79771.0), row(55, 8868159.0, 85108.0), row(56, 8783051.0, 90729.0),
    row(57, 8692322.0, 96650.0), row(58, 8595672.0, 102864.0), row(59, 8492808.0, 109379.0),
    row(60, 8383429.0, 116194.0), row(61, 8267235.0, 123298.0), row(62, 8143937.0, 130694.0),
    row(63, 8013243.0, 138349.0), row(64, 7874895.0, 146268.0), row(65, 7728626.0, 154418.0),
    row(66, 7574208.0, 162770.0), row(67, 7411439.0, 171286.0), row(68, 7240153.0, 179925.0),
    row(69, 7060228.0, 188649.0), row(70, 6871578.0, 197379.0), row(71, 6674199.0, 206059.0),
    row(72, 6468140.0, 214613.0), row(73, 6253527.0, 222944.0), row(74, 6030583.0, 230971.0),
    row(75, 5799611.0, 238573.0), row(76, 5561038.0, 245653.0), row(77, 5315385.0, 252077.0),
    row(78, 5063308.0, 257733.0), row(79, 4805576.0, 262476.0), row(80, 4543100.0, 266189.0),
    row(81, 4276911.0, 268735.0), row(82, 4008175.0, 269999.0), row(83, 3738177.0, 269859.0),
    row(84, 3468318.0, 268229.0), row(85, 3200088.0, 265022.0), row(86, 2935067.0, 260191.0),
    row(87, 2674876.0, 253712.0), row(88, 2421164.0, 245593.0), row(89, 2175571.0, 235884.0),
    row(90, 1939687.0, 224678.0), row(91, 1715009.0, 212107.0), row(92, 1502902.0, 198342.0),
    row(93, 1304559.0, 183600.0), row(94, 1120960.0, 168125.0), row(95, 952835.0, 152190.0),
    row(96, 800645.0, 136086.0), row(97, 664559.0, 120108.0), row(98, 544452.0, 104546.0),
    row(99, 439906.0, 89669.0), row(100, 350237.0, 350237.0),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_bounds() {
        let table = MortalityTable::mexican_2000_i();
        assert_eq!(table.rows().len(), 89);
        assert_eq!(table.min_age(), MIN_AGE);
        assert_eq!(table.max_age(), MAX_AGE);
        assert_eq!(table.survivors(12), Some(10_000_000.0));
        assert_eq!(table.deaths(40), Some(30541.0));
    }

    #[test]
    fn test_ages_contiguous() {
        let table = MortalityTable::mexican_2000_i();
        for (i, pair) in table.rows().windows(2).enumerate() {
            assert_eq!(pair[1].age, pair[0].age + 1, "gap after row {}", i);
            assert!(pair[1].survivors <= pair[0].survivors);
        }
    }

    #[test]
    fn test_deaths_match_survivor_decrements() {
        let table = MortalityTable::mexican_2000_i();
        // Published values are rounded to whole lives
        for pair in table.rows().windows(2) {
            let decrement = pair[0].survivors - pair[1].survivors;
            assert!(
                (decrement - pair[0].deaths).abs() <= 1.0,
                "age {}: l_x - l_x+1 = {} but d_x = {}",
                pair[0].age, decrement, pair[0].deaths
            );
        }

        // Closing row folds everyone remaining into deaths
        let last = table.row(MAX_AGE).unwrap();
        assert_eq!(last.deaths, last.survivors);
    }

    #[test]
    fn test_lookup_outside_table() {
        let table = MortalityTable::mexican_2000_i();
        assert!(!table.exists(11));
        assert!(!table.exists(101));
        assert!(table.exists(100));
        assert_eq!(table.survivors(0), None);
        assert_eq!(table.deaths(150), None);
    }
}
