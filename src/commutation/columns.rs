//! Commutation columns D, C, N, M for a single interest rate

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::mortality::MortalityTable;

/// Commutation values at one age
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommutationRow {
    pub age: u32,
    #[serde(rename = "Dx")]
    pub dx: f64,
    #[serde(rename = "Cx")]
    pub cx: f64,
    #[serde(rename = "Nx")]
    pub nx: f64,
    #[serde(rename = "Mx")]
    pub mx: f64,
}

/// Selector for a commutation column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Column {
    D,
    C,
    N,
    M,
}

impl CommutationRow {
    pub fn value(&self, column: Column) -> f64 {
        match column {
            Column::D => self.dx,
            Column::C => self.cx,
            Column::N => self.nx,
            Column::M => self.mx,
        }
    }
}

/// Commutation table built from the mortality table at one interest rate
///
/// Rebuilt whenever the rate changes; nothing is cached across rates.
#[derive(Debug, Clone)]
pub struct CommutationTable {
    interest_rate: f64,
    min_age: u32,
    rows: Vec<CommutationRow>,
}

impl CommutationTable {
    /// Build the columns for `interest_rate` (annual effective, e.g. 0.04)
    pub fn build(mortality: &MortalityTable, interest_rate: f64) -> Self {
        let accumulation = 1.0 + interest_rate;

        let mut rows: Vec<CommutationRow> = mortality
            .rows()
            .iter()
            .map(|r| CommutationRow {
                age: r.age,
                dx: r.survivors * accumulation.powi(-(r.age as i32)),
                cx: r.deaths * accumulation.powi(-(r.age as i32 + 1)),
                nx: 0.0,
                mx: 0.0,
            })
            .collect();

        // Suffix sums from the terminal age down
        let mut n_acc = 0.0;
        let mut m_acc = 0.0;
        for row in rows.iter_mut().rev() {
            n_acc += row.dx;
            m_acc += row.cx;
            row.nx = n_acc;
            row.mx = m_acc;
        }

        log::debug!(
            "Built commutation table at i={:.4}: {} ages",
            interest_rate,
            rows.len()
        );

        Self {
            interest_rate,
            min_age: mortality.min_age(),
            rows,
        }
    }

    pub fn interest_rate(&self) -> f64 {
        self.interest_rate
    }

    pub fn rows(&self) -> &[CommutationRow] {
        &self.rows
    }

    /// Oldest age in the table
    pub fn max_age(&self) -> u32 {
        self.rows.last().map(|r| r.age).unwrap_or(self.min_age)
    }

    pub fn row(&self, age: u32) -> Option<&CommutationRow> {
        let idx = age.checked_sub(self.min_age)? as usize;
        self.rows.get(idx)
    }

    /// Column value, or `None` when the age is not in the table
    pub fn get(&self, age: u32, column: Column) -> Option<f64> {
        self.row(age).map(|r| r.value(column))
    }

    /// Column value with ages outside the table reading as zero
    pub fn column_value(&self, age: u32, column: Column) -> f64 {
        self.get(age, column).unwrap_or(0.0)
    }

    pub fn d(&self, age: u32) -> f64 {
        self.column_value(age, Column::D)
    }

    pub fn c(&self, age: u32) -> f64 {
        self.column_value(age, Column::C)
    }

    pub fn n(&self, age: u32) -> f64 {
        self.column_value(age, Column::N)
    }

    pub fn m(&self, age: u32) -> f64 {
        self.column_value(age, Column::M)
    }

    /// Write the table as CSV with an `age,Dx,Cx,Nx,Mx` header
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
