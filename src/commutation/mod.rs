//! Commutation functions and the single-premium / annuity formulas built on them
//!
//! A [`CommutationTable`] is built for one interest rate from the mortality
//! table and holds the discounted columns:
//! - `D_x = l_x · v^x`
//! - `C_x = d_x · v^(x+1)`
//! - `N_x = Σ_{y≥x} D_y`
//! - `M_x = Σ_{y≥x} C_y`
//!
//! [`ActuarialFormulas`] reads ratios of these columns. Every lookup outside
//! the table reads as zero, which is the boundary condition the formulas rely
//! on (`N_101 = M_101 = 0`).

mod columns;
mod formulas;

pub use columns::{Column, CommutationRow, CommutationTable};
pub use formulas::ActuarialFormulas;
