//! Guaranteed (non-forfeiture) values at a policy anniversary
//!
//! For valuation year `t` (attained age `x+t`) the engine computes:
//! 1. **Cash surrender value**: prospective net reserve less the unamortized
//!    acquisition expense `k·B·ä_rem/ä_pay`.
//! 2. **Reduced paid-up amount**: the sum insured the surrender value buys as
//!    a single premium for the remaining coverage.
//! 3. **Extended term**: how long the full sum insured stays in force when
//!    the surrender value is spent on term insurance, found by inverting the
//!    `M_x` column. Endowments whose value covers the remaining term run to
//!    maturity instead, with an optional survival return.

mod engine;
mod extended;
mod types;

pub use engine::GuaranteedValueEngine;
pub use extended::{find_bracket, target_mx, Bracket, SEARCH_END_AGE};
pub use types::{ExtendedTerm, ExtendedTermStatus, GuaranteedValueResult, TermDuration};
