//! Expense loadings and the commercial (gross) premium
//!
//! The net level premium spreads the net single premium over the paying
//! annuity. The commercial premium per unit then adds administration (γ),
//! collection (β) and acquisition (k) loadings:
//!
//! ```text
//! B = (P·ä_pay + α + γ·ä_cov) / (ä_pay·(1 − k/ä_pay − β))
//! ```

mod calculator;
mod loading;

pub use calculator::{gross_premium_rate, PremiumCalculator, PremiumResult};
pub use loading::LoadingParameters;
