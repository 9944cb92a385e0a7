//! Guaranteed Values - premium and non-forfeiture engine for traditional life policies
//!
//! This library provides:
//! - The shipped Mexican 2000-I mortality table (ages 12 to 100)
//! - Commutation columns D/C/N/M at any technical rate
//! - Annuity-due and net-single-premium formulas
//! - Commercial premiums with administration, collection and acquisition loadings
//! - Cash surrender, reduced paid-up and extended-term values at any policy year
//! - Report payloads and CSV export for schedules and batches

pub mod commutation;
pub mod error;
pub mod guaranteed;
pub mod mortality;
pub mod policy;
pub mod premium;
pub mod quote;
pub mod report;

// Re-export commonly used types
pub use commutation::{ActuarialFormulas, CommutationTable};
pub use error::{ComputationWarning, GuaranteeError, Quantity, Result};
pub use guaranteed::{
    ExtendedTerm, ExtendedTermStatus, GuaranteedValueEngine, GuaranteedValueResult, TermDuration,
};
pub use mortality::MortalityTable;
pub use policy::{LoadingTier, PolicyKind, PolicyParameters, QuoteRequest};
pub use premium::{LoadingParameters, PremiumCalculator, PremiumResult};
pub use quote::{quote, Quotation, QuoteEngine};
pub use report::GuaranteedValueReport;
