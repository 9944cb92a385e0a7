//! Policy parameters, validation and quote-request loading

mod data;
pub mod loader;

pub use data::{
    LoadingTier, PolicyKind, PolicyParameters, QuoteRequest, MAX_INTEREST_RATE, MAX_ISSUE_AGE,
    MIN_SUM_INSURED,
};
pub use loader::{load_request_json, load_requests, load_requests_from_reader, LoadedRequest};
