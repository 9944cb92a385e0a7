//! Load quote requests from CSV (batches) or JSON (single policy)

use std::io::Read;
use std::path::Path;

use csv::Reader;

use super::{LoadingTier, PolicyKind, PolicyParameters, QuoteRequest};
use crate::error::{GuaranteeError, Result};

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "PolicyID")]
    policy_id: u32,
    #[serde(rename = "Kind")]
    kind: String,
    #[serde(rename = "IssueAge")]
    issue_age: u32,
    #[serde(rename = "SumInsured")]
    sum_insured: f64,
    #[serde(rename = "InterestRate")]
    interest_rate: f64,
    #[serde(rename = "TermYears", default)]
    term_years: Option<u32>,
    #[serde(rename = "PayingYears")]
    premium_paying_years: u32,
    #[serde(rename = "LoadingTier")]
    loading_tier: String,
    #[serde(rename = "ValuationYear")]
    valuation_year: u32,
}

impl CsvRow {
    fn into_request(self) -> Result<QuoteRequest> {
        let kind: PolicyKind = self.kind.parse()?;
        let loading_tier: LoadingTier = self.loading_tier.parse()?;

        let policy = match kind {
            PolicyKind::WholeLife => PolicyParameters::whole_life(
                self.issue_age,
                self.sum_insured,
                self.interest_rate,
                self.premium_paying_years,
                loading_tier,
            ),
            PolicyKind::Term | PolicyKind::Endowment => PolicyParameters {
                kind,
                issue_age: self.issue_age,
                sum_insured: self.sum_insured,
                interest_rate: self.interest_rate,
                term_years: self.term_years.unwrap_or(0),
                premium_paying_years: self.premium_paying_years,
                loading_tier,
            },
        };

        Ok(QuoteRequest {
            policy_id: self.policy_id,
            policy,
            valuation_year: self.valuation_year,
        })
    }
}

/// One data row of a request CSV, parsed or not
#[derive(Debug)]
pub struct LoadedRequest {
    /// `PolicyID` column, or 0 when the row is too broken to read it
    pub policy_id: u32,
    /// Line of the row in the file (header is line 1)
    pub line: u64,
    pub request: Result<QuoteRequest>,
}

/// Load all requests from a CSV file
///
/// Expected header:
/// `PolicyID,Kind,IssueAge,SumInsured,InterestRate,TermYears,PayingYears,LoadingTier,ValuationYear`.
/// `TermYears` may be left empty for whole-life rows. Only a missing file or
/// an unreadable header fails the load; a bad row is returned as an `Err`
/// in its own slot. Rows are parsed but not validated; validation happens
/// when each request is quoted.
pub fn load_requests<P: AsRef<Path>>(path: P) -> Result<Vec<LoadedRequest>> {
    let reader = Reader::from_path(path)?;
    collect_requests(reader)
}

/// Load requests from any reader (e.g., string buffer, stdin)
pub fn load_requests_from_reader<R: Read>(reader: R) -> Result<Vec<LoadedRequest>> {
    collect_requests(Reader::from_reader(reader))
}

fn collect_requests<R: Read>(mut reader: Reader<R>) -> Result<Vec<LoadedRequest>> {
    let headers = reader.headers()?.clone();
    let id_column = headers.iter().position(|h| h == "PolicyID");
    let mut rows = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let fallback_line = index as u64 + 2;
        let loaded = match record {
            Ok(record) => {
                let line = record.position().map_or(fallback_line, |p| p.line());
                let policy_id = id_column
                    .and_then(|i| record.get(i))
                    .and_then(|id| id.trim().parse().ok())
                    .unwrap_or(0);
                let request = record
                    .deserialize::<CsvRow>(Some(&headers))
                    .map_err(GuaranteeError::from)
                    .and_then(CsvRow::into_request);
                LoadedRequest {
                    policy_id,
                    line,
                    request,
                }
            }
            Err(err) => LoadedRequest {
                policy_id: 0,
                line: err.position().map_or(fallback_line, |p| p.line()),
                request: Err(err.into()),
            },
        };

        if let Err(err) = &loaded.request {
            log::warn!("Request on line {} not loaded: {}", loaded.line, err);
        }
        rows.push(loaded);
    }

    log::debug!("Loaded {} quote request rows", rows.len());
    Ok(rows)
}

/// Load a single request from a JSON file
pub fn load_request_json<P: AsRef<Path>>(path: P) -> Result<QuoteRequest> {
    let file = std::fs::File::open(path)?;
    let request = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(request)
}
