//! Guaranteed Values CLI
//!
//! # Usage
//!
//! ```bash
//! # Premium and guaranteed values at year 10
//! guaranteed-values quote --kind whole-life --age 40 --sum-insured 100000 --rate 0.04 --paying 20 --year 10
//!
//! # Same, reading the request from JSON and printing the report payload
//! guaranteed-values quote --policy request.json --json
//!
//! # Every year of the term to CSV
//! guaranteed-values schedule --kind endowment --age 40 --term 20 --paying 15 --output schedule.csv
//!
//! # Commutation columns at 5%
//! guaranteed-values commutations --rate 0.05 --output commutations.csv
//!
//! # Quote a CSV of requests
//! guaranteed-values batch --input requests.csv --output quotes.csv
//! ```

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};

use guaranteed_values::policy::{load_request_json, load_requests};
use guaranteed_values::report::{describe_policy, write_batch_csv, write_schedule_csv};
use guaranteed_values::{
    ExtendedTermStatus, GuaranteedValueReport, LoadingTier, PolicyKind, PolicyParameters,
    QuoteEngine,
};

/// Premium and guaranteed-value quotes for whole-life, term and endowment policies
#[derive(Parser)]
#[command(name = "guaranteed-values")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Commercial premium and guaranteed values at one policy year
    Quote(QuoteArgs),

    /// Guaranteed values for every year of the term
    Schedule(ScheduleArgs),

    /// Commutation columns D/C/N/M at a technical rate
    Commutations(CommutationArgs),

    /// Quote every request in a CSV file
    Batch(BatchArgs),
}

/// Policy description shared by `quote` and `schedule`
#[derive(Args, Debug)]
struct PolicyArgs {
    /// whole-life, term or endowment
    #[arg(short, long, default_value = "whole-life")]
    kind: PolicyKind,

    /// Issue age
    #[arg(short, long, default_value = "40")]
    age: u32,

    /// Sum insured
    #[arg(short, long, default_value = "100000")]
    sum_insured: f64,

    /// Technical interest rate (0.04 = 4%)
    #[arg(short, long, default_value = "0.04")]
    rate: f64,

    /// Coverage term in years (term and endowment only)
    #[arg(short, long)]
    term: Option<u32>,

    /// Premium paying years
    #[arg(short, long, default_value = "20")]
    paying: u32,

    /// Loading tier: minimum or maximum
    #[arg(long, default_value = "minimum")]
    tier: LoadingTier,
}

impl PolicyArgs {
    fn to_policy(&self) -> Result<PolicyParameters> {
        let policy = match (self.kind, self.term) {
            (PolicyKind::WholeLife, _) => {
                PolicyParameters::whole_life(self.age, self.sum_insured, self.rate, self.paying, self.tier)
            }
            (PolicyKind::Term, Some(term)) => {
                PolicyParameters::term(self.age, self.sum_insured, self.rate, term, self.paying, self.tier)
            }
            (PolicyKind::Endowment, Some(term)) => PolicyParameters::endowment(
                self.age,
                self.sum_insured,
                self.rate,
                term,
                self.paying,
                self.tier,
            ),
            (kind, None) => bail!("--term is required for {} policies", kind),
        };
        Ok(policy)
    }
}

#[derive(Args, Debug)]
struct QuoteArgs {
    #[command(flatten)]
    policy: PolicyArgs,

    /// Valuation year (0 = issue)
    #[arg(short, long, default_value = "0")]
    year: u32,

    /// JSON quote request; overrides the policy flags and --year
    #[arg(long = "policy", value_name = "FILE")]
    policy_file: Option<PathBuf>,

    /// Print the report payload as JSON
    #[arg(long)]
    json: bool,

    /// Write the JSON report payload to this directory under a timestamped name
    #[arg(long)]
    save_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ScheduleArgs {
    #[command(flatten)]
    policy: PolicyArgs,

    /// Output CSV path (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CommutationArgs {
    /// Technical interest rate (0.04 = 4%)
    #[arg(short, long, default_value = "0.04")]
    rate: f64,

    /// Output CSV path (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Input CSV of quote requests
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV path (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let engine = QuoteEngine::new();

    match cli.command {
        Commands::Quote(args) => run_quote(&engine, args),
        Commands::Schedule(args) => run_schedule(&engine, args),
        Commands::Commutations(args) => run_commutations(&engine, args),
        Commands::Batch(args) => run_batch(&engine, args),
    }
}

fn output_writer(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Unable to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    })
}

fn run_quote(engine: &QuoteEngine, args: QuoteArgs) -> Result<()> {
    let (policy, year) = match &args.policy_file {
        Some(path) => {
            let request = load_request_json(path)
                .with_context(|| format!("Failed to load request {}", path.display()))?;
            (request.policy, request.valuation_year)
        }
        None => (args.policy.to_policy()?, args.year),
    };

    let quotation = engine.quote(&policy, year)?;
    let report = GuaranteedValueReport::new(&quotation, Utc::now());

    if let Some(dir) = &args.save_dir {
        let path = dir.join(report.file_name("json"));
        std::fs::write(&path, report.to_json()?)
            .with_context(|| format!("Unable to write {}", path.display()))?;
        log::info!("Report written to {}", path.display());
    }

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report);
    }

    Ok(())
}

fn run_schedule(engine: &QuoteEngine, args: ScheduleArgs) -> Result<()> {
    let policy = args.policy.to_policy()?;
    let (premium, schedule) = engine.schedule(&policy)?;

    eprintln!("{}", describe_policy(&policy));
    eprintln!("Annual premium: {:.2}", premium.gross_annual_premium);

    let exhausted = schedule
        .iter()
        .filter(|row| row.extended_term.status == ExtendedTermStatus::Exhausted)
        .count();
    if exhausted > 0 {
        log::warn!("{} years exhaust the table in the extended-term search", exhausted);
    }

    write_schedule_csv(&schedule, output_writer(args.output.as_ref())?)?;

    if let Some(path) = &args.output {
        eprintln!("{} years written to: {}", schedule.len(), path.display());
    }
    Ok(())
}

fn run_commutations(engine: &QuoteEngine, args: CommutationArgs) -> Result<()> {
    if !(args.rate > 0.0) {
        bail!("Interest rate must be positive, got {}", args.rate);
    }

    let table = engine.commutation(args.rate);
    table.write_csv(output_writer(args.output.as_ref())?)?;

    if let Some(path) = &args.output {
        eprintln!("{} ages written to: {}", table.rows().len(), path.display());
    }
    Ok(())
}

fn run_batch(engine: &QuoteEngine, args: BatchArgs) -> Result<()> {
    let start = Instant::now();
    let rows = load_requests(&args.input)
        .with_context(|| format!("Failed to load requests from {}", args.input.display()))?;
    eprintln!("Loaded {} request rows", rows.len());

    let outcomes = engine.quote_loaded(rows);
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    for outcome in &outcomes {
        if let Err(err) = &outcome.result {
            log::warn!("Policy {}: {}", outcome.policy_id, err);
        }
    }

    write_batch_csv(&outcomes, output_writer(args.output.as_ref())?)?;

    eprintln!(
        "Quoted {} policies ({} failed) in {:?}",
        outcomes.len() - failed,
        failed,
        start.elapsed()
    );
    Ok(())
}
