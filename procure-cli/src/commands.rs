use crate::{IOArgs, OutputArgs, config::OptimizerConfig};
use clap::{Args, Subcommand};
use procure_core::models::{CancelToken, CurrencyCode, Deadline};
use procure_solver::MinimumOrderPolicy;
use std::{path::PathBuf, time::Duration};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{Level, event};

mod optimize;
mod plan;

pub(crate) use optimize::optimize;
pub(crate) use plan::{PlanArgs, plan};

#[derive(Subcommand)]
pub enum Commands {
    /// Optimize a self-contained request (shopping list, catalog and rates)
    Optimize {
        #[command(flatten)]
        io: IOArgs,

        #[command(flatten)]
        tuning: TuningArgs,
    },

    /// Optimize a build stored in the catalog database
    Plan {
        /// The stored build to purchase
        build_id: String,

        /// The currency to report costs in
        #[arg(long, default_value = "EUR")]
        currency: CurrencyCode,

        /// JSON object of exchange rates into the reporting currency, e.g. {"USD": "0.92"}
        #[arg(short, long)]
        rates: Option<PathBuf>,

        /// Judge offer freshness at this RFC3339 instant instead of now
        #[arg(long, value_parser = parse_instant)]
        as_of: Option<OffsetDateTime>,

        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        tuning: TuningArgs,
    },
}

// Per-invocation overrides of the [optimizer] configuration section
#[derive(Args)]
pub struct TuningArgs {
    /// Stop searching after this long and report the best allocation found (e.g. "250ms", "2s")
    #[arg(short, long, value_parser = parse_duration)]
    deadline: Option<Duration>,

    /// How supplier minimum orders are enforced
    #[arg(short, long)]
    policy: Option<MinimumOrderPolicy>,
}

impl TuningArgs {
    pub fn apply(self, mut config: OptimizerConfig) -> OptimizerConfig {
        if let Some(deadline) = self.deadline {
            config.deadline = Some(deadline);
        }
        if let Some(policy) = self.policy {
            config.policy = policy;
        }
        config
    }
}

fn parse_duration(value: &str) -> Result<Duration, humantime_serde::re::humantime::DurationError> {
    humantime_serde::re::humantime::parse_duration(value)
}

fn parse_instant(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(value, &Rfc3339)
}

/// A deadline from the configured budget that also expires on Ctrl-C, so an
/// interrupted search still reports the best allocation it has.
pub(crate) fn interruptible(budget: Option<Duration>) -> Deadline {
    let token = CancelToken::new();
    let deadline = budget
        .map_or_else(Deadline::none, Deadline::after)
        .with_token(token.clone());

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            event!(Level::WARN, "interrupted, reporting the best allocation so far");
            token.cancel();
        }
    });

    deadline
}
