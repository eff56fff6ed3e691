use super::interruptible;
use crate::{OutputArgs, config::AppConfig};
use procure_core::{
    models::{BuildId, CurrencyCode, ExchangeRates},
    ports::{CatalogRepository as _, Optimizer as _},
};
use procure_solver::BranchAndBound;
use procure_sqlite::Db;
use std::{fs::File, io::BufReader, path::PathBuf};
use time::OffsetDateTime;
use tracing::{Level, event};

pub(crate) struct PlanArgs {
    pub build_id: BuildId,
    pub currency: CurrencyCode,
    pub rates: Option<PathBuf>,
    pub as_of: Option<OffsetDateTime>,
}

pub(crate) async fn plan(
    args: PlanArgs,
    config: AppConfig,
    output: OutputArgs,
) -> anyhow::Result<()> {
    let PlanArgs {
        build_id,
        currency,
        rates,
        as_of,
    } = args;

    let rates = match rates {
        Some(path) => {
            serde_json::from_reader::<_, ExchangeRates>(BufReader::new(File::open(path)?))?
        }
        None => ExchangeRates::default(),
    };

    let db = Db::open(&config.database, config.catalog).await?;
    let list = db.load_shopping_list(&build_id).await??;
    let snapshot = db
        .load_offers(
            &list.component_ids(),
            as_of.unwrap_or_else(OffsetDateTime::now_utc),
        )
        .await??;

    event!(
        Level::INFO,
        %build_id,
        lines = list.items.len(),
        offers = snapshot.offers.len(),
        "catalog loaded"
    );

    let optimizer = BranchAndBound::new(config.optimizer.settings());
    let deadline = interruptible(config.optimizer.deadline);

    let allocation = tokio::task::spawn_blocking(move || {
        optimizer.optimize(&list.items, &snapshot, &rates, currency, &deadline)
    })
    .await??;

    output.emit(&allocation)
}
