use super::interruptible;
use crate::{IOArgs, config::OptimizerConfig};
use procure_solver::{BranchAndBound, io::ProcurementRequest};
use tokio::runtime::Handle;
use tracing::{Level, event};

pub(crate) async fn optimize(io: IOArgs, config: OptimizerConfig) -> anyhow::Result<()> {
    let request = serde_json::from_reader::<_, ProcurementRequest>(io.read()?)?;
    event!(
        Level::INFO,
        build = %request.shopping_list.build_id,
        lines = request.shopping_list.items.len(),
        "request read"
    );

    let optimizer = BranchAndBound::new(config.settings());
    let deadline = interruptible(config.deadline);

    // The search is CPU-bound; keep it off the runtime so the interrupt
    // handler can still fire.
    let handle = Handle::current();
    let allocation = tokio::task::spawn_blocking(move || {
        handle.block_on(request.solve(&optimizer, &deadline))
    })
    .await??;

    io.output().emit(&allocation)
}
