use crate::{
    OptimizeError, explain, normalize,
    problem::Problem,
    search::{Direction, Search},
};
use procure_core::{
    models::{Allocation, CatalogSnapshot, CurrencyCode, Deadline, ExchangeRates, LineItem, SearchStatus},
    ports::Optimizer,
};
use tracing::{Level, event, span};

/// How a supplier's minimum order amount is enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum MinimumOrderPolicy {
    /// Every supplier used must be sent at least its minimum order amount
    #[default]
    Strict,
    /// A supplier may be sent less than its minimum, but only when every line
    /// it receives has no other possible supplier
    SoleSourceExempt,
}

impl std::str::FromStr for MinimumOrderPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "strict" => Ok(Self::Strict),
            "sole-source-exempt" => Ok(Self::SoleSourceExempt),
            other => Err(format!("unknown minimum order policy: {other}")),
        }
    }
}

/// Tuning for [`BranchAndBound`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Settings {
    /// Minimum order enforcement
    pub policy: MinimumOrderPolicy,
    /// Read the clock once every this many search nodes. The cancellation
    /// token is checked at every node regardless.
    pub check_interval: u64,
    /// Search nodes the savings baseline may spend looking for the most
    /// expensive split when no single supplier covers the list
    pub baseline_node_limit: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            policy: MinimumOrderPolicy::default(),
            check_interval: 64,
            baseline_node_limit: 50_000,
        }
    }
}

/// An exact branch-and-bound optimizer.
///
/// Each line of the shopping list is assigned to one supplier. Lines are
/// decided in order of how few suppliers can take them, branches are tried
/// cheapest first, and a partial assignment is abandoned as soon as its cost
/// plus the cheapest possible completion can no longer beat the incumbent, or
/// as soon as an opened supplier can no longer reach its minimum order.
///
/// Ties in landed cost are broken by fewer suppliers, then by the
/// lexicographically smallest assignment of supplier ids in list order, so
/// the answer never depends on the order of the offers.
#[derive(Debug, Clone, Default)]
pub struct BranchAndBound {
    settings: Settings,
}

impl BranchAndBound {
    /// Create an optimizer with the given settings
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// The settings in use
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

impl Optimizer for BranchAndBound {
    type Error = OptimizeError;

    fn optimize(
        &self,
        line_items: &[LineItem],
        snapshot: &CatalogSnapshot,
        rates: &ExchangeRates,
        reporting: CurrencyCode,
        deadline: &Deadline,
    ) -> Result<Allocation, Self::Error> {
        let span = span!(
            Level::INFO,
            "optimize",
            lines = line_items.len(),
            offers = snapshot.offers.len(),
            %reporting
        );
        let _enter = span.enter();

        let catalog = normalize(snapshot, rates, reporting)?;
        let problem = Problem::build(line_items, snapshot, &catalog, self.settings.policy)?;

        event!(
            Level::DEBUG,
            suppliers = problem.suppliers.len(),
            choices = problem.items.iter().map(|item| item.options.len()).sum::<usize>(),
            "eligibility graph built"
        );

        let mut search = Search::new(
            &problem,
            Direction::Minimize,
            deadline,
            self.settings.check_interval,
        );
        for assignment in problem.single_supplier_assignments() {
            search.seed(assignment);
        }
        search.seed(problem.greedy_assignment());

        let outcome = search.run();
        let status = if outcome.exhausted {
            SearchStatus::Optimal
        } else {
            SearchStatus::TimeBounded
        };

        let best = match outcome.best {
            Some(best) => best,
            None if outcome.exhausted => {
                let conflict = problem.conflict();
                event!(Level::WARN, error = %conflict, "no feasible allocation");
                return Err(conflict.into());
            }
            None => {
                event!(Level::WARN, nodes = outcome.stats.nodes, "deadline expired without a solution");
                return Err(OptimizeError::DeadlineExpired);
            }
        };

        if status == SearchStatus::TimeBounded {
            event!(
                Level::WARN,
                nodes = outcome.stats.nodes,
                total = %best.cost,
                "deadline expired, returning best allocation so far"
            );
        }

        let savings = explain::savings(&problem, &best, deadline, &self.settings);
        let allocation = explain::allocation(
            &problem,
            &best,
            reporting,
            status,
            savings,
            snapshot.warnings.clone(),
            outcome.stats,
        );

        event!(
            Level::INFO,
            total = %allocation.total,
            suppliers = allocation.suppliers.len(),
            savings = %allocation.savings.amount,
            status = ?allocation.status,
            "allocation complete"
        );
        Ok(allocation)
    }
}
