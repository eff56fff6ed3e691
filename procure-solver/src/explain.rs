use crate::{
    Settings,
    problem::Problem,
    search::{Candidate, Direction, Search},
};
use procure_core::models::{
    Allocation, AllocationLine, Baseline, CurrencyCode, DataQualityWarning, Deadline, Money,
    Savings, SearchStats, SearchStatus, SupplierCharge,
};
use std::collections::BTreeMap;
use tracing::{Level, event};

/// Measure `best` against the cheapest single supplier able to take the whole
/// list, or failing that against the most expensive feasible split.
pub(crate) fn savings(
    problem: &Problem,
    best: &Candidate,
    deadline: &Deadline,
    settings: &Settings,
) -> Savings {
    let baseline = single_supplier(problem)
        .unwrap_or_else(|| most_expensive_split(problem, best, deadline, settings));
    Savings {
        amount: baseline.cost() - best.cost,
        baseline,
    }
}

fn single_supplier(problem: &Problem) -> Option<Baseline> {
    problem
        .single_supplier_assignments()
        .into_iter()
        .filter_map(|assignment| {
            let supplier = *assignment.first()?;
            let (cost, _) = problem.evaluate(&assignment)?;
            Some((cost, supplier))
        })
        .min()
        .map(|(cost, supplier)| Baseline::SingleSupplier {
            supplier_id: problem.suppliers[supplier].id.clone(),
            cost,
        })
}

/// Runs under both the deadline and `baseline_node_limit`; a baseline cut
/// short by either is inexact.
fn most_expensive_split(
    problem: &Problem,
    best: &Candidate,
    deadline: &Deadline,
    settings: &Settings,
) -> Baseline {
    let mut search = Search::new(problem, Direction::Maximize, deadline, settings.check_interval)
        .with_node_limit(settings.baseline_node_limit);
    // The allocation itself is feasible, so the search always has an incumbent.
    search.seed(best.assignment.clone());
    search.seed(problem.dearest_assignment());
    let outcome = search.run();

    let cost = outcome
        .best
        .map(|candidate| candidate.cost)
        .unwrap_or(best.cost);
    if !outcome.exhausted {
        event!(
            Level::DEBUG,
            %cost,
            nodes = outcome.stats.nodes,
            "baseline search cut short"
        );
    }
    Baseline::MostExpensiveSplit {
        cost,
        exact: outcome.exhausted,
    }
}

/// Render the winning assignment.
pub(crate) fn allocation(
    problem: &Problem,
    best: &Candidate,
    reporting: CurrencyCode,
    status: SearchStatus,
    savings: Savings,
    warnings: Vec<DataQualityWarning>,
    stats: SearchStats,
) -> Allocation {
    let mut charges = BTreeMap::<usize, (Vec<usize>, Money)>::new();
    let mut lines = Vec::with_capacity(problem.items.len());

    // The assignment was accepted by `Problem::evaluate`, so every line has a
    // matching choice.
    for (item, &supplier) in problem.items.iter().zip(best.assignment.iter()) {
        let Some(choice) = item.choice(supplier) else {
            continue;
        };
        let node = &problem.suppliers[supplier];

        let (positions, subtotal) = charges.entry(supplier).or_default();
        positions.push(item.line);
        *subtotal += choice.cost;

        lines.push(AllocationLine {
            line: item.line,
            component_id: item.component_id.clone(),
            supplier_id: node.id.clone(),
            quantity: item.quantity,
            unit_price: choice.unit_price,
            line_total: choice.cost,
            shipping_charge: node.terms.shipping,
        });
    }

    // Supplier indices follow supplier ids, so the map is already in id order.
    let suppliers = charges
        .into_iter()
        .map(|(supplier, (lines, subtotal))| {
            let node = &problem.suppliers[supplier];
            SupplierCharge {
                supplier_id: node.id.clone(),
                name: node.name.clone(),
                lines,
                min_order: node.terms.min_order,
                subtotal,
                shipping: node.terms.shipping,
                total: subtotal + node.terms.shipping,
            }
        })
        .collect::<Vec<_>>();

    Allocation {
        reporting_currency: reporting,
        status,
        total: best.cost,
        lines,
        suppliers,
        savings,
        warnings,
        stats,
    }
}
