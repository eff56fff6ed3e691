use procure_core::{
    models::{
        Baseline, CancelToken, CurrencyCode, DataQualityWarning, Deadline, ExchangeRates,
        OfferRecord, SearchStatus,
    },
    ports::Optimizer,
};
use procure_solver::{
    AmountOutOfRange, BranchAndBound, InfeasibleOrder, InfeasibleReason, MinimumOrderPolicy,
    OptimizeError, Settings, UnfulfillableLine, UnsupportedCurrency,
};
use rstest::*;
use rstest_reuse::{self, *};
use rust_decimal_macros::dec;
use std::time::{Duration, Instant};
use time::macros::datetime;

mod all_policies;
use all_policies::all_policies;

mod common;
use common::{CatalogBuilder, chosen, line, optimize, optimizer};

#[fixture]
fn bundle_or_split() -> CatalogBuilder {
    // x is cheaper on both lines but only accepts orders of 50 or more
    CatalogBuilder::new()
        .supplier("x", dec!(50), dec!(5))
        .supplier("y", dec!(0), dec!(5))
        .offer("x", "cpu", dec!(30))
        .offer("x", "ram", dec!(30))
        .offer("y", "cpu", dec!(40))
        .offer("y", "ram", dec!(40))
}

#[fixture]
fn needs_backtracking() -> CatalogBuilder {
    // the cheapest supplier per line leaves x short of its minimum
    CatalogBuilder::new()
        .supplier("x", dec!(35), dec!(0))
        .supplier("y", dec!(25), dec!(0))
        .supplier("z", dec!(0), dec!(0))
        .offer("x", "case", dec!(10))
        .offer("x", "fan", dec!(30))
        .offer("y", "fan", dec!(20))
        .offer("y", "psu", dec!(10))
        .offer("z", "psu", dec!(15))
}

#[fixture]
fn no_single_supplier() -> CatalogBuilder {
    // a and b each miss a line; gpu is dearer at a
    CatalogBuilder::new()
        .supplier("a", dec!(0), dec!(5))
        .supplier("b", dec!(0), dec!(5))
        .offer("a", "cpu", dec!(10))
        .offer("b", "ram", dec!(10))
        .offer("a", "gpu", dec!(50))
        .offer("b", "gpu", dec!(40))
}

#[fixture]
fn contested_line() -> CatalogBuilder {
    // x and y each need the fan to reach their minimum
    CatalogBuilder::new()
        .supplier("x", dec!(30), dec!(0))
        .supplier("y", dec!(30), dec!(0))
        .offer("x", "case", dec!(10))
        .offer("x", "fan", dec!(25))
        .offer("y", "fan", dec!(25))
        .offer("y", "psu", dec!(10))
}

#[apply(all_policies)]
fn picks_the_supplier_whose_minimum_is_met(
    policy: MinimumOrderPolicy,
    #[values(dec!(120), dec!(90))] other_price: rust_decimal::Decimal,
) {
    let catalog = CatalogBuilder::new()
        .supplier("a", dec!(50), dec!(0))
        .supplier("b", dec!(200), dec!(0))
        .offer("a", "gpu", dec!(100))
        .offer("b", "gpu", other_price);

    let allocation = optimize(policy, &catalog, &[line("gpu", 1)]).unwrap();

    assert_eq!(chosen(&allocation), ["a"]);
    assert_eq!(allocation.total, dec!(100));
    assert_eq!(allocation.status, SearchStatus::Optimal);
}

#[apply(all_policies)]
fn bundles_to_clear_a_minimum(policy: MinimumOrderPolicy, bundle_or_split: CatalogBuilder) {
    let allocation = optimize(
        policy,
        &bundle_or_split,
        &[line("cpu", 1), line("ram", 1)],
    )
    .unwrap();

    assert_eq!(chosen(&allocation), ["x", "x"]);
    assert_eq!(allocation.total, dec!(65));

    let [charge] = allocation.suppliers.as_slice() else {
        panic!("expected a single supplier, got {:?}", allocation.suppliers);
    };
    assert_eq!(charge.supplier_id.as_str(), "x");
    assert_eq!(charge.lines, [0, 1]);
    assert_eq!(charge.subtotal, dec!(60));
    assert_eq!(charge.shipping, dec!(5));
    assert_eq!(charge.total, dec!(65));

    // shipping is charged once per supplier, not per line
    assert!(allocation.lines.iter().all(|line| line.shipping_charge == dec!(5)));
}

#[apply(all_policies)]
fn splits_when_price_gaps_outweigh_shipping(policy: MinimumOrderPolicy) {
    let catalog = CatalogBuilder::new()
        .supplier("x", dec!(0), dec!(5))
        .supplier("y", dec!(0), dec!(5))
        .offer("x", "cpu", dec!(10))
        .offer("x", "ram", dec!(50))
        .offer("y", "cpu", dec!(50))
        .offer("y", "ram", dec!(10));

    let allocation = optimize(policy, &catalog, &[line("cpu", 1), line("ram", 1)]).unwrap();

    assert_eq!(chosen(&allocation), ["x", "y"]);
    assert_eq!(allocation.total, dec!(30));
    assert_eq!(
        allocation.savings.baseline,
        Baseline::SingleSupplier {
            supplier_id: "x".into(),
            cost: dec!(65),
        }
    );
    assert_eq!(allocation.savings.amount, dec!(35));
}

#[apply(all_policies)]
fn equal_costs_prefer_fewer_suppliers_then_smaller_ids(policy: MinimumOrderPolicy) {
    let catalog = CatalogBuilder::new()
        .supplier("y", dec!(0), dec!(10))
        .supplier("x", dec!(0), dec!(10))
        .offer("y", "cpu", dec!(12))
        .offer("y", "ram", dec!(10))
        .offer("x", "cpu", dec!(10))
        .offer("x", "ram", dec!(12));

    let allocation = optimize(policy, &catalog, &[line("cpu", 1), line("ram", 1)]).unwrap();

    assert_eq!(chosen(&allocation), ["x", "x"]);
    assert_eq!(allocation.total, dec!(32));
}

#[apply(all_policies)]
fn line_without_offers_is_infeasible(policy: MinimumOrderPolicy) {
    let catalog = CatalogBuilder::new()
        .supplier("x", dec!(0), dec!(0))
        .offer("x", "cpu", dec!(10))
        .component("cooler");
    let items = [line("cpu", 1), line("cooler", 1)];

    let snapshot = catalog.snapshot(&items);
    assert_eq!(
        snapshot.warnings,
        [DataQualityWarning::NoEligibleOffers {
            component: "cooler".into()
        }]
    );

    assert_eq!(
        optimize(policy, &catalog, &items),
        Err(OptimizeError::Infeasible(InfeasibleOrder {
            lines: vec![UnfulfillableLine {
                line: 1,
                component_id: "cooler".into(),
                reason: InfeasibleReason::NoOffers,
            }]
        }))
    );
}

#[apply(all_policies)]
fn component_missing_from_snapshot_is_reported(policy: MinimumOrderPolicy) {
    let catalog = CatalogBuilder::new()
        .supplier("x", dec!(0), dec!(0))
        .offer("x", "cpu", dec!(10));
    let snapshot = catalog.snapshot(&[line("cpu", 1)]);

    let result = optimizer(policy).optimize(
        &[line("cpu", 1), line("ssd", 1)],
        &snapshot,
        &ExchangeRates::default(),
        CurrencyCode::Eur,
        &Deadline::none(),
    );

    assert_eq!(result, Err(OptimizeError::UnknownComponent("ssd".into())));
}

#[rstest]
fn unreachable_minimum_is_infeasible_under_strict_policy() {
    let catalog = CatalogBuilder::new()
        .supplier("x", dec!(100), dec!(5))
        .offer("x", "cpu", dec!(10));

    assert_eq!(
        optimize(MinimumOrderPolicy::Strict, &catalog, &[line("cpu", 1)]),
        Err(OptimizeError::Infeasible(InfeasibleOrder {
            lines: vec![UnfulfillableLine {
                line: 0,
                component_id: "cpu".into(),
                reason: InfeasibleReason::MinimumOrderUnreachable,
            }]
        }))
    );
}

#[rstest]
fn sole_source_may_ship_below_its_minimum() {
    let catalog = CatalogBuilder::new()
        .supplier("x", dec!(100), dec!(5))
        .offer("x", "cpu", dec!(10));

    let allocation =
        optimize(MinimumOrderPolicy::SoleSourceExempt, &catalog, &[line("cpu", 1)]).unwrap();

    assert_eq!(chosen(&allocation), ["x"]);
    assert_eq!(allocation.total, dec!(15));
}

#[rstest]
fn strict_search_backtracks_past_the_greedy_split(needs_backtracking: CatalogBuilder) {
    let items = [line("case", 1), line("fan", 1), line("psu", 1)];
    let allocation = optimize(MinimumOrderPolicy::Strict, &needs_backtracking, &items).unwrap();

    assert_eq!(chosen(&allocation), ["x", "x", "z"]);
    assert_eq!(allocation.total, dec!(55));

    // nobody stocks all three, and this is the only feasible split
    assert_eq!(
        allocation.savings.baseline,
        Baseline::MostExpensiveSplit {
            cost: dec!(55),
            exact: true,
        }
    );
    assert_eq!(allocation.savings.amount, dec!(0));
}

#[rstest]
fn exemption_lets_a_sole_source_ship_below_minimum(needs_backtracking: CatalogBuilder) {
    let items = [line("case", 1), line("fan", 1), line("psu", 1)];
    let allocation = optimize(
        MinimumOrderPolicy::SoleSourceExempt,
        &needs_backtracking,
        &items,
    )
    .unwrap();

    assert_eq!(chosen(&allocation), ["x", "y", "y"]);
    assert_eq!(allocation.total, dec!(40));
    assert_eq!(
        allocation.savings.baseline,
        Baseline::MostExpensiveSplit {
            cost: dec!(55),
            exact: true,
        }
    );
    assert_eq!(allocation.savings.amount, dec!(15));
}

#[rstest]
fn conflicting_minimums_name_the_constrained_lines(contested_line: CatalogBuilder) {
    let items = [line("case", 1), line("fan", 1), line("psu", 1)];
    let Err(OptimizeError::Infeasible(InfeasibleOrder { lines })) =
        optimize(MinimumOrderPolicy::Strict, &contested_line, &items)
    else {
        panic!("expected an infeasible order");
    };

    assert_eq!(
        lines.iter().map(|line| line.line).collect::<Vec<_>>(),
        [0, 1, 2]
    );
    assert!(
        lines
            .iter()
            .all(|line| line.reason == InfeasibleReason::Conflict)
    );
}

#[rstest]
fn exemption_resolves_conflicting_minimums(contested_line: CatalogBuilder) {
    let items = [line("case", 1), line("fan", 1), line("psu", 1)];
    let allocation =
        optimize(MinimumOrderPolicy::SoleSourceExempt, &contested_line, &items).unwrap();

    // [x, y, y] costs the same; the smaller assignment wins
    assert_eq!(chosen(&allocation), ["x", "x", "y"]);
    assert_eq!(allocation.total, dec!(45));
}

#[rstest]
fn expired_deadline_without_an_incumbent(needs_backtracking: CatalogBuilder) {
    let items = [line("case", 1), line("fan", 1), line("psu", 1)];
    let snapshot = needs_backtracking.snapshot(&items);

    let result = optimizer(MinimumOrderPolicy::Strict).optimize(
        &items,
        &snapshot,
        &ExchangeRates::default(),
        CurrencyCode::Eur,
        &Deadline::at(Instant::now()),
    );

    assert_eq!(result, Err(OptimizeError::DeadlineExpired));
}

#[apply(all_policies)]
fn cancelled_search_returns_its_incumbent(
    policy: MinimumOrderPolicy,
    bundle_or_split: CatalogBuilder,
) {
    let items = [line("cpu", 1), line("ram", 1)];
    let snapshot = bundle_or_split.snapshot(&items);

    let token = CancelToken::new();
    token.cancel();
    let allocation = optimizer(policy)
        .optimize(
            &items,
            &snapshot,
            &ExchangeRates::default(),
            CurrencyCode::Eur,
            &Deadline::none().with_token(token),
        )
        .unwrap();

    assert_eq!(allocation.status, SearchStatus::TimeBounded);
    assert_eq!(chosen(&allocation), ["x", "x"]);
    assert_eq!(allocation.total, dec!(65));
    assert_eq!(allocation.stats.nodes, 1);
}

#[apply(all_policies)]
fn empty_list_costs_nothing(policy: MinimumOrderPolicy) {
    let allocation = optimize(policy, &CatalogBuilder::new(), &[]).unwrap();

    assert_eq!(allocation.total, dec!(0));
    assert!(allocation.lines.is_empty());
    assert!(allocation.suppliers.is_empty());
    assert_eq!(allocation.status, SearchStatus::Optimal);
    assert_eq!(allocation.savings.amount, dec!(0));
}

#[apply(all_policies)]
fn repeated_component_is_allocated_per_line(policy: MinimumOrderPolicy) {
    let catalog = CatalogBuilder::new()
        .supplier("x", dec!(0), dec!(5))
        .offer("x", "fan", dec!(10));

    let allocation = optimize(policy, &catalog, &[line("fan", 2), line("fan", 1)]).unwrap();

    assert_eq!(
        allocation
            .lines
            .iter()
            .map(|line| line.line_total)
            .collect::<Vec<_>>(),
        [dec!(20), dec!(10)]
    );
    assert_eq!(allocation.suppliers[0].lines, [0, 1]);
    assert_eq!(allocation.total, dec!(35));
}

#[apply(all_policies)]
fn catalog_warnings_travel_with_the_allocation(policy: MinimumOrderPolicy) {
    let catalog = CatalogBuilder::new()
        .supplier("x", dec!(0), dec!(0))
        .record(OfferRecord {
            supplier_id: "x".into(),
            component_id: "ssd".into(),
            price: dec!(10),
            available: true,
            active: true,
            updated_at: datetime!(2026-01-01 00:00 UTC),
        })
        .offer("x", "ssd", dec!(12));

    let allocation = optimize(policy, &catalog, &[line("ssd", 1)]).unwrap();

    assert_eq!(allocation.lines[0].unit_price, dec!(12));
    assert_eq!(
        allocation.warnings,
        [DataQualityWarning::DuplicateOffer {
            supplier: "x".into(),
            component: "ssd".into(),
        }]
    );
}

#[rstest]
#[case::foreign_is_dearer(dec!(0.9), "eu")]
#[case::foreign_is_cheaper(dec!(0.8), "us")]
fn compares_prices_in_the_reporting_currency(
    #[case] usd_rate: rust_decimal::Decimal,
    #[case] expected: &str,
) {
    // us: 100 USD + 10 USD shipping; eu: 95 EUR, free shipping
    let catalog = CatalogBuilder::new()
        .supplier_in("us", CurrencyCode::Usd, dec!(0), dec!(10))
        .supplier("eu", dec!(0), dec!(0))
        .offer("us", "gpu", dec!(100))
        .offer("eu", "gpu", dec!(95));
    let items = [line("gpu", 1)];
    let snapshot = catalog.snapshot(&items);
    let rates = ExchangeRates::new([(CurrencyCode::Usd, usd_rate)]).unwrap();

    let allocation = optimizer(MinimumOrderPolicy::Strict)
        .optimize(
            &items,
            &snapshot,
            &rates,
            CurrencyCode::Eur,
            &Deadline::none(),
        )
        .unwrap();

    assert_eq!(chosen(&allocation), [expected]);
    assert_eq!(allocation.reporting_currency, CurrencyCode::Eur);
}

#[rstest]
fn missing_rate_fails_instead_of_defaulting() {
    let catalog = CatalogBuilder::new()
        .supplier_in("uk", CurrencyCode::Gbp, dec!(0), dec!(0))
        .offer("uk", "gpu", dec!(100));
    let items = [line("gpu", 1)];
    let snapshot = catalog.snapshot(&items);

    let result = optimizer(MinimumOrderPolicy::Strict).optimize(
        &items,
        &snapshot,
        &ExchangeRates::default(),
        CurrencyCode::Eur,
        &Deadline::none(),
    );

    assert_eq!(
        result,
        Err(OptimizeError::UnsupportedCurrency(UnsupportedCurrency {
            currency: CurrencyCode::Gbp,
            reporting: CurrencyCode::Eur,
        }))
    );
}

#[apply(all_policies)]
fn cancelled_baseline_search_is_inexact(
    policy: MinimumOrderPolicy,
    no_single_supplier: CatalogBuilder,
) {
    let items = [line("cpu", 1), line("ram", 1), line("gpu", 1)];
    let snapshot = no_single_supplier.snapshot(&items);

    let token = CancelToken::new();
    token.cancel();
    let allocation = optimizer(policy)
        .optimize(
            &items,
            &snapshot,
            &ExchangeRates::default(),
            CurrencyCode::Eur,
            &Deadline::none().with_token(token),
        )
        .unwrap();

    assert_eq!(allocation.status, SearchStatus::TimeBounded);
    assert_eq!(chosen(&allocation), ["a", "b", "b"]);
    assert_eq!(allocation.total, dec!(70));
    // only the seeds were evaluated: the dearest one sends gpu to a
    assert_eq!(
        allocation.savings.baseline,
        Baseline::MostExpensiveSplit {
            cost: dec!(80),
            exact: false,
        }
    );
    assert!(allocation.savings.amount >= dec!(0));
    assert_eq!(allocation.savings.amount, dec!(10));
}

#[rstest]
#[case::unlimited(u64::MAX, true)]
#[case::exhausted_budget(0, false)]
fn baseline_node_limit_marks_the_split_inexact(
    #[case] baseline_node_limit: u64,
    #[case] exact: bool,
    no_single_supplier: CatalogBuilder,
) {
    let items = [line("cpu", 1), line("ram", 1), line("gpu", 1)];
    let allocation = BranchAndBound::new(Settings {
        baseline_node_limit,
        ..Default::default()
    })
    .optimize(
        &items,
        &no_single_supplier.snapshot(&items),
        &ExchangeRates::default(),
        CurrencyCode::Eur,
        &Deadline::none(),
    )
    .unwrap();

    assert_eq!(allocation.status, SearchStatus::Optimal);
    assert_eq!(allocation.total, dec!(70));
    assert_eq!(
        allocation.savings.baseline,
        Baseline::MostExpensiveSplit {
            cost: dec!(80),
            exact,
        }
    );
}

#[apply(all_policies)]
fn long_list_without_a_covering_supplier_finishes_promptly(policy: MinimumOrderPolicy) {
    // every line is stocked by four of six suppliers, so none covers the list
    let mut catalog = CatalogBuilder::new();
    for supplier in 0..6u32 {
        catalog = catalog.supplier(
            &format!("s{supplier}"),
            rust_decimal::Decimal::from(10 * supplier),
            rust_decimal::Decimal::from(5 + supplier),
        );
    }
    let mut items = Vec::new();
    for component in 0..14u32 {
        for k in 0..4u32 {
            let supplier = (component + k) % 6;
            let price = 30 + (component * 7 + supplier * 3) % 20;
            catalog = catalog.offer(
                &format!("s{supplier}"),
                &format!("c{component}"),
                rust_decimal::Decimal::from(price),
            );
        }
        items.push(line(&format!("c{component}"), 1));
    }

    let started = Instant::now();
    let allocation = optimize(policy, &catalog, &items).unwrap();
    assert!(started.elapsed() < Duration::from_secs(10));

    assert_eq!(allocation.status, SearchStatus::Optimal);
    let Baseline::MostExpensiveSplit { cost, .. } = allocation.savings.baseline else {
        panic!("no supplier stocks every line");
    };
    assert!(cost >= allocation.total);
    assert_eq!(allocation.savings.amount, cost - allocation.total);
}

#[rstest]
#[case::line_total(dec!(100000000000000000000), 1_000_000_000, 1)]
#[case::landed_cost(dec!(50000000000000000000000000000), 1, 2)]
fn amounts_beyond_decimal_range_are_an_error(
    #[case] price: rust_decimal::Decimal,
    #[case] quantity: u32,
    #[case] lines: usize,
) {
    let catalog = CatalogBuilder::new()
        .supplier("a", dec!(0), dec!(0))
        .offer("a", "x", price)
        .offer("a", "y", price);
    let items = [line("x", quantity), line("y", quantity)];

    let result = optimize(MinimumOrderPolicy::Strict, &catalog, &items[..lines]);

    assert_eq!(result, Err(OptimizeError::OutOfRange(AmountOutOfRange)));
}
