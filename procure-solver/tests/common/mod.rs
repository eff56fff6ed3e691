#![allow(dead_code)]
use procure_core::{
    models::{
        Allocation, BuildId, CatalogConfig, CatalogSnapshot, Component, CurrencyCode, Deadline,
        ExchangeRates, LineItem, Money, OfferRecord, ShoppingList, Supplier, SupplierTerms,
    },
    ports::Optimizer,
};
use procure_solver::{BranchAndBound, MinimumOrderPolicy, OptimizeError, Settings};
use time::{OffsetDateTime, macros::datetime};

pub const NOW: OffsetDateTime = datetime!(2026-03-01 12:00 UTC);

/// Builds small catalogs for tests: every component offered by anyone exists,
/// and suppliers default to EUR.
#[derive(Debug, Default, Clone)]
pub struct CatalogBuilder {
    components: Vec<Component>,
    suppliers: Vec<Supplier>,
    offers: Vec<OfferRecord>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn component(mut self, id: &str) -> Self {
        if !self.components.iter().any(|component| component.id.as_str() == id) {
            self.components.push(Component {
                id: id.into(),
                name: id.to_uppercase(),
                category: String::new(),
                brand: String::new(),
                specification: String::new(),
            });
        }
        self
    }

    pub fn supplier(self, id: &str, min_order: Money, shipping: Money) -> Self {
        self.supplier_in(id, CurrencyCode::Eur, min_order, shipping)
    }

    pub fn supplier_in(
        mut self,
        id: &str,
        currency: CurrencyCode,
        min_order: Money,
        shipping: Money,
    ) -> Self {
        self.suppliers.push(Supplier {
            id: id.into(),
            name: format!("Supplier {id}"),
            terms: SupplierTerms::new(currency, min_order, shipping).unwrap(),
        });
        self
    }

    pub fn offer(mut self, supplier: &str, component: &str, price: Money) -> Self {
        self = self.component(component);
        self.offers.push(OfferRecord {
            supplier_id: supplier.into(),
            component_id: component.into(),
            price,
            available: true,
            active: true,
            updated_at: NOW,
        });
        self
    }

    pub fn record(mut self, record: OfferRecord) -> Self {
        self = self.component(record.component_id.as_str());
        self.offers.push(record);
        self
    }

    pub fn snapshot(&self, items: &[LineItem]) -> CatalogSnapshot {
        let list = ShoppingList {
            build_id: BuildId::from("test"),
            items: items.to_vec(),
        };
        CatalogSnapshot::assemble(
            &list.component_ids(),
            self.components.iter().cloned(),
            self.suppliers.iter().cloned(),
            self.offers.iter().cloned(),
            NOW,
            &CatalogConfig::default(),
        )
        .unwrap()
    }
}

pub fn line(component: &str, quantity: u32) -> LineItem {
    LineItem::new(component, quantity).unwrap()
}

pub fn optimizer(policy: MinimumOrderPolicy) -> BranchAndBound {
    BranchAndBound::new(Settings {
        policy,
        ..Default::default()
    })
}

/// Optimize in EUR without a deadline
pub fn optimize(
    policy: MinimumOrderPolicy,
    catalog: &CatalogBuilder,
    items: &[LineItem],
) -> Result<Allocation, OptimizeError> {
    let snapshot = catalog.snapshot(items);
    optimizer(policy).optimize(
        items,
        &snapshot,
        &ExchangeRates::default(),
        CurrencyCode::Eur,
        &Deadline::none(),
    )
}

/// The supplier chosen for each line, in list order
pub fn chosen(allocation: &Allocation) -> Vec<&str> {
    allocation
        .lines
        .iter()
        .map(|line| line.supplier_id.as_str())
        .collect()
}
