use crate::{
    AmountOutOfRange, Bundle, InfeasibleOrder, InfeasibleReason, Map, MinimumOrderPolicy, NormalizedCatalog,
    NormalizedOffer, NormalizedTerms, OptimizeError, UnfulfillableLine, evaluate_bundle,
};
use procure_core::models::{CatalogSnapshot, ComponentId, LineItem, Money, SupplierId};

/// One edge of the eligibility graph: a supplier able to fulfill a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Choice {
    /// Index into `Problem::suppliers`
    pub supplier: usize,
    /// Unit price in the reporting currency
    pub unit_price: Money,
    /// `unit_price * quantity`
    pub cost: Money,
}

/// A line of the shopping list and the suppliers that may fulfill it.
#[derive(Debug, Clone)]
pub(crate) struct Item {
    pub line: usize,
    pub component_id: ComponentId,
    pub quantity: u32,
    /// Sorted by supplier index, never empty once the problem is built
    pub options: Vec<Choice>,
}

impl Item {
    pub fn choice(&self, supplier: usize) -> Option<&Choice> {
        self.options
            .binary_search_by_key(&supplier, |choice| choice.supplier)
            .ok()
            .map(|position| &self.options[position])
    }

    /// A line with only one possible supplier
    pub fn is_sole_sourced(&self) -> bool {
        self.options.len() == 1
    }

    pub fn cheapest(&self) -> Money {
        self.options
            .iter()
            .map(|choice| choice.cost)
            .min()
            .unwrap_or_default()
    }

    pub fn dearest(&self) -> Money {
        self.options
            .iter()
            .map(|choice| choice.cost)
            .max()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SupplierNode {
    pub id: SupplierId,
    pub name: String,
    pub terms: NormalizedTerms,
}

/// The bipartite eligibility graph between lines and suppliers, in the
/// reporting currency.
///
/// Suppliers are indexed in ascending id order, so comparing two assignments
/// by supplier index is the same as comparing them by supplier id.
#[derive(Debug, Clone)]
pub(crate) struct Problem {
    pub items: Vec<Item>,
    pub suppliers: Vec<SupplierNode>,
    pub policy: MinimumOrderPolicy,
}

impl Problem {
    pub fn build(
        line_items: &[LineItem],
        snapshot: &CatalogSnapshot,
        catalog: &NormalizedCatalog,
        policy: MinimumOrderPolicy,
    ) -> Result<Self, OptimizeError> {
        let mut suppliers = catalog
            .suppliers
            .values()
            .map(|supplier| SupplierNode {
                id: supplier.id.clone(),
                name: supplier.name.clone(),
                terms: supplier.terms,
            })
            .collect::<Vec<_>>();
        suppliers.sort_by(|a, b| a.id.cmp(&b.id));

        let index = suppliers
            .iter()
            .enumerate()
            .map(|(position, supplier)| (supplier.id.clone(), position))
            .collect::<Map<_, _>>();

        let mut by_component = Map::<&ComponentId, Vec<&NormalizedOffer>>::default();
        for offer in catalog.offers.iter() {
            by_component
                .entry(&offer.component_id)
                .or_default()
                .push(offer);
        }

        let mut items = Vec::with_capacity(line_items.len());
        for (line, item) in line_items.iter().enumerate() {
            let component_id = item.component_id();
            if !snapshot.components.contains_key(component_id) {
                return Err(OptimizeError::UnknownComponent(component_id.clone()));
            }

            let quantity = Money::from(item.quantity());
            let mut options = Vec::new();
            for offer in by_component.get(component_id).into_iter().flatten() {
                let Some(&supplier) = index.get(&offer.supplier_id) else {
                    continue;
                };
                options.push(Choice {
                    supplier,
                    unit_price: offer.unit_price,
                    cost: offer
                        .unit_price
                        .checked_mul(quantity)
                        .ok_or(AmountOutOfRange)?,
                });
            }
            options.sort_by_key(|choice| choice.supplier);
            options.dedup_by_key(|choice| choice.supplier);

            items.push(Item {
                line,
                component_id: component_id.clone(),
                quantity: item.quantity(),
                options,
            });
        }

        let offered = items
            .iter()
            .map(|item| !item.options.is_empty())
            .collect::<Vec<_>>();

        // Every total the search forms is bounded by this one, so once it
        // fits, plain arithmetic on costs and shipping cannot overflow.
        items
            .iter()
            .flat_map(|item| item.options.iter().map(|choice| choice.cost))
            .chain(suppliers.iter().map(|supplier| supplier.terms.shipping))
            .try_fold(Money::ZERO, |sum, amount| sum.checked_add(amount))
            .ok_or(AmountOutOfRange)?;

        // A supplier that cannot reach its minimum even with every line it
        // stocks can never be part of a feasible allocation.
        let mut potential = vec![Money::ZERO; suppliers.len()];
        for choice in items.iter().flat_map(|item| item.options.iter()) {
            potential[choice.supplier] += choice.cost;
        }
        let unreachable = suppliers
            .iter()
            .zip(potential.iter())
            .map(|(supplier, potential)| *potential < supplier.terms.min_order)
            .collect::<Vec<_>>();

        for item in items.iter_mut() {
            let exempt = policy == MinimumOrderPolicy::SoleSourceExempt && item.is_sole_sourced();
            if !exempt {
                item.options.retain(|choice| !unreachable[choice.supplier]);
            }
        }

        let lines = items
            .iter()
            .filter(|item| item.options.is_empty())
            .map(|item| UnfulfillableLine {
                line: item.line,
                component_id: item.component_id.clone(),
                reason: if offered[item.line] {
                    InfeasibleReason::MinimumOrderUnreachable
                } else {
                    InfeasibleReason::NoOffers
                },
            })
            .collect::<Vec<_>>();
        if !lines.is_empty() {
            return Err(InfeasibleOrder { lines }.into());
        }

        Ok(Self {
            items,
            suppliers,
            policy,
        })
    }

    /// May a bundle below its supplier's minimum still be ordered?
    pub fn exempts(&self, flexible_lines: usize) -> bool {
        self.policy == MinimumOrderPolicy::SoleSourceExempt && flexible_lines == 0
    }

    /// Landed cost and number of suppliers of a complete assignment, or
    /// `None` if some supplier's bundle is not eligible.
    ///
    /// `assignment[i]` is the supplier index chosen for `items[i]`.
    pub fn evaluate(&self, assignment: &[usize]) -> Option<(Money, usize)> {
        let mut bundles = Map::<usize, (Vec<(Money, u32)>, usize)>::default();
        for (item, &supplier) in self.items.iter().zip(assignment.iter()) {
            let choice = item.choice(supplier)?;
            let (lines, flexible) = bundles.entry(supplier).or_default();
            lines.push((choice.unit_price, item.quantity));
            if !item.is_sole_sourced() {
                *flexible += 1;
            }
        }

        let mut cost = Money::ZERO;
        for (&supplier, (lines, flexible)) in bundles.iter() {
            let terms = &self.suppliers[supplier].terms;
            // Range-checked when the problem was built.
            match evaluate_bundle(terms, lines.iter().copied()).ok()? {
                Bundle::Eligible { total, .. } => cost += total,
                Bundle::Ineligible { subtotal, .. } if self.exempts(*flexible) => {
                    cost += subtotal + terms.shipping
                }
                Bundle::Ineligible { .. } => return None,
            }
        }

        Some((cost, bundles.len()))
    }

    /// Every supplier able to fulfill the whole list on its own
    pub fn single_supplier_assignments(&self) -> Vec<Vec<usize>> {
        if self.items.is_empty() {
            return Vec::new();
        }
        (0..self.suppliers.len())
            .filter(|&supplier| {
                self.items
                    .iter()
                    .all(|item| item.choice(supplier).is_some())
            })
            .map(|supplier| vec![supplier; self.items.len()])
            .collect()
    }

    /// The cheapest supplier for each line, ignoring shipping and minimums
    pub fn greedy_assignment(&self) -> Vec<usize> {
        self.items
            .iter()
            .map(|item| {
                item.options
                    .iter()
                    .min_by_key(|choice| (choice.cost, choice.supplier))
                    .map(|choice| choice.supplier)
                    .unwrap_or_default()
            })
            .collect()
    }

    /// The dearest supplier for each line, ties to the lower supplier index
    pub fn dearest_assignment(&self) -> Vec<usize> {
        self.items
            .iter()
            .map(|item| {
                item.options
                    .iter()
                    .max_by_key(|choice| (choice.cost, std::cmp::Reverse(choice.supplier)))
                    .map(|choice| choice.supplier)
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Describe why an exhausted search found nothing.
    ///
    /// A supplier without a minimum accepts any subset, so a line with such a
    /// supplier among its options can always be placed. The lines at fault
    /// are the ones without that escape hatch.
    pub fn conflict(&self) -> InfeasibleOrder {
        let constrained = |item: &&Item| {
            item.options
                .iter()
                .all(|choice| self.suppliers[choice.supplier].terms.min_order > Money::ZERO)
        };
        let mut lines = self
            .items
            .iter()
            .filter(constrained)
            .map(|item| UnfulfillableLine {
                line: item.line,
                component_id: item.component_id.clone(),
                reason: InfeasibleReason::Conflict,
            })
            .collect::<Vec<_>>();
        if lines.is_empty() {
            lines = self
                .items
                .iter()
                .map(|item| UnfulfillableLine {
                    line: item.line,
                    component_id: item.component_id.clone(),
                    reason: InfeasibleReason::Conflict,
                })
                .collect();
        }
        InfeasibleOrder { lines }
    }
}
