use super::{Component, ComponentId, Map, Offer, OfferRecord, Supplier, SupplierId};
use crate::ports::CatalogFailure;
use std::time::Duration;
use time::OffsetDateTime;

/// How the catalog reader decides which offers are current enough to use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogConfig {
    /// Offers last refreshed longer ago than this are dropped (if omitted, no age limit)
    #[cfg_attr(feature = "serde", serde(default, with = "humantime_serde"))]
    pub max_offer_age: Option<Duration>,
}

/// A non-fatal problem with the catalog data, reported next to the results.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum DataQualityWarning {
    /// A requested component has no active, available, fresh offer
    NoEligibleOffers {
        /// The component without offers
        component: ComponentId,
    },
    /// Some offers for a component were older than the configured limit
    StaleOffers {
        /// The affected component
        component: ComponentId,
        /// How many offers were dropped
        dropped: usize,
    },
    /// More than one active offer for the same pair; the newest one was kept
    DuplicateOffer {
        /// The selling supplier
        supplier: SupplierId,
        /// The component on offer
        component: ComponentId,
    },
    /// An offer references a supplier the store does not know
    OrphanOffer {
        /// The missing supplier
        supplier: SupplierId,
        /// The component on offer
        component: ComponentId,
    },
    /// An offer failed validation (e.g. a negative price) and was dropped
    InvalidOffer {
        /// The selling supplier
        supplier: SupplierId,
        /// The component on offer
        component: ComponentId,
    },
}

/// A read-only view of the catalog scoped to one optimization run.
///
/// The snapshot is loaded once, before the search starts, and never refreshed
/// or written back.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogSnapshot {
    /// The requested components, in request order
    pub components: Map<ComponentId, Component>,
    /// Eligible offers, grouped by component (request order) then by supplier id
    pub offers: Vec<Offer>,
    /// Problems found while loading
    pub warnings: Vec<DataQualityWarning>,
}

impl CatalogSnapshot {
    /// Project raw store rows onto the snapshot for `requested`.
    ///
    /// This is the filter every catalog backend shares: unknown components
    /// fail the load, inactive rows are ignored, duplicated active rows are
    /// collapsed onto the newest, and unavailable or stale rows are dropped.
    /// Everything unusual but survivable becomes a [`DataQualityWarning`].
    pub fn assemble(
        requested: &[ComponentId],
        components: impl IntoIterator<Item = Component>,
        suppliers: impl IntoIterator<Item = Supplier>,
        offers: impl IntoIterator<Item = OfferRecord>,
        as_of: OffsetDateTime,
        config: &CatalogConfig,
    ) -> Result<Self, CatalogFailure> {
        let mut known = components
            .into_iter()
            .map(|component| (component.id.clone(), component))
            .collect::<Map<_, _>>();

        // Preserve request order; a component requested twice appears once.
        let mut selected = Map::<ComponentId, Component>::with_capacity(requested.len());
        let mut missing = Vec::new();
        for id in requested {
            if selected.contains_key(id) || missing.contains(id) {
                continue;
            }
            match known.swap_remove(id) {
                Some(component) => {
                    selected.insert(id.clone(), component);
                }
                None => missing.push(id.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(CatalogFailure::NotFound(missing));
        }

        let suppliers = suppliers
            .into_iter()
            .map(|supplier| (supplier.id.clone(), supplier))
            .collect::<Map<_, _>>();

        let mut warnings = Vec::new();

        // Collapse to one active row per (component, supplier), newest wins.
        let mut current = Map::<(ComponentId, SupplierId), OfferRecord>::default();
        for record in offers {
            if !record.active || !selected.contains_key(&record.component_id) {
                continue;
            }
            if record.validate().is_err() {
                warnings.push(DataQualityWarning::InvalidOffer {
                    supplier: record.supplier_id,
                    component: record.component_id,
                });
                continue;
            }
            let key = (record.component_id.clone(), record.supplier_id.clone());
            match current.get_mut(&key) {
                Some(existing) => {
                    warnings.push(DataQualityWarning::DuplicateOffer {
                        supplier: key.1,
                        component: key.0,
                    });
                    if record.updated_at > existing.updated_at {
                        *existing = record;
                    }
                }
                None => {
                    current.insert(key, record);
                }
            }
        }

        let max_age = config
            .max_offer_age
            .map(|age| time::Duration::try_from(age).unwrap_or(time::Duration::MAX));

        let mut eligible = Vec::with_capacity(current.len());
        for component_id in selected.keys() {
            let mut candidates = current
                .iter()
                .filter(|((component, _), _)| component == component_id)
                .map(|(_, record)| record)
                .collect::<Vec<_>>();
            candidates.sort_by(|a, b| a.supplier_id.cmp(&b.supplier_id));

            let mut stale = 0;
            let before = eligible.len();
            for record in candidates {
                if !record.available {
                    continue;
                }
                if max_age.is_some_and(|max_age| as_of - record.updated_at > max_age) {
                    stale += 1;
                    continue;
                }
                let Some(supplier) = suppliers.get(&record.supplier_id) else {
                    warnings.push(DataQualityWarning::OrphanOffer {
                        supplier: record.supplier_id.clone(),
                        component: record.component_id.clone(),
                    });
                    continue;
                };
                eligible.push(Offer {
                    supplier: supplier.clone(),
                    component_id: record.component_id.clone(),
                    price: record.price,
                    updated_at: record.updated_at,
                });
            }

            if stale > 0 {
                warnings.push(DataQualityWarning::StaleOffers {
                    component: component_id.clone(),
                    dropped: stale,
                });
            }
            if eligible.len() == before {
                warnings.push(DataQualityWarning::NoEligibleOffers {
                    component: component_id.clone(),
                });
            }
        }

        Ok(Self {
            components: selected,
            offers: eligible,
            warnings,
        })
    }

    /// Eligible offers for one component
    pub fn offers_for<'a>(&'a self, component: &'a ComponentId) -> impl Iterator<Item = &'a Offer> {
        self.offers
            .iter()
            .filter(move |offer| &offer.component_id == component)
    }
}
