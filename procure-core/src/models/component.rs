use super::ComponentId;

/// A purchasable part as described by the catalog.
///
/// The optimizer only needs the identity; the descriptive fields travel along
/// so that allocations can be rendered without a second lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    /// Unique identifier
    pub id: ComponentId,
    /// Display name
    pub name: String,
    /// Category, e.g. "GPU" or "PSU"
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: String,
    /// Manufacturer
    #[cfg_attr(feature = "serde", serde(default))]
    pub brand: String,
    /// Free-form specification text
    #[cfg_attr(feature = "serde", serde(default))]
    pub specification: String,
}
