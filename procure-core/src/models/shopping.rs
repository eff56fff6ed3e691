use super::{BuildId, ComponentId};
use thiserror::Error;

/// One row of a shopping list: a component and how many to buy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "LineItemDto", into = "LineItemDto")
)]
pub struct LineItem {
    component_id: ComponentId,
    quantity: u32,
}

/// The ways a line item may be invalid
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineItemError {
    /// A line asking for nothing
    #[error("line item for {0} must have a quantity of at least 1")]
    ZeroQuantity(ComponentId),
}

impl LineItem {
    /// Build a line item, rejecting a zero quantity
    pub fn new(component_id: impl Into<ComponentId>, quantity: u32) -> Result<Self, LineItemError> {
        let component_id = component_id.into();
        if quantity == 0 {
            return Err(LineItemError::ZeroQuantity(component_id));
        }
        Ok(Self {
            component_id,
            quantity,
        })
    }

    /// The component to buy
    pub fn component_id(&self) -> &ComponentId {
        &self.component_id
    }

    /// How many units to buy (always at least one)
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct LineItemDto {
    component_id: ComponentId,
    #[cfg_attr(feature = "serde", serde(default = "default_quantity"))]
    quantity: u32,
}

#[cfg(feature = "serde")]
fn default_quantity() -> u32 {
    1
}

impl TryFrom<LineItemDto> for LineItem {
    type Error = LineItemError;

    fn try_from(value: LineItemDto) -> Result<Self, Self::Error> {
        Self::new(value.component_id, value.quantity)
    }
}

impl From<LineItem> for LineItemDto {
    fn from(value: LineItem) -> Self {
        Self {
            component_id: value.component_id,
            quantity: value.quantity,
        }
    }
}

/// An ordered multiset of line items belonging to one build.
///
/// A component may appear on more than one line; each line is allocated on
/// its own.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShoppingList {
    /// The owning build
    pub build_id: BuildId,
    /// The lines, in the order they were entered
    pub items: Vec<LineItem>,
}

impl ShoppingList {
    /// The distinct components referenced, in first-seen order
    pub fn component_ids(&self) -> Vec<ComponentId> {
        let mut seen = rustc_hash::FxHashSet::default();
        self.items
            .iter()
            .map(LineItem::component_id)
            .filter(|id| seen.insert(*id))
            .cloned()
            .collect()
    }
}
