//! Strongly-typed identifiers.
//!
//! Catalog identifiers are opaque strings owned by the external store (SKUs,
//! supplier codes, build numbers). Wrapping each kind in its own newtype keeps
//! a supplier id from being passed where a component id is expected. The
//! ordering of supplier ids is also the final tie-break between equally cheap
//! allocations, so every id type is `Ord`.

macro_rules! string_id {
    ($struct:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(transparent)
        )]
        pub struct $struct(String);

        impl $struct {
            /// Borrow the underlying identifier
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $struct {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $struct {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<$struct> for String {
            fn from(value: $struct) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $struct {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(ComponentId, "Identifier of a purchasable component (a SKU)");
string_id!(SupplierId, "Identifier of a supplier");
string_id!(BuildId, "Identifier of a build, the owner of a shopping list");
