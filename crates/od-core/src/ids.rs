//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Graph-internal ids (`NodeId`,
//! `EdgeId`, `RoadId`, `CategoryId`, `HazardId`) index directly into columnar `Vec`s via
//! `.index()`.  `OriginId` and `DestinationId` carry the numeric part of the
//! persisted OD labels (`A_12` → `OriginId(12)`) and are never used as
//! indices.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[derive(serde::Serialize, serde::Deserialize)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a road-network node.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a directed arc in the CSR adjacency.
    pub struct EdgeId(u32);
}

typed_id! {
    /// Index of a logical road.  A two-way road owns two arcs but one
    /// `RoadId`, so loads and hazard values are shared by both directions.
    pub struct RoadId(u32);
}

typed_id! {
    /// Index of a destination category in first-seen order.
    pub struct CategoryId(u16);
}

typed_id! {
    /// Index of a hazard scenario in the network's hazard column list.
    pub struct HazardId(u16);
}

typed_id! {
    /// Numeric id of an origin record (`od_id` column of the OD table).
    pub struct OriginId(u32);
}

typed_id! {
    /// Numeric id of a destination record (`od_id` column of the OD table).
    pub struct DestinationId(u32);
}

impl CategoryId {
    /// Short column suffix used in output tables: `D1`, `D2`, …
    pub fn short_name(self) -> String {
        format!("D{}", self.0 + 1)
    }
}
