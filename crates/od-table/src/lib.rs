//! `od-table`: origin/destination records and snapshot loading.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                        |
//! |------------|-----------------------------------------------------------------|
//! | [`label`]  | `OdLabels`, `OdLabel` (`A_12` ↔ `OriginId(12)`)                 |
//! | [`record`] | `OriginRecord`, `DestinationRecord`, `OdTable`                  |
//! | [`index`]  | `OdIndex` (id → row, node → rows)                               |
//! | [`loader`] | `load_network_csv`, `load_od_table_csv` and their `Read` forms  |
//! | [`error`]  | `TableError`, `TableResult<T>`                                  |

pub mod error;
pub mod index;
pub mod label;
pub mod loader;
pub mod record;

#[cfg(test)]
mod tests;

pub use error::{TableError, TableResult};
pub use index::OdIndex;
pub use label::{OdLabel, OdLabels};
pub use loader::{load_network_csv, load_network_reader, load_od_table_csv, load_od_table_reader};
pub use record::{DestinationRecord, OdTable, OriginRecord};
