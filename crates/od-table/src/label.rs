//! OD label parsing.
//!
//! Snapshots identify origins and destinations by `{prefix}_{number}`
//! labels (`A_12`, `B_3`).  A node hosting several of them carries the
//! labels comma-joined (`A_1,B_3`).  Labels are parsed exactly once, at load
//! time, into typed ids; nothing downstream handles the strings.

use od_core::{AnalysisConfig, DestinationId, OriginId};
use od_network::OdTags;

use crate::{TableError, TableResult};

/// Values treated as "no label" in persisted tables.
const EMPTY_CELLS: [&str; 4] = ["", "nan", "NaN", "None"];

/// A parsed label.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OdLabel {
    Origin(OriginId),
    Destination(DestinationId),
}

/// Label prefixes of one analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OdLabels {
    origin_prefix:      String,
    destination_prefix: String,
}

impl OdLabels {
    pub fn new(origin_prefix: impl Into<String>, destination_prefix: impl Into<String>) -> Self {
        Self {
            origin_prefix:      origin_prefix.into(),
            destination_prefix: destination_prefix.into(),
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(&config.origins_names, &config.destinations_names)
    }

    pub fn origin_label(&self, id: OriginId) -> String {
        format!("{}_{}", self.origin_prefix, id.0)
    }

    pub fn destination_label(&self, id: DestinationId) -> String {
        format!("{}_{}", self.destination_prefix, id.0)
    }

    /// Parse a single label.
    pub fn parse(&self, label: &str) -> TableResult<OdLabel> {
        let label = label.trim();
        let Some((prefix, number)) = label.rsplit_once('_') else {
            return Err(malformed(label, "expected <prefix>_<number>"));
        };
        let n: u32 = number
            .parse()
            .map_err(|_| malformed(label, &format!("{number:?} is not a non-negative integer")))?;
        if prefix == self.origin_prefix {
            Ok(OdLabel::Origin(OriginId(n)))
        } else if prefix == self.destination_prefix {
            Ok(OdLabel::Destination(DestinationId(n)))
        } else {
            Err(malformed(
                label,
                &format!(
                    "prefix {prefix:?} is neither {:?} nor {:?}",
                    self.origin_prefix, self.destination_prefix
                ),
            ))
        }
    }

    /// Parse a possibly empty cell holding a label of the given kind.
    pub fn parse_origin_cell(&self, cell: &str) -> TableResult<Option<OriginId>> {
        if is_empty_cell(cell) {
            return Ok(None);
        }
        match self.parse(cell)? {
            OdLabel::Origin(id) => Ok(Some(id)),
            OdLabel::Destination(_) => Err(malformed(cell, "expected an origin label")),
        }
    }

    pub fn parse_destination_cell(&self, cell: &str) -> TableResult<Option<DestinationId>> {
        if is_empty_cell(cell) {
            return Ok(None);
        }
        match self.parse(cell)? {
            OdLabel::Destination(id) => Ok(Some(id)),
            OdLabel::Origin(_) => Err(malformed(cell, "expected a destination label")),
        }
    }

    /// Parse a node's comma-joined label list into typed tags.
    ///
    /// Duplicate labels collapse; the order of first appearance is kept.
    pub fn parse_tags(&self, cell: &str) -> TableResult<OdTags> {
        let mut tags = OdTags::default();
        if is_empty_cell(cell) {
            return Ok(tags);
        }
        for part in cell.split(',') {
            match self.parse(part)? {
                OdLabel::Origin(id) if !tags.origins.contains(&id) => tags.origins.push(id),
                OdLabel::Destination(id) if !tags.destinations.contains(&id) => {
                    tags.destinations.push(id)
                }
                _ => {}
            }
        }
        Ok(tags)
    }

    /// Inverse of [`parse_tags`](Self::parse_tags): origins first, then
    /// destinations.
    pub fn format_tags(&self, tags: &OdTags) -> String {
        tags.origins
            .iter()
            .map(|id| self.origin_label(*id))
            .chain(tags.destinations.iter().map(|id| self.destination_label(*id)))
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn is_empty_cell(cell: &str) -> bool {
    EMPTY_CELLS.contains(&cell.trim())
}

fn malformed(label: &str, reason: &str) -> TableError {
    TableError::Label { label: label.to_owned(), reason: reason.to_owned() }
}
