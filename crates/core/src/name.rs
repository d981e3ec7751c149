//! Mutable name records and update history.

use crate::address::ContentAddress;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A single entry in a name's update history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameUpdate {
    /// Address the name pointed at before the update.
    pub from: ContentAddress,
    /// Address the name points at after the update.
    pub to: ContentAddress,
    /// Sequence number assigned by the publish.
    pub seq: u64,
    /// When the update happened.
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
}

/// The current resolution of a mutable name.
///
/// Sequence numbers strictly increase per name; history is append-only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NameRecord {
    /// The mutable name.
    pub name: String,
    /// Current address the name resolves to.
    pub address: ContentAddress,
    /// Monotonically increasing publish sequence number.
    pub seq: u64,
    /// When the record was last resolved or published.
    #[serde(with = "time::serde::rfc3339")]
    pub resolved_at: OffsetDateTime,
    /// Ordered update history, oldest first.
    #[serde(default)]
    pub history: Vec<NameUpdate>,
}

impl NameRecord {
    /// Create a record for a freshly published name.
    pub fn new(name: impl Into<String>, address: ContentAddress, seq: u64) -> Self {
        Self {
            name: name.into(),
            address,
            seq,
            resolved_at: OffsetDateTime::now_utc(),
            history: Vec::new(),
        }
    }

    /// Age of the record since its last resolution.
    pub fn age(&self) -> time::Duration {
        OffsetDateTime::now_utc() - self.resolved_at
    }
}
