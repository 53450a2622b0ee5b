use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EntityId, GameClock};

/// Unique identifier for a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactId(Uuid);

impl FactId {
    /// Creates a new random fact ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a fact ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for FactId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for FactId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<FactId> for Uuid {
    fn from(id: FactId) -> Self {
        id.0
    }
}

/// Per-entity append counter, used for replay ordering and optimistic
/// concurrency control.
///
/// Sequences start at 1 for an entity's first fact and increment by 1
/// for each subsequent fact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Sequence(i64);

impl Sequence {
    /// Creates a sequence from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the initial sequence (0) for an entity with no facts.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the first sequence (1) for an entity's first fact.
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the next sequence.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw sequence value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Sequence {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Sequence> for i64 {
    fn from(sequence: Sequence) -> Self {
        sequence.0
    }
}

/// An immutable fact record as persisted in the log.
///
/// Wraps a domain fact payload with everything needed for storage,
/// ordering, and typed reconstruction on load. Once appended, a record's
/// fields never change; records are never deleted or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRecord {
    /// Unique identifier for this fact.
    pub fact_id: FactId,

    /// The entity this fact belongs to.
    pub entity_id: EntityId,

    /// Per-entity append position of this fact.
    pub sequence: Sequence,

    /// Logical game clock at the time the fact was emitted.
    pub clock: GameClock,

    /// Wall-clock audit timestamp. Never an input to replay.
    pub recorded_at: DateTime<Utc>,

    /// The fact's type discriminator (e.g. "FundsDebited").
    pub type_tag: String,

    /// The fact payload as JSON, decodable via `type_tag`.
    pub payload: serde_json::Value,
}

impl FactRecord {
    /// Creates a new fact record builder.
    pub fn builder() -> FactRecordBuilder {
        FactRecordBuilder::default()
    }
}

/// Builder for constructing fact records.
#[derive(Debug, Default)]
pub struct FactRecordBuilder {
    fact_id: Option<FactId>,
    entity_id: Option<EntityId>,
    sequence: Option<Sequence>,
    clock: Option<GameClock>,
    recorded_at: Option<DateTime<Utc>>,
    type_tag: Option<String>,
    payload: Option<serde_json::Value>,
}

impl FactRecordBuilder {
    /// Sets the fact ID. If not set, a new ID will be generated.
    pub fn fact_id(mut self, id: FactId) -> Self {
        self.fact_id = Some(id);
        self
    }

    /// Sets the owning entity.
    pub fn entity_id(mut self, id: EntityId) -> Self {
        self.entity_id = Some(id);
        self
    }

    /// Sets the per-entity sequence.
    pub fn sequence(mut self, sequence: Sequence) -> Self {
        self.sequence = Some(sequence);
        self
    }

    /// Sets the logical clock context.
    pub fn clock(mut self, clock: GameClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the audit timestamp. If not set, the current time is used.
    pub fn recorded_at(mut self, at: DateTime<Utc>) -> Self {
        self.recorded_at = Some(at);
        self
    }

    /// Sets the type discriminator.
    pub fn type_tag(mut self, tag: impl Into<String>) -> Self {
        self.type_tag = Some(tag.into());
        self
    }

    /// Sets the payload from a serializable value.
    pub fn payload<T: Serialize>(mut self, payload: &T) -> Result<Self, serde_json::Error> {
        self.payload = Some(serde_json::to_value(payload)?);
        Ok(self)
    }

    /// Sets the payload from a raw JSON value.
    pub fn payload_raw(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Builds the fact record.
    ///
    /// # Panics
    ///
    /// Panics if required fields (entity_id, sequence, clock, type_tag,
    /// payload) are not set.
    pub fn build(self) -> FactRecord {
        FactRecord {
            fact_id: self.fact_id.unwrap_or_default(),
            entity_id: self.entity_id.expect("entity_id is required"),
            sequence: self.sequence.expect("sequence is required"),
            clock: self.clock.expect("clock is required"),
            recorded_at: self.recorded_at.unwrap_or_else(Utc::now),
            type_tag: self.type_tag.expect("type_tag is required"),
            payload: self.payload.expect("payload is required"),
        }
    }

    /// Tries to build the fact record, returning None if required fields
    /// are missing.
    pub fn try_build(self) -> Option<FactRecord> {
        Some(FactRecord {
            fact_id: self.fact_id.unwrap_or_default(),
            entity_id: self.entity_id?,
            sequence: self.sequence?,
            clock: self.clock?,
            recorded_at: self.recorded_at.unwrap_or_else(Utc::now),
            type_tag: self.type_tag?,
            payload: self.payload?,
        })
    }
}
