use common::GameClock;

use crate::{EntityId, Sequence};

/// Builder for constructing log queries.
///
/// Allows filtering facts by entity, type tag, sequence range, and logical
/// clock range. Used by read endpoints such as the "recent facts" window
/// handed to narrative collaborators.
#[derive(Debug, Clone, Default)]
pub struct LogQuery {
    /// Filter by entity ID.
    pub entity_id: Option<EntityId>,

    /// Filter by type tags (any of these tags).
    pub type_tags: Option<Vec<String>>,

    /// Filter by minimum sequence (inclusive).
    pub from_sequence: Option<Sequence>,

    /// Filter by maximum sequence (inclusive).
    pub to_sequence: Option<Sequence>,

    /// Filter by facts at or after this clock (inclusive).
    pub from_clock: Option<GameClock>,

    /// Filter by facts at or before this clock (inclusive).
    pub to_clock: Option<GameClock>,

    /// Maximum number of facts to return.
    pub limit: Option<usize>,

    /// Number of facts to skip.
    pub offset: Option<usize>,
}

impl LogQuery {
    /// Creates a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for a specific entity.
    pub fn for_entity(entity_id: EntityId) -> Self {
        Self {
            entity_id: Some(entity_id),
            ..Default::default()
        }
    }

    /// Creates a query for facts of a specific type.
    pub fn for_type_tag(type_tag: impl Into<String>) -> Self {
        Self {
            type_tags: Some(vec![type_tag.into()]),
            ..Default::default()
        }
    }

    /// Filters by entity ID.
    pub fn entity_id(mut self, id: EntityId) -> Self {
        self.entity_id = Some(id);
        self
    }

    /// Filters by a single type tag.
    pub fn type_tag(mut self, type_tag: impl Into<String>) -> Self {
        self.type_tags = Some(vec![type_tag.into()]);
        self
    }

    /// Filters by multiple type tags (any of these).
    pub fn type_tags(mut self, type_tags: Vec<String>) -> Self {
        self.type_tags = Some(type_tags);
        self
    }

    /// Filters to facts starting from this sequence (inclusive).
    pub fn from_sequence(mut self, sequence: Sequence) -> Self {
        self.from_sequence = Some(sequence);
        self
    }

    /// Filters to facts up to this sequence (inclusive).
    pub fn to_sequence(mut self, sequence: Sequence) -> Self {
        self.to_sequence = Some(sequence);
        self
    }

    /// Filters to facts at or after this clock (inclusive).
    pub fn from_clock(mut self, clock: GameClock) -> Self {
        self.from_clock = Some(clock);
        self
    }

    /// Filters to facts at or before this clock (inclusive).
    pub fn to_clock(mut self, clock: GameClock) -> Self {
        self.to_clock = Some(clock);
        self
    }

    /// Limits the number of facts returned.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips this many facts before returning results.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Returns true if a record passes every filter in this query.
    pub fn matches(&self, record: &crate::FactRecord) -> bool {
        if let Some(id) = self.entity_id
            && record.entity_id != id
        {
            return false;
        }
        if let Some(ref tags) = self.type_tags
            && !tags.iter().any(|t| t == &record.type_tag)
        {
            return false;
        }
        if let Some(from) = self.from_sequence
            && record.sequence < from
        {
            return false;
        }
        if let Some(to) = self.to_sequence
            && record.sequence > to
        {
            return false;
        }
        if let Some(from) = self.from_clock
            && record.clock < from
        {
            return false;
        }
        if let Some(to) = self.to_clock
            && record.clock > to
        {
            return false;
        }
        true
    }
}
