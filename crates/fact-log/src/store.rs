use async_trait::async_trait;

use crate::{EntityId, FactRecord, LogQuery, Result, Sequence};

/// Options for appending facts to the log.
#[derive(Debug, Clone, Default)]
pub struct AppendOptions {
    /// Expected sequence of the entity for optimistic concurrency control.
    /// If None, no sequence check is performed (use with caution).
    pub expected_sequence: Option<Sequence>,
}

impl AppendOptions {
    /// Creates options with no sequence check.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options expecting the entity to be at a specific sequence.
    pub fn expect_sequence(sequence: Sequence) -> Self {
        Self {
            expected_sequence: Some(sequence),
        }
    }

    /// Creates options expecting the entity to have no facts yet.
    pub fn expect_new() -> Self {
        Self {
            expected_sequence: Some(Sequence::initial()),
        }
    }
}

/// Core trait for fact log implementations.
///
/// A fact log persists immutable facts in append order and hands back the
/// complete history for replay. All implementations must be thread-safe
/// (Send + Sync).
#[async_trait]
pub trait FactLog: Send + Sync {
    /// Appends a batch of facts to the log.
    ///
    /// The batch is appended atomically, in emission order - either every
    /// record lands or none do. If `options.expected_sequence` is set, the
    /// operation fails with `SequenceConflict` if the entity's current
    /// sequence doesn't match. An I/O failure propagates as an error and
    /// leaves no partial batch behind.
    ///
    /// Returns the entity's new sequence after appending.
    async fn append(&self, facts: Vec<FactRecord>, options: AppendOptions) -> Result<Sequence>;

    /// Retrieves the complete history for one entity, in append order.
    async fn facts_for_entity(&self, entity_id: EntityId) -> Result<Vec<FactRecord>>;

    /// Retrieves the complete history across all entities, in append order.
    async fn load_all(&self) -> Result<Vec<FactRecord>>;

    /// Retrieves facts matching a query.
    async fn query(&self, query: LogQuery) -> Result<Vec<FactRecord>>;

    /// Gets the current sequence of an entity.
    ///
    /// Returns None if the entity has no facts.
    async fn entity_sequence(&self, entity_id: EntityId) -> Result<Option<Sequence>>;
}

/// Validates a batch of facts before appending.
///
/// Every record must belong to the same entity and carry contiguous,
/// strictly increasing sequences.
pub fn validate_batch(facts: &[FactRecord]) -> Result<()> {
    use crate::FactLogError;

    let first = facts
        .first()
        .ok_or_else(|| FactLogError::InvalidBatch("cannot append an empty batch".to_string()))?;

    let mut expected = first.sequence;
    for record in facts.iter().skip(1) {
        if record.entity_id != first.entity_id {
            return Err(FactLogError::InvalidBatch(
                "all facts in a batch must belong to the same entity".to_string(),
            ));
        }
        expected = expected.next();
        if record.sequence != expected {
            return Err(FactLogError::InvalidBatch(format!(
                "fact sequences must be contiguous: expected {}, got {}",
                expected, record.sequence
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FactLogError, GameClock};

    fn record(entity_id: EntityId, sequence: i64) -> FactRecord {
        FactRecord::builder()
            .entity_id(entity_id)
            .sequence(Sequence::new(sequence))
            .clock(GameClock::genesis())
            .type_tag("TestFact")
            .payload_raw(serde_json::json!({}))
            .build()
    }

    #[test]
    fn empty_batch_is_invalid() {
        let result = validate_batch(&[]);
        assert!(matches!(result, Err(FactLogError::InvalidBatch(_))));
    }

    #[test]
    fn mixed_entity_batch_is_invalid() {
        let batch = vec![record(EntityId::new(), 1), record(EntityId::new(), 2)];
        assert!(matches!(
            validate_batch(&batch),
            Err(FactLogError::InvalidBatch(_))
        ));
    }

    #[test]
    fn gapped_sequences_are_invalid() {
        let entity = EntityId::new();
        let batch = vec![record(entity, 1), record(entity, 3)];
        assert!(matches!(
            validate_batch(&batch),
            Err(FactLogError::InvalidBatch(_))
        ));
    }

    #[test]
    fn contiguous_batch_is_valid() {
        let entity = EntityId::new();
        let batch = vec![record(entity, 4), record(entity, 5), record(entity, 6)];
        assert!(validate_batch(&batch).is_ok());
    }
}
