use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    EntityId, FactLogError, FactRecord, LogQuery, Result, Sequence,
    store::{AppendOptions, FactLog, validate_batch},
};

/// In-memory fact log implementation.
///
/// Volatile - intended for tests and ephemeral runs. Provides the same
/// interface and concurrency behavior as the durable file-backed log.
#[derive(Clone, Default)]
pub struct InMemoryFactLog {
    facts: Arc<RwLock<Vec<FactRecord>>>,
}

impl InMemoryFactLog {
    /// Creates a new empty in-memory fact log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of facts stored.
    pub async fn fact_count(&self) -> usize {
        self.facts.read().await.len()
    }

    /// Clears all facts.
    pub async fn clear(&self) {
        self.facts.write().await.clear();
    }
}

#[async_trait]
impl FactLog for InMemoryFactLog {
    async fn append(&self, facts: Vec<FactRecord>, options: AppendOptions) -> Result<Sequence> {
        validate_batch(&facts)?;

        let entity_id = facts[0].entity_id;
        let mut store = self.facts.write().await;

        let current = store
            .iter()
            .filter(|f| f.entity_id == entity_id)
            .map(|f| f.sequence)
            .max()
            .unwrap_or(Sequence::initial());

        if let Some(expected) = options.expected_sequence
            && current != expected
        {
            return Err(FactLogError::SequenceConflict {
                entity_id,
                expected,
                actual: current,
            });
        }

        if facts[0].sequence != current.next() {
            return Err(FactLogError::SequenceConflict {
                entity_id,
                expected: current,
                actual: facts[0].sequence,
            });
        }

        let last = facts.last().map(|f| f.sequence).unwrap_or(current);
        store.extend(facts);

        Ok(last)
    }

    async fn facts_for_entity(&self, entity_id: EntityId) -> Result<Vec<FactRecord>> {
        let store = self.facts.read().await;
        let mut facts: Vec<_> = store
            .iter()
            .filter(|f| f.entity_id == entity_id)
            .cloned()
            .collect();
        facts.sort_by_key(|f| f.sequence);
        Ok(facts)
    }

    async fn load_all(&self) -> Result<Vec<FactRecord>> {
        Ok(self.facts.read().await.clone())
    }

    async fn query(&self, query: LogQuery) -> Result<Vec<FactRecord>> {
        let store = self.facts.read().await;
        let matched = store.iter().filter(|f| query.matches(f)).cloned();

        let matched: Vec<_> = match query.offset {
            Some(offset) => matched.skip(offset).collect(),
            None => matched.collect(),
        };

        let matched = match query.limit {
            Some(limit) => matched.into_iter().take(limit).collect(),
            None => matched,
        };

        Ok(matched)
    }

    async fn entity_sequence(&self, entity_id: EntityId) -> Result<Option<Sequence>> {
        let store = self.facts.read().await;
        let sequence = store
            .iter()
            .filter(|f| f.entity_id == entity_id)
            .map(|f| f.sequence)
            .max();
        Ok(sequence)
    }
}
