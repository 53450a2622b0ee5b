//! State reconstruction by replay.

use common::EntityId;
use fact_log::FactRecord;

use crate::error::ReplayError;
use crate::reducers::ReducerRegistry;
use crate::state::VenueState;

/// Replays an ordered fact sequence over a template initial state.
///
/// Every build starts from a fresh clone of the template - Rust's value
/// semantics give each replay a fully independent state tree, so no
/// aliasing can leak between replays or back into the template. The
/// template itself is never mutated.
pub struct StateBuilder {
    template: VenueState,
    registry: ReducerRegistry,
}

impl StateBuilder {
    /// Creates a builder from a template state and a reducer registry.
    pub fn new(template: VenueState, registry: ReducerRegistry) -> Self {
        Self { template, registry }
    }

    /// Creates a builder with the standard template and registry.
    pub fn standard() -> Self {
        Self::new(VenueState::template(), ReducerRegistry::standard())
    }

    /// Returns the reducer registry backing this builder.
    pub fn registry(&self) -> &ReducerRegistry {
        &self.registry
    }

    /// Rebuilds the state for `entity_id` by folding `records` in order.
    ///
    /// Returns a brand-new state each call. Replay is O(n) in the number
    /// of records by design: the log is the single source of truth and
    /// reads privilege auditability over latency.
    pub fn build(
        &self,
        entity_id: EntityId,
        records: &[FactRecord],
    ) -> Result<VenueState, ReplayError> {
        let mut state = self.template.clone();
        state.entity_id = entity_id;

        for record in records {
            state = self.registry.apply(state, record)?;
        }

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::Fact;
    use crate::values::Coins;
    use common::GameClock;
    use fact_log::Sequence;

    fn records_for(entity_id: EntityId, facts: &[Fact]) -> Vec<FactRecord> {
        facts
            .iter()
            .enumerate()
            .map(|(index, fact)| {
                FactRecord::builder()
                    .entity_id(entity_id)
                    .sequence(Sequence::new(index as i64 + 1))
                    .clock(GameClock::genesis())
                    .type_tag(fact.type_tag())
                    .payload_raw(fact.to_payload().unwrap())
                    .build()
            })
            .collect()
    }

    fn sample_history() -> Vec<Fact> {
        vec![
            Fact::venue_founded("The Gilded Tankard", Coins::from_copper(1000)),
            Fact::room_added("taproom", "Taproom"),
            Fact::equipment_purchased("taproom", "hearth-1", "Stone Hearth", Coins::from_copper(500)),
            Fact::funds_debited(Coins::from_copper(500), "purchase of Stone Hearth"),
        ]
    }

    #[test]
    fn build_replays_in_order() {
        let builder = StateBuilder::standard();
        let entity_id = EntityId::new();
        let records = records_for(entity_id, &sample_history());

        let state = builder.build(entity_id, &records).unwrap();

        assert_eq!(state.entity_id, entity_id);
        assert_eq!(state.balance, Coins::from_copper(500));
        assert_eq!(state.equipment_count(), 1);
    }

    #[test]
    fn build_is_deterministic() {
        let builder = StateBuilder::standard();
        let entity_id = EntityId::new();
        let records = records_for(entity_id, &sample_history());

        let first = builder.build(entity_id, &records).unwrap();
        let second = builder.build(entity_id, &records).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn build_never_mutates_the_template() {
        let template = VenueState::template();
        let snapshot = template.clone();
        let builder = StateBuilder::new(template, ReducerRegistry::standard());
        let entity_id = EntityId::new();

        builder
            .build(entity_id, &records_for(entity_id, &sample_history()))
            .unwrap();

        let empty = builder.build(entity_id, &[]).unwrap();
        assert_eq!(empty.name, snapshot.name);
        assert_eq!(empty.balance, snapshot.balance);
        assert!(empty.rooms.is_empty());
    }

    #[test]
    fn prefix_then_suffix_equals_whole_replay() {
        let builder = StateBuilder::standard();
        let entity_id = EntityId::new();
        let records = records_for(entity_id, &sample_history());

        let whole = builder.build(entity_id, &records).unwrap();

        let mut partial = builder.build(entity_id, &records[..2]).unwrap();
        for record in &records[2..] {
            partial = builder.registry().apply(partial, record).unwrap();
        }

        assert_eq!(whole, partial);
    }

    #[test]
    fn built_states_are_independent() {
        let builder = StateBuilder::standard();
        let entity_id = EntityId::new();
        let records = records_for(entity_id, &sample_history());

        let mut first = builder.build(entity_id, &records).unwrap();
        first.balance = Coins::from_copper(-777);

        let second = builder.build(entity_id, &records).unwrap();
        assert_eq!(second.balance, Coins::from_copper(500));
    }

    #[test]
    fn unregistered_fact_aborts_the_build() {
        let builder = StateBuilder::new(VenueState::template(), ReducerRegistry::new());
        let entity_id = EntityId::new();
        let records = records_for(entity_id, &sample_history());

        let result = builder.build(entity_id, &records);
        assert!(matches!(
            result,
            Err(ReplayError::UnregisteredFactType { .. })
        ));
    }
}
