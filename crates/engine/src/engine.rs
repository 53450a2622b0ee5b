use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use common::EntityId;
use domain::{
    Command, Fact, HandlerRegistry, ReducerRegistry, StateBuilder, VenueState,
};
use fact_log::{AppendOptions, FactLog, FactRecord, FileFactLog, LogQuery, Sequence};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::outcome::ExecutionOutcome;

/// Builds the standard reducer and handler registries.
///
/// This is the single startup wiring point: every fact type and command
/// type in the taxonomies is bound here, explicitly, and the registries
/// are immutable once handed to the engine.
pub fn standard_registries() -> (ReducerRegistry, HandlerRegistry) {
    (ReducerRegistry::standard(), HandlerRegistry::standard())
}

/// The orchestration facade over the fact log and the domain registries.
///
/// Per entity, state changes only through [`Engine::execute`]; reading
/// state is always a full replay from genesis via
/// [`Engine::current_state`]. The engine caches nothing between calls -
/// it holds only the registries, a log handle, and the per-entity locks
/// that serialize the read-validate-append cycle.
pub struct Engine<L: FactLog> {
    log: Arc<L>,
    handlers: HandlerRegistry,
    builder: StateBuilder,
    execute_locks: Mutex<HashMap<EntityId, Arc<Mutex<()>>>>,
}

impl Engine<FileFactLog> {
    /// Opens a durable engine at the log path named by `config`.
    pub async fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let log = FileFactLog::open(&config.log_path).await?;
        Ok(Self::standard(Arc::new(log)))
    }
}

impl<L: FactLog> Engine<L> {
    /// Creates an engine with explicit registries and state template.
    pub fn new(
        log: Arc<L>,
        handlers: HandlerRegistry,
        reducers: ReducerRegistry,
        template: VenueState,
    ) -> Self {
        Self {
            log,
            handlers,
            builder: StateBuilder::new(template, reducers),
            execute_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an engine with the standard wiring.
    pub fn standard(log: Arc<L>) -> Self {
        let (reducers, handlers) = standard_registries();
        Self::new(log, handlers, reducers, VenueState::template())
    }

    /// Returns a handle to the underlying fact log.
    pub fn log(&self) -> &Arc<L> {
        &self.log
    }

    /// Rebuilds the current state of an entity by replaying its full
    /// history from genesis.
    ///
    /// This is the only sanctioned way to obtain state; the engine never
    /// hands out or keeps a cached snapshot.
    #[tracing::instrument(skip(self))]
    pub async fn current_state(&self, entity_id: EntityId) -> Result<VenueState, EngineError> {
        let records = self.log.facts_for_entity(entity_id).await?;
        let state = self.builder.build(entity_id, &records)?;
        Ok(state)
    }

    /// Executes a command against an entity.
    ///
    /// The read-validate-append cycle runs under a per-entity lock, so
    /// two in-flight commands for the same entity can never validate
    /// against the same stale state. On acceptance the handler's whole
    /// fact batch is appended atomically, in emission order; on rejection
    /// the log is untouched.
    #[tracing::instrument(skip(self, command), fields(command_type = command.command_type()))]
    pub async fn execute(
        &self,
        entity_id: EntityId,
        command: &Command,
    ) -> Result<ExecutionOutcome, EngineError> {
        let entity_lock = self.entity_lock(entity_id).await;
        let _guard = entity_lock.lock().await;

        let records = self.log.facts_for_entity(entity_id).await?;
        let state = self.builder.build(entity_id, &records)?;

        let Some(handler) = self.handlers.get(command.command_type()) else {
            tracing::warn!(command_type = command.command_type(), "unknown command type");
            return Ok(ExecutionOutcome::UnknownCommand {
                command_type: command.command_type().to_string(),
            });
        };

        let facts = match handler(&state, command) {
            Ok(facts) => facts,
            Err(rejection) => {
                metrics::counter!("engine_commands_rejected").increment(1);
                tracing::debug!(%rejection, "command rejected");
                return Ok(ExecutionOutcome::Rejected { rejection });
            }
        };

        if facts.is_empty() {
            return Ok(ExecutionOutcome::Accepted { facts: vec![] });
        }

        let current = records
            .last()
            .map(|r| r.sequence)
            .unwrap_or(Sequence::initial());
        let stamped = stamp_records(entity_id, current, &state, &facts)?;

        // The per-entity lock already serializes writers; the sequence
        // expectation guards against anything appending behind our back.
        self.log
            .append(stamped.clone(), AppendOptions::expect_sequence(current))
            .await?;

        metrics::counter!("engine_facts_appended").increment(stamped.len() as u64);
        tracing::info!(facts = stamped.len(), "command accepted");

        Ok(ExecutionOutcome::Accepted { facts: stamped })
    }

    /// Returns an entity's full fact history in append order.
    pub async fn history(&self, entity_id: EntityId) -> Result<Vec<FactRecord>, EngineError> {
        Ok(self.log.facts_for_entity(entity_id).await?)
    }

    /// Returns the most recent `limit` facts for an entity, oldest first.
    ///
    /// This is the fact window handed to narrative collaborators.
    pub async fn recent_facts(
        &self,
        entity_id: EntityId,
        limit: usize,
    ) -> Result<Vec<FactRecord>, EngineError> {
        let records = self.log.facts_for_entity(entity_id).await?;
        let skip = records.len().saturating_sub(limit);
        Ok(records.into_iter().skip(skip).collect())
    }

    /// Runs an arbitrary query against the log.
    pub async fn query(&self, query: LogQuery) -> Result<Vec<FactRecord>, EngineError> {
        Ok(self.log.query(query).await?)
    }

    async fn entity_lock(&self, entity_id: EntityId) -> Arc<Mutex<()>> {
        let mut locks = self.execute_locks.lock().await;
        locks
            .entry(entity_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Stamps a handler's fact batch into persistable records: fresh fact
/// ids, contiguous sequences, and the entity's logical clock.
///
/// A clock-advance fact moves the running clock, so facts emitted after
/// it in the same batch are stamped with the new day.
fn stamp_records(
    entity_id: EntityId,
    current: Sequence,
    state: &VenueState,
    facts: &[Fact],
) -> Result<Vec<FactRecord>, EngineError> {
    let mut records = Vec::with_capacity(facts.len());
    let mut sequence = current;
    let mut clock = state.clock;

    for fact in facts {
        sequence = sequence.next();
        if let Fact::DayAdvanced(data) = fact {
            clock = data.clock;
        }
        let record = FactRecord::builder()
            .entity_id(entity_id)
            .sequence(sequence)
            .clock(clock)
            .type_tag(fact.type_tag())
            .payload_raw(fact.to_payload()?)
            .build();
        records.push(record);
    }

    Ok(records)
}
