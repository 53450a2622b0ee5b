use domain::CommandRejection;
use fact_log::FactRecord;

/// The tri-state result of executing a command.
///
/// Every `execute` call resolves to one of these; domain failures never
/// cross the engine boundary as errors.
#[derive(Debug, Clone)]
pub enum ExecutionOutcome {
    /// The command was accepted and its facts were appended to the log,
    /// in emission order.
    Accepted {
        /// The persisted records, as stamped into the log.
        facts: Vec<FactRecord>,
    },

    /// The command failed validation. Zero facts were produced and the
    /// log is unchanged.
    Rejected {
        /// Why the command was rejected.
        rejection: CommandRejection,
    },

    /// No handler is registered for the command's type. This is a
    /// configuration error, distinct from a domain rejection, so callers
    /// can tell "bad input" from "bad deployment".
    UnknownCommand {
        /// The unrecognized command type.
        command_type: String,
    },
}

impl ExecutionOutcome {
    /// Returns true if the command was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, ExecutionOutcome::Accepted { .. })
    }

    /// Returns true if the command was rejected by validation.
    pub fn is_rejected(&self) -> bool {
        matches!(self, ExecutionOutcome::Rejected { .. })
    }

    /// The appended facts; empty unless the command was accepted.
    pub fn facts(&self) -> &[FactRecord] {
        match self {
            ExecutionOutcome::Accepted { facts } => facts,
            _ => &[],
        }
    }

    /// A human-readable description of the outcome.
    pub fn message(&self) -> String {
        match self {
            ExecutionOutcome::Accepted { facts } => {
                format!("accepted: {} fact(s) appended", facts.len())
            }
            ExecutionOutcome::Rejected { rejection } => format!("rejected: {rejection}"),
            ExecutionOutcome::UnknownCommand { command_type } => {
                format!("unknown command type: {command_type}")
            }
        }
    }
}
