//! Execution events.
//!
//! Everything observable about a run — script output, yielded actions,
//! state transitions, failures — is an [`Event`] appended to the VM's
//! log and dispatched to subscribers. Event order matches emission
//! order matches execution order.

use std::time::{SystemTime, UNIX_EPOCH};

use autodrone_core::{Action, Value};

use crate::vm::ExecState;

/// The closed set of event categories. Subscriptions are keyed by
/// category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A `log` statement produced a value.
    Log,
    /// An action opcode yielded an action descriptor.
    Action,
    /// The execution state changed.
    StateChange,
    /// A runtime error stopped the run.
    Error,
    /// A non-fatal problem, e.g. a rejected action.
    Warning,
}

/// The data carried by an event.
#[derive(Clone, Debug, PartialEq)]
pub enum EventPayload {
    /// A logged value.
    Log {
        /// The value the script logged.
        value: Value,
    },
    /// A yielded action descriptor.
    Action {
        /// The descriptor handed to the driver.
        action: Action,
    },
    /// An execution state transition.
    StateChange {
        /// State before the transition.
        from: ExecState,
        /// State after the transition.
        to: ExecState,
    },
    /// A fatal runtime error.
    Error {
        /// Error message.
        message: String,
        /// Faulting source line, 0 if unknown.
        line: u32,
        /// Hint for the learner, when one applies.
        hint: Option<&'static str>,
    },
    /// A non-fatal problem.
    Warning {
        /// Warning message.
        message: String,
        /// Related source line, 0 if unknown.
        line: u32,
    },
}

impl EventPayload {
    /// The category this payload belongs to.
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::Log { .. } => EventKind::Log,
            EventPayload::Action { .. } => EventKind::Action,
            EventPayload::StateChange { .. } => EventKind::StateChange,
            EventPayload::Error { .. } => EventKind::Error,
            EventPayload::Warning { .. } => EventKind::Warning,
        }
    }
}

/// One entry in the event log.
///
/// `tick` is the VM's instruction count at emission. `timestamp_ms` is
/// wall-clock and exists for host display only; nothing downstream
/// depends on it.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// What happened.
    pub payload: EventPayload,
    /// Instruction count at emission.
    pub tick: u32,
    /// Milliseconds since the Unix epoch at emission.
    pub timestamp_ms: u64,
}

impl Event {
    /// Build an event stamped with the current wall clock.
    pub fn now(payload: EventPayload, tick: u32) -> Event {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Event {
            payload,
            tick,
            timestamp_ms,
        }
    }

    /// The event's category.
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}
