//! Stepwise bytecode virtual machine with snapshot-based rewind.
//!
//! The VM executes exactly one instruction per [`Vm::tick`] call and
//! returns control to its driver between instructions. Action opcodes
//! are never applied here: the VM hands back an action descriptor and
//! the driver applies it to the world simulator. Before every tick the
//! VM captures an atomic snapshot of its own state and the world,
//! enabling [`Vm::rewind`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bus;
pub mod event;
pub mod history;
pub mod options;
pub mod vm;

pub use bus::EventBus;
pub use event::{Event, EventKind, EventPayload};
pub use history::{HistoryRing, VmSnapshot};
pub use options::{VmConfigError, VmOptions};
pub use vm::{ExecState, Vm, VmError};
