//! Gateway - host-provided persistence and notification
//!
//! The state machine only talks to the host through two traits:
//! [`StateStore`] for durability and [`EventEmitter`] for lifecycle
//! notifications. Each has concrete adapters here so the broker can run
//! against a JSON file and a broadcast bus, or against in-memory fakes.

/// Broadcast event bus adapter.
pub mod bus;
/// Lifecycle event definitions.
pub mod events;
/// JSON file state store.
pub mod file_store;
/// Emitter that only logs.
pub mod log;
/// In-memory store and recording emitter.
pub mod memory;
/// Collaborator traits.
pub mod traits;

pub use bus::EventBus;
pub use events::KeyringEvent;
pub use file_store::{JsonFileStore, StateLock};
pub use log::TracingEmitter;
pub use memory::{MemoryStateStore, RecordingEmitter};
pub use traits::{EventEmitter, StateStore};

#[cfg(test)]
pub use traits::{MockEventEmitter, MockStateStore};

#[cfg(test)]
mod tests;
