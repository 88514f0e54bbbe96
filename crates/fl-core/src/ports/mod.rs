//! Port interfaces for the application layer
//!
//! Ports define the contract between the application logic (use cases)
//! and infrastructure implementations. This follows Hexagonal Architecture
//! principles, allowing the core business logic to remain independent of
//! external dependencies.
//!
//! The queue store is the single shared mutable resource of the
//! subsystem; only the enqueue path and the drain path write to it.

mod clock;
mod config;
mod connectivity;
pub mod errors;
mod upload_endpoint;
mod upload_queue;

pub use clock::ClockPort;
pub use config::ConfigPort;
pub use connectivity::{ConnectivityListener, ConnectivityMonitorPort, Subscription};
pub use errors::{QueueError, UploadError};
pub use upload_endpoint::UploadEndpointPort;
pub use upload_queue::{QueueCounts, UploadPatch, UploadQueuePort};
