//! # fieldlink
//!
//! Offline upload queue and connectivity-aware sync core for the
//! FieldLink field-operations client.
//!
//! Files captured in the field (trip proofs, delivery receipts, KYC
//! documents) are written durably to a local SQLite queue the moment
//! they are taken, online or not, and drained to the platform's upload
//! endpoint whenever connectivity allows. The crate is split the
//! hexagonal way: `fl-core` holds the domain and ports, `fl-infra` the
//! SQLite/HTTP/probe adapters, `fl-app` the use cases and sync tasks.
//! This root crate only assembles them.

pub mod bootstrap;

pub use bootstrap::SyncRuntime;
pub use fl_app;
pub use fl_core;
pub use fl_infra;
