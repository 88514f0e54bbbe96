//! Connectivity domain: the last known usability of the network link.

mod state;

pub use state::ConnectivityState;
