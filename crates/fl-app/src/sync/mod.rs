//! Long-running sync tasks: the drain scheduler and the connectivity
//! indicator model.

pub mod indicator;
pub mod scheduler;

pub use indicator::{SyncBadge, SyncIndicator};
pub use scheduler::{connectivity_trigger, DrainScheduler, DrainTrigger};
