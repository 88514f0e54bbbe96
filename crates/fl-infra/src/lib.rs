pub mod connectivity;
pub mod db;
pub mod fs;
pub mod http;
pub mod settings;
pub mod time;

pub use connectivity::{ConnectivityMonitor, HttpReachabilityProbe, ReachabilityProbeTask};
pub use db::repositories::DieselUploadQueueRepository;
pub use http::HttpUploadEndpoint;
pub use time::SystemClock;
