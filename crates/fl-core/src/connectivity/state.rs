use serde::{Deserialize, Serialize};

/// Last known usability of the network link.
///
/// Produced by the connectivity monitor and consumed by the sync
/// indicator and the drain scheduler. There is deliberately no
/// `Connecting` in between: the queue only cares whether an upload
/// attempt is worth starting right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityState {
    Online,
    Offline,
}

impl ConnectivityState {
    pub fn is_online(self) -> bool {
        self == Self::Online
    }

    pub fn from_reachable(reachable: bool) -> Self {
        if reachable {
            Self::Online
        } else {
            Self::Offline
        }
    }
}
