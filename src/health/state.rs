//! Replica health state machine.

use serde::{Deserialize, Serialize};

/// Health state of a replica, stored as an `AtomicU8` on the registry entry.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplicaState {
    Disconnected = 0,
    Connected = 1,
    Connecting = 2,
    Error = 3,
}

impl From<u8> for ReplicaState {
    fn from(val: u8) -> Self {
        match val {
            1 => ReplicaState::Connected,
            2 => ReplicaState::Connecting,
            3 => ReplicaState::Error,
            _ => ReplicaState::Disconnected,
        }
    }
}

impl ReplicaState {
    /// Only `Connected` replicas are eligible for query selection.
    pub fn is_connected(&self) -> bool {
        matches!(self, ReplicaState::Connected)
    }
}
