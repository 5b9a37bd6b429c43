//! Relay server wire types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::command::RelayId;

/// State of one relay as reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayStatus {
    /// Whether the relay is energized
    pub on: bool,
    /// Brightness level (0-100)
    pub brightness: u8,
}

/// `GET /status` body: relay id (as a string key) to state
pub type StatusMap = BTreeMap<String, RelayStatus>;

/// Result of dispatching one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// States of all relays
    Status(StatusMap),
    /// Relay state after a power change
    Power {
        /// Relay that was switched
        relay: RelayId,
        /// State reported by the server
        status: RelayStatus,
    },
    /// Relay state after a brightness change
    Brightness {
        /// Relay that was dimmed
        relay: RelayId,
        /// State reported by the server
        status: RelayStatus,
    },
    /// Nothing was sent; the text matched no command
    Unrecognized(String),
}
