//! Spoken command model
//!
//! A transcribed utterance becomes exactly one [`Command`]. The interpreter,
//! [`interpret()`], is a pure function of its input string.

mod interpret;

use std::fmt;

pub use interpret::{NUMBER_WORDS, interpret, normalize};

/// Highest brightness level the relay server accepts
pub const MAX_BRIGHTNESS: u8 = 100;

/// One of the four relay channels on the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelayId(u8);

impl RelayId {
    /// Number of relay channels
    pub const COUNT: u8 = 4;

    /// Create a relay id, or `None` if `id` is outside 1-4
    #[must_use]
    pub const fn new(id: u8) -> Option<Self> {
        if id >= 1 && id <= Self::COUNT {
            Some(Self(id))
        } else {
            None
        }
    }

    /// Numeric channel
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for RelayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Intent extracted from a transcribed utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Report the state of every relay
    QueryState,
    /// Switch a relay on or off
    SetPower {
        /// Target relay
        relay: RelayId,
        /// Desired power state
        on: bool,
    },
    /// Set a relay's brightness (0-100)
    SetBrightness {
        /// Target relay
        relay: RelayId,
        /// Clamped brightness level
        level: u8,
    },
    /// Text that matched no command pattern
    Unrecognized(String),
}

impl Command {
    /// Whether dispatching this command touches the network
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueryState => write!(f, "query state"),
            Self::SetPower { relay, on } => {
                write!(f, "relay {relay} {}", if *on { "on" } else { "off" })
            }
            Self::SetBrightness { relay, level } => {
                write!(f, "relay {relay} brightness {level}%")
            }
            Self::Unrecognized(text) => write!(f, "unrecognized: {text:?}"),
        }
    }
}
