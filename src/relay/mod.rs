//! Relay server client
//!
//! The server exposes three GET endpoints, each answering with a small JSON
//! object:
//!
//! | Request | Path | Body |
//! |---|---|---|
//! | all states | `/status` | `{"1": {"on": .., "brightness": ..}, ..}` |
//! | power | `/relay/{id}/{on\|off}` | `{"on": .., "brightness": ..}` |
//! | brightness | `/relay/{id}/brightness/{0-100}` | `{"on": .., "brightness": ..}` |
//!
//! State lives on the server. Nothing here is cached between commands.

mod client;
mod types;

pub use client::RelayClient;
pub use types::{Outcome, RelayStatus, StatusMap};
