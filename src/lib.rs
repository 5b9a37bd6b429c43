//! voxrelay - voice remote control for a relay server
//!
//! This library provides the pieces of the `voxrelay` binary:
//! - Voice front end (capture, utterance endpointing, STT)
//! - Command interpretation from transcribed text
//! - Relay server client
//! - The listen loop tying them together
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   WAV   ┌──────────────┐  text  ┌──────────────┐
//! │  Microphone  │────────▶│  STT service │───────▶│  Interpreter │
//! │   (cpal)     │         │ (Whisper/DG) │        │  (command)   │
//! └──────────────┘         └──────────────┘        └──────┬───────┘
//!                                                         │ Command
//!                                                  ┌──────▼───────┐
//!                                                  │ Relay server │
//!                                                  │  (HTTP GET)  │
//!                                                  └──────────────┘
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod relay;
pub mod voice;

pub use command::{Command, RelayId, interpret, normalize};
pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::Pipeline;
pub use relay::{Outcome, RelayClient, RelayStatus, StatusMap};
