//! Voice front end
//!
//! Handles microphone capture, utterance endpointing, and speech-to-text.

mod capture;
mod stt;
mod utterance;

pub use capture::{AudioCapture, SAMPLE_RATE, rms, samples_to_wav};
pub use stt::{SpeechToText, SttProvider, Transcriber};
pub use utterance::{DEFAULT_MIN_ENERGY, DetectorState, UtteranceDetector};
