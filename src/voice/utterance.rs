//! Utterance endpointing
//!
//! Splits the microphone stream into utterances using RMS energy: speech
//! starts when a block is louder than the threshold and ends after a run of
//! quiet blocks. The threshold is recalibrated from ambient noise before each
//! listen.

use super::capture::{SAMPLE_RATE, rms};

/// Default minimum energy to count a block as speech
pub const DEFAULT_MIN_ENERGY: f32 = 0.03;

/// Ambient RMS is multiplied by this to get the speech threshold
const AMBIENT_MULTIPLIER: f32 = 1.5;

/// Minimum loud audio before an utterance can complete (0.3 s)
const MIN_SPEECH_SAMPLES: usize = SAMPLE_RATE as usize * 3 / 10;

/// Silence that ends an utterance (0.5 s)
const SILENCE_SAMPLES: usize = SAMPLE_RATE as usize / 2;

/// Endpointer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    /// Waiting for speech
    Idle,
    /// Speech started, accumulating until silence
    Speaking,
}

/// Detects where spoken utterances begin and end
pub struct UtteranceDetector {
    min_energy: f32,
    threshold: f32,
    state: DetectorState,
    buffer: Vec<f32>,
    speech_samples: usize,
    silence_counter: usize,
}

impl UtteranceDetector {
    /// Create a detector whose threshold never drops below `min_energy`
    #[must_use]
    pub fn new(min_energy: f32) -> Self {
        let min_energy = min_energy.max(0.0);
        Self {
            min_energy,
            threshold: min_energy,
            state: DetectorState::Idle,
            buffer: Vec::new(),
            speech_samples: 0,
            silence_counter: 0,
        }
    }

    /// Adjust the speech threshold to the ambient noise in `ambient`
    ///
    /// Returns the new threshold.
    pub fn calibrate(&mut self, ambient: &[f32]) -> f32 {
        let noise = rms(ambient);
        self.threshold = (noise * AMBIENT_MULTIPLIER).max(self.min_energy);
        tracing::debug!(noise, threshold = self.threshold, "calibrated for ambient noise");
        self.threshold
    }

    /// Feed a block of samples
    ///
    /// Returns true once an utterance is complete; take it with
    /// [`take_utterance`](Self::take_utterance).
    pub fn process(&mut self, samples: &[f32]) -> bool {
        if samples.is_empty() {
            return false;
        }

        let energy = rms(samples);
        let is_speech = energy > self.threshold;

        match self.state {
            DetectorState::Idle => {
                if is_speech {
                    self.state = DetectorState::Speaking;
                    self.buffer.clear();
                    self.buffer.extend_from_slice(samples);
                    self.speech_samples = samples.len();
                    self.silence_counter = 0;
                    tracing::trace!(energy, "speech detected");
                }
                false
            }
            DetectorState::Speaking => {
                self.buffer.extend_from_slice(samples);

                if is_speech {
                    self.speech_samples += samples.len();
                    self.silence_counter = 0;
                } else {
                    self.silence_counter += samples.len();
                }

                if self.is_complete() {
                    tracing::debug!(samples = self.buffer.len(), "utterance complete");
                    return true;
                }

                // Long silence after a blip too short to be speech
                if self.silence_counter > SILENCE_SAMPLES * 2 {
                    tracing::trace!("no speech, resetting");
                    self.reset();
                }

                false
            }
        }
    }

    /// Whether the buffered audio holds a finished utterance
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == DetectorState::Speaking
            && self.silence_counter > SILENCE_SAMPLES
            && self.speech_samples >= MIN_SPEECH_SAMPLES
    }

    /// Take the buffered utterance and return to idle
    pub fn take_utterance(&mut self) -> Vec<f32> {
        let utterance = std::mem::take(&mut self.buffer);
        self.reset();
        utterance
    }

    /// Buffered audio so far
    #[must_use]
    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    /// Reset to idle, discarding buffered audio
    pub fn reset(&mut self) {
        self.state = DetectorState::Idle;
        self.buffer.clear();
        self.speech_samples = 0;
        self.silence_counter = 0;
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> DetectorState {
        self.state
    }
}

impl Default for UtteranceDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ENERGY)
    }
}
