//! Listen loop
//!
//! Each iteration runs four stages in order and never overlaps two:
//!
//! ```text
//! capture ──▶ transcribe ──▶ interpret ──▶ dispatch ──▶ report
//! (mic)       (STT API)      (pure)        (relay GET)
//! ```
//!
//! An unintelligible utterance or a failed relay request is reported and the
//! loop continues. Any other transcription failure ends the loop.

pub mod report;

use std::future::Future;
use std::time::Duration;

use crate::command;
use crate::relay::{Outcome, RelayClient};
use crate::voice::{AudioCapture, SAMPLE_RATE, Transcriber, UtteranceDetector, samples_to_wav};
use crate::Result;

/// How often the capture buffer is drained into the detector
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Transcribes, interprets, and dispatches utterances
pub struct Pipeline<T> {
    relay: RelayClient,
    transcriber: T,
}

impl<T: Transcriber> Pipeline<T> {
    /// Create a pipeline sending commands through `relay`
    pub const fn new(relay: RelayClient, transcriber: T) -> Self {
        Self { relay, transcriber }
    }

    /// Interpret a transcript, dispatch it, and report the outcome
    ///
    /// Relay failures are reported here; callers only need the result to
    /// inspect what happened.
    ///
    /// # Errors
    ///
    /// Returns the relay error after reporting it
    pub async fn handle_transcript(&self, heard: &str) -> Result<Outcome> {
        let command = command::interpret(heard);
        tracing::debug!(heard, command = %command, "parsed command");
        report::parsed(&command);

        if !command.is_actionable() {
            tracing::warn!(heard, "unrecognized command");
        }

        match self.relay.dispatch(&command).await {
            Ok(outcome) => {
                report::outcome(&outcome);
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(error = %e, command = %command, "relay request failed");
                report::failure(&command, &e);
                Err(e)
            }
        }
    }

    /// Transcribe one utterance and act on it
    ///
    /// # Errors
    ///
    /// Returns error only when transcription fails for a reason other than
    /// unintelligible audio; that ends the listen loop.
    pub async fn handle_audio(&self, samples: &[f32]) -> Result<()> {
        let wav = samples_to_wav(samples, SAMPLE_RATE)?;

        let heard = match self.transcriber.transcribe(&wav).await {
            Ok(text) => text.to_lowercase(),
            Err(e) if e.is_recoverable_transcription() => {
                tracing::info!("speech not understood");
                report::not_understood();
                return Ok(());
            }
            Err(e) => {
                tracing::error!(error = %e, "transcription service failed");
                println!("API error: {e}");
                return Err(e);
            }
        };

        report::heard(&heard);
        // Relay failures are already reported and never stop the loop
        let _ = self.handle_transcript(&heard).await;
        Ok(())
    }

    /// Listen until `shutdown` resolves or transcription fails fatally
    ///
    /// Ambient noise is sampled for `calibration` before every utterance.
    ///
    /// # Errors
    ///
    /// Returns error if capture cannot start or the STT service fails
    #[allow(clippy::future_not_send)]
    pub async fn run(
        &self,
        capture: &mut AudioCapture,
        detector: &mut UtteranceDetector,
        calibration: Duration,
        shutdown: impl Future<Output = ()>,
    ) -> Result<()> {
        tokio::pin!(shutdown);

        capture.start()?;
        println!("{}", report::BANNER);
        tracing::info!(server = %self.relay.base_url(), "listening for commands");

        let result = loop {
            let samples = tokio::select! {
                () = &mut shutdown => break Ok(()),
                samples = capture_utterance(capture, detector, calibration) => samples,
            };

            tokio::select! {
                () = &mut shutdown => break Ok(()),
                result = self.handle_audio(&samples) => {
                    if let Err(e) = result {
                        break Err(e);
                    }
                }
            }
        };

        capture.stop();
        if result.is_ok() {
            tracing::info!("shutdown requested");
        }
        result
    }
}

/// Calibrate for ambient noise, then wait for one complete utterance
pub async fn capture_utterance(
    capture: &AudioCapture,
    detector: &mut UtteranceDetector,
    calibration: Duration,
) -> Vec<f32> {
    detector.reset();
    if !calibration.is_zero() {
        let ambient = capture.record(calibration).await;
        detector.calibrate(&ambient);
    }

    println!("Listening...");
    capture.clear_buffer();

    loop {
        tokio::time::sleep(POLL_INTERVAL).await;
        let samples = capture.take_buffer();
        if detector.process(&samples) {
            return detector.take_utterance();
        }
    }
}
