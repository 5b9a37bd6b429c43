//! Console output for the listen loop

use crate::command::Command;
use crate::relay::{Outcome, RelayStatus};
use crate::Error;

/// Shown once when listening starts
pub const BANNER: &str =
    "Say commands like \"relay 2 on\", \"relay 3 brightness 50\", or \"state\"";

fn on_off(status: &RelayStatus) -> &'static str {
    if status.on { "ON" } else { "OFF" }
}

/// Lines describing a dispatch outcome
#[must_use]
pub fn outcome_lines(outcome: &Outcome) -> Vec<String> {
    match outcome {
        Outcome::Status(states) => {
            let mut lines = Vec::with_capacity(states.len() + 1);
            lines.push("Current States:".to_string());
            lines.extend(states.iter().map(|(id, st)| {
                format!(" Relay {id}: {}, Brightness {}%", on_off(st), st.brightness)
            }));
            lines
        }
        Outcome::Power { relay, status } => vec![format!(
            "Relay {relay} -> {}, Brightness {}%",
            on_off(status),
            status.brightness
        )],
        Outcome::Brightness { relay, status } => vec![format!(
            "Relay {relay} brightness set to {}% -> {}",
            status.brightness,
            on_off(status)
        )],
        Outcome::Unrecognized(_) => vec!["Unrecognized command format.".to_string()],
    }
}

/// Warning for a failed relay request
#[must_use]
pub fn failure_line(command: &Command, error: &Error) -> String {
    match command {
        Command::QueryState => format!("Failed to fetch status: {error}"),
        _ => format!("Command failed: {error}"),
    }
}

/// Print the transcript
pub fn heard(text: &str) {
    println!("Heard: {text}");
}

/// Line naming the command a transcript was parsed into
#[must_use]
pub fn parsed_line(command: &Command) -> String {
    format!("Command: {command}")
}

/// Print the parsed command
pub fn parsed(command: &Command) {
    println!("{}", parsed_line(command));
}

/// Print a dispatch outcome
pub fn outcome(outcome: &Outcome) {
    for line in outcome_lines(outcome) {
        println!("{line}");
    }
}

/// Print a relay request failure
pub fn failure(command: &Command, error: &Error) {
    println!("{}", failure_line(command, error));
}

/// Print the retry prompt for unintelligible audio
pub fn not_understood() {
    println!("Could not understand. Try again.");
}
