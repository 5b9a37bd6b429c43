use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use voxrelay::pipeline::report;
use voxrelay::voice::{AudioCapture, SpeechToText, UtteranceDetector, rms};
use voxrelay::{Config, Pipeline, RelayClient};

/// voxrelay - Voice remote control for a relay server
#[derive(Parser)]
#[command(name = "voxrelay", version, about)]
struct Cli {
    /// Relay server base URL (overrides config and `VOXRELAY_SERVER_URL`)
    #[arg(short, long)]
    server: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Listen for spoken commands (default)
    Listen,
    /// Interpret typed text and send it to the relay server
    Exec {
        /// Command text, e.g. "relay 2 brightness 40"
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Show how text would be interpreted, without sending anything
    Parse {
        /// Command text
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Print the state of every relay
    Status,
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,voxrelay=info",
        1 => "info,voxrelay=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    let command = cli.command.unwrap_or(Command::Listen);

    if let Command::Parse { text } = &command {
        parse(&text.join(" "));
        return Ok(());
    }
    if let Command::TestMic { duration } = command {
        return test_mic(duration).await;
    }

    let mut config = Config::load()?;
    if let Some(url) = cli.server.as_deref() {
        config = config.with_server_url(url)?;
    }
    tracing::debug!(?config, "loaded configuration");

    let relay = RelayClient::new(&config.server.url, config.server.timeout)?;

    match command {
        Command::Exec { text } => {
            let text = text.join(" ");
            let parsed = voxrelay::interpret(&text);
            report::parsed(&parsed);
            match relay.dispatch(&parsed).await {
                Ok(outcome) => report::outcome(&outcome),
                Err(e) => {
                    report::failure(&parsed, &e);
                    return Err(e.into());
                }
            }
        }
        Command::Status => {
            let states = relay.status().await?;
            report::outcome(&voxrelay::Outcome::Status(states));
        }
        Command::Listen => listen(&config, relay).await?,
        Command::Parse { .. } | Command::TestMic { .. } => {}
    }

    Ok(())
}

/// Run the voice loop until Ctrl-C or a fatal STT error
#[allow(clippy::future_not_send)]
async fn listen(config: &Config, relay: RelayClient) -> anyhow::Result<()> {
    let api_key = config.stt_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "no API key for {} STT (set OPENAI_API_KEY or DEEPGRAM_API_KEY)",
            config.voice.stt_provider
        )
    })?;

    let stt = SpeechToText::new(
        config.voice.stt_provider,
        api_key.to_string(),
        config.voice.stt_model.clone(),
        config.voice.stt_timeout,
    )?;

    tracing::info!(
        server = %config.server.url,
        stt = %config.voice.stt_provider,
        model = %config.voice.stt_model,
        "starting voxrelay"
    );

    let pipeline = Pipeline::new(relay, stt);
    let mut capture = AudioCapture::new()?;
    let mut detector = UtteranceDetector::new(config.voice.min_energy);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    pipeline
        .run(&mut capture, &mut detector, config.voice.calibration, shutdown)
        .await?;

    Ok(())
}

/// Print normalization and classification for `text`
fn parse(text: &str) {
    println!("Normalized: {}", voxrelay::normalize(&text.to_lowercase()));
    report::parsed(&voxrelay::interpret(text));
}

/// Test microphone input
#[allow(clippy::future_not_send)]
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let mut capture = AudioCapture::new()?;
    capture.start()?;

    println!("Device: {}", capture.device_name());
    println!("Sample rate: {} Hz", capture.sample_rate());
    println!("---");

    for i in 0..duration {
        let samples = capture.record(Duration::from_secs(1)).await;
        let energy = rms(&samples);
        let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 100.0).min(50.0) as usize;
        let meter: String = "#".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!(
            "[{:2}s] RMS: {:.4} | Peak: {:.4} | [{}]",
            i + 1,
            energy,
            peak,
            meter
        );
    }

    capture.stop();

    println!("\n---");
    println!("If you saw movement in the meter, your mic is working.");
    println!(
        "Speech should rise well above the default threshold of {}.",
        voxrelay::voice::DEFAULT_MIN_ENERGY
    );

    Ok(())
}
