use anyhow::Result;
use aryavoice::cli::{Cli, Commands};
use aryavoice::config::Config;
use clap::{CommandFactory, Parser};
use owo_colors::OwoColorize;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // Bare invocation runs the voice assistant
            let config = load_config(cli.config.as_deref())?;
            run_voice(config, cli.quiet, cli.verbose).await;
        }
        Some(Commands::Voice {
            device,
            window,
            listen_secs,
            no_tts,
        }) => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(index) = device {
                config.audio.device = Some(index);
            }
            if let Some(secs) = window {
                config.wake.window_ceiling_secs = secs;
            }
            if let Some(secs) = listen_secs {
                config.wake.listen_secs = secs;
            }
            if no_tts {
                config.tts.enabled = false;
            }
            run_voice(config, cli.quiet, cli.verbose).await;
        }
        Some(Commands::Chat) => {
            let config = load_config(cli.config.as_deref())?;
            let quiet = cli.quiet;
            // Blocking loop over stdin; keep it off the async runtime
            tokio::task::spawn_blocking(move || aryavoice::app::run_chat(&config, quiet)).await??;
        }
        Some(Commands::Devices) => {
            list_audio_devices()?;
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "aryavoice", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/aryavoice/config.toml)
/// 3. Built-in defaults with environment variable overrides
fn load_config(custom_path: Option<&std::path::Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path)?
    } else {
        let default_path = Config::default_path();
        Config::load_or_default(&default_path)
    };

    Ok(config.with_env_overrides())
}

/// Run the voice assistant, exiting non-zero on a fatal startup or
/// pipeline failure.
#[cfg(feature = "cpal-audio")]
async fn run_voice(config: Config, quiet: bool, verbosity: u8) {
    let result =
        tokio::task::spawn_blocking(move || aryavoice::app::run_voice(&config, quiet, verbosity))
            .await;

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(join_error) => {
            eprintln!("{}", format!("voice loop panicked: {join_error}").red());
            std::process::exit(1);
        }
    };

    if let Err(e) = outcome {
        eprintln!("{}", format!("Error: {e}").red());
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cpal-audio"))]
async fn run_voice(_config: Config, _quiet: bool, _verbosity: u8) {
    eprintln!(
        "{}",
        "This build has no audio support; rebuild with the cpal-audio feature".red()
    );
    std::process::exit(1);
}

/// List available audio input devices.
#[cfg(feature = "cpal-audio")]
fn list_audio_devices() -> Result<()> {
    let devices = aryavoice::audio::list_input_devices()?;

    if devices.is_empty() {
        eprintln!("No audio input devices found");
        std::process::exit(1);
    }

    println!("Available audio input devices:");
    for device in &devices {
        if device.recommended {
            println!(
                "  [{}] {} {}",
                device.index,
                device.name,
                "(recommended)".green()
            );
        } else {
            println!("  [{}] {}", device.index, device.name);
        }
    }

    Ok(())
}

#[cfg(not(feature = "cpal-audio"))]
fn list_audio_devices() -> Result<()> {
    eprintln!("This build has no audio support; rebuild with the cpal-audio feature");
    std::process::exit(1);
}
