use anyhow::Result;
use avatar_chat::cli::TranscribeCli;
use avatar_chat::config::Config;
use avatar_chat::defaults::gpu_backend;
use avatar_chat::logging;
use avatar_chat::models::catalog::list_models;
use avatar_chat::models::download::format_speech_model;
use avatar_chat::transcription;
use avatar_chat::version_string;
use clap::Parser;
use owo_colors::OwoColorize;

fn main() -> Result<()> {
    let cli = TranscribeCli::parse();
    logging::init(cli.verbose, cli.quiet);

    let mut config = Config::resolve(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    if cli.list_models {
        print_speech_models(&config.speech.model);
        return Ok(());
    }

    config.validate_speech()?;

    tracing::info!(
        version = %version_string(),
        backend = gpu_backend(),
        model = %config.speech.model,
        audio = %config.speech.audio_path.display(),
        "starting avatar-transcribe"
    );

    transcription::run(&config)?;
    Ok(())
}

fn print_speech_models(current: &str) {
    println!("Whisper models (current: {}):", current.green());
    for model in list_models() {
        let marker = if model.name == current {
            "●".green().to_string()
        } else {
            " ".to_string()
        };
        println!("  {} {}", marker, format_speech_model(model));
    }
}
