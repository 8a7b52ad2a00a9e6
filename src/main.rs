use anyhow::{Context, Result};
use avatar_chat::app::run_chat;
use avatar_chat::cli::ChatCli;
use avatar_chat::config::Config;
use avatar_chat::logging;
use avatar_chat::models::chat_catalog::list_chat_models;
use avatar_chat::models::download::format_chat_model;
use avatar_chat::version_string;
use clap::Parser;
use owo_colors::OwoColorize;

fn main() -> Result<()> {
    let cli = ChatCli::parse();
    logging::init(cli.verbose, cli.quiet);

    let mut config = Config::resolve(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    if cli.list_models {
        print_chat_models(&config.chat.model);
        return Ok(());
    }

    config.validate_chat()?;

    let utterance = cli
        .utterance
        .as_deref()
        .context("an utterance is required")?;

    tracing::info!(
        version = %version_string(),
        model = %config.chat.model,
        accelerator = ?config.runtime.accelerator,
        "starting avatar-chat"
    );

    run_chat(&config, utterance)?;
    Ok(())
}

fn print_chat_models(current: &str) {
    println!("Chat models (current: {}):", current.green());
    for info in list_chat_models() {
        let marker = if info.name == current {
            "●".green().to_string()
        } else {
            " ".to_string()
        };
        println!("  {} {}", marker, format_chat_model(info));
    }
}
