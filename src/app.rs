//! Command dispatch: wires config, client, renderer, history, and player
//! together for each CLI subcommand.

use crate::card::fonts::FontSet;
use crate::card::CardRenderer;
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::controller::ManifestController;
use crate::generation::GenerationClient;
use crate::history::HistoryStore;
use crate::speech::{AudioClip, SpeechPlayer};
use anyhow::Result;
use chrono::{Local, Utc};
use std::path::PathBuf;
use std::sync::mpsc;

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Manifest { desire, out, speak } => manifest(config, desire, out, speak).await,
        Commands::History => history(&config),
        Commands::Card {
            desire,
            affirmation,
            out,
        } => card(&config, &desire, &affirmation, out),
        Commands::Speak { text } => speak(&config, &text).await,
    }
}

async fn manifest(
    config: Config,
    desire: Option<String>,
    out: Option<PathBuf>,
    speak_after: bool,
) -> Result<()> {
    let desire = match desire {
        Some(desire) => desire,
        None => dialoguer::Input::<String>::new()
            .with_prompt("What do you wish to bring into reality?")
            .interact_text()?,
    };

    let fonts = FontSet::load(&config.fonts)?;
    let client = GenerationClient::new(&config);
    let store = HistoryStore::open(config.history_path(), config.history_limit);
    let mut controller =
        ManifestController::new(client, CardRenderer::new(fonts), store, rand::rng());

    println!("Aligning frequencies...");
    match controller.manifest(&desire).await {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Frequency disturbance: {}", e.user_message());
            return Err(e.into());
        }
    }

    let result = controller.result().expect("complete cycle has a result");
    println!("\n\"{}\"\n", result.original_desire);

    println!("Affirmations:");
    for (n, affirmation) in result.content.affirmations.iter().enumerate() {
        println!("  {}. {affirmation}", n + 1);
    }

    println!("\nScripting:\n  {}", result.content.scripting);

    println!("\nVisualizations:");
    for visualization in &result.content.visualizations {
        println!("  ✦ {visualization}");
    }

    println!("\nAction steps:");
    for (n, action) in result.content.actions.iter().enumerate() {
        println!("  Step {}: {action}", n + 1);
    }

    let path = out.unwrap_or_else(|| {
        config
            .workspace_dir
            .join(format!("wishtheory-card-{}.png", Utc::now().timestamp_millis()))
    });
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    controller
        .last_card()
        .expect("complete cycle has a card")
        .save(&path)?;
    println!("\nVision card saved to {}", path.display());

    if speak_after {
        let affirmation = controller
            .primary_affirmation()
            .expect("complete cycle chose an affirmation")
            .to_string();
        println!("Speaking: {affirmation}");
        let mut player = SpeechPlayer::system();
        let (tx, rx) = mpsc::channel();
        controller
            .speak_affirmation(
                &mut player,
                0,
                &affirmation,
                Box::new(move || {
                    let _ = tx.send(());
                }),
            )
            .await?;
        let _ = rx.recv();
    }

    Ok(())
}

fn history(config: &Config) -> Result<()> {
    let store = HistoryStore::open(config.history_path(), config.history_limit);
    if store.entries().is_empty() {
        println!("No history yet");
        return Ok(());
    }
    println!("Past manifestations:");
    for entry in store.entries() {
        println!("  {}  {}", entry.date, entry.desire);
    }
    Ok(())
}

fn card(config: &Config, desire: &str, affirmation: &str, out: Option<PathBuf>) -> Result<()> {
    let fonts = FontSet::load(&config.fonts)?;
    let renderer = CardRenderer::new(fonts);
    let rendered = renderer.render(desire, affirmation, Some(Local::now().date_naive()))?;
    let path = out.unwrap_or_else(|| {
        PathBuf::from(format!("wishtheory-card-{}.png", Utc::now().timestamp_millis()))
    });
    rendered.save(&path)?;
    println!("Vision card saved to {}", path.display());
    Ok(())
}

async fn speak(config: &Config, text: &str) -> Result<()> {
    let client = GenerationClient::new(config);
    let payload = client.generate_audio(text).await?;
    let clip = AudioClip::from_pcm16_base64(&payload)?;
    println!("Playing ({:.1}s)...", clip.duration_secs());

    let mut player = SpeechPlayer::system();
    let (tx, rx) = mpsc::channel();
    player.play(
        "cli",
        clip,
        Box::new(move || {
            let _ = tx.send(());
        }),
    )?;
    let _ = rx.recv();
    Ok(())
}
