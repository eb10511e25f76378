//! Console ATC session - talk to AI controllers from a scripted scenario.
//!
//! Usage:
//!   cargo run -p aiatc-session -- --scenario world.json

use std::path::PathBuf;
use std::sync::Arc;

use aiatc_core::{AirportCatalog, Language};
use aiatc_session::console::{Command, Scenario, HELP};
use aiatc_session::{
    AtcEngine, Collaborators, ConsoleOutput, Config, HttpChatClient, SessionRuntime, Simulator,
};
use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "AI air traffic control in the terminal")]
struct Args {
    /// Scenario file with airports, pilot and aircraft state
    #[arg(long)]
    scenario: PathBuf,

    /// Airport names keyed by ICAO code, overriding scenario names
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Chat completions endpoint (overrides ATC_CHAT_URL)
    #[arg(long)]
    chat_url: Option<String>,

    /// Model name (overrides ATC_CHAT_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Session language, EN or FR (overrides ATC_LANGUAGE)
    #[arg(long)]
    language: Option<Language>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("aiatc_session=info".parse()?))
        .init();

    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(url) = args.chat_url {
        config.chat_url = url;
    }
    if let Some(model) = args.model {
        config.chat_model = model;
    }
    if let Some(language) = args.language {
        config.language = language;
    }

    let scenario = Scenario::load(&args.scenario)
        .with_context(|| format!("loading {}", args.scenario.display()))?;
    let (airports, mut catalog, simulator) = scenario.into_parts();
    tracing::info!("Loaded {} airports from {}", airports.len(), args.scenario.display());

    if let Some(path) = &args.catalog {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let names = AirportCatalog::from_json_str(&json)
            .with_context(|| format!("parsing {}", path.display()))?;
        tracing::info!("Loaded {} airport names from {}", names.len(), path.display());
        catalog.merge(names);
    }

    let simulator = Arc::new(simulator);
    let chat = HttpChatClient::from_config(&config)?;
    let collaborators = Collaborators {
        simulator: simulator.clone(),
        airports: Arc::new(airports),
        catalog: Arc::new(catalog),
        output: Arc::new(ConsoleOutput),
    };
    let engine = Arc::new(AtcEngine::new(config, collaborators, chat));
    let runtime = SessionRuntime::start(engine.clone());

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            Command::Tune(code) => {
                let code = match code {
                    Some(code) => Some(code),
                    None => {
                        let suggested = engine.suggested_frequency();
                        let prompt = engine.store().language().messages().enter_airport;
                        match &suggested {
                            Some(default) => println!("{} [{}]:", prompt, default),
                            None => println!("{}:", prompt),
                        }
                        lines
                            .next_line()
                            .await?
                            .map(|line| line.trim().to_string())
                            .filter(|line| !line.is_empty())
                            .or_else(|| suggested.map(|c| c.to_string()))
                    }
                };
                if let Err(e) = engine.tune_in(code.as_deref()) {
                    tracing::debug!("Tune-in not completed: {}", e);
                }
            }
            Command::Say(text) => {
                let text = match text {
                    Some(text) => text,
                    None => {
                        println!("{}", engine.store().language().messages().enter_message);
                        lines.next_line().await?.unwrap_or_default()
                    }
                };
                let engine = engine.clone();
                tokio::spawn(async move {
                    if let Err(e) = engine.transmit_text(Some(&text)).await {
                        tracing::debug!("Transmission not completed: {}", e);
                    }
                });
            }
            Command::Mode(selection) => engine.set_mode(selection),
            Command::Lang(language) => engine.set_language(language),
            Command::Goto(position) => {
                simulator.update(|scene| scene.aircraft = position);
                println!("Aircraft at {:.4}, {:.4}", position.lat, position.lon);
            }
            Command::Altitude(feet) => {
                simulator.update(|scene| {
                    scene.sea_altitude_ft = feet;
                    scene.on_ground = false;
                });
                println!("Altitude {:.0} ft", feet);
            }
            Command::Ground(on_ground) => {
                simulator.update(|scene| {
                    scene.on_ground = on_ground;
                    if on_ground {
                        scene.sea_altitude_ft = scene.ground_elevation_ft;
                        scene.airspeed_kts = 0.0;
                    }
                });
                println!("On ground: {}", on_ground);
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }

        if !runtime.is_tracking() {
            tracing::warn!("Proximity tracking stopped");
        }
    }

    tracing::info!("Pilot {} signing off", simulator.pilot().callsign);
    runtime.shutdown().await;
    Ok(())
}
