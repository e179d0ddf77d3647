//! Faction AI - Sandbox runner
//!
//! Loads a scenario into the in-memory sandbox world, then either plays a
//! number of turns for every faction or opens a chat with one faction.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::runtime::Runtime;

use faction_ai::core::config::AiConfig;
use faction_ai::core::error::Result;
use faction_ai::game::SandboxWorld;
use faction_ai::llm::{LlmClient, LlmPlanGenerator, LlmResponseGenerator};
use faction_ai::memory::{InMemoryStore, JsonFileStore, MemoryStore};
use faction_ai::{DecisionOrchestrator, TurnReport};

/// Faction AI - run faction turns or talk to a faction in a sandbox scenario
#[derive(Parser, Debug)]
#[command(name = "faction-ai")]
#[command(about = "Run computer-controlled factions against a sandbox scenario")]
struct Args {
    /// Scenario TOML file
    #[arg(long, default_value = "data/scenarios/border_war.toml")]
    scenario: PathBuf,

    /// Engine config TOML file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of turns to play
    #[arg(long, default_value_t = 3)]
    turns: u32,

    /// Chat with this faction instead of playing turns
    #[arg(long)]
    chat: Option<String>,

    /// Persist faction memory as JSON files in this directory
    #[arg(long)]
    memory_dir: Option<PathBuf>,

    /// Use the LLM generators (needs LLM_API_KEY)
    #[arg(long, default_value_t = false)]
    llm: bool,

    /// Print full plan reasoning and every command result
    #[arg(long, short = 'v', default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("faction_ai=info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AiConfig::load(path)?,
        None => AiConfig::default(),
    };
    let world = Arc::new(SandboxWorld::load(&args.scenario)?);

    let store: Arc<dyn MemoryStore> = match &args.memory_dir {
        Some(dir) => Arc::new(JsonFileStore::new(dir.clone(), config.interaction_cap)),
        None => Arc::new(InMemoryStore::new(config.interaction_cap)),
    };

    let mut orchestrator =
        DecisionOrchestrator::new(world.clone(), world.clone(), store, config.clone());
    if args.llm {
        match LlmClient::from_env() {
            Ok(client) => {
                tracing::info!("Using LLM generators ({})", client.model());
                orchestrator = orchestrator
                    .with_plan_generator(Arc::new(LlmPlanGenerator::new(client.clone())))
                    .with_response_generator(Arc::new(LlmResponseGenerator::new(client)));
            }
            Err(e) => {
                tracing::warn!("LLM unavailable ({}) - using rule-based generators", e);
            }
        }
    }
    let orchestrator = Arc::new(orchestrator);

    let rt = Runtime::new()?;

    if let Some(faction) = &args.chat {
        return chat_loop(&rt, &orchestrator, faction);
    }

    let factions: Vec<String> = world
        .factions()
        .into_iter()
        .filter(|f| *f != config.player_faction)
        .collect();
    tracing::info!("Playing {} turns for {} factions", args.turns, factions.len());

    for _ in 0..args.turns {
        let reports = rt.block_on(orchestrator.decide_all(&factions));
        for report in &reports {
            print_report(report, args.verbose);
        }
        let turn = world.advance_turn();
        println!("--- advanced to turn {} ---\n", turn);
    }

    for faction in &factions {
        println!("{}", orchestrator.status_report(faction));
    }

    Ok(())
}

fn chat_loop(rt: &Runtime, orchestrator: &Arc<DecisionOrchestrator>, faction: &str) -> Result<()> {
    println!("\n=== Talking to {} ===", faction);
    println!("  status / s  - Show the faction's status");
    println!("  quit / q    - Leave");
    println!();

    loop {
        print!("you> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }
        if input == "status" || input == "s" {
            println!("{}", orchestrator.status_report(faction));
            continue;
        }

        let reply = rt.block_on(orchestrator.process_player_message(faction, input));
        println!("{}> {}", faction, reply);
    }

    Ok(())
}

fn print_report(report: &TurnReport, verbose: bool) {
    println!(
        "[turn {}] {} ({}), plan from {}: {}",
        report.turn, report.faction, report.personality, report.plan_source, report.plan.summary
    );
    if verbose && !report.plan.reasoning.is_empty() {
        println!("  reasoning: {}", report.plan.reasoning);
    }

    for result in &report.execution_results {
        if result.success {
            if verbose {
                println!(
                    "  ok   {} - {}",
                    result.command,
                    result.detail.as_deref().unwrap_or("")
                );
            }
        } else {
            println!(
                "  FAIL {} - {}",
                result.command,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    if let Some(diplomacy) = &report.diplomacy {
        let stance = if diplomacy.decision.declare_war { "war" } else { "peace" };
        println!(
            "  diplomacy: {} (war chance {:.3})",
            stance, diplomacy.decision.factors.war_chance
        );
    }
    println!();
}
