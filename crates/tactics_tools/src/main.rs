//! Tactics - Development Tools

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tactics_core::combat::CombatOptions;
use tactics_core::data::{Ability, Formation, Terrain, UnitType, Weather};
use tactics_core::ids::TechId;
use tactics_core::turn_log::TurnLog;
use tactics_tools::duel::{run_duel, DuelConfig};
use tactics_tools::error::Result;
use tactics_tools::inspect::TechSummary;
use tactics_tools::{inspect, replay, validate};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tactics-tools")]
#[command(about = "Development tools for the tactics rules engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and lint a rule file
    Validate {
        /// RON rule file (defaults to the reference rules)
        #[arg(long)]
        rules: Option<PathBuf>,
    },
    /// List researchable technologies
    Available {
        /// RON rule file (defaults to the reference rules)
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Technologies already researched
        #[arg(long, value_delimiter = ',')]
        researched: Vec<String>,
    },
    /// Show the prerequisite chain to a technology
    Path {
        /// Target technology id
        tech: String,
        /// RON rule file (defaults to the reference rules)
        #[arg(long)]
        rules: Option<PathBuf>,
        /// List every prerequisite instead of the shortest chain
        #[arg(long)]
        full: bool,
    },
    /// Play a seeded duel between two stock units
    Duel {
        /// Unit type that strikes first
        #[arg(long)]
        attacker: UnitType,
        /// Unit type that defends
        #[arg(long)]
        defender: UnitType,
        #[arg(long, default_value = "plains")]
        terrain: Terrain,
        #[arg(long, default_value = "clear")]
        weather: Weather,
        #[arg(long, default_value = "line")]
        formation: Formation,
        #[arg(long)]
        ability: Option<Ability>,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 20)]
        rounds: u32,
        /// RON rule file (defaults to the reference rules)
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Write the turn log to this file
        #[arg(long)]
        log: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the events of a recorded turn log
    Replay {
        /// Turn log file
        file: PathBuf,
    },
}

fn print_techs(listing: &[TechSummary]) {
    for tech in listing {
        println!(
            "{:<20} {:<28} {:<12} {}",
            tech.id.as_str(),
            tech.name,
            tech.era.as_str(),
            tech.research_time
        );
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Validate { rules } => {
            let report = validate::validate_rules(rules.as_deref())?;
            tracing::info!(
                source = %report.source,
                technologies = report.technologies,
                roots = report.roots.len(),
                warnings = report.warnings.len(),
                "Validation passed"
            );
        }
        Commands::Available { rules, researched } => {
            let rule_set = validate::load_rules(rules.as_deref())?;
            let researched: Vec<TechId> = researched.into_iter().map(TechId::from).collect();
            print_techs(&inspect::available(&rule_set, &researched)?);
        }
        Commands::Path { tech, rules, full } => {
            let rule_set = validate::load_rules(rules.as_deref())?;
            print_techs(&inspect::path(&rule_set, &TechId::from(tech), full)?);
        }
        Commands::Duel {
            attacker,
            defender,
            terrain,
            weather,
            formation,
            ability,
            seed,
            rounds,
            rules,
            log,
            json,
        } => {
            let rule_set = validate::load_rules(rules.as_deref())?;
            let mut options = CombatOptions::default()
                .with_terrain(terrain)
                .with_weather(weather)
                .with_formation(formation);
            if let Some(ability) = ability {
                options = options.with_ability(ability);
            }
            let config = DuelConfig {
                attacker,
                defender,
                options,
                seed,
                rounds,
            };

            let (report, turn_log) = run_duel(rule_set, &config)?;
            if let Some(path) = log {
                replay::save_log(&turn_log, &path)?;
                tracing::info!(path = %path.display(), events = turn_log.len(), "Wrote turn log");
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for attack in &report.attacks {
                    println!(
                        "round {:>3}  {:<8} {:>4} damage{}",
                        attack.round,
                        attack.attacker.as_str(),
                        attack.result.damage,
                        if attack.result.is_critical { " (critical)" } else { "" }
                    );
                }
                println!(
                    "attacker: {} hp, level {}",
                    report.attacker.health, report.attacker.level
                );
                println!(
                    "defender: {} hp, level {}",
                    report.defender.health, report.defender.level
                );
            }
        }
        Commands::Replay { file } => {
            let turn_log = replay::load_log(&file)?;
            println!("seed {}", turn_log.seed());
            for event in turn_log.events() {
                println!("{}", replay::describe(event));
            }
        }
    }
    Ok(())
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
