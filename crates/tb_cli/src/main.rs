//! Team balancer CLI
//!
//! Reads a player pool from a JSON file, balances it and prints the
//! resulting teams, optionally with the full decision report.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tb_core::engine::BalanceOutcome;
use tb_core::models::PlayerInput;
use tb_core::{balance_teams, BalanceConfig};

#[derive(Parser)]
#[command(name = "tb")]
#[command(about = "Split a rated player pool into two balanced teams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Balance a pool from a JSON player file
    Balance {
        /// Input JSON file: an array of player records
        #[arg(long)]
        input: PathBuf,

        /// Config profile: "default", "casual" or "competitive"
        #[arg(long)]
        profile: Option<String>,

        /// Print the full decision report after the rosters
        #[arg(long, default_value = "false")]
        report: bool,

        /// Write the full outcome as JSON to this path
        #[arg(long)]
        json_out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Balance { input, profile, report, json_out } => {
            let players = load_players(&input)?;
            let config = resolve_profile(profile.as_deref())?;
            let outcome = balance_teams(&players, &config)?;

            print_rosters(&outcome);

            if report {
                println!();
                print!("{}", tb_core::report::render(&outcome.log));
            }

            if let Some(path) = json_out {
                let json = serde_json::to_string_pretty(&outcome)?;
                fs::write(&path, json)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("\nFull outcome written to {}", path.display());
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();
}

fn load_players(path: &PathBuf) -> Result<Vec<PlayerInput>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).context("parsing player file")
}

fn resolve_profile(profile: Option<&str>) -> Result<BalanceConfig> {
    match profile {
        None | Some("default") => Ok(BalanceConfig::default()),
        Some("casual") => Ok(BalanceConfig::casual()),
        Some("competitive") => Ok(BalanceConfig::competitive()),
        Some(other) => anyhow::bail!("unknown profile '{other}'"),
    }
}

fn print_rosters(outcome: &BalanceOutcome) {
    for team in [&outcome.blue, &outcome.orange] {
        println!("⚽ {} ({} players)", team.color.label(), team.len());
        for player in &team.players {
            println!("   {:<20} {:>5.2}  {}", player.name, player.rating, player.momentum.as_str());
        }
    }
    println!(
        "\nBalance: {:.1} ({}), {} swap(s) applied",
        outcome.score.aggregate,
        outcome.score.quality.label(),
        outcome.swaps.iter().filter(|s| s.accepted).count()
    );
    for degraded in &outcome.degraded_players {
        println!("⚠️  limited data for {}", degraded.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_a_player_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": 1, "name": "Alice", "base_skill": {{"attack": 7.0, "defense": 5.0, "game_iq": 6.0}}}},
                {{"id": 2, "name": "Bob", "base_skill": {{"attack": 4.0, "defense": 6.0, "game_iq": 5.0}}}}
            ]"#
        )
        .unwrap();

        let players = load_players(&file.path().to_path_buf()).unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].name, "Alice");

        let outcome = balance_teams(&players, &BalanceConfig::default()).unwrap();
        assert_eq!(outcome.blue.len() + outcome.orange.len(), 2);
    }

    #[test]
    fn rejects_unknown_profiles() {
        assert!(resolve_profile(Some("casual")).is_ok());
        assert!(resolve_profile(None).is_ok());
        assert!(resolve_profile(Some("ranked")).is_err());
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = load_players(&PathBuf::from("/no/such/pool.json")).unwrap_err();
        assert!(err.to_string().contains("/no/such/pool.json"));
    }
}
