//! Main entry point for the futsal league CLI
//!
//! Every invocation loads the league snapshot, runs one command against it
//! and, for commands that change the league, delivers the resulting
//! notifications and writes the snapshot back.

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use futsal_league::config::AppConfig;
use futsal_league::matches::{MatchInput, PlayerStatsInput};
use futsal_league::players::PlayerRegistration;
use futsal_league::rating::compute_overall_for_code;
use futsal_league::roster::NewTeam;
use futsal_league::service::AppState;
use futsal_league::types::{Actor, Attribute, Attributes, Decision, Position};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Futsal League - roster and match-result consistency engine
#[derive(Parser)]
#[command(
    name = "futsal-league",
    version,
    about = "Recreational futsal league engine: standings, ratings and transfers",
    long_about = "Futsal League keeps team standings consistent with match results, derives \
                  player ratings from positional attributes and manages captain-approved \
                  transfer requests. The league lives in a JSON snapshot file that every \
                  command reads and every changing command writes back.",
    arg_required_else_help = true
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Snapshot path override
    #[arg(long, value_name = "FILE", help = "Override the league snapshot file")]
    snapshot: Option<PathBuf>,

    /// Disable notification delivery
    #[arg(long, help = "Discard notification intents instead of delivering them")]
    no_notifications: bool,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(
        long,
        help = "Validate configuration and exit without touching the league"
    )]
    dry_run: bool,

    /// Administrator identity for admin-only commands
    #[arg(long, value_name = "ID", default_value = "league-admin")]
    admin: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the league table
    Standings,
    /// Print the teams with the most wins
    TopTeams,
    /// Print the goal or assist leaderboard
    Leaderboard {
        #[arg(value_enum, default_value_t = LeaderboardKind::Goals)]
        kind: LeaderboardKind,
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
    /// Print matches, most recent first
    Matches {
        /// Only matches of this team
        #[arg(long, value_name = "TEAM_ID", conflicts_with = "player")]
        team: Option<Uuid>,
        /// Only matches this player has statistics in
        #[arg(long, value_name = "PLAYER_ID")]
        player: Option<Uuid>,
        /// Only the latest N matches
        #[arg(long, value_name = "N")]
        recent: Option<usize>,
    },
    /// Print one match with every player's line
    Match {
        id: Uuid,
    },
    /// Print players by overall rating
    Players,
    /// Print league counts
    Summary,
    /// Rate attributes for a position code without storing anything
    Rate {
        /// Position code such as ST or MOO; unknown codes rate 50
        code: String,
        /// Attribute override, e.g. `shooting=80`; unset attributes are 50
        #[arg(long = "attr", value_name = "NAME=VALUE", value_parser = parse_attribute)]
        attributes: Vec<(Attribute, u8)>,
    },
    /// Create the player profile of an actor
    RegisterPlayer {
        #[arg(long)]
        actor: String,
        #[arg(long)]
        name: String,
        /// Position code (KL, SLB, SGB, STP, DOS, MO, MOO, SLK, SGK, ST)
        #[arg(long)]
        position: Position,
        #[arg(long)]
        age: Option<u8>,
        #[arg(long)]
        jersey: Option<u8>,
    },
    /// Found a team captained by a player
    CreateTeam {
        #[arg(long, value_name = "PLAYER_ID")]
        captain: Uuid,
        #[arg(long)]
        name: String,
        #[arg(long)]
        short_name: Option<String>,
    },
    /// Ask to join a team
    RequestJoin {
        #[arg(long, value_name = "PLAYER_ID")]
        player: Uuid,
        #[arg(long, value_name = "TEAM_ID")]
        team: Uuid,
    },
    /// Answer a join request as the team's captain
    Respond {
        #[arg(long, value_name = "REQUEST_ID")]
        request: Uuid,
        #[arg(long, value_name = "PLAYER_ID")]
        captain: Uuid,
        #[arg(value_enum)]
        decision: DecisionArg,
    },
    /// Leave the current team
    LeaveTeam {
        #[arg(long, value_name = "PLAYER_ID")]
        player: Uuid,
    },
    /// Create a match, or update one with --id (admin)
    RecordMatch {
        #[arg(long, value_name = "MATCH_ID")]
        id: Option<Uuid>,
        #[arg(long, value_name = "TEAM_ID")]
        team1: Option<Uuid>,
        #[arg(long, value_name = "TEAM_ID")]
        team2: Option<Uuid>,
        #[arg(long)]
        score1: Option<i64>,
        #[arg(long)]
        score2: Option<i64>,
        /// Mark the match finished
        #[arg(long)]
        finished: bool,
        /// Kick-off time (RFC 3339)
        #[arg(long)]
        date: Option<DateTime<Utc>>,
    },
    /// Undo a finished result and set the match back to draft (admin)
    ReopenMatch {
        id: Uuid,
    },
    /// Store one player's line for a match (admin)
    PlayerStats {
        #[arg(long = "match", value_name = "MATCH_ID")]
        match_id: Uuid,
        #[arg(long, value_name = "PLAYER_ID")]
        player: Uuid,
        #[arg(long, value_name = "TEAM_ID")]
        team: Uuid,
        #[arg(long, default_value_t = 0)]
        goals: i64,
        #[arg(long, default_value_t = 0)]
        assists: i64,
        #[arg(long)]
        did_not_play: bool,
    },
    /// Send a SYSTEM notice to every player (admin)
    Broadcast {
        message: String,
        #[arg(long)]
        title: Option<String>,
    },
}

impl Command {
    /// Whether the command changes the league and must be written back
    fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::RegisterPlayer { .. }
                | Command::CreateTeam { .. }
                | Command::RequestJoin { .. }
                | Command::Respond { .. }
                | Command::LeaveTeam { .. }
                | Command::RecordMatch { .. }
                | Command::ReopenMatch { .. }
                | Command::PlayerStats { .. }
                | Command::Broadcast { .. }
        )
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LeaderboardKind {
    Goals,
    Assists,
}

#[derive(Clone, Copy, ValueEnum)]
enum DecisionArg {
    Accept,
    Reject,
}

impl From<DecisionArg> for Decision {
    fn from(arg: DecisionArg) -> Self {
        match arg {
            DecisionArg::Accept => Decision::Accept,
            DecisionArg::Reject => Decision::Reject,
        }
    }
}

/// Parse `name=value` into an attribute override
fn parse_attribute(raw: &str) -> std::result::Result<(Attribute, u8), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;
    let attribute: Attribute =
        serde_json::from_value(serde_json::Value::String(name.trim().to_lowercase()))
            .map_err(|_| format!("unknown attribute '{}'", name))?;
    let value: u8 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid value '{}' for {}", value, name))?;
    Ok((attribute, value))
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Display startup banner with service information
fn display_startup_banner(config: &AppConfig) {
    info!("Futsal League");
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!(
        "   Snapshot: {}",
        config
            .league
            .snapshot_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "none (in-memory only)".to_string())
    );
    info!(
        "   Notifications: {} (queue capacity {})",
        if config.notifications.enabled {
            "enabled"
        } else {
            "disabled"
        },
        config.notifications.queue_capacity
    );
    info!("   Top teams limit: {}", config.league.top_teams_limit);
}

/// Load and merge configuration from environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }
    if args.debug {
        config.service.log_level = "debug".to_string();
    }
    if let Some(snapshot) = &args.snapshot {
        config.league.snapshot_path = Some(snapshot.clone());
    }
    if args.no_notifications {
        config.notifications.enabled = false;
    }

    futsal_league::config::validate_config(&config)?;
    Ok(config)
}

/// Print a read model from the configured snapshot
fn run_report(app: &AppState, command: Command) -> Result<()> {
    match command {
        Command::Standings => {
            println!(
                "{:>3}  {:<30} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>5} {:>4}",
                "#", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"
            );
            for row in app.standings()? {
                println!(
                    "{:>3}  {:<30} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>5} {:>4}",
                    row.rank,
                    row.name,
                    row.played,
                    row.wins,
                    row.draws,
                    row.losses,
                    row.goals_scored,
                    row.goals_conceded,
                    row.goal_difference,
                    row.points
                );
            }
        }
        Command::TopTeams => {
            for (index, team) in app.top_teams()?.iter().enumerate() {
                println!(
                    "{:>2}. {:<30} W{} L{} ({:.1}%)",
                    index + 1,
                    team.name,
                    team.standings.wins,
                    team.standings.losses,
                    team.standings.win_rate()
                );
            }
        }
        Command::Leaderboard { kind, limit } => {
            let entries = match kind {
                LeaderboardKind::Goals => app.matches().goal_leaderboard(limit)?,
                LeaderboardKind::Assists => app.matches().assist_leaderboard(limit)?,
            };
            for (index, entry) in entries.iter().enumerate() {
                println!("{:>2}. {:<30} {}", index + 1, entry.name, entry.value);
            }
        }
        Command::Matches {
            team,
            player,
            recent,
        } => {
            let mut matches = match (team, player) {
                (Some(team_id), _) => app.matches().team_matches(team_id)?,
                (None, Some(player_id)) => app.matches().player_matches(player_id)?,
                (None, None) => app.matches().match_list()?,
            };
            if let Some(limit) = recent {
                matches.truncate(limit);
            }
            for m in matches {
                let status = if m.is_finished { "FT" } else { "--" };
                println!(
                    "{}  {} {:>2} - {:<2} {}  [{}]",
                    m.date.format("%Y-%m-%d"),
                    m.team1_name,
                    m.team1_score,
                    m.team2_score,
                    m.team2_name,
                    status
                );
            }
        }
        Command::Players => {
            for player in app.players().players_by_overall()? {
                println!(
                    "{:>3}  {:<30} {:<4} {}",
                    player.overall(),
                    player.name,
                    player.position.code(),
                    if player.is_free_agent() { "free agent" } else { "" }
                );
            }
        }
        Command::Match { id } => print_json(&app.matches().match_detail(id)?)?,
        Command::Summary => print_json(&app.summary()?)?,
        Command::Rate { code, attributes } => println!("{}", rate(&code, &attributes)?),
        _ => bail!("Command changes the league and cannot run as a report"),
    }
    Ok(())
}

/// Run one command that changes the league
async fn run_mutation(app: &AppState, admin: &Actor, command: Command) -> Result<()> {
    match command {
        Command::RegisterPlayer {
            actor,
            name,
            position,
            age,
            jersey,
        } => {
            let mut registration = PlayerRegistration::new(name, position);
            if let Some(age) = age {
                registration = registration.with_age(age);
            }
            if let Some(number) = jersey {
                registration = registration.with_jersey_number(number);
            }
            print_json(&app.players().register_player(&actor, registration)?)?;
        }
        Command::CreateTeam {
            captain,
            name,
            short_name,
        } => {
            let mut new_team = NewTeam::new(name);
            if let Some(short_name) = short_name {
                new_team = new_team.with_short_name(short_name);
            }
            print_json(&app.roster().create_team(captain, new_team)?)?;
        }
        Command::RequestJoin { player, team } => {
            print_json(&app.roster().request_join(player, team).await?)?;
        }
        Command::Respond {
            request,
            captain,
            decision,
        } => {
            let answered = app
                .roster()
                .respond_to_request(request, captain, decision.into())
                .await?;
            print_json(&answered)?;
        }
        Command::LeaveTeam { player } => print_json(&app.roster().leave_team(player)?)?,
        Command::RecordMatch {
            id,
            team1,
            team2,
            score1,
            score2,
            finished,
            date,
        } => {
            let mut input = match id {
                Some(id) => MatchInput::from_match(&app.matches().get_match(id)?),
                None => {
                    let team1 = team1.ok_or_else(|| anyhow!("--team1 is required for a new match"))?;
                    let team2 = team2.ok_or_else(|| anyhow!("--team2 is required for a new match"))?;
                    MatchInput::new(team1, team2)
                }
            };
            if let Some(id) = id {
                if team1.is_some_and(|t| t != input.team1) || team2.is_some_and(|t| t != input.team2) {
                    bail!("The teams of match {} cannot be changed", id);
                }
            }
            let scores = (
                score1.unwrap_or(input.team1_score),
                score2.unwrap_or(input.team2_score),
            );
            input = input.with_scores(scores.0, scores.1);
            if finished {
                input = input.finished(true);
            }
            if let Some(date) = date {
                input = input.with_date(date);
            }
            print_json(&app.matches().record_match(admin, input)?)?;
        }
        Command::ReopenMatch { id } => print_json(&app.matches().reopen_match(admin, id)?)?,
        Command::PlayerStats {
            match_id,
            player,
            team,
            goals,
            assists,
            did_not_play,
        } => {
            let input = PlayerStatsInput {
                match_id,
                player_id: player,
                team_id: team,
                goals,
                assists,
                played: !did_not_play,
            };
            print_json(&app.matches().update_player_stats(admin, input)?)?;
        }
        Command::Broadcast { message, title } => {
            let sent = app.broadcast(admin, &message, title.as_deref()).await?;
            println!("Queued {} notification(s)", sent);
        }
        _ => bail!("Command does not change the league"),
    }
    Ok(())
}

/// Overall for a position code, starting from all-50 attributes
fn rate(code: &str, overrides: &[(Attribute, u8)]) -> Result<u8> {
    let mut attributes = Attributes::default();
    for &(attribute, value) in overrides {
        attributes.set(attribute, value);
    }
    attributes.validate()?;
    if Position::from_code(code).is_none() {
        warn!("Unknown position code '{}', using the default rating", code);
    }
    Ok(compute_overall_for_code(code, &attributes))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Apply one changing command: deliver its notifications and save the league
async fn apply_mutation(config: AppConfig, admin: Actor, command: Command) -> Result<()> {
    if config.league.snapshot_path.is_none() {
        bail!("Commands that change the league need a snapshot file (--snapshot or SNAPSHOT_PATH)");
    }

    let mut app = AppState::new(config)
        .await
        .context("Failed to initialize league")?;
    app.start().await?;

    // A failed command may still have committed, e.g. a superseded accept
    let outcome = run_mutation(&app, &admin, command).await;
    if let Err(e) = &outcome {
        error!("Command failed: {:#}", e);
    }

    app.shutdown().await?;
    for notice in app.inbox().all()? {
        info!(
            "Notified '{}': {} - {}",
            notice.recipient, notice.title, notice.message
        );
    }
    outcome
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if args.dry_run {
        info!("Configuration validation successful");
        display_startup_banner(&config);
        info!("Dry run completed - exiting without touching the league");
        return Ok(());
    }

    let Some(command) = args.command else {
        bail!("No command given; run with --help to list them");
    };

    if command.is_mutation() {
        return apply_mutation(config, Actor::admin(args.admin), command).await;
    }

    if config.league.snapshot_path.is_none() {
        warn!("No snapshot configured; reporting on an empty league");
    }
    let app = AppState::new(config).await?;
    run_report(&app, command)
}
