//! NBA 3PT CLI - Command-line interface for three-point total projections

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use nba3p::analysis::{Analyzer, MatchupAnalysis, MatchupRequest};
use nba3p::core::{evaluate_edge, suggested_line, ProjectionEngine};
use nba3p::data::{load_schedule, load_stats, ProfileResolver};
use nba3p::{
    AbsenceCategory, EngineConfig, LeagueContext, LeagueTable, Matchup, Schedule, SessionLedger,
    SignalClass, SituationalAdjustment, TeamRef, TeamStatProfile, Tempo,
};

#[cfg(feature = "stats-api")]
use nba3p::stats_api::{season_for, NbaStatsClient, StatsApiConfig};

/// Default data files (relative to working directory)
const DEFAULT_STATS_FILE: &str = "data/team_stats.json";
const DEFAULT_SCHEDULE_FILE: &str = "data/schedule.json";
const DEFAULT_LEDGER_FILE: &str = "ledger.csv";

/// Upper bound of the continuous absence impact input
const MAX_ABSENCE_IMPACT: f64 = 6.0;

#[derive(Parser)]
#[command(name = "nba3p")]
#[command(author, version, about = "NBA three-point total projections", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Engine configuration file (TOML)
    #[arg(long, env = "NBA3P_CONFIG")]
    config: Option<PathBuf>,

    /// Override the edge threshold
    #[arg(long)]
    threshold: Option<f64>,

    /// Override the penalty per absence category
    #[arg(long)]
    absence_penalty: Option<f64>,

    /// Team stats file (.json or .csv)
    #[arg(long, default_value = DEFAULT_STATS_FILE)]
    stats: PathBuf,

    /// Schedule file (.json or .csv)
    #[arg(long, default_value = DEFAULT_SCHEDULE_FILE)]
    schedule: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Project one matchup from raw numbers
    Project {
        /// Home threes made per game
        #[arg(long)]
        home_scored: f64,

        /// Home threes allowed per game
        #[arg(long)]
        home_allowed: f64,

        /// Home possessions per game
        #[arg(long)]
        home_pace: f64,

        /// Away threes made per game
        #[arg(long)]
        away_scored: f64,

        /// Away threes allowed per game
        #[arg(long)]
        away_allowed: f64,

        /// Away possessions per game
        #[arg(long)]
        away_pace: f64,

        /// League average pace
        #[arg(long, default_value = "99.0")]
        league_pace: f64,

        #[command(flatten)]
        situation: SituationArgs,

        /// Bookmaker line
        #[arg(long)]
        line: Option<f64>,
    },

    /// List resolved and rejected teams from the stats file
    Teams,

    /// Evaluate every scheduled game
    Slate {
        /// Bookmaker line as HOME_ID:AWAY_ID=LINE (repeatable)
        #[arg(long = "line")]
        lines: Vec<String>,

        /// Schedule date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Download team stats and today's schedule from stats.nba.com
    #[cfg(feature = "stats-api")]
    Fetch {
        /// Season (e.g. 2024-25, default: derived from date)
        #[arg(long)]
        season: Option<String>,

        /// Schedule date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Delay between requests in milliseconds
        #[arg(long, default_value = "600")]
        delay: u64,
    },
}

#[derive(clap::Args)]
struct SituationArgs {
    /// Home team on the second night of a back-to-back
    #[arg(long)]
    home_b2b: bool,

    /// Away team on the second night of a back-to-back
    #[arg(long)]
    away_b2b: bool,

    /// Home absences: star, shooter, playmaker (comma separated)
    #[arg(long, value_delimiter = ',')]
    home_absent: Vec<AbsenceCategory>,

    /// Away absences: star, shooter, playmaker (comma separated)
    #[arg(long, value_delimiter = ',')]
    away_absent: Vec<AbsenceCategory>,

    /// Home absence impact in threes (0-6), replaces --home-absent
    #[arg(long)]
    home_impact: Option<f64>,

    /// Away absence impact in threes (0-6), replaces --away-absent
    #[arg(long)]
    away_impact: Option<f64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    println!("{}", "NBA 3PT Projections v0.1.0".cyan().bold());
    println!();

    let config = load_config(&cli)?;

    if cli.interactive {
        run_interactive(&cli.stats, &cli.schedule, &config)?;
    } else if let Some(command) = cli.command {
        match command {
            Commands::Project {
                home_scored,
                home_allowed,
                home_pace,
                away_scored,
                away_allowed,
                away_pace,
                league_pace,
                situation,
                line,
            } => {
                let home = TeamStatProfile::new(0, "Home", home_scored, home_allowed, home_pace)?;
                let away = TeamStatProfile::new(1, "Away", away_scored, away_allowed, away_pace)?;
                let league = LeagueContext {
                    average_pace: league_pace,
                };
                run_project(Matchup::new(home, away), league, &situation, line, &config)?;
            }
            Commands::Teams => {
                let table = load_table(&cli.stats, &config)?;
                list_teams(&table)?;
            }
            Commands::Slate { lines, date } => {
                let date = date.unwrap_or_else(|| Local::now().date_naive());
                run_slate(&cli.stats, &cli.schedule, date, &lines, &config)?;
            }
            #[cfg(feature = "stats-api")]
            Commands::Fetch {
                season,
                date,
                delay,
            } => {
                let date = date.unwrap_or_else(|| Local::now().date_naive());
                let season = season.unwrap_or_else(|| season_for(date));
                run_fetch(&cli.stats, &cli.schedule, &season, date, delay)?;
            }
        }
    } else {
        println!("Use --help for usage information or --interactive for interactive mode.");
    }

    Ok(())
}

/// Config file (if any) with command-line overrides applied
fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => EngineConfig::default(),
    };

    if let Some(threshold) = cli.threshold {
        config.edge_threshold = threshold;
    }
    if let Some(penalty) = cli.absence_penalty {
        config.absence_penalty_per_category = penalty;
    }

    config.validate().context("Invalid engine configuration")?;
    Ok(config)
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb
}

fn load_table(stats_path: &Path, config: &EngineConfig) -> Result<LeagueTable> {
    let pb = spinner("Loading team stats...");
    let table = load_stats(stats_path, &ProfileResolver::new(config))
        .with_context(|| format!("Failed to load stats from {:?}", stats_path));
    pb.finish_and_clear();

    let table = table?;
    if table.is_empty() {
        anyhow::bail!("No usable teams in {:?}", stats_path);
    }
    Ok(table)
}

fn side_adjustment(
    b2b: bool,
    absent: &[AbsenceCategory],
    impact: Option<f64>,
    config: &EngineConfig,
) -> Result<SituationalAdjustment> {
    match impact {
        Some(impact) => {
            if !(0.0..=MAX_ABSENCE_IMPACT).contains(&impact) {
                anyhow::bail!(
                    "Absence impact must be 0-{}, got {}",
                    MAX_ABSENCE_IMPACT,
                    impact
                );
            }
            Ok(SituationalAdjustment::new(b2b, impact))
        }
        None => Ok(SituationalAdjustment::from_categories(
            b2b,
            absent,
            config.absence_penalty_per_category,
        )),
    }
}

fn run_project(
    matchup: Matchup,
    league: LeagueContext,
    situation: &SituationArgs,
    line: Option<f64>,
    config: &EngineConfig,
) -> Result<()> {
    let adj_home = side_adjustment(
        situation.home_b2b,
        &situation.home_absent,
        situation.home_impact,
        config,
    )?;
    let adj_away = side_adjustment(
        situation.away_b2b,
        &situation.away_absent,
        situation.away_impact,
        config,
    )?;

    let engine = ProjectionEngine::new(config.clone());
    let projection = engine.project(&matchup, &league, &adj_home, &adj_away)?;
    let signal = match line {
        Some(line) => Some(evaluate_edge(
            projection.total_projection,
            line,
            config.edge_threshold,
        )?),
        None => None,
    };

    print_analysis(&MatchupAnalysis {
        home: matchup.home,
        away: matchup.away,
        projection,
        line,
        signal,
    });

    Ok(())
}

fn list_teams(table: &LeagueTable) -> Result<()> {
    let league = table.league_context()?;

    println!("{}", "Teams:".yellow().bold());
    println!(
        "{:>12} {:<26} {:>8} {:>8} {:>7}",
        "ID", "Team", "3PM", "Opp 3PM", "Pace"
    );
    println!("{}", "-".repeat(65));

    let mut profiles: Vec<&TeamStatProfile> = table.profiles().iter().collect();
    profiles.sort_by(|a, b| a.team_name.cmp(&b.team_name));

    for p in profiles {
        println!(
            "{:>12} {:<26} {:>8.1} {:>8.1} {:>7.1}",
            p.team_id,
            truncate_name(&p.team_name, 26),
            p.scored_rate,
            p.allowed_rate,
            p.pace
        );
    }

    if !table.rejected().is_empty() {
        println!();
        println!("{}", "Rejected:".red().bold());
        for rejected in table.rejected() {
            println!("  {}: {}", rejected.label, rejected.error);
        }
    }

    println!();
    println!(
        "Total: {} teams, league average pace {:.2}",
        table.len(),
        league.average_pace
    );

    Ok(())
}

/// Parse `HOME_ID:AWAY_ID=LINE`
fn parse_line_arg(arg: &str) -> Result<(u32, u32, f64)> {
    let (teams, line) = arg
        .split_once('=')
        .with_context(|| format!("Expected HOME_ID:AWAY_ID=LINE, got '{}'", arg))?;
    let (home, away) = teams
        .split_once(':')
        .with_context(|| format!("Expected HOME_ID:AWAY_ID=LINE, got '{}'", arg))?;

    let home: u32 = home
        .trim()
        .parse()
        .with_context(|| format!("Invalid home team id in '{}'", arg))?;
    let away: u32 = away
        .trim()
        .parse()
        .with_context(|| format!("Invalid away team id in '{}'", arg))?;
    let line: f64 = line
        .trim()
        .parse()
        .with_context(|| format!("Invalid line in '{}'", arg))?;

    Ok((home, away, line))
}

fn run_slate(
    stats_path: &Path,
    schedule_path: &Path,
    date: NaiveDate,
    line_args: &[String],
    config: &EngineConfig,
) -> Result<()> {
    let table = load_table(stats_path, config)?;
    let league = table.league_context()?;

    let schedule = if schedule_path.exists() {
        load_schedule(schedule_path, date)
            .with_context(|| format!("Failed to load schedule from {:?}", schedule_path))?
    } else {
        println!(
            "{}: {:?} not found, evaluating --line matchups only",
            "Warning".yellow(),
            schedule_path
        );
        Schedule::new(date, Vec::new())
    };

    let mut requests: Vec<MatchupRequest> =
        schedule.games.iter().map(MatchupRequest::from_game).collect();

    for arg in line_args {
        let (home, away, line) = parse_line_arg(arg)?;
        let existing = requests
            .iter_mut()
            .find(|r| r.home == TeamRef::Id(home) && r.away == TeamRef::Id(away));
        match existing {
            Some(request) => request.line = Some(line),
            None => requests.push(MatchupRequest::new(home, away).with_line(line)),
        }
    }

    if requests.is_empty() {
        println!("{}", "No games to evaluate.".yellow());
        return Ok(());
    }

    println!(
        "{}: {} ({} games)",
        "Slate for".green(),
        schedule.date,
        requests.len()
    );
    println!();

    let analyzer = Analyzer::new(&table, league, config.clone());
    let outcomes = analyzer.analyze_slate(&requests);

    println!(
        "{:<40} {:>6} {:>6} {:>7} {:>5} {:>6} {:>7}  {}",
        "Matchup", "Home", "Away", "Total", "Tempo", "Line", "Edge", "Signal"
    );
    println!("{}", "-".repeat(90));

    let mut failures = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(analysis) => {
                let (line, edge, signal) = match (analysis.line, analysis.signal) {
                    (Some(line), Some(signal)) => (
                        format!("{:.1}", line),
                        format!("{:+.2}", signal.edge),
                        signal_label(signal.classification),
                    ),
                    _ => ("-".to_string(), "-".to_string(), "-".dimmed()),
                };
                println!(
                    "{:<40} {:>6.2} {:>6.2} {:>7.2} {:>5} {:>6} {:>7}  {}",
                    truncate_name(&analysis.label(), 40),
                    analysis.projection.home_projection,
                    analysis.projection.away_projection,
                    analysis.projection.total_projection,
                    tempo_label(analysis.projection.tempo()),
                    line,
                    edge,
                    signal
                );
            }
            Err(e) => {
                failures += 1;
                println!(
                    "{:<40} {}",
                    truncate_name(&outcome.request.label(), 40),
                    format!("skipped: {}", e).red()
                );
            }
        }
    }

    println!();
    println!(
        "Evaluated: {}, skipped: {}",
        outcomes.len() - failures,
        failures
    );

    Ok(())
}

#[cfg(feature = "stats-api")]
fn run_fetch(
    stats_path: &Path,
    schedule_path: &Path,
    season: &str,
    date: NaiveDate,
    delay: u64,
) -> Result<()> {
    println!(
        "{}: season {}, schedule {}",
        "Fetching".green(),
        season,
        date
    );
    println!();

    // Create runtime for async operations
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let config = StatsApiConfig {
        delay_ms: delay,
        ..Default::default()
    };
    let client = NbaStatsClient::new(config).context("Failed to create HTTP client")?;

    for path in [stats_path, schedule_path] {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {:?}", dir))?;
        }
    }

    let pb = ProgressBar::new(2);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    pb.set_message("team stats");
    let records = rt
        .block_on(client.fetch_team_records(season))
        .context("Failed to fetch team stats")?;
    let json = serde_json::to_string_pretty(&records)?;
    std::fs::write(stats_path, json)
        .with_context(|| format!("Failed to write {:?}", stats_path))?;
    pb.inc(1);

    pb.set_message("schedule");
    let schedule = rt
        .block_on(client.fetch_schedule(date))
        .context("Failed to fetch schedule")?;
    let json = serde_json::to_string_pretty(&schedule)?;
    std::fs::write(schedule_path, json)
        .with_context(|| format!("Failed to write {:?}", schedule_path))?;
    pb.inc(1);

    pb.finish_and_clear();

    println!("{}: {:?} ({} teams)", "Saved".green(), stats_path, records.len());
    println!(
        "{}: {:?} ({} games)",
        "Saved".green(),
        schedule_path,
        schedule.games.len()
    );

    Ok(())
}

fn run_interactive(stats_path: &Path, schedule_path: &Path, config: &EngineConfig) -> Result<()> {
    println!("{}", "Interactive mode".green().bold());
    println!();

    let table = load_table(stats_path, config)?;
    let league = table.league_context()?;
    let today = Local::now().date_naive();
    let schedule = if schedule_path.exists() {
        load_schedule(schedule_path, today)
            .with_context(|| format!("Failed to load schedule from {:?}", schedule_path))?
    } else {
        Schedule::new(today, Vec::new())
    };

    let analyzer = Analyzer::new(&table, league, config.clone());
    let mut ledger = SessionLedger::new();
    let theme = ColorfulTheme::default();

    loop {
        let options = vec![
            "Analyze a scheduled game",
            "Analyze any matchup",
            "List teams",
            "Show saved bets",
            "Export saved bets to CSV",
            "Quit",
        ];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => {
                if schedule.is_empty() {
                    println!("{}", "No games scheduled.".yellow());
                    continue;
                }
                let labels: Vec<String> = schedule
                    .games
                    .iter()
                    .map(|g| {
                        format!(
                            "{} @ {}",
                            team_display(&table, g.away_id),
                            team_display(&table, g.home_id)
                        )
                    })
                    .collect();
                let game = Select::with_theme(&theme)
                    .with_prompt("Game")
                    .items(&labels)
                    .default(0)
                    .interact()?;

                let request = MatchupRequest::from_game(&schedule.games[game]);
                interactive_analysis(&analyzer, request, &mut ledger, &theme)?;
            }
            1 => {
                let home: String = Input::with_theme(&theme)
                    .with_prompt("Home team (id or name)")
                    .interact_text()?;
                let away: String = Input::with_theme(&theme)
                    .with_prompt("Away team (id or name)")
                    .interact_text()?;

                let request = MatchupRequest::new(home.as_str(), away.as_str());
                interactive_analysis(&analyzer, request, &mut ledger, &theme)?;
            }
            2 => {
                println!();
                list_teams(&table)?;
                println!();
            }
            3 => print_ledger(&ledger),
            4 => {
                if ledger.is_empty() {
                    println!("{}", "No saved bets.".yellow());
                    continue;
                }
                let path: String = Input::with_theme(&theme)
                    .with_prompt("Export path")
                    .default(DEFAULT_LEDGER_FILE.to_string())
                    .interact_text()?;
                match ledger.export_csv(&path) {
                    Ok(()) => println!("{}: {} ({} bets)", "Exported".green(), path, ledger.len()),
                    Err(e) => println!("{}: {}", "Export failed".red(), e),
                }
            }
            5 => {
                println!("Goodbye!");
                break;
            }
            _ => {}
        }
    }

    Ok(())
}

fn interactive_analysis(
    analyzer: &Analyzer<'_, LeagueTable>,
    request: MatchupRequest,
    ledger: &mut SessionLedger,
    theme: &ColorfulTheme,
) -> Result<()> {
    let config = analyzer.config();

    let (home, away) = match analyzer.resolve_teams(&request) {
        Ok(teams) => teams,
        Err(e) => {
            println!("{}: {}", "Cannot evaluate".red(), e);
            return Ok(());
        }
    };

    let adj_home = prompt_adjustment(&home.team_name, config, theme)?;
    let adj_away = prompt_adjustment(&away.team_name, config, theme)?;
    let request = request.with_adjustments(adj_home, adj_away);

    let mut analysis = match analyzer.analyze(&request) {
        Ok(analysis) => analysis,
        Err(e) => {
            println!("{}: {}", "Cannot evaluate".red(), e);
            return Ok(());
        }
    };

    let line: f64 = Input::with_theme(theme)
        .with_prompt("Bookmaker line")
        .default(suggested_line(analysis.projection.total_projection))
        .interact_text()?;

    match evaluate_edge(
        analysis.projection.total_projection,
        line,
        config.edge_threshold,
    ) {
        Ok(signal) => {
            analysis.line = Some(line);
            analysis.signal = Some(signal);
        }
        Err(e) => println!("{}: {}", "Invalid line".red(), e),
    }

    println!();
    print_analysis(&analysis);

    if analysis.signal.is_none() {
        return Ok(());
    }

    let save = Confirm::with_theme(theme)
        .with_prompt("Save this bet?")
        .default(false)
        .interact()?;
    if save {
        let stake: f64 = Input::with_theme(theme)
            .with_prompt("Stake")
            .interact_text()?;
        let odds: f64 = Input::with_theme(theme)
            .with_prompt("Decimal odds")
            .default(1.91)
            .interact_text()?;

        match ledger.record(
            analysis.label(),
            analysis.projection.total_projection,
            stake,
            odds,
        ) {
            Ok(_) => println!("{} ({} this session)", "Saved".green(), ledger.len()),
            Err(e) => println!("{}: {}", "Not saved".red(), e),
        }
    }
    println!();

    Ok(())
}

fn prompt_adjustment(
    side: &str,
    config: &EngineConfig,
    theme: &ColorfulTheme,
) -> Result<SituationalAdjustment> {
    let b2b = Confirm::with_theme(theme)
        .with_prompt(format!("{} on a back-to-back?", side))
        .default(false)
        .interact()?;

    let mode = Select::with_theme(theme)
        .with_prompt(format!("{} absences", side))
        .items(&["By category", "By impact (0-6 threes)"])
        .default(0)
        .interact()?;

    if mode == 1 {
        let impact: f64 = Input::with_theme(theme)
            .with_prompt(format!("{} absence impact", side))
            .default(0.0)
            .validate_with(|v: &f64| {
                if (0.0..=MAX_ABSENCE_IMPACT).contains(v) {
                    Ok(())
                } else {
                    Err(format!("must be 0-{}", MAX_ABSENCE_IMPACT))
                }
            })
            .interact_text()?;
        return side_adjustment(b2b, &[], Some(impact), config);
    }

    let names: Vec<&str> = AbsenceCategory::ALL.iter().map(|c| c.as_str()).collect();
    let picked = MultiSelect::with_theme(theme)
        .with_prompt(format!("{} missing players (space to select)", side))
        .items(&names)
        .interact()?;
    let absent: Vec<AbsenceCategory> = picked.into_iter().map(|i| AbsenceCategory::ALL[i]).collect();

    side_adjustment(b2b, &absent, None, config)
}

fn print_analysis(analysis: &MatchupAnalysis) {
    let p = &analysis.projection;

    println!("{}", analysis.label().yellow().bold());
    println!("{}", "-".repeat(50));
    println!(
        "{:<26} {:>8.2}",
        format!("{} 3PM", truncate_name(&analysis.home.team_name, 20)),
        p.home_projection
    );
    println!(
        "{:<26} {:>8.2}",
        format!("{} 3PM", truncate_name(&analysis.away.team_name, 20)),
        p.away_projection
    );
    println!("{:<26} {:>8.2}", "Total", p.total_projection);
    println!(
        "{:<26} {:>8.2} ({}, factor {:.3})",
        "Match pace",
        p.match_pace,
        tempo_label(p.tempo()),
        p.pace_factor
    );

    if let (Some(line), Some(signal)) = (analysis.line, analysis.signal) {
        println!("{:<26} {:>8.1}", "Line", line);
        println!(
            "{:<26} {:>+8.2}  {}",
            "Edge",
            signal.edge,
            signal_label(signal.classification)
        );
    }

    if let Some(report) = analysis.report() {
        println!();
        println!("{}", report.dimmed());
    }
    println!();
}

fn print_ledger(ledger: &SessionLedger) {
    if ledger.is_empty() {
        println!("{}", "No saved bets.".yellow());
        return;
    }

    println!("{}", "Saved bets:".yellow().bold());
    println!(
        "{:<17} {:<36} {:>7} {:>8} {:>6}",
        "Date", "Matchup", "Proj", "Stake", "Odds"
    );
    println!("{}", "-".repeat(78));
    for entry in ledger.entries() {
        println!(
            "{:<17} {:<36} {:>7.2} {:>8.2} {:>6.2}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            truncate_name(&entry.matchup_label, 36),
            entry.total_projection,
            entry.stake,
            entry.odds
        );
    }
    println!();
    println!("Total staked: {:.2}", ledger.total_staked());
    println!();
}

fn team_display(table: &LeagueTable, id: u32) -> String {
    table
        .find(&TeamRef::Id(id))
        .map(|p| p.team_name.clone())
        .unwrap_or_else(|| TeamRef::Id(id).to_string())
}

fn signal_label(class: SignalClass) -> ColoredString {
    let text = class.to_string();
    match class {
        SignalClass::Over => text.green().bold(),
        SignalClass::Under => text.red().bold(),
        SignalClass::Neutral => text.dimmed(),
    }
}

fn tempo_label(tempo: Tempo) -> &'static str {
    match tempo {
        Tempo::Fast => "fast",
        Tempo::Slow => "slow",
    }
}

/// Truncate name to fit display width
fn truncate_name(name: &str, max_len: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_len {
        name.to_string()
    } else {
        chars[..max_len - 1].iter().collect::<String>() + "…"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_arg() {
        let (home, away, line) = parse_line_arg("1610612738:1610612748=24.5").unwrap();
        assert_eq!(home, 1610612738);
        assert_eq!(away, 1610612748);
        assert!((line - 24.5).abs() < 1e-9);

        assert!(parse_line_arg("1:2").is_err());
        assert!(parse_line_arg("1=24.5").is_err());
        assert!(parse_line_arg("a:2=24.5").is_err());
        assert!(parse_line_arg("1:2=abc").is_err());
    }

    #[test]
    fn test_side_adjustment() {
        let config = EngineConfig::default();

        let adj = side_adjustment(
            true,
            &[AbsenceCategory::Star, AbsenceCategory::Shooter],
            None,
            &config,
        )
        .unwrap();
        assert!(adj.is_back_to_back);
        assert!((adj.absence_penalty - 3.2).abs() < 1e-9);

        let adj = side_adjustment(false, &[AbsenceCategory::Star], Some(2.5), &config).unwrap();
        assert!((adj.absence_penalty - 2.5).abs() < 1e-9);

        assert!(side_adjustment(false, &[], Some(6.5), &config).is_err());
        assert!(side_adjustment(false, &[], Some(-1.0), &config).is_err());
    }

    #[test]
    fn test_list_teams_uses_given_table() {
        let table = LeagueTable::from_profiles(vec![
            TeamStatProfile::new(1, "Boston Celtics", 16.0, 12.0, 98.0).unwrap(),
            TeamStatProfile::new(2, "Miami Heat", 13.0, 12.5, 96.0).unwrap(),
        ]);
        assert!(list_teams(&table).is_ok());
        assert!(list_teams(&LeagueTable::from_profiles(Vec::new())).is_err());
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Heat", 10), "Heat");
        assert_eq!(truncate_name("Golden State Warriors", 8), "Golden …");
    }
}
