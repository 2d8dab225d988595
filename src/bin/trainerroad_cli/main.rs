// ABOUTME: trainerroad-cli - unofficial data-export CLI for TrainerRoad
// ABOUTME: Thin command layer over the trainerroad_export core library
//
//! Usage:
//! ```bash
//! # Authenticate and persist a session
//! trainerroad-cli login --username rider --password-stdin
//!
//! # Upcoming workouts with agent filters
//! trainerroad-cli future --days 30 --details --json
//! trainerroad-cli future --from 2026-03-01 --to 2026-03-31 --min-tss 60 --fields id,name,tss --jsonl
//!
//! # Public mode against another profile
//! trainerroad-cli timeline --target alice --public --json
//! ```

mod commands;
mod output;

use clap::{Parser, Subcommand};
use trainerroad_export::config::Settings;
use trainerroad_export::context::QueryIntent;
use trainerroad_export::errors::ExportError;
use trainerroad_export::logging::init_logging;
use trainerroad_export::timezone::resolve_time_zone;

use commands::{CommandEnv, FilterArgs};
use output::RenderOptions;

#[derive(Parser)]
#[command(
    name = "trainerroad-cli",
    about = "Unofficial TrainerRoad data-export CLI",
    long_about = "Exports activities, planned workouts, plans, progression levels, FTP history, \
                  and more from a TrainerRoad account, with a public-profile fallback."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Target username (switches to public mode unless it is your own)
    #[arg(long, global = true)]
    target: Option<String>,

    /// Force the public data path even when authenticated
    #[arg(long, global = true)]
    public: bool,

    /// Emit the full JSON payload
    #[arg(long, global = true)]
    json: bool,

    /// Emit line-delimited JSON records
    #[arg(long, global = true)]
    jsonl: bool,

    /// Write output to a file instead of stdout
    #[arg(long, global = true)]
    output: Option<std::path::PathBuf>,

    /// Session file override (default: ~/.trainerroad/session.json)
    #[arg(long = "session-file", global = true)]
    session_file: Option<std::path::PathBuf>,

    /// Login username override (default: TR_USERNAME)
    #[arg(long, global = true)]
    username: Option<String>,

    /// Login password override (default: TR_PASSWORD)
    #[arg(long, global = true)]
    password: Option<String>,

    /// IANA timezone override (default: TR_TIMEZONE, then the host zone)
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Log in and persist the session cookie jar
    Login {
        /// Read the password from stdin instead of flags/environment
        #[arg(long = "password-stdin")]
        password_stdin: bool,

        /// Post-login return path on the platform
        #[arg(long = "return-path", default_value = "/app")]
        return_path: String,
    },

    /// Clear the persisted session
    Logout,

    /// Show the authenticated member info
    Whoami,

    /// Summarize the resolved timeline (private) or public day aggregate
    Timeline {
        /// Include the full payload instead of counts
        #[arg(long)]
        full: bool,
    },

    /// Planned and completed workouts for one date
    Today {
        /// Date to inspect (default: today in the working timezone)
        #[arg(long)]
        date: Option<String>,

        /// Fetch full detail records for the day
        #[arg(long)]
        details: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Upcoming planned workouts
    Future {
        /// Days ahead when --to is not given
        #[arg(long, default_value_t = 60)]
        days: i64,

        /// Fetch full planned-workout detail records
        #[arg(long)]
        details: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Completed workouts, newest first
    Past {
        /// Days back when --from is not given
        #[arg(long, default_value_t = 60)]
        days: i64,

        /// Cap on activities considered
        #[arg(long, default_value_t = 30)]
        limit: usize,

        /// Fetch full activity detail records and per-activity PR counts
        #[arg(long)]
        details: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Calendar events (races, goals)
    Events {
        /// Emit raw event payloads instead of compact records
        #[arg(long)]
        full: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Calendar annotations (notes, time off, injury, illness)
    Annotations {
        /// Emit raw annotation payloads instead of compact records
        #[arg(long)]
        full: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Progression levels per training zone, joined with AI projections
    Levels {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Training plans: current plan, phases, or all plans
    Plan {
        /// View: current, phases, or plans
        #[arg(long, default_value = "phases")]
        view: String,

        /// Include every view in the JSON payload
        #[arg(long)]
        full: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Weight history entries
    WeightHistory {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// FTP value and history
    Ftp {
        /// Most recent history points to include (0 = all)
        #[arg(long = "history-limit", default_value_t = 50)]
        history_limit: usize,
    },

    /// AI FTP detection status and predicted FTP
    FtpPrediction,

    /// Power ranking percentiles across standard durations
    PowerRanking,

    /// Personal power records for a date range
    PowerRecords {
        /// Range start (default: the platform's power-record epoch)
        #[arg(long = "start-date", default_value = "2013-05-10")]
        start_date: String,

        /// Range end (default: today)
        #[arg(long = "end-date")]
        end_date: Option<String>,

        /// Upstream row type
        #[arg(long = "row-type", default_value_t = 101)]
        row_type: u32,

        /// Restrict to indoor rides
        #[arg(long = "indoor-only")]
        indoor_only: bool,

        /// Comparison slot
        #[arg(long, default_value_t = 1)]
        slot: u32,

        /// Records to keep after ranking by watts
        #[arg(long, default_value_t = 25)]
        limit: usize,

        /// Emit raw rows and the full response payload
        #[arg(long)]
        full: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(error) = run(cli).await {
        eprintln!("Error: {error:#}");
        print_tips(&error);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = Settings::from_env();
    if let Some(session_file) = cli.session_file {
        settings.session_file = session_file;
    }
    if cli.username.is_some() {
        settings.username = cli.username;
    }
    if cli.password.is_some() {
        settings.password = cli.password;
    }

    let zone = resolve_time_zone(cli.timezone.as_deref(), settings.timezone.as_deref())?;
    let env = CommandEnv {
        settings,
        zone,
        render: RenderOptions {
            json: cli.json,
            jsonl: cli.jsonl,
            output: cli.output,
        },
        intent: QueryIntent {
            target: cli.target,
            force_public: cli.public,
        },
    };

    match cli.command {
        Command::Login {
            password_stdin,
            return_path,
        } => commands::auth::login(&env, password_stdin, &return_path).await,
        Command::Logout => commands::auth::logout(&env).await,
        Command::Whoami => commands::auth::whoami(&env).await,
        Command::Timeline { full } => commands::timeline::timeline(&env, full).await,
        Command::Today {
            date,
            details,
            filters,
        } => commands::workouts::today(&env, date.as_deref(), details, &filters).await,
        Command::Future {
            days,
            details,
            filters,
        } => commands::workouts::future(&env, days, details, &filters).await,
        Command::Past {
            days,
            limit,
            details,
            filters,
        } => commands::workouts::past(&env, days, limit, details, &filters).await,
        Command::Events { full, filters } => commands::records::events(&env, full, &filters).await,
        Command::Annotations { full, filters } => {
            commands::records::annotations(&env, full, &filters).await
        }
        Command::Levels { filters } => commands::records::levels(&env, &filters).await,
        Command::Plan {
            view,
            full,
            filters,
        } => commands::plan::plan(&env, &view, full, &filters).await,
        Command::WeightHistory { filters } => {
            commands::records::weight_history(&env, &filters).await
        }
        Command::Ftp { history_limit } => commands::ftp::ftp(&env, history_limit).await,
        Command::FtpPrediction => commands::ftp::ftp_prediction(&env).await,
        Command::PowerRanking => commands::power::power_ranking(&env).await,
        Command::PowerRecords {
            start_date,
            end_date,
            row_type,
            indoor_only,
            slot,
            limit,
            full,
        } => {
            commands::power::power_records(
                &env,
                commands::power::PowerRecordsArgs {
                    start_date,
                    end_date,
                    row_type,
                    indoor_only,
                    slot,
                    limit,
                    full,
                },
            )
            .await
        }
    }
}

fn print_tips(error: &anyhow::Error) {
    let Some(export_error) = error.downcast_ref::<ExportError>() else {
        return;
    };
    match export_error {
        ExportError::PrivateModeRequired { .. } => {
            eprintln!("Tip: login first: trainerroad-cli login --username <username> --password-stdin");
        }
        ExportError::NoTarget => {
            eprintln!("Tip: login first: trainerroad-cli login --username <username> --password-stdin");
            eprintln!("Tip: or use public mode: trainerroad-cli <command> --target <username> --public");
        }
        ExportError::InvalidInput { message } if message.contains("expected YYYY-MM-DD") => {
            eprintln!("Tip: expected date format is YYYY-MM-DD");
        }
        ExportError::InvalidInput { message } if message.contains("--view") => {
            eprintln!("Tip: valid plan views are: current, phases, plans");
        }
        _ => {}
    }
}
