//! `roombook` command-line client
//!
//! One command per invocation: the session is read from disk, the backend is
//! queried, and the result is printed. Failures are reported as a single
//! message and a non-zero exit status.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand, ValueEnum};
use roombook_client::portal::BookingDraft;
use roombook_client::{
    AppState, BookingApi, BookingPortal, ClientError, ClientResult, auth, render,
};
use roombook_core::autofill::AutoFill;
use roombook_core::classifier::Bucket;
use roombook_core::types::{DEFAULT_END_TIME, DEFAULT_START_TIME, RegisterRequest, RoomId};
use roombook_core::{BookingStatus, Config, departments};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info, warn};

/// Command line interface for campus room booking
#[derive(Parser)]
#[command(
    name = "roombook",
    version = env!("CARGO_PKG_VERSION"),
    about = "Book campus rooms and review booking requests",
    long_about = "Client for the campus room booking service. Students request rooms and follow their bookings; administrators review requests and book on behalf of students."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable structured JSON logging
    #[arg(long)]
    json: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        /// Student register number (or admin username)
        nrp: String,

        /// Password
        #[arg(short, long, env = "ROOMBOOK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create a student account
    Register(RegisterArgs),

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List bookable rooms
    Rooms,

    /// List departments and their majors
    Departments,

    /// Campus-wide schedule of upcoming bookings
    Schedule {
        /// Filter by room or date (e.g. "05/2024")
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Your own bookings
    Dashboard {
        /// Tab to show
        #[arg(short, long, value_enum, default_value_t = Tab::Active)]
        tab: Tab,

        /// Filter by room or date
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Request a room
    Book {
        #[command(flatten)]
        slot: SlotArgs,

        /// Reason for the booking
        #[arg(short, long, default_value = "")]
        purpose: String,
    },

    /// Withdraw one of your pending bookings
    Cancel {
        /// Booking ID
        id: i64,
    },

    /// Administrator commands
    Admin {
        /// Admin subcommand
        #[command(subcommand)]
        action: AdminCommands,
    },

    /// Inspect configuration
    Config {
        /// Show resolved configuration
        #[arg(short, long)]
        show: bool,
    },
}

/// Administrator subcommands
#[derive(Subcommand)]
enum AdminCommands {
    /// All bookings with review counters
    Dashboard {
        /// Tab to show
        #[arg(short, long, value_enum, default_value_t = Tab::Active)]
        tab: Tab,

        /// Filter by room, borrower or date
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Approve a pending booking
    Approve {
        /// Booking ID
        id: i64,
    },

    /// Reject a pending booking
    Reject {
        /// Booking ID
        id: i64,
    },

    /// Book for a student and approve it immediately
    Book {
        /// Borrower NRP
        #[arg(long, conflicts_with = "name", required_unless_present = "name")]
        nrp: Option<String>,

        /// Borrower name
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        slot: SlotArgs,

        /// Reason for the booking
        #[arg(short, long, default_value = roombook_core::types::ADMIN_DEFAULT_PURPOSE)]
        purpose: String,
    },
}

/// Account details for registration
#[derive(Args)]
struct RegisterArgs {
    /// Full name
    #[arg(long)]
    name: String,

    /// Student register number
    #[arg(long)]
    nrp: String,

    /// Department, as listed by `roombook departments`
    #[arg(long)]
    department: String,

    /// Major within the department
    #[arg(long)]
    major: String,

    /// Year of enrolment
    #[arg(long)]
    year_entry: i32,

    /// Password
    #[arg(short, long, env = "ROOMBOOK_PASSWORD", hide_env_values = true)]
    password: String,
}

/// Room and time window of a booking
#[derive(Args)]
struct SlotArgs {
    /// Room ID, as listed by `roombook rooms`
    #[arg(short, long)]
    room: RoomId,

    /// Date (YYYY-MM-DD)
    #[arg(short, long)]
    date: String,

    /// Start time (HH:MM)
    #[arg(long, default_value = DEFAULT_START_TIME)]
    start: String,

    /// End time (HH:MM)
    #[arg(long, default_value = DEFAULT_END_TIME)]
    end: String,
}

impl SlotArgs {
    fn into_draft(self, purpose: String) -> BookingDraft {
        BookingDraft::new(self.room, self.date)
            .with_times(self.start, self.end)
            .with_purpose(purpose)
    }
}

/// Dashboard tab
#[derive(Clone, Copy, ValueEnum)]
enum Tab {
    /// Pending, or approved and not over
    Active,
    /// Approved and over
    History,
    /// Declined
    Rejected,
}

impl From<Tab> for Bucket {
    fn from(tab: Tab) -> Self {
        match tab {
            Tab::Active => Self::Active,
            Tab::History => Self::History,
            Tab::Rejected => Self::Rejected,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is the normal case.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (config, config_error) = match Config::load_from(cli.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    let json = cli.json || config.logging.format == "json";
    if let Err(e) = roombook_core::init_logging(level, json) {
        eprintln!("{e}");
    }

    if let Some(e) = config_error {
        warn!(error = %e, "using default configuration");
    }
    debug!(base_url = %config.api.base_url, "configuration resolved");

    let result = match AppState::new(config) {
        Ok(state) => run(cli.command, &state).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Dispatch one command
async fn run(command: Commands, state: &AppState) -> ClientResult<()> {
    match command {
        Commands::Login { nrp, password } => {
            let user = auth::login(&state.api, &state.session, &nrp, &password).await?;
            println!("Selamat datang, {}!", user.name);
        }
        Commands::Register(args) => {
            let request = RegisterRequest {
                name: args.name,
                nrp: args.nrp,
                department: args.department,
                major: args.major,
                year_entry: args.year_entry,
                password: args.password,
            };
            auth::register(&state.api, &request).await?;
            println!("Registrasi berhasil! Silakan login.");
        }
        Commands::Logout => {
            auth::logout(&state.session)?;
            println!("Anda telah logout.");
        }
        Commands::Whoami => {
            let user = state.session.require_user()?;
            print!("{}", render::user(&user));
        }
        Commands::Rooms => {
            let rooms = state.portal()?.booking_form().await?;
            print!("{}", render::rooms(&rooms));
        }
        Commands::Departments => show_departments(),
        Commands::Schedule { search } => {
            let dashboard = state.portal()?.student_dashboard(local_now()).await?;
            let rows = dashboard.search_schedule(search.as_deref().unwrap_or_default());
            print!("{}", render::bookings(&rows, dashboard.now(), false));
        }
        Commands::Dashboard { tab, search } => {
            let dashboard = state.portal()?.student_dashboard(local_now()).await?;
            let rows = dashboard.search_tab(tab.into(), search.as_deref().unwrap_or_default());
            print!("{}", render::bookings(&rows, dashboard.now(), false));
        }
        Commands::Book { slot, purpose } => {
            state.portal()?.submit_booking(slot.into_draft(purpose)).await?;
            println!("Booking berhasil diajukan! Menunggu persetujuan admin.");
        }
        Commands::Cancel { id } => {
            state.portal()?.cancel_booking(id).await?;
            println!("Booking #{id} dibatalkan.");
        }
        Commands::Admin { action } => {
            run_admin(action, &state.admin_portal()?, local_now()).await?;
        }
        Commands::Config { show } => {
            if show {
                show_config(&state.config)?;
            }
        }
    }
    Ok(())
}

/// Dispatch an admin command for an already gated admin portal
async fn run_admin<A: BookingApi>(
    action: AdminCommands,
    portal: &BookingPortal<A>,
    now: NaiveDateTime,
) -> ClientResult<()> {
    match action {
        AdminCommands::Dashboard { tab, search } => {
            let dashboard = portal.admin_dashboard(now).await?;
            print!("{}", render::stats(&dashboard.stats()));
            println!();
            let rows = dashboard.search_tab(tab.into(), search.as_deref().unwrap_or_default());
            print!("{}", render::bookings(&rows, dashboard.now(), true));
        }
        AdminCommands::Approve { id } => {
            portal.review(id, BookingStatus::Approved).await?;
            println!("Booking #{id} disetujui.");
        }
        AdminCommands::Reject { id } => {
            portal.review(id, BookingStatus::Rejected).await?;
            println!("Booking #{id} ditolak.");
        }
        AdminCommands::Book {
            nrp,
            name,
            slot,
            purpose,
        } => {
            let form = portal.admin_booking_form().await?;
            let mut autofill = AutoFill::new();
            if let Some(nrp) = nrp {
                autofill.set_nrp(&form.users, nrp);
            } else if let Some(name) = name {
                autofill.set_name(&form.users, name);
            }

            match portal.book_on_behalf(&autofill, slot.into_draft(purpose)).await? {
                Some(id) => println!(
                    "Booking #{id} untuk {} ({}) dibuat dan disetujui.",
                    autofill.name(),
                    autofill.nrp()
                ),
                None => println!("Booking dibuat, tetapi belum dapat disetujui otomatis."),
            }
        }
    }
    Ok(())
}

fn show_departments() {
    for department in departments::departments() {
        println!("{department}");
        for major in departments::majors_of(department).unwrap_or_default() {
            println!("  - {major}");
        }
    }
}

/// Show configuration as TOML
fn show_config(config: &Config) -> ClientResult<()> {
    let config_toml = toml::to_string_pretty(config).map_err(|e| {
        ClientError::Core(roombook_core::Error::Configuration {
            message: format!("Failed to serialize configuration: {e}"),
        })
    })?;
    println!("{config_toml}");
    info!("configuration shown");
    Ok(())
}
