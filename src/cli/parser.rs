use clap::{Parser, Subcommand};

/// Command-line interface definition for rAttendance
/// CLI application to track attendance, breaks and net working time
#[derive(Parser)]
#[command(
    name = "rattendance",
    version = env!("CARGO_PKG_VERSION"),
    about = "A simple attendance CLI: check in, take breaks, check out and watch net working time",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Check in and start a new work session
    In {
        /// Position (O = Office, R = Remote, H = Home, F = Field)
        #[arg(
            long = "pos",
            help = "Work position: O=Office, R=Remote, H=Home, F=Field (default from config)"
        )]
        pos: Option<String>,

        #[arg(long = "note", help = "Free-text note attached to the check-in")]
        note: Option<String>,
    },

    /// Start a break
    Break {
        /// Break kind: lunch, tea, short, meeting, other
        #[arg(
            long = "kind",
            help = "Break kind: lunch, tea, short, meeting, other (default from config)"
        )]
        kind: Option<String>,
    },

    /// End the current break and resume working
    Resume,

    /// Check out and close the current session
    Out {
        #[arg(long = "note", help = "Free-text note attached to the check-out")]
        note: Option<String>,
    },

    /// Acknowledge a check-out and get ready for the next check-in
    Reset,

    /// Replace (or clear, when omitted) the note of the open session
    Note {
        text: Option<String>,
    },

    /// Show the current status and durations
    Status {
        #[arg(long = "json", help = "Print the snapshot as JSON")]
        json: bool,
    },

    /// Refresh the status live while a session is open
    Watch {
        #[arg(long = "ticks", help = "Stop after N refreshes (0 = print the status once)")]
        ticks: Option<usize>,

        #[arg(
            long = "interval-ms",
            value_parser = clap::value_parser!(u64).range(1..),
            help = "Refresh period in milliseconds (default from config)"
        )]
        interval_ms: Option<u64>,
    },

    /// List completed sessions
    List {
        #[arg(
            long,
            short,
            help = "Filter by year/month/day or a custom range (YYYY, YYYY-MM, YYYY-MM-DD, A:B, all)"
        )]
        period: Option<String>,

        #[arg(long = "today", help = "Show only today's sessions")]
        now: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
