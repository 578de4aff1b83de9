//! aaedit CLI
//!
//! List and edit the rules of AppArmor profile files in place.

mod commands;

use aaedit_core::{ConfigLoader, init_tracing};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "aaedit")]
#[command(about = "aaedit: round-trip editing of AppArmor profile rules")]
#[command(version = aaedit_core::VERSION)]
#[command(
    long_about = "aaedit edits individual rules of AppArmor profiles while leaving\n\
comments, formatting and every other rule untouched.\n\
\n\
Rules are addressed by profile name and their 1-based position as shown by `list`.\n\
\n\
Examples:\n  \
aaedit list /etc/apparmor.d/usr.sbin.ntpd\n  \
aaedit add usr.sbin.ntpd -p /usr/sbin/ntpd /var/log/ntp.log w\n  \
aaedit remove usr.sbin.ntpd -p /usr/sbin/ntpd -r 3\n  \
aaedit edit usr.sbin.ntpd -p /usr/sbin/ntpd -r 2 /etc/ntp.conf rw -o new.profile"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, help = "Path to configuration file (.aaedit.toml)")]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List profiles and their numbered rules
    #[command(alias = "ls")]
    List {
        /// Profile file to read
        file: PathBuf,
    },

    /// Append a rule to the end of a profile
    Add {
        #[command(flatten)]
        target: ProfileTarget,

        /// Path pattern of the new rule
        pattern: String,

        /// Access mode of the new rule (e.g. r, rw, ix)
        mode: String,
    },

    /// Remove a rule from a profile
    #[command(alias = "rm")]
    Remove {
        #[command(flatten)]
        target: ProfileTarget,

        /// 1-based rule number as shown by `list`
        #[arg(short, long)]
        rule: usize,
    },

    /// Replace a rule with a new pattern and mode
    Edit {
        #[command(flatten)]
        target: ProfileTarget,

        /// 1-based rule number as shown by `list`
        #[arg(short, long)]
        rule: usize,

        /// Path pattern of the replacement rule
        pattern: String,

        /// Access mode of the replacement rule
        mode: String,
    },
}

/// File and profile an edit applies to
#[derive(Args)]
struct ProfileTarget {
    /// Profile file to edit
    file: PathBuf,

    /// Name of the profile to edit
    #[arg(short, long)]
    profile: String,

    /// Write the result here instead of overwriting FILE
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load(cli.config.as_deref(), None) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing based on verbosity
    let log_filter = match cli.verbose {
        0 => config.log_filter.as_str(),
        1 => "aaedit=debug",
        _ => "aaedit=trace",
    };
    init_tracing(log_filter);
    debug!("Loaded configuration: {:?}", config);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let result = match cli.command {
        Commands::List { file } => commands::list_command(&file, config),
        Commands::Add {
            target,
            pattern,
            mode,
        } => commands::add_command(&target, &pattern, &mode, config),
        Commands::Remove { target, rule } => commands::remove_command(&target, rule, config),
        Commands::Edit {
            target,
            rule,
            pattern,
            mode,
        } => commands::edit_command(&target, rule, &pattern, &mode, config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        if let commands::CliError::Core(err) = &e {
            for diagnostic in err.diagnostics() {
                eprintln!("  {diagnostic}");
            }
        }
        std::process::exit(1);
    }
}
