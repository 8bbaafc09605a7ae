//! Command-line argument definitions.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::locale::Locale;

/// Top-level CLI entry point for the devtools helpers.
#[derive(Parser, Debug)]
#[command(
    name = "devtools",
    about = "File helpers: INI config files, timestamped backups, SHA-256 checks",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Language for operator notices (defaults to DEVTOOLS_LANG, then LANG)
    #[arg(long, global = true, value_enum)]
    pub lang: Option<Locale>,
}

impl GlobalOpts {
    /// The notice language: `--lang` if given, else the environment.
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.lang.unwrap_or_else(Locale::from_env)
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read or write INI configuration files
    Config(ConfigOpts),
    /// Copy a file to a timestamped backup
    Backup(BackupOpts),
    /// Print a file's SHA-256 digest, or check several files for equality
    Hash(HashOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Short name used for the per-command log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Backup(_) => "backup",
            Self::Hash(_) => "hash",
            Self::Version => "version",
        }
    }
}

/// Options for the `config` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ConfigOpts {
    /// Action to perform on the config file.
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// `config` actions.
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Write a config file from SECTION.OPTION=VALUE assignments
    Write(ConfigWriteOpts),
    /// Print the sections and options of a config file
    Read(ConfigReadOpts),
}

/// Options for `config write`.
#[derive(Parser, Debug, Clone)]
pub struct ConfigWriteOpts {
    /// File to create or overwrite
    pub file: PathBuf,

    /// Option to write; repeat for several (option names are lowercased)
    #[arg(
        short,
        long = "set",
        value_name = "SECTION.OPTION=VALUE",
        required = true,
        value_parser = parse_assignment
    )]
    pub set: Vec<Assignment>,
}

/// Options for `config read`.
#[derive(Parser, Debug, Clone)]
pub struct ConfigReadOpts {
    /// File to read (a missing file prints nothing)
    pub file: PathBuf,

    /// Print as JSON instead of INI text
    #[arg(long)]
    pub json: bool,
}

/// Options for the `backup` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct BackupOpts {
    /// File to back up
    pub source: PathBuf,

    /// Destination directory (created if missing; default: current directory)
    #[arg(short, long, default_value = "")]
    pub dest: String,

    /// Backup file name (default: "YYYY-MM-DD HHhMM" plus the source extension)
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Options for the `hash` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct HashOpts {
    /// One file to digest, or several to compare
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// A single `SECTION.OPTION=VALUE` assignment from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Section name (may itself contain dots).
    pub section: String,
    /// Option name, lowercased.
    pub option: String,
    /// Value, verbatim.
    pub value: String,
}

/// Parse `SECTION.OPTION=VALUE`; the option is the text after the last `.`
/// before the `=`.
fn parse_assignment(raw: &str) -> Result<Assignment, String> {
    let (target, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected SECTION.OPTION=VALUE, got '{raw}'"))?;
    let (section, option) = target
        .rsplit_once('.')
        .ok_or_else(|| format!("missing section in '{target}'"))?;
    if section.is_empty() || option.is_empty() {
        return Err(format!("empty section or option in '{target}'"));
    }
    Ok(Assignment {
        section: section.to_string(),
        option: option.to_lowercase(),
        value: value.to_string(),
    })
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_hash_single_file() {
        let cli = Cli::parse_from(["devtools", "hash", "a.bin"]);
        assert!(
            matches!(&cli.command, Command::Hash(opts) if opts.files.len() == 1),
            "Expected Hash command with one file"
        );
    }

    #[test]
    fn parse_hash_requires_a_file() {
        assert!(Cli::try_parse_from(["devtools", "hash"]).is_err());
    }

    #[test]
    fn parse_backup_with_dest_and_name() {
        let cli = Cli::parse_from(["devtools", "backup", "r.csv", "-d", "bak", "-n", "x.csv"]);
        let Command::Backup(opts) = cli.command else {
            panic!("Expected Backup command");
        };
        assert_eq!(opts.source, PathBuf::from("r.csv"));
        assert_eq!(opts.dest, "bak");
        assert_eq!(opts.name.as_deref(), Some("x.csv"));
    }

    #[test]
    fn backup_dest_defaults_to_empty() {
        let cli = Cli::parse_from(["devtools", "backup", "r.csv"]);
        let Command::Backup(opts) = cli.command else {
            panic!("Expected Backup command");
        };
        assert_eq!(opts.dest, "");
        assert_eq!(opts.name, None);
    }

    #[test]
    fn parse_config_write_assignments() {
        let cli = Cli::parse_from([
            "devtools",
            "config",
            "write",
            "app.cfg",
            "--set",
            "db.Host=localhost",
            "-s",
            "eu.west.port=5432",
        ]);
        let Command::Config(ConfigOpts {
            action: ConfigAction::Write(opts),
        }) = cli.command
        else {
            panic!("Expected config write");
        };
        assert_eq!(
            opts.set,
            vec![
                Assignment {
                    section: "db".to_string(),
                    option: "host".to_string(),
                    value: "localhost".to_string(),
                },
                Assignment {
                    section: "eu.west".to_string(),
                    option: "port".to_string(),
                    value: "5432".to_string(),
                },
            ]
        );
    }

    #[test]
    fn parse_assignment_rejects_malformed_input() {
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("nosection=1").is_err());
        assert!(parse_assignment(".opt=1").is_err());
        assert!(parse_assignment("sec.=1").is_err());
        assert_eq!(parse_assignment("s.k=a=b").unwrap().value, "a=b");
    }

    #[test]
    fn parse_lang_flag() {
        let cli = Cli::parse_from(["devtools", "--lang", "pt-br", "version"]);
        assert_eq!(cli.global.lang, Some(Locale::PtBr));
        assert_eq!(cli.global.locale(), Locale::PtBr);
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["devtools", "-v", "version"]);
        assert!(cli.verbose);
        assert_eq!(cli.command.name(), "version");
    }
}
