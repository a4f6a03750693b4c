use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mound",
    about = "Mound — sharded descriptor and blob store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Storage root (overrides config file and MOUND_DATA_DIR)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Sync every document write and blob append
    #[arg(long, global = true)]
    pub durable: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new entity and print its identifier
    Create(CreateArgs),
    /// Allocate a blob on an entity
    Blob(BlobArgs),
    /// Append to a blob
    Write(WriteArgs),
    /// Link an entity to another identifier
    Link(LinkArgs),
    /// Close an entity with a terminal status
    Close(CloseArgs),
    /// Show an entity's descriptor
    Show(ShowArgs),
    /// Print a blob's contents
    Cat(CatArgs),
    /// Print the resolved path of a descriptor or blob
    Path(PathArgs),
    /// Run the hello-world scenario and print the final descriptor
    Demo(DemoArgs),
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(short, long)]
    pub program: String,
    /// Free-form version; `--semver 1.2.3` builds `semver|1.2.3` instead
    #[arg(long, conflicts_with = "semver")]
    pub version: Option<String>,
    #[arg(long)]
    pub semver: Option<String>,
}

#[derive(Args)]
pub struct BlobArgs {
    pub did: String,
    /// Optional blob name; at most one
    pub names: Vec<String>,
}

#[derive(Args)]
pub struct WriteArgs {
    pub did: String,
    pub slot: usize,
    /// Text to append; read from stdin when omitted
    pub text: Option<String>,
    /// Append a trailing newline
    #[arg(short = 'l', long)]
    pub line: bool,
}

#[derive(Args)]
pub struct LinkArgs {
    pub did: String,
    pub target: String,
}

#[derive(Args)]
pub struct CloseArgs {
    pub did: String,
    #[arg(default_value_t = 0, allow_negative_numbers = true)]
    pub status: i32,
}

#[derive(Args)]
pub struct ShowArgs {
    pub did: String,
}

#[derive(Args)]
pub struct CatArgs {
    pub did: String,
    /// Slot number, or a blob name
    pub blob: String,
}

#[derive(Args)]
pub struct PathArgs {
    pub did: String,
    pub slot: Option<usize>,
}

#[derive(Args)]
pub struct DemoArgs {
    #[arg(long, default_value = "mound-rs")]
    pub program: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["mound", "show", "abc", "--root", "/r", "--format", "json"])
            .unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/r")));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Command::Show(ShowArgs { ref did }) if did == "abc"));
    }

    #[test]
    fn blob_accepts_several_names() {
        let cli = Cli::try_parse_from(["mound", "blob", "abc", "a", "b"]).unwrap();
        match cli.command {
            Command::Blob(args) => assert_eq!(args.names, vec!["a", "b"]),
            _ => panic!("expected blob"),
        }
    }

    #[test]
    fn close_defaults_to_zero_and_takes_negatives() {
        let cli = Cli::try_parse_from(["mound", "close", "abc"]).unwrap();
        assert!(matches!(cli.command, Command::Close(CloseArgs { status: 0, .. })));
        let cli = Cli::try_parse_from(["mound", "close", "abc", "-2"]).unwrap();
        assert!(matches!(cli.command, Command::Close(CloseArgs { status: -2, .. })));
    }

    #[test]
    fn version_and_semver_conflict() {
        let result = Cli::try_parse_from([
            "mound", "create", "-p", "x", "--version", "1", "--semver", "1.0.0",
        ]);
        assert!(result.is_err());
    }
}
