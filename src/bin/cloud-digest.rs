//! CLI binary for cloud-digest crate.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use cloud_digest::{load_snapshot, read_snapshot, CloudProvider, DigestError, MetadataDigest};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "cloud-digest")]
#[command(
    author,
    version,
    about = "Digest raw cloud instance metadata into hostname, SSH keys and interfaces"
)]
struct Cli {
    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Input {
    /// Metadata document to read (stdin when omitted or "-")
    file: Option<PathBuf>,

    /// Provider that produced the document
    #[arg(short, long, default_value = "gcp")]
    provider: CloudProvider,

    /// Maximum size in bytes to accept (fails if exceeded)
    #[arg(short, long)]
    max_size: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full digest
    Digest {
        #[command(flatten)]
        input: Input,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },

    /// Print SSH keys as `user:key` lines
    Keys {
        #[command(flatten)]
        input: Input,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Json,
    Text,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            _ => Err(format!("unknown format: {}", s)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

fn setup_logging(level: LogLevel) {
    let level = Level::from(level);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .finish();

    // Only fails if a subscriber is already installed
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), DigestError> {
    match cli.command {
        Commands::Digest { input, format } => {
            let digest = input.digest()?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&digest)?),
                OutputFormat::Text => print!("{}", render_text(&digest)),
            }
            Ok(())
        }

        Commands::Keys { input } => {
            let digest = input.digest()?;
            print!("{}", render_keys(&digest));
            Ok(())
        }
    }
}

impl Input {
    /// Path to read, or `None` for stdin.
    fn path(&self) -> Option<&Path> {
        self.file.as_deref().filter(|path| *path != Path::new("-"))
    }

    fn digest(&self) -> Result<MetadataDigest, DigestError> {
        let data = match self.path() {
            Some(path) => load_snapshot(path, self.max_size)?,
            None => read_snapshot(io::stdin().lock(), self.max_size)?,
        };
        debug!(provider = %self.provider, bytes = data.len(), "digesting snapshot");
        self.provider.digest_json(&data)
    }
}

fn render_keys(digest: &MetadataDigest) -> String {
    let mut out = String::new();
    for (user, keys) in &digest.ssh_keys {
        for key in keys {
            out.push_str(&format!("{}:{}\n", user, key));
        }
    }
    out
}

fn render_text(digest: &MetadataDigest) -> String {
    let mut out = format!("hostname: {}\n", digest.hostname);

    for (user, keys) in &digest.ssh_keys {
        for key in keys {
            out.push_str(&format!("ssh-key {} {}\n", user, key));
        }
    }

    for (idx, ifc) in digest.network_interfaces.iter().enumerate() {
        out.push_str(&format!(
            "interface {} {} {}",
            idx, ifc.network_name, ifc.private_address
        ));
        for addr in &ifc.public_addresses {
            out.push_str(&format!(" {}", addr));
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_text() {
        let digest = CloudProvider::Gcp
            .digest_json(
                br#"{
                    "instance": {
                        "hostname": "vm-1",
                        "networkInterfaces": [
                            {"ip": "10.0.0.5", "network": "default",
                             "accessConfigs": [{"type": "ONE_TO_ONE_NAT", "externalIp": "34.1.2.3"}]},
                            {"ip": "10.1.0.5", "network": "backend"}
                        ]
                    },
                    "project": {"attributes": {"ssh-keys": "root:ssh-rsa AAA\nroot:ssh-ed25519 BBB\n"}}
                }"#,
            )
            .unwrap();

        assert_eq!(
            render_text(&digest),
            "hostname: vm-1\n\
             ssh-key root ssh-rsa AAA\n\
             ssh-key root ssh-ed25519 BBB\n\
             interface 0 default 10.0.0.5 34.1.2.3\n\
             interface 1 backend 10.1.0.5\n"
        );
    }

    #[test]
    fn test_cli_parses_digest_command() {
        let cli = Cli::try_parse_from([
            "cloud-digest",
            "digest",
            "snapshot.json",
            "--format",
            "text",
            "-m",
            "4096",
        ])
        .unwrap();

        match cli.command {
            Commands::Digest { input, format } => {
                assert_eq!(input.file, Some(PathBuf::from("snapshot.json")));
                assert_eq!(input.provider, CloudProvider::Gcp);
                assert_eq!(input.max_size, Some(4096));
                assert_eq!(format, OutputFormat::Text);
            }
            Commands::Keys { .. } => panic!("expected digest command"),
        }
    }

    #[test]
    fn test_render_keys_groups_by_first_appearance() {
        let digest = CloudProvider::Gcp
            .digest_json(
                br#"{"project": {"attributes": {"ssh-keys": "zed:k1\nalice:k2\nzed:k3\n"}}}"#,
            )
            .unwrap();

        assert_eq!(render_keys(&digest), "zed:k1\nzed:k3\nalice:k2\n");
    }

    #[test]
    fn test_input_reads_stdin_for_dash_or_missing_file() {
        for args in [
            &["cloud-digest", "digest", "-"][..],
            &["cloud-digest", "keys"][..],
        ] {
            let cli = Cli::try_parse_from(args).unwrap();
            let input = match &cli.command {
                Commands::Digest { input, .. } | Commands::Keys { input } => input,
            };
            assert_eq!(input.path(), None);
        }
    }

    #[test]
    fn test_input_reads_named_file() {
        let cli = Cli::try_parse_from(["cloud-digest", "keys", "snapshot.json"]).unwrap();
        let Commands::Keys { input } = cli.command else {
            panic!("expected keys command");
        };
        assert_eq!(input.path(), Some(Path::new("snapshot.json")));
    }

    #[test]
    fn test_log_level() {
        let cli = Cli::try_parse_from(["cloud-digest", "keys", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(Level::from(cli.log_level), Level::DEBUG);

        let cli = Cli::try_parse_from(["cloud-digest", "keys"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        assert!(Cli::try_parse_from(["cloud-digest", "keys", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_provider() {
        assert!(Cli::try_parse_from(["cloud-digest", "keys", "-p", "azure"]).is_err());
    }
}
