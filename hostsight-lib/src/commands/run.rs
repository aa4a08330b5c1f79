//! Command dispatch logic for hostsight

use super::{InitArgs, SnapshotArgs, ValidateArgs, WatchArgs, init_config, snapshot, validate_config, watch};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "hostsight", version, author, long_about = None)]
#[command(about = "Report how much of the host inventory security monitoring actually sees")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: HostsightSubcommand,
}

#[derive(Subcommand, Debug)]
enum HostsightSubcommand {
    /// Load every dimension once and report the result
    Snapshot(Box<SnapshotArgs>),
    /// Refresh periodically and report each completed refresh
    Watch(Box<WatchArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        HostsightSubcommand::Snapshot(snapshot_args) => snapshot(host, snapshot_args).await,
        HostsightSubcommand::Watch(watch_args) => watch(host, watch_args).await,
        HostsightSubcommand::Init(init_args) => init_config(host, init_args),
        HostsightSubcommand::Validate(validate_args) => validate_config(host, validate_args),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_snapshot_flags() {
        let cli = Cli::parse_from([
            "hostsight",
            "snapshot",
            "--base-url",
            "http://backend:5000",
            "--json",
            "out.json",
            "--color",
            "never",
            "--error-if-critical",
        ]);

        let HostsightSubcommand::Snapshot(args) = cli.command else {
            panic!("expected the snapshot subcommand");
        };
        assert_eq!(args.common.base_url.as_deref(), Some("http://backend:5000"));
        assert_eq!(args.common.json.as_deref().map(camino::Utf8Path::as_str), Some("out.json"));
        assert!(args.common.error_if_critical);
        assert!(!args.common.console);
    }

    #[test]
    fn test_parse_watch_ticks() {
        let cli = Cli::parse_from(["hostsight", "watch", "--ticks", "3"]);
        let HostsightSubcommand::Watch(args) = cli.command else {
            panic!("expected the watch subcommand");
        };
        assert_eq!(args.ticks, Some(3));
    }

    #[tokio::test]
    async fn test_run_init_and_validate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let path = path.to_str().unwrap();

        let mut host = TestHost::new();
        run(&mut host, ["hostsight", "init", path]).await.unwrap();
        run(&mut host, ["hostsight", "validate", "-c", path]).await.unwrap();

        let output = host.output_text();
        assert!(output.contains("Generated default configuration file"), "{output}");
        assert!(output.contains("Configuration file is valid"), "{output}");
    }
}
