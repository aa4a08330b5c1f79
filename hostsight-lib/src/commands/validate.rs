use super::Host;
use super::config::{CONFIG_FILE_NAME, Config};
use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file (default is `hostsight.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,
}

pub fn validate_config<H: Host>(host: &mut H, args: &ValidateArgs) -> Result<()> {
    let base_dir = Utf8Path::new(".");
    let config_path = args.config.as_ref();

    match Config::load(base_dir, config_path) {
        Ok(config) => {
            let _ = writeln!(host.output(), "Configuration file is valid");
            if let Some(path) = config_path {
                let _ = writeln!(host.output(), "Config file: {path}");
            } else if base_dir.join(CONFIG_FILE_NAME).exists() {
                let _ = writeln!(host.output(), "Config file: {CONFIG_FILE_NAME}");
            } else {
                let _ = writeln!(host.output(), "Using default configuration (no config file found)");
            }
            let _ = writeln!(
                host.output(),
                "Backend {} with {} dimension(s), refreshed every {:?}",
                config.base_url,
                config.dimensions.len(),
                config.refresh_interval
            );
            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Configuration validation failed: {e}");
            host.exit(1);
            Err(e)
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;
    use crate::commands::init::{InitArgs, init_config};
    use tempfile::TempDir;

    fn write_config(name: &str, contents: &str) -> (TempDir, Utf8PathBuf) {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config_path = Utf8PathBuf::from_path_buf(temp_dir.path().join(name)).expect("temp dir should be UTF-8");
        std::fs::write(&config_path, contents).expect("Failed to write test config");
        (temp_dir, config_path)
    }

    fn validate(config_path: Utf8PathBuf) -> (TestHost, Result<()>) {
        let mut host = TestHost::new();
        let args = ValidateArgs { config: Some(config_path) };
        let result = validate_config(&mut host, &args);
        (host, result)
    }

    #[test]
    fn test_default_config_is_valid() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config_path = Utf8PathBuf::from_path_buf(temp_dir.path().join("hostsight.toml")).expect("temp dir should be UTF-8");

        let mut init_host = TestHost::new();
        let init_args = InitArgs {
            output: config_path.clone(),
        };
        init_config(&mut init_host, &init_args).expect("init_config should succeed");
        assert!(init_host.output_text().contains("Generated default configuration file"));

        let (host, result) = validate(config_path);
        assert!(result.is_ok(), "Default configuration should validate successfully: {result:?}");
        assert!(host.output_text().contains("Configuration file is valid"));
        assert!(host.output_text().contains("refreshed every 30s"), "{}", host.output_text());
        assert_eq!(host.exit_code, None);
    }

    #[test]
    fn test_default_config_matches_embedded() {
        let default_config = Config::default();
        let parsed_config: Config =
            toml::from_str(super::super::config::DEFAULT_CONFIG_TOML).expect("DEFAULT_CONFIG_TOML should parse successfully");

        let default_toml = toml::to_string(&default_config).expect("default config should serialize");
        let parsed_toml = toml::to_string(&parsed_config).expect("parsed config should serialize");

        assert_eq!(default_toml, parsed_toml, "Config::default() should match parsing DEFAULT_CONFIG_TOML");
    }

    #[test]
    fn test_invalid_toml_syntax() {
        let (_dir, config_path) = write_config("invalid_syntax.toml", "[thresholds\ncritical_below = 10.0\n");

        let (host, result) = validate(config_path);

        assert!(result.is_err(), "Invalid TOML syntax should fail validation");
        assert!(host.error_text().contains("Configuration validation failed"));
        assert_eq!(host.exit_code, Some(1));
    }

    #[test]
    fn test_unknown_field() {
        let (_dir, config_path) = write_config("unknown_field.toml", "unknown_field = \"value\"\n");

        let (host, result) = validate(config_path);

        assert!(result.is_err(), "Unknown field should fail validation");
        assert_eq!(host.exit_code, Some(1));
    }

    #[test]
    fn test_invalid_duration_format() {
        let (_dir, config_path) = write_config("invalid_duration.toml", "refresh_interval = \"not a valid duration\"\n");

        let (_host, result) = validate(config_path);

        assert!(result.is_err(), "Invalid duration format should fail validation");
    }

    #[test]
    fn test_unknown_dimension_override() {
        let (_dir, config_path) = write_config(
            "unknown_override.toml",
            "[thresholds.overrides.galactic]\ncritical_below = 10.0\nhealthy_at = 20.0\n",
        );

        let (_host, result) = validate(config_path);

        assert!(result.is_err(), "Overrides for unknown dimensions should fail validation");
    }

    #[test]
    fn test_inverted_thresholds() {
        let (_dir, config_path) = write_config("inverted.toml", "[thresholds]\ncritical_below = 90.0\nhealthy_at = 10.0\n");

        let (_host, result) = validate(config_path);

        assert!(result.is_err(), "critical_below above healthy_at should fail validation");
    }

    #[test]
    fn test_empty_config_is_valid() {
        let (_dir, config_path) = write_config("empty.toml", "# Empty config file\n");

        let (_host, result) = validate(config_path);

        assert!(result.is_ok(), "Empty config should be valid (uses defaults)");
    }
}
