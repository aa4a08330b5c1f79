use super::Host;
use super::common::{Common, CommonArgs};
use crate::Result;
use crate::refresh::{DashboardState, load_view_model};
use chrono::Utc;
use clap::Parser;
use ohno::app_err;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct SnapshotArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Run a single refresh tick and report the resulting state
///
/// # Errors
///
/// Returns an error if any dimension fails to load, a report cannot be written,
/// or `--error-if-critical` is set and a dimension is critical
pub async fn snapshot<H: Host>(host: &mut H, args: &SnapshotArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;
    let settings = common.settings();

    let state = DashboardState::idle().loading(1, Utc::now());
    let outcome = load_view_model(&common.client, &settings.dimensions, &settings.thresholds, 1).await;
    let state = state.completed(outcome, Utc::now());

    common.report(&state)?;

    if let Some(e) = state.error() {
        let _ = writeln!(common.host().error(), "{e}");
        return Err(app_err!("{e}"));
    }

    common.check_critical(&state)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::commands::common::{ColorMode, LogLevel};
    use crate::commands::host::TestHost;
    use camino::Utf8PathBuf;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn global_only_config() -> (TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let config_path = Utf8PathBuf::from_path_buf(dir.path().join("hostsight.toml")).unwrap();
        std::fs::write(&config_path, "dimensions = [\"global\"]\n").unwrap();
        (dir, config_path)
    }

    fn args(base_url: String, config: Utf8PathBuf) -> SnapshotArgs {
        SnapshotArgs {
            common: CommonArgs {
                base_url: Some(base_url),
                config: Some(config),
                color: ColorMode::Never,
                log_level: LogLevel::None,
                json: None,
                console: false,
                error_if_critical: false,
            },
        }
    }

    async fn serve_global(visible_hosts: u64) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/global_visibility"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_hosts": 1000, "visible_hosts": visible_hosts})))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_snapshot_renders_console() {
        let server = serve_global(300).await;
        let (_dir, config) = global_only_config();

        let mut host = TestHost::new();
        snapshot(&mut host, &args(server.uri(), config)).await.unwrap();

        let output = host.output_text();
        assert!(output.contains("300 of 1000 hosts visible"), "{output}");
        assert!(output.contains("WARNING"), "{output}");
    }

    #[tokio::test]
    async fn test_snapshot_writes_json_only() {
        let server = serve_global(900).await;
        let (dir, config) = global_only_config();
        let json_path = Utf8PathBuf::from_path_buf(dir.path().join("report.json")).unwrap();

        let mut args = args(server.uri(), config);
        args.common.json = Some(json_path.clone());

        let mut host = TestHost::new();
        snapshot(&mut host, &args).await.unwrap();

        assert!(host.output_text().is_empty());
        let report: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(report["status"]["phase"], "READY");
        assert_eq!(report["snapshot"]["dimensions"]["global"]["severity"], "HEALTHY");
    }

    #[tokio::test]
    async fn test_snapshot_fails_on_load_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/global_visibility"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let (_dir, config) = global_only_config();

        let mut host = TestHost::new();
        let _ = snapshot(&mut host, &args(server.uri(), config)).await.unwrap_err();

        assert!(host.output_text().contains("No visibility data loaded yet (ERROR)"));
        assert!(host.error_text().contains("could not load global visibility"), "{}", host.error_text());
    }

    #[tokio::test]
    async fn test_error_if_critical() {
        let server = serve_global(100).await;
        let (_dir, config) = global_only_config();

        let mut args = args(server.uri(), config);
        let mut host = TestHost::new();
        snapshot(&mut host, &args).await.unwrap();

        args.common.error_if_critical = true;
        let mut host = TestHost::new();
        let e = snapshot(&mut host, &args).await.unwrap_err();
        assert!(e.to_string().contains("1 dimension(s) were classified as critical"));
    }
}
