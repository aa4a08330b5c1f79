use super::Host;
use super::common::{Common, CommonArgs};
use crate::Result;
use crate::refresh::{DashboardState, RefreshScheduler};
use clap::Parser;
use std::io::Write;

const LOG_TARGET: &str = "   commands";

#[derive(Parser, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Stop after this many completed refreshes (default is to run until interrupted)
    #[arg(long, value_name = "N")]
    pub ticks: Option<u64>,
}

/// Refresh periodically and report every completed tick until interrupted
///
/// # Errors
///
/// Returns an error if a report cannot be written, or `--error-if-critical` is set
/// and the last reported state has a critical dimension
pub async fn watch<H: Host>(host: &mut H, args: &WatchArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;
    let scheduler = RefreshScheduler::start(common.client.clone(), common.settings());
    let mut states = scheduler.subscribe();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut last = DashboardState::idle();
    let mut completed = 0;

    let outcome = loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break Ok(());
                }

                let state = states.borrow_and_update().clone();
                if state.is_loading() || state.ticks_started == last.ticks_started {
                    continue;
                }

                if completed > 0 {
                    let _ = writeln!(common.host().output());
                }

                if let Err(e) = common.report(&state) {
                    break Err(e);
                }

                completed += 1;
                last = state;
                if args.ticks.is_some_and(|limit| completed >= limit) {
                    break Ok(());
                }
            }
            _ = &mut ctrl_c => {
                log::info!(target: LOG_TARGET, "Interrupted, stopping refresh");
                break Ok(());
            }
        }
    };

    scheduler.shutdown().await;
    outcome?;
    common.check_critical(&last)
}
