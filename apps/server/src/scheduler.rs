//! Background scheduler for the periodic accrual refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::{info, warn};

use crate::main_lib::AppState;

/// Starts the accrual scheduler. The first run happens after `initial_delay`,
/// then once per `every`.
pub fn start_accrual_scheduler(state: Arc<AppState>, every: Duration, initial_delay: Duration) {
    tokio::spawn(async move {
        info!("Accrual scheduler started ({}s interval)", every.as_secs());

        tokio::time::sleep(initial_delay).await;

        // First tick is immediate.
        let mut accrual_interval = interval(every);

        loop {
            accrual_interval.tick().await;
            run_scheduled_accrual(&state).await;
        }
    });
}

async fn run_scheduled_accrual(state: &Arc<AppState>) {
    info!("Running scheduled accrual refresh...");

    match state.accrual_service.run_accrual().await {
        Ok(report) => {
            info!(
                "Accrual refresh done: {} scanned, {} updated, {} completed, {} unchanged",
                report.scanned, report.updated, report.completed, report.unchanged
            );
            if !report.failed.is_empty() {
                warn!(
                    "Accrual refresh skipped {} investment(s): {}",
                    report.failed.len(),
                    report.failed.join(", ")
                );
            }
        }
        Err(e) => warn!("Scheduled accrual refresh failed: {}", e),
    }
}
