mod alert;
mod config;
mod models;
mod scraping;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenv::dotenv;
use thirtyfour::prelude::*;
use tracing::{error, info, warn};

use crate::alert::{AlertSink, TwilioNotifier};
use crate::config::AlertConfig;
use crate::models::outcome::AttemptOutcome;
use crate::scraping::constants::*;
use crate::scraping::pages::snapshot_path;
use crate::scraping::watcher::{self, AvailabilityProbe};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenv().ok();

    // read credentials before a browser exists, so a bad environment fails here
    let alert_config = AlertConfig::from_env()?;

    std::fs::create_dir_all(SCREENSHOT_DIR)
        .with_context(|| format!("failed to create {SCREENSHOT_DIR}/"))?;

    // headful on purpose, the operator finishes the booking in this window
    let caps = DesiredCapabilities::chrome();

    let driver = Arc::new(
        WebDriver::new(WEBDRIVER_URL, caps)
            .await
            .context("failed to start a session against the local chromedriver")?,
    );

    // once the session exists, every exit path below runs the release at the end
    let result = {
        let probe = watcher::MyChartProbe::new(Arc::clone(&driver));
        let notifier = TwilioNotifier::new(alert_config);
        watch_session(&driver, &probe, &notifier).await
    };

    match &result {
        Ok(outcome) => {
            warn!(
                "appointment may be bookable ({outcome:?}); finish the booking in the open \
                 browser window, then press Ctrl-C"
            );
            let _ = tokio::signal::ctrl_c().await;
        }
        Err(e) => error!("watch loop terminated: {e:?}"),
    }

    // final diagnostic capture; a failure here must not skip the quit below
    if let Err(e) = driver.screenshot(&snapshot_path(TERMINATION_SNAPSHOT)).await {
        warn!("failed to capture {TERMINATION_SNAPSHOT}: {e}");
    }

    info!("Quitting Chrome session");
    match Arc::try_unwrap(driver) {
        Ok(driver) => driver.quit().await?,
        Err(_) => error!("driver still has live references, cannot quit cleanly"),
    }

    result.map(|_| ())
}

async fn watch_session<P, N>(driver: &WebDriver, probe: &P, notifier: &N) -> Result<AttemptOutcome>
where
    P: AvailabilityProbe,
    N: AlertSink,
{
    driver
        .set_window_rect(0, 0, WINDOW_WIDTH, WINDOW_HEIGHT)
        .await?;
    watcher::run(probe, notifier, Duration::from_secs(WATCH_INTERVAL_SECS)).await
}
