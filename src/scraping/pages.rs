//! Page objects interact with the DOM so the rest of the crate never touches
//! selectors or frame layout directly. Each interaction that advances the
//! flow hands back the next page object.

use std::path::PathBuf;
use std::time::Duration;

use thirtyfour::prelude::*;

use crate::models::outcome::AttemptOutcome;
use crate::scraping::constants::*;

pub fn snapshot_path(file_name: &str) -> PathBuf {
    PathBuf::from(SCREENSHOT_DIR).join(file_name)
}

pub struct LocationSelectPage<'a> {
    driver: &'a WebDriver,
}

impl<'a> LocationSelectPage<'a> {
    pub fn new(driver: &'a WebDriver) -> Self {
        LocationSelectPage { driver }
    }

    pub async fn navigate(&self) -> WebDriverResult<()> {
        self.driver.goto(TRIAGE_URL).await
    }

    pub async fn snapshot(&self, file_name: &str) -> WebDriverResult<()> {
        self.driver.screenshot(&snapshot_path(file_name)).await
    }

    /// Waits for the first location card and clicks it. The card never
    /// appearing within the ceiling surfaces as a query timeout.
    pub async fn select_first_location(self) -> WebDriverResult<SchedulingPage<'a>> {
        let card = self
            .driver
            .query(By::ClassName(LOCATION_CARD_CLASS))
            .wait(
                Duration::from_secs(ELEMENT_WAIT_SECS),
                Duration::from_millis(QUERY_POLL_MS),
            )
            .first()
            .await?;
        card.click().await?;
        Ok(SchedulingPage::new(self.driver))
    }
}

pub struct SchedulingPage<'a> {
    driver: &'a WebDriver,
}

impl<'a> SchedulingPage<'a> {
    pub fn new(driver: &'a WebDriver) -> Self {
        SchedulingPage { driver }
    }

    pub async fn snapshot(&self, file_name: &str) -> WebDriverResult<()> {
        self.driver.screenshot(&snapshot_path(file_name)).await
    }

    /// Classifies availability from inside the scheduling iframe.
    ///
    /// The marker element signals "no openings". Failing to locate it within
    /// the ceiling does not prove an opening exists, so that case stays
    /// distinct from an affirmative sighting of the openings widget.
    pub async fn classify_availability(&self) -> WebDriverResult<AttemptOutcome> {
        // the iframe is not in the DOM right after the card click
        let frame = self
            .driver
            .query(By::Tag("iframe"))
            .wait(
                Duration::from_secs(FRAME_WAIT_SECS),
                Duration::from_millis(QUERY_POLL_MS),
            )
            .first()
            .await?;
        frame.enter_frame().await?;

        let marker_present = self
            .driver
            .query(By::ClassName(NO_OPENINGS_CLASS))
            .wait(
                Duration::from_secs(ELEMENT_WAIT_SECS),
                Duration::from_millis(QUERY_POLL_MS),
            )
            .exists()
            .await?;

        let outcome = if marker_present {
            AttemptOutcome::NoSlot
        } else if self
            .driver
            .query(By::ClassName(OPENINGS_WIDGET_CLASS))
            .nowait()
            .exists()
            .await?
        {
            AttemptOutcome::SlotAvailable
        } else {
            AttemptOutcome::Indeterminate
        };

        self.driver.enter_default_frame().await?;
        Ok(outcome)
    }
}
