// thirtyfour (selenium) inputs
pub const WEBDRIVER_URL: &str = "http://localhost:9515";
pub const TRIAGE_URL: &str = "https://vaccinescheduling.ucdavis.edu/MyChart/covid19/#/triage";

pub const WINDOW_WIDTH: u32 = 2560;
pub const WINDOW_HEIGHT: u32 = 1600;

// HTML class selectors; these must match the live site's markup bit for bit
pub const LOCATION_CARD_CLASS: &str = "location-card-title";
pub const NO_OPENINGS_CLASS: &str = "openingsNoData";
pub const OPENINGS_WIDGET_CLASS: &str = "openingsData";

// wait ceilings for element queries
pub const ELEMENT_WAIT_SECS: u64 = 12;
pub const FRAME_WAIT_SECS: u64 = 10;
pub const QUERY_POLL_MS: u64 = 500;

// fixed delay between attempts
pub const WATCH_INTERVAL_SECS: u64 = 30;

// diagnostic output; each run overwrites the same file names
pub const SCREENSHOT_DIR: &str = "screenshots";
pub const LOCATION_PAGE_SNAPSHOT: &str = "ucd_location_pg.png";
pub const SCHEDULING_READY_SNAPSHOT: &str = "scheduling_page_ready.png";
pub const AVAILABLE_SNAPSHOT: &str = "available_to_schedule.png";
pub const TERMINATION_SNAPSHOT: &str = "termination_point.png";
