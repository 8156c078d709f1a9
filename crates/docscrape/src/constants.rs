//! Crawl targets and filesystem layout.

pub const MAIN_DOC_URL: &str = "https://docs.python.org/3/";
pub const WHATS_NEW_URL: &str = "https://docs.python.org/3/whatsnew/";
pub const DOWNLOADS_URL: &str = "https://docs.python.org/3/download.html";
pub const PEPS_LIST_URL: &str = "https://peps.python.org/";

pub const DOWNLOADS_DIR: &str = "downloads";
pub const RESULTS_DIR: &str = "results";

/// Timestamp embedded in report file names.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
