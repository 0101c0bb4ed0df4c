//! Project-wide constants.

use std::path::PathBuf;
use std::time::Duration;

/// Prefix shared by every backend route.
pub const API_BASE: &str = "/api/v1";

/// Default backend origin when not running against the mock responder.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Total attempts per request, first try included.
pub const MAX_ATTEMPTS: u32 = 3;

/// Unit of the linear retry backoff.
pub const BASE_DELAY: Duration = Duration::from_millis(1000);

/// Error message used when a failed response carries no `error` field.
pub const GENERIC_API_ERROR: &str = "API call failed";

/// Error body returned by the mock responder when a fixture cannot be loaded.
pub const MOCK_LOAD_ERROR: &str = "Failed to load mock data";

/// Settings key holding the persisted theme.
pub const THEME_KEY: &str = "integrity-theme";

/// Settings key holding the responsible-use acceptance flag.
pub const RESPONSIBLE_USE_KEY: &str = "responsible-use-accepted";

/// Default database path: `~/.integrity/integrity.db`.
pub fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".integrity")
        .join("integrity.db")
}

/// Join a path relative to [`API_BASE`] into a full request path.
pub fn api_path(relative: &str) -> String {
    format!("{API_BASE}{relative}")
}
