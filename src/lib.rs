pub mod api;
pub mod config;
pub mod monitor;
pub mod notify;
pub mod types;

/// Watched release: Mk.gee - Fool, vinyl pressing
pub const RELEASE_ID: &str = "13811316";

/// Discogs REST API base URL
pub const DISCOGS_API_BASE: &str = "https://api.discogs.com";

/// Pushover message delivery endpoint
pub const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// User-Agent sent on every Discogs request (their API requires one)
pub const USER_AGENT: &str = "DiscogsMonitor/1.0";

/// Default seconds between marketplace polls
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;

/// Seconds to wait before resuming after an unexpected poll-cycle error
pub const ERROR_COOLDOWN_SECS: u64 = 60;
