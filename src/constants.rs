/// Constants module to avoid magic strings in the codebase

// Network Configuration
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
pub const CHAT_PATH: &str = "/chat";
pub const HEALTH_PATH: &str = "/healthz";

// Session persistence
pub const SESSION_STORAGE_KEY: &str = "natlang_session_id";
pub const SESSION_FILE_NAME: &str = "session.toml";
pub const SESSION_ID_PREFIX: &str = "s-";
pub const SESSION_ID_RANDOM_LEN: usize = 12;

// Logging
pub const LOG_FILE_NAME: &str = "natlang.log";
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Conversation texts
pub const GREETING_TEXT: &str = "Hi, welcome to Natlang. How can we assist you today ?";
pub const GREETING_BUTTONS: &[&str] = &["Billing", "Outage Assist"];
pub const TRANSPORT_ERROR_TEXT: &str = "Error contacting server. Check the log for details.";
pub const SERVER_ERROR_FALLBACK: &str = "Error";

// Metadata keys
pub const META_TICKET_KEY: &str = "ticket";
pub const META_CORRELATION_KEY: &str = "correlation_id";

// UI Configuration
pub const UI_REFRESH_INTERVAL_MS: u64 = 50;
pub const UI_SCROLL_LINES: u16 = 3;
pub const UI_PAGE_LINES: u16 = 10;
pub const OUTCOME_CHANNEL_CAPACITY: usize = 64;
