//! Domain constants
//!
//! Persistent key names and configuration defaults.

// Persistent key space. Absence of a key is meaningful (logged out).
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const TOKEN_EXPIRE_DATE_KEY: &str = "tokenExpireDate";

/// All session keys, in the order they are written
pub const SESSION_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TOKEN_EXPIRE_DATE_KEY];

// Configuration defaults
pub const DEFAULT_TOKEN_URL: &str = "https://login.xsolla.com/api/oauth2/token";
pub const DEFAULT_REDIRECT_URI: &str = "app://xlogin.demo";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SERVICE_NAME: &str = "LoginKit.session";
pub const DEFAULT_SESSION_FILE: &str = "session.json";
pub const DEFAULT_LOG_LEVEL: &str = "info";

// OAuth2 refresh grant
pub const REFRESH_GRANT_TYPE: &str = "refresh_token";
