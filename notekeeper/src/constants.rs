// src/constants.rs
//
// Application-wide constants.

/// Storage key of the session token.
///
/// Used in: `application/session.rs`
pub const SESSION_TOKEN_KEY: &str = "session_token";

/// API root used when neither the config file nor the command line names one.
///
/// Used in: `config.rs`
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Directory name under the platform config and data directories.
///
/// Used in: `config.rs`
pub const APP_DIR: &str = "notekeeper";

/// Longest content preview shown in the note list, in characters.
///
/// Used in: `ports/text.rs`
pub const PREVIEW_MAX_CHARS: usize = 60;
