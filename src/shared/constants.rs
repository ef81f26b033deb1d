/// Number of records returned per listing page
pub const FILES_PAGE_SIZE: i64 = 20;

/// Prefix of the cache key mapping a session token to a user id
pub const SESSION_KEY_PREFIX: &str = "auth_";

/// Request header carrying the session token
pub const SESSION_TOKEN_HEADER: &str = "x-token";

/// Content type used when none can be derived from a file name
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
