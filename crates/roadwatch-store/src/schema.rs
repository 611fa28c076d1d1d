//! Storage layout.
//!
//! The session is kept as three independent string entries, mirroring a
//! browser's local storage. No other fields are persisted.

/// Keys of the persisted session entries.
pub mod keys {
    /// The opaque bearer token.
    pub const TOKEN: &str = "token";

    /// The role tag (`citizen` or `official`).
    pub const ROLE: &str = "role";

    /// The display name of the logged-in user.
    pub const USER_NAME: &str = "user_name";
}

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Flat string key/value entries.
    pub const LOCAL_STORAGE: &str = "local_storage";
}

/// Every key this component writes, in teardown order.
pub const SESSION_KEYS: [&str; 3] = [keys::TOKEN, keys::ROLE, keys::USER_NAME];

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::LOCAL_STORAGE]
}
