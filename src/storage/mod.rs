// Client-local persistent storage
// Key/value store holding the credential pair and UI preferences

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use anyhow::Result;

/// Storage key of the access token
pub const ACCESS_KEY: &str = "access";

/// Storage key of the refresh token
pub const REFRESH_KEY: &str = "refresh";

/// Storage key of the theme preference
pub const THEME_KEY: &str = "theme";

/// Durable string key/value storage shared by the whole client
///
/// Implementations must be cheap to call from async code: every outbound
/// request reads the access token through this trait.
pub trait ClientStorage: Send + Sync {
    /// Read a value, `None` when the key was never set or was removed
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite a value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}
