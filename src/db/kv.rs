//! Byte-oriented key-value storage seam.

#[cfg(any(test, feature = "test-mocks"))]
use mockall::automock;

use super::error::StoreResult;

/// Durable get/set by key
#[cfg_attr(any(test, feature = "test-mocks"), automock)]
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Insert or replace the value stored under `key`
    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Check whether a value exists under `key`
    fn contains(&self, key: &str) -> StoreResult<bool>;

    /// List all keys currently stored
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Release the underlying storage. Later calls fail with `StoreError::Closed`.
    fn close(&mut self) -> StoreResult<()>;
}
