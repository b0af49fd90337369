mod error;
pub mod kv;
mod models;
mod schema;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use kv::KeyValueStore;
#[cfg(any(test, feature = "test-mocks"))]
pub use kv::MockKeyValueStore;
pub use models::{BoardSnapshot, Task, TaskStatus};
pub use schema::Database;
pub use store::{BoardStore, LoadOutcome, CORRUPT_LISTS_KEY, LISTS_KEY};
