use super::error::{StoreError, StoreResult};
use super::kv::KeyValueStore;
use super::models::BoardSnapshot;

/// Key holding the serialized board
pub const LISTS_KEY: &str = "lists";

/// Key where an unreadable board is preserved before it is replaced
pub const CORRUPT_LISTS_KEY: &str = "lists.corrupt";

/// Result of loading the board at startup
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Stored board decoded successfully
    Loaded(BoardSnapshot),
    /// Nothing was stored yet; an empty board was written
    Initialized(BoardSnapshot),
    /// Stored bytes did not decode; an empty board is used instead
    Recovered { snapshot: BoardSnapshot, reason: String },
}

impl LoadOutcome {
    pub fn into_snapshot(self) -> BoardSnapshot {
        match self {
            LoadOutcome::Loaded(s) | LoadOutcome::Initialized(s) => s,
            LoadOutcome::Recovered { snapshot, .. } => snapshot,
        }
    }
}

/// Persists board snapshots as a single JSON record in a key-value store
pub struct BoardStore {
    kv: Box<dyn KeyValueStore>,
}

impl BoardStore {
    pub fn new(kv: Box<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub fn encode(snapshot: &BoardSnapshot) -> StoreResult<Vec<u8>> {
        serde_json::to_vec(snapshot).map_err(StoreError::Encode)
    }

    pub fn decode(bytes: &[u8]) -> StoreResult<BoardSnapshot> {
        serde_json::from_slice(bytes).map_err(StoreError::Decode)
    }

    /// Write an empty board if nothing has been stored yet.
    /// Returns true when the record was created.
    pub fn init(&self) -> StoreResult<bool> {
        if self.kv.contains(LISTS_KEY)? {
            return Ok(false);
        }
        tracing::info!("no stored board found, initializing empty board");
        self.save(&BoardSnapshot::empty())?;
        Ok(true)
    }

    /// Read and decode the stored board
    pub fn load(&self) -> StoreResult<BoardSnapshot> {
        match self.kv.get(LISTS_KEY)? {
            Some(bytes) => Self::decode(&bytes),
            None => Ok(BoardSnapshot::empty()),
        }
    }

    /// Initialize if needed, then load. A corrupt record is copied to
    /// [`CORRUPT_LISTS_KEY`] and an empty board is returned in its place.
    pub fn open_board(&self) -> StoreResult<LoadOutcome> {
        if self.init()? {
            return Ok(LoadOutcome::Initialized(BoardSnapshot::empty()));
        }

        let Some(bytes) = self.kv.get(LISTS_KEY)? else {
            return Ok(LoadOutcome::Loaded(BoardSnapshot::empty()));
        };

        match Self::decode(&bytes) {
            Ok(snapshot) => {
                tracing::info!(tasks = snapshot.len(), "loaded board");
                Ok(LoadOutcome::Loaded(snapshot))
            }
            Err(err) => {
                tracing::warn!(error = %err, "stored board could not be decoded, starting empty");
                self.kv.set(CORRUPT_LISTS_KEY, &bytes)?;
                Ok(LoadOutcome::Recovered {
                    snapshot: BoardSnapshot::empty(),
                    reason: err.to_string(),
                })
            }
        }
    }

    pub fn save(&self, snapshot: &BoardSnapshot) -> StoreResult<()> {
        let bytes = Self::encode(snapshot)?;
        self.kv.set(LISTS_KEY, &bytes)?;
        tracing::debug!(tasks = snapshot.len(), bytes = bytes.len(), "saved board");
        Ok(())
    }

    pub fn close(&mut self) -> StoreResult<()> {
        self.kv.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::kv::MockKeyValueStore;
    use crate::db::models::{Task, TaskStatus};

    #[test]
    fn test_init_writes_empty_board_when_missing() {
        let mut kv = MockKeyValueStore::new();
        kv.expect_contains()
            .withf(|key: &str| key == LISTS_KEY)
            .times(1)
            .returning(|_| Ok(false));
        kv.expect_set()
            .withf(|key: &str, value: &[u8]| key == LISTS_KEY && value == b"[[],[],[]]")
            .times(1)
            .returning(|_, _| Ok(()));

        let store = BoardStore::new(Box::new(kv));
        assert!(store.init().unwrap());
    }

    #[test]
    fn test_init_skips_existing_board() {
        let mut kv = MockKeyValueStore::new();
        kv.expect_contains().returning(|_| Ok(true));
        kv.expect_set().never();

        let store = BoardStore::new(Box::new(kv));
        assert!(!store.init().unwrap());
    }

    #[test]
    fn test_open_board_recovers_from_corrupt_record() {
        let mut kv = MockKeyValueStore::new();
        kv.expect_contains().returning(|_| Ok(true));
        kv.expect_get()
            .withf(|key: &str| key == LISTS_KEY)
            .returning(|_| Ok(Some(b"not json".to_vec())));
        kv.expect_set()
            .withf(|key: &str, value: &[u8]| key == CORRUPT_LISTS_KEY && value == b"not json")
            .times(1)
            .returning(|_, _| Ok(()));

        let store = BoardStore::new(Box::new(kv));
        match store.open_board().unwrap() {
            LoadOutcome::Recovered { snapshot, reason } => {
                assert!(snapshot.is_empty());
                assert!(reason.contains("corrupt"));
            }
            other => panic!("expected recovery, got {:?}", other),
        }
    }

    #[test]
    fn test_open_board_propagates_storage_failure() {
        let mut kv = MockKeyValueStore::new();
        kv.expect_contains().returning(|_| Err(StoreError::Closed));

        let store = BoardStore::new(Box::new(kv));
        assert!(matches!(store.open_board(), Err(StoreError::Closed)));
    }

    #[test]
    fn test_encode_uses_named_fields() {
        let mut snapshot = BoardSnapshot::empty();
        snapshot.columns[1].push(Task::new(TaskStatus::InProgress, "Write", "docs"));

        let json = String::from_utf8(BoardStore::encode(&snapshot).unwrap()).unwrap();
        assert_eq!(
            json,
            r#"[[],[{"status":"in_progress","title":"Write","description":"docs"}],[]]"#
        );
    }
}
