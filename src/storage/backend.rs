use std::sync::Mutex;

use crate::error::StorageResult;

/// A single key-value slot holding the serialized document.
pub trait StorageBackend: Send + Sync {
    /// Read the stored text, `None` when nothing has been saved yet.
    fn read(&self) -> StorageResult<Option<String>>;
    /// Replace the stored text.
    fn write(&self, contents: &str) -> StorageResult<()>;
    /// Remove the stored text.
    fn clear(&self) -> StorageResult<()>;
    /// Human-readable location for logs.
    fn describe(&self) -> String;
}

/// In-memory slot, used in tests and when embedding the store.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slot: Mutex<Option<String>>,
}

impl MemoryBackend {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot pre-filled with `contents`.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(contents.into())),
        }
    }

    /// Current raw contents of the slot.
    pub fn contents(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self) -> StorageResult<Option<String>> {
        Ok(self.contents())
    }

    fn write(&self, contents: &str) -> StorageResult<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(contents.to_string());
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
