//! # Host Reader Contract
//!
//! Traits describing the environment-provided file reading primitive that
//! the adapter wraps.
//!
//! ## The wrapped shape
//!
//! A host reader is a stateful object with an event-style API:
//!
//! 1. Construct one reader per read operation.
//! 2. Assign its three reaction slots (completion, error, progress).
//! 3. Invoke one of the three trigger operations.
//! 4. The host populates the reader's result field, then fires completion
//!    (or error) from its own event-processing turn.
//!
//! [`FileReader`] mirrors that surface. [`HostRuntime`] is the
//! construction seam: implementations hand out one fresh reader per
//! operation, and the adapter takes exclusive ownership of it.
//!
//! ## Object Safety
//!
//! Both traits are object-safe once their associated types are named,
//! e.g. `dyn FileReader<File = PathBuf>`.

use std::sync::{Arc, Mutex};

use crate::types::Progress;

/// Reaction slot fired on completion or error.
///
/// The slot takes no arguments; the reader's current state is reachable
/// through the [`ResultCell`] captured when the slot was built.
pub type CompletionSlot = Box<dyn FnMut() + Send>;

/// Reaction slot fired on each progress notification, carrying the
/// host's progress tuple.
pub type ProgressSlot = Box<dyn FnMut(Progress) + Send>;

/// Shared view of a reader's stateful `result` field.
///
/// Hosts populate the cell before firing the completion or error slot;
/// the adapter snapshots it at slot-fire time. Clones share storage, so
/// a reader and the slots armed on it observe the same field.
#[derive(Debug, Clone, Default)]
pub struct ResultCell(Arc<Mutex<Option<String>>>);

impl ResultCell {
    /// Create an empty cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the field. Hosts call this before firing completion or
    /// error.
    pub fn set(&self, value: impl Into<String>) {
        *self.0.lock().unwrap() = Some(value.into());
    }

    /// Reset the field to unpopulated.
    pub fn clear(&self) {
        *self.0.lock().unwrap() = None;
    }

    /// Current contents of the field.
    pub fn snapshot(&self) -> Option<String> {
        self.0.lock().unwrap().clone()
    }
}

/// A host file reading primitive.
///
/// One instance backs exactly one read operation. The adapter arms all
/// three slots before invoking a trigger, so implementations are free to
/// fire synchronously from the trigger call or later from their own
/// event-processing turn.
///
/// # Thread Safety
///
/// Readers must be `Send`: the future returned by the adapter owns the
/// reader and may be moved across threads by the caller's executor.
pub trait FileReader: Send + 'static {
    /// Opaque designator for the blob this reader reads.
    ///
    /// Passed through to the trigger verbatim; the adapter never
    /// inspects or validates it.
    type File;

    /// Assign the completion slot.
    fn set_on_load(&mut self, slot: CompletionSlot);

    /// Assign the error slot.
    fn set_on_error(&mut self, slot: CompletionSlot);

    /// Assign the progress slot.
    fn set_on_progress(&mut self, slot: ProgressSlot);

    /// Shared handle to this reader's result field.
    ///
    /// The host must populate it before firing the completion slot. At
    /// error time it holds whatever the host left there, possibly
    /// nothing.
    fn result(&self) -> ResultCell;

    /// Start reading `file` as a URL-encoded data string.
    fn read_as_data_url(&mut self, file: Self::File);

    /// Start reading `file` as text decoded with `encoding`.
    fn read_as_text(&mut self, file: Self::File, encoding: &str);

    /// Start reading `file` as a raw binary string.
    fn read_as_binary_string(&mut self, file: Self::File);
}

/// Factory seam for host readers.
///
/// The adapter is constructed with a runtime and asks it for one fresh
/// reader per read operation. Readers are never shared or reused; each
/// returned future owns its reader exclusively.
pub trait HostRuntime {
    /// Reader type this runtime constructs.
    type Reader: FileReader;

    /// Construct a fresh reader.
    fn new_reader(&self) -> Self::Reader;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_cell_round_trip() {
        let cell = ResultCell::new();
        assert_eq!(cell.snapshot(), None);

        cell.set("readedFile");
        assert_eq!(cell.snapshot(), Some("readedFile".to_string()));

        cell.clear();
        assert_eq!(cell.snapshot(), None);
    }

    #[test]
    fn result_cell_clones_share_storage() {
        let cell = ResultCell::new();
        let view = cell.clone();

        cell.set("fileError");
        assert_eq!(view.snapshot(), Some("fileError".to_string()));
    }

    #[test]
    fn file_reader_is_object_safe() {
        fn _check(_: &dyn FileReader<File = ()>) {}
    }

    #[test]
    fn host_runtime_is_object_safe() {
        struct Never;
        impl FileReader for Never {
            type File = ();
            fn set_on_load(&mut self, _: CompletionSlot) {}
            fn set_on_error(&mut self, _: CompletionSlot) {}
            fn set_on_progress(&mut self, _: ProgressSlot) {}
            fn result(&self) -> ResultCell {
                ResultCell::new()
            }
            fn read_as_data_url(&mut self, _: ()) {}
            fn read_as_text(&mut self, _: (), _: &str) {}
            fn read_as_binary_string(&mut self, _: ()) {}
        }

        fn _check(_: &dyn HostRuntime<Reader = Never>) {}
    }
}
