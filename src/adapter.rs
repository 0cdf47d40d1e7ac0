//! # The Read Adapter
//!
//! Converts the event-style host reader API into a single-resolution
//! future plus scoped progress broadcasts.
//!
//! ## How It Works
//!
//! ```text
//! HostRuntime ──new_reader()──▶ FileReader
//!                                  │ arm slots, trigger
//!                                  ▼
//!                              ReadFuture ──await──▶ ReadOutcome
//!                                  │
//!                                  └─ progress ──▶ Scope::broadcast("fileProgress")
//! ```
//!
//! Each public operation constructs one reader, arms all three reaction
//! slots, invokes the matching trigger, and returns immediately. The
//! returned [`ReadFuture`] owns the reader exclusively and settles once
//! the scope's reaction queue is flushed after the host fires completion
//! or error.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::bus::Scope;
use crate::error::ReadFailure;
use crate::host::{FileReader, HostRuntime};
use crate::types::{FILE_PROGRESS, Progress, ReadOutcome};

/// File designator accepted by a runtime's reader type.
pub type FileOf<H> = <<H as HostRuntime>::Reader as FileReader>::File;

// Shared between the completion and error slots; taken on first use so
// the future settles exactly once no matter how often the host fires.
type SettleSlot = Arc<Mutex<Option<oneshot::Sender<ReadOutcome>>>>;

/// Awaitable adapter over a host reader runtime.
///
/// Construct it once with the runtime and call the read operations as
/// often as needed; every call backs itself with a fresh reader. The
/// adapter performs no validation, no retries, and has no timeout: a
/// malformed file designator surfaces only as the host's error firing,
/// and a host that never calls back leaves the future pending
/// indefinitely.
///
/// # Examples
///
/// ```rust
/// use readfuture::{FileOf, FileReadAdapter, HostRuntime, Progress, ReadOutcome, Scope};
///
/// async fn load_avatar<H: HostRuntime>(
///     adapter: &FileReadAdapter<H>,
///     file: FileOf<H>,
///     scope: &Scope<Progress>,
/// ) -> ReadOutcome {
///     adapter.read_as_data_url(file, scope).await
/// }
/// ```
#[derive(Debug)]
pub struct FileReadAdapter<H> {
    host: H,
}

impl<H: HostRuntime> FileReadAdapter<H> {
    /// Create an adapter over the given host runtime.
    pub fn new(host: H) -> Self {
        Self { host }
    }

    /// Read `file` as a URL-encoded data string.
    ///
    /// Progress firings are broadcast as [`FILE_PROGRESS`] events on
    /// `scope`.
    pub fn read_as_data_url(
        &self,
        file: FileOf<H>,
        scope: &Scope<Progress>,
    ) -> ReadFuture<H::Reader> {
        self.start("dataURL", scope, |reader| reader.read_as_data_url(file))
    }

    /// Read `file` as text decoded with `encoding`.
    ///
    /// The encoding is passed through to the host verbatim, exactly like
    /// the file designator.
    pub fn read_as_text(
        &self,
        file: FileOf<H>,
        encoding: &str,
        scope: &Scope<Progress>,
    ) -> ReadFuture<H::Reader> {
        self.start("text", scope, |reader| reader.read_as_text(file, encoding))
    }

    /// Read `file` as a raw binary string.
    pub fn read_as_binary_string(
        &self,
        file: FileOf<H>,
        scope: &Scope<Progress>,
    ) -> ReadFuture<H::Reader> {
        self.start("binaryString", scope, |reader| {
            reader.read_as_binary_string(file)
        })
    }

    // The three read modes share this wiring skeleton and differ only in
    // the trigger invocation.
    fn start(
        &self,
        mode: &'static str,
        scope: &Scope<Progress>,
        trigger: impl FnOnce(&mut H::Reader),
    ) -> ReadFuture<H::Reader> {
        let mut reader = self.host.new_reader();
        let (tx, rx) = oneshot::channel();
        let settle: SettleSlot = Arc::new(Mutex::new(Some(tx)));
        let result = reader.result();

        // All three slots are armed before the trigger; a host that fires
        // synchronously from the trigger call must not be missed.
        let progress_scope = scope.clone();
        reader.set_on_progress(Box::new(move |progress| {
            log::trace!(
                "{mode} read progress: {}/{}",
                progress.loaded,
                progress.total
            );
            progress_scope.broadcast(FILE_PROGRESS, progress);
        }));

        let load_scope = scope.clone();
        let load_settle = Arc::clone(&settle);
        let load_result = result.clone();
        reader.set_on_load(Box::new(move || {
            log::trace!("{mode} read completed");
            let outcome = Ok(load_result.snapshot().unwrap_or_default());
            queue_settlement(&load_scope, &load_settle, outcome);
        }));

        let error_scope = scope.clone();
        let error_settle = Arc::clone(&settle);
        let error_result = result;
        reader.set_on_error(Box::new(move || {
            log::debug!("{mode} read failed");
            let outcome = Err(ReadFailure::new(error_result.snapshot()));
            queue_settlement(&error_scope, &error_settle, outcome);
        }));

        log::debug!("triggering {mode} read");
        trigger(&mut reader);

        ReadFuture {
            rx,
            _reader: Box::new(reader),
        }
    }
}

// The snapshot is taken by the slot at fire time; only the send is
// deferred, so settlement and progress deliveries stay in host firing
// order on the scope's queue.
fn queue_settlement(scope: &Scope<Progress>, settle: &SettleSlot, outcome: ReadOutcome) {
    let settle = Arc::clone(settle);
    scope.defer(move || {
        if let Some(tx) = settle.lock().unwrap().take() {
            // The caller may have dropped the future already.
            let _ = tx.send(outcome);
        }
    });
}

/// Future returned by the read operations.
///
/// Owns the host reader for the duration of the operation; the reader,
/// the slots armed on it, and the settlement channel live exactly as
/// long as this future. Settlement is observed after the scope's
/// reaction queue has been flushed following the host's completion or
/// error firing.
pub struct ReadFuture<R> {
    rx: oneshot::Receiver<ReadOutcome>,
    _reader: Box<R>,
}

impl<R> Future for ReadFuture<R> {
    type Output = ReadOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        Pin::new(&mut this.rx).poll(cx).map(|received| {
            match received {
                Ok(outcome) => outcome,
                // Sender gone without a settlement. Unreachable while
                // this future owns the reader; mapped to a valueless
                // failure rather than a panic.
                Err(_) => Err(ReadFailure::new(None)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_future_is_send_for_send_readers() {
        fn _assert_send<T: Send>() {}
        fn _check<R: FileReader>() {
            _assert_send::<ReadFuture<R>>();
        }
    }

    #[test]
    fn adapter_is_shareable_for_sync_runtimes() {
        fn _assert_sync<T: Sync>() {}
        fn _check<H: HostRuntime + Sync>() {
            _assert_sync::<FileReadAdapter<H>>();
        }
    }
}
