//! # readfuture
//!
//! Awaitable adapter over callback-style file reader hosts.
//!
//! Host runtimes expose file reading as a stateful object: construct a
//! reader, assign its completion/error/progress reaction slots, invoke a
//! trigger, and wait for the host's event loop to call back. That shape
//! does not compose with chained asynchronous logic. This crate wraps it
//! behind one consistent contract: every read returns a
//! single-resolution future, and every progress firing is broadcast as a
//! named event on a caller-supplied scope.
//!
//! ---
//!
//! ## Quick Start
//!
//! The adapter is generic over the host seam, so callers write ordinary
//! async code against any [`HostRuntime`] implementation:
//!
//! ```rust
//! use readfuture::{FileOf, FileReadAdapter, HostRuntime, Progress, ReadOutcome, Scope};
//!
//! async fn load_avatar<H: HostRuntime>(
//!     adapter: &FileReadAdapter<H>,
//!     file: FileOf<H>,
//!     scope: &Scope<Progress>,
//! ) -> ReadOutcome {
//!     adapter.read_as_data_url(file, scope).await
//! }
//! ```
//!
//! Progress is observed by subscribing on the same scope:
//!
//! ```rust
//! use readfuture::{EventBus, FILE_PROGRESS, Progress};
//!
//! let bus = EventBus::<Progress>::new();
//! let scope = bus.scope();
//! let _sub = scope.subscribe(FILE_PROGRESS, |p: &Progress| {
//!     println!("{}/{} bytes", p.loaded, p.total);
//! });
//! scope.broadcast(FILE_PROGRESS, Progress::new(70, 30));
//! scope.flush();
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`FileReadAdapter`] | The adapter: three read modes, one wiring |
//! | [`ReadFuture`] | Single-resolution future owning the host reader |
//! | [`FileReader`] | Contract of the wrapped host primitive |
//! | [`HostRuntime`] | Factory seam: one fresh reader per operation |
//! | [`EventBus`] / [`Scope`] | Context-scoped broadcast with a deferred reaction queue |
//! | [`Progress`] | `{ total, loaded }` payload of [`FILE_PROGRESS`] events |
//! | [`ReadFailure`] | The single, opaque-valued error kind |
//!
//! ---
//!
//! ## Read Modes
//!
//! | Operation | Result interpretation |
//! |-----------|----------------------|
//! | [`read_as_data_url`](FileReadAdapter::read_as_data_url) | URL-encoded data string |
//! | [`read_as_text`](FileReadAdapter::read_as_text) | Text decoded with the given encoding |
//! | [`read_as_binary_string`](FileReadAdapter::read_as_binary_string) | Raw binary string |
//!
//! Decoding happens entirely inside the host; the adapter relays the
//! reader's result field without inspecting it.
//!
//! ---
//!
//! ## Execution Model
//!
//! Single-threaded cooperative: the adapter never blocks and never
//! spawns. Triggers return immediately; the host fires callbacks from
//! its own processing turn, and both settlement and progress delivery
//! are routed through the scope's reaction queue. For one operation,
//! progress deliveries are observed in host firing order and strictly
//! before the terminal settlement. Concurrent operations are fully
//! independent: each future owns its reader exclusively.
//!
//! There is no cancellation and no timeout; callers needing either must
//! layer it externally.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Enable serialization for [`Progress`] |

// Private modules
mod adapter;
mod bus;
mod error;
mod host;
mod types;

// Public re-exports - error types
pub use error::ReadFailure;

// Public re-exports - core types
pub use types::{FILE_PROGRESS, Progress, ReadOutcome};

// Public re-exports - host contract
pub use host::{CompletionSlot, FileReader, HostRuntime, ProgressSlot, ResultCell};

// Public re-exports - scoped broadcast
pub use bus::{EventBus, Scope, ScopeId, Subscription};

// Public re-exports - the adapter
pub use adapter::{FileOf, FileReadAdapter, ReadFuture};
