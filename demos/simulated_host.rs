//! Wiring demo: adapt a simulated callback host and await reads.
//!
//! The simulated runtime serves blobs from an in-memory table and fires
//! its reaction slots synchronously from the trigger call. Run with:
//!
//! ```text
//! cargo run --example simulated_host
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use futures::executor::block_on;

use readfuture::{
    CompletionSlot, EventBus, FILE_PROGRESS, FileReadAdapter, FileReader, HostRuntime, Progress,
    ProgressSlot, ResultCell,
};

struct SimReader {
    blobs: Arc<HashMap<&'static str, &'static str>>,
    result: ResultCell,
    on_load: Option<CompletionSlot>,
    on_error: Option<CompletionSlot>,
    on_progress: Option<ProgressSlot>,
}

impl SimReader {
    fn serve(&mut self, name: &'static str) {
        match self.blobs.get(name).copied() {
            Some(contents) => {
                let total = contents.len() as u64;
                if let Some(slot) = self.on_progress.as_mut() {
                    slot(Progress::new(total, total / 2));
                    slot(Progress::new(total, total));
                }
                self.result.set(contents);
                if let Some(slot) = self.on_load.as_mut() {
                    slot();
                }
            }
            None => {
                self.result.set(format!("no such blob: {name}"));
                if let Some(slot) = self.on_error.as_mut() {
                    slot();
                }
            }
        }
    }
}

impl FileReader for SimReader {
    type File = &'static str;

    fn set_on_load(&mut self, slot: CompletionSlot) {
        self.on_load = Some(slot);
    }

    fn set_on_error(&mut self, slot: CompletionSlot) {
        self.on_error = Some(slot);
    }

    fn set_on_progress(&mut self, slot: ProgressSlot) {
        self.on_progress = Some(slot);
    }

    fn result(&self) -> ResultCell {
        self.result.clone()
    }

    fn read_as_data_url(&mut self, file: &'static str) {
        self.serve(file);
    }

    fn read_as_text(&mut self, file: &'static str, _encoding: &str) {
        self.serve(file);
    }

    fn read_as_binary_string(&mut self, file: &'static str) {
        self.serve(file);
    }
}

struct SimHost {
    blobs: Arc<HashMap<&'static str, &'static str>>,
}

impl HostRuntime for SimHost {
    type Reader = SimReader;

    fn new_reader(&self) -> SimReader {
        SimReader {
            blobs: Arc::clone(&self.blobs),
            result: ResultCell::new(),
            on_load: None,
            on_error: None,
            on_progress: None,
        }
    }
}

fn main() {
    let blobs: HashMap<&'static str, &'static str> =
        HashMap::from([("hello.txt", "hello, world"), ("logo.svg", "<svg/>")]);
    let adapter = FileReadAdapter::new(SimHost {
        blobs: Arc::new(blobs),
    });

    let bus = EventBus::<Progress>::new();
    let scope = bus.scope();
    let _sub = scope.subscribe(FILE_PROGRESS, |p: &Progress| {
        println!("progress: {}/{} bytes", p.loaded, p.total);
    });

    let read = adapter.read_as_text("hello.txt", "utf-8", &scope);
    scope.flush();
    match block_on(read) {
        Ok(text) => println!("read: {text}"),
        Err(err) => println!("failed: {err}"),
    }

    let missing = adapter.read_as_text("absent.txt", "utf-8", &scope);
    scope.flush();
    if let Err(err) = block_on(missing) {
        println!("failed as expected: {err}");
    }
}
