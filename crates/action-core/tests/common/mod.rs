//! Shared test doubles for pipeline tests
#![allow(dead_code)]

use action_core::context::{Emitter, RoomSelector};
use action_core::logger::ActionLogger;
use action_core::protocol::AckCallback;
use action_core::Error;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Logger that records every call for later assertions
#[derive(Default)]
pub struct RecordingLogger {
    errors: Mutex<Vec<String>>,
    debugs: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn error_count(&self) -> usize {
        self.errors.lock().unwrap().len()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn debug_count(&self) -> usize {
        self.debugs.lock().unwrap().len()
    }
}

impl ActionLogger for RecordingLogger {
    fn error(&self, err: &Error) {
        self.errors.lock().unwrap().push(err.to_string());
    }

    fn debug(&self, message: &str) {
        self.debugs.lock().unwrap().push(message.to_string());
    }
}

/// Emitter that records every event it is asked to deliver
#[derive(Default)]
pub struct RecordingEmitter {
    events: Mutex<Vec<(String, Vec<Value>)>>,
}

impl RecordingEmitter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<(String, Vec<Value>)> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Emitter for RecordingEmitter {
    async fn emit(&self, event: &str, values: Vec<Value>) {
        self.events
            .lock()
            .unwrap()
            .push((event.to_string(), values));
    }
}

/// Selector handing out one shared recording emitter and remembering which
/// rooms were asked for
pub struct RecordingSelector {
    pub emitter: Arc<RecordingEmitter>,
    selections: Mutex<Vec<Vec<String>>>,
}

impl RecordingSelector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            emitter: RecordingEmitter::new(),
            selections: Mutex::new(Vec::new()),
        })
    }

    pub fn selections(&self) -> Vec<Vec<String>> {
        self.selections.lock().unwrap().clone()
    }
}

impl RoomSelector for RecordingSelector {
    fn select(&self, rooms: &[String]) -> Arc<dyn Emitter> {
        self.selections.lock().unwrap().push(rooms.to_vec());
        self.emitter.clone()
    }
}

/// Probe for acknowledgment callbacks: remembers whether and with what the
/// callback fired
pub struct AckProbe {
    values: Arc<Mutex<Option<Vec<Value>>>>,
}

impl AckProbe {
    pub fn invoked(&self) -> bool {
        self.values.lock().unwrap().is_some()
    }

    pub fn values(&self) -> Option<Vec<Value>> {
        self.values.lock().unwrap().clone()
    }
}

/// Build an acknowledgment callback together with its probe.
pub fn ack_probe() -> (AckCallback, AckProbe) {
    let values = Arc::new(Mutex::new(None));
    let sink = values.clone();
    let callback = AckCallback::new(move |ack| {
        *sink.lock().unwrap() = Some(ack);
    });
    (callback, AckProbe { values })
}
