//! Raw parameter classification
//!
//! A transport delivers each event invocation as an ordered parameter
//! sequence. Every element is a data value except, possibly, the last one:
//! the peer's acknowledgment callback. [`split_params`] performs that
//! classification before any validation runs, so a trailing callback is
//! recognized and stripped whatever the data arity turns out to be.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Acknowledgment callback supplied by the calling peer.
///
/// Fires at most once. The pipeline only ever invokes it with values that
/// passed the action's output rules, or with no values at all for actions
/// that declare no output; on any pipeline failure it is dropped uninvoked.
pub struct AckCallback {
    inner: Box<dyn FnOnce(Vec<Value>) + Send + 'static>,
}

impl AckCallback {
    /// Wrap a callback function.
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce(Vec<Value>) + Send + 'static,
    {
        Self {
            inner: Box::new(callback),
        }
    }

    /// Invoke the callback with the given positional values.
    pub fn invoke(self, values: Vec<Value>) {
        (self.inner)(values);
    }
}

impl fmt::Debug for AckCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AckCallback")
    }
}

/// One element of a raw parameter sequence.
#[derive(Debug)]
pub enum RawParam {
    /// A positional data value.
    Data(Value),
    /// The peer's acknowledgment callback.
    Callback(AckCallback),
}

impl From<Value> for RawParam {
    fn from(value: Value) -> Self {
        RawParam::Data(value)
    }
}

/// A classified parameter sequence: the data values in order, plus the
/// trailing acknowledgment callback when the peer supplied one.
#[derive(Debug)]
pub struct SplitParams {
    /// Positional data values, order preserved.
    pub data: Vec<Value>,
    /// Trailing acknowledgment callback, if any.
    pub callback: Option<AckCallback>,
}

/// A callback showed up somewhere other than the final parameter position.
#[derive(Debug, Error)]
#[error("Acknowledgment callback at position {position} is not the final parameter")]
pub struct MisplacedCallback {
    /// Zero-based position of the offending parameter.
    pub position: usize,
}

/// Classify a raw parameter sequence into data values and an optional
/// trailing acknowledgment callback.
///
/// Runs before arity and schema validation: the final position is inspected
/// for a callback first, and everything ahead of it must be data. A callback
/// anywhere else is a protocol shape violation, reported with its position.
pub fn split_params(params: Vec<RawParam>) -> Result<SplitParams, MisplacedCallback> {
    let last = params.len().checked_sub(1);
    let mut data = Vec::with_capacity(params.len());
    let mut callback = None;

    for (position, param) in params.into_iter().enumerate() {
        match param {
            RawParam::Data(value) => data.push(value),
            RawParam::Callback(ack) if Some(position) == last => callback = Some(ack),
            RawParam::Callback(_) => return Err(MisplacedCallback { position }),
        }
    }

    Ok(SplitParams { data, callback })
}
