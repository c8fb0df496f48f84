//! Schema parsing capability
//!
//! The pipeline never validates values itself; it depends on a parse
//! capability over the action's input and output shapes. [`SchemaAdapter`]
//! is the default implementation over [`tuple_schema::TupleSchema`], and a
//! custom [`TupleParser`] can slot in any other validation engine without
//! touching the pipeline.

use serde_json::Value;
use tuple_schema::{Issues, TupleSchema};

/// Parse capability over an action's input and output tuples.
///
/// Callback stripping is not the parser's job: raw parameters are classified
/// before validation runs, and handler outputs never contain a callback.
pub trait TupleParser: Send + Sync {
    /// Validate the incoming data parameters.
    fn parse_input(&self, values: &[Value]) -> Result<Vec<Value>, Issues>;

    /// Validate the handler's returned values. `None` means the action
    /// declares no output shape: returns are ignored and acknowledgments
    /// carry no values.
    fn parse_output(&self, values: &[Value]) -> Option<Result<Vec<Value>, Issues>>;

    /// Discovery description of the input shape.
    fn describe_input(&self) -> Value;

    /// Discovery description of the output shape, if declared.
    fn describe_output(&self) -> Option<Value>;
}

/// Default parser over a pair of tuple schemas.
#[derive(Debug, Clone)]
pub struct SchemaAdapter {
    input: TupleSchema,
    output: Option<TupleSchema>,
}

impl SchemaAdapter {
    /// Adapter over an input schema and an optional output schema.
    pub fn new(input: TupleSchema, output: Option<TupleSchema>) -> Self {
        Self { input, output }
    }
}

impl TupleParser for SchemaAdapter {
    fn parse_input(&self, values: &[Value]) -> Result<Vec<Value>, Issues> {
        self.input.parse(values)
    }

    fn parse_output(&self, values: &[Value]) -> Option<Result<Vec<Value>, Issues>> {
        self.output.as_ref().map(|schema| schema.parse(values))
    }

    fn describe_input(&self) -> Value {
        self.input.describe()
    }

    fn describe_output(&self) -> Option<Value> {
        self.output.as_ref().map(TupleSchema::describe)
    }
}
