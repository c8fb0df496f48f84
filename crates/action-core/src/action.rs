//! Actions and the execute pipeline
//!
//! An [`Action`] binds one event name to an input shape, an optional output
//! shape, and an asynchronous handler. [`Action::execute`] drives the
//! pipeline for one invocation:
//!
//! 1. classify the raw parameters, stripping a trailing acknowledgment
//!    callback,
//! 2. validate the data parameters against the input shape,
//! 3. invoke the handler with a normalized [`ExecutionContext`],
//! 4. validate the handler's output against the output shape,
//! 5. invoke the acknowledgment callback with the validated output.
//!
//! Each stage runs only when every stage before it succeeded. A failure maps
//! to its own [`Error`] kind, is logged through the invocation's logger
//! exactly once, and leaves the acknowledgment callback uninvoked.

use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use tuple_schema::TupleSchema;

use crate::adapter::{SchemaAdapter, TupleParser};
use crate::context::{ExecutionContext, Invocation};
use crate::error::{Error, Result};
use crate::protocol::{SplitParams, split_params};

/// Namespace used when an action does not name one.
pub const ROOT_NAMESPACE: &str = "/";

/// Future returned by a boxed handler
pub type HandlerFuture = Pin<Box<dyn Future<Output = anyhow::Result<Vec<Value>>> + Send + 'static>>;

/// Boxed asynchronous handler: validated context in, ordered output values out
pub type Handler = Box<dyn Fn(ExecutionContext) -> HandlerFuture + Send + Sync + 'static>;

/// One event binding: namespace, event name, shapes, handler.
///
/// Immutable after construction, so concurrent invocations share it freely;
/// all per-invocation state lives in the [`Invocation`] passed to
/// [`execute`](Action::execute).
pub struct Action {
    event: String,
    namespace: String,
    schemas: Box<dyn TupleParser>,
    handler: Handler,
}

impl Action {
    /// Start building an action for `event`.
    pub fn builder(event: impl Into<String>) -> ActionBuilder {
        ActionBuilder::new(event)
    }

    /// Event name.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Namespace path.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// `namespace#event`, the identity used in logs and errors.
    pub fn qualified_event(&self) -> String {
        format!("{}#{}", self.namespace, self.event)
    }

    /// Discovery description of the input shape.
    pub fn describe_input(&self) -> Value {
        self.schemas.describe_input()
    }

    /// Discovery description of the output shape, if declared.
    pub fn describe_output(&self) -> Option<Value> {
        self.schemas.describe_output()
    }

    /// Run the full pipeline for one invocation.
    ///
    /// On success the acknowledgment callback, when supplied, has been
    /// invoked with the validated output values (or with none for actions
    /// that declare no output shape). On failure the callback has not been
    /// invoked at all, the failure has been logged at error severity exactly
    /// once through the invocation's logger, and the same error comes back
    /// to the caller.
    pub async fn execute(&self, invocation: Invocation) -> Result<()> {
        let logger = invocation.logger.clone();
        let result = self.run(invocation).await;
        if let Err(err) = &result {
            logger.error(err);
        }
        result
    }

    async fn run(&self, invocation: Invocation) -> Result<()> {
        let Invocation {
            params,
            logger,
            client,
            all,
            rooms,
        } = invocation;

        logger.debug(&format!(
            "Executing '{}' with {} raw parameter(s)",
            self.qualified_event(),
            params.len()
        ));

        let SplitParams { data, callback } = split_params(params)
            .map_err(|err| Error::acknowledgment_type(self.qualified_event(), err.position))?;

        let input = self
            .schemas
            .parse_input(&data)
            .map_err(|issues| Error::input_validation(self.qualified_event(), issues))?;

        let context = ExecutionContext::new(input, logger.clone(), client, all, rooms);
        let output = (self.handler)(context)
            .await
            .map_err(|source| Error::handler(self.qualified_event(), source))?;

        match self.schemas.parse_output(&output) {
            Some(Ok(values)) => {
                if let Some(ack) = callback {
                    logger.debug(&format!(
                        "Acknowledging '{}' with {} value(s)",
                        self.qualified_event(),
                        values.len()
                    ));
                    ack.invoke(values);
                }
            }
            Some(Err(issues)) => {
                // The callback is dropped uninvoked: values that failed the
                // output shape never reach the wire.
                return Err(Error::output_validation(self.qualified_event(), issues));
            }
            None => {
                // No output shape declared: the handler's return value is
                // ignored and a supplied callback fires empty, as a bare
                // completion signal.
                if let Some(ack) = callback {
                    logger.debug(&format!(
                        "Acknowledging '{}' without values",
                        self.qualified_event()
                    ));
                    ack.invoke(Vec::new());
                }
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("namespace", &self.namespace)
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Action`] instances.
///
/// The handler is the one mandatory ingredient, so supplying it through
/// [`handler`](ActionBuilder::handler) is what finishes the build.
pub struct ActionBuilder {
    event: String,
    namespace: String,
    input: TupleSchema,
    output: Option<TupleSchema>,
    parser: Option<Box<dyn TupleParser>>,
}

impl ActionBuilder {
    fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            namespace: ROOT_NAMESPACE.to_string(),
            input: TupleSchema::empty(),
            output: None,
            parser: None,
        }
    }

    /// Set the namespace path. Defaults to [`ROOT_NAMESPACE`].
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the input shape. Defaults to the empty tuple, which rejects any
    /// data parameters.
    pub fn input(mut self, schema: TupleSchema) -> Self {
        self.input = schema;
        self
    }

    /// Declare an output shape. Acknowledgments then carry the handler's
    /// validated values; without one they carry nothing.
    pub fn output(mut self, schema: TupleSchema) -> Self {
        self.output = Some(schema);
        self
    }

    /// Replace the schema capability entirely. When set, the `input` and
    /// `output` schemas are ignored in favor of the custom parser.
    pub fn parser(mut self, parser: impl TupleParser + 'static) -> Self {
        self.parser = Some(Box::new(parser));
        self
    }

    /// Supply the handler and finish the action.
    pub fn handler<F, Fut>(self, handler: F) -> Action
    where
        F: Fn(ExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Vec<Value>>> + Send + 'static,
    {
        let ActionBuilder {
            event,
            namespace,
            input,
            output,
            parser,
        } = self;

        let schemas =
            parser.unwrap_or_else(|| Box::new(SchemaAdapter::new(input, output)));

        Action {
            event,
            namespace,
            schemas,
            handler: Box::new(move |context| Box::pin(handler(context)) as HandlerFuture),
        }
    }
}
