//! # Tuple Schema
//!
//! Ordered-tuple schemas for positional socket parameters.
//!
//! Socket events carry their payload as an ordered sequence of values rather
//! than a single document, so validation here is tuple-shaped: a
//! [`TupleSchema`] holds one [`ElementRule`] per position, optionally followed
//! by a variadic `rest` rule for trailing extras. Each rule names a shape
//! (string, number, boolean, enumeration, object, array, anything) and two
//! modifiers: `optional` (the position may be absent) and `nullable` (an
//! explicit null is a valid value). Absence and null are distinct and never
//! conflated.
//!
//! [`TupleSchema::parse`] validates a raw sequence and either returns it as
//! the validated input for a handler or fails with [`Issues`]: every problem
//! found, each located by a [`Path`] from the tuple root (`$[2].user.name`).
//!
//! # Example
//!
//! ```
//! use tuple_schema::{ElementRule, TupleSchema};
//! use serde_json::json;
//!
//! let schema = TupleSchema::new(vec![
//!     ElementRule::string(),
//!     ElementRule::integer().optional(),
//! ]);
//!
//! assert!(schema.parse(&[json!("hello"), json!(3)]).is_ok());
//! assert!(schema.parse(&[json!("hello")]).is_ok());
//! assert!(schema.parse(&[json!(3)]).is_err());
//! ```

#![warn(missing_docs)]

mod issue;
mod rule;
mod schema;

pub use issue::{Issue, Issues, Path, Segment};
pub use rule::{ElementRule, RuleKind};
pub use schema::TupleSchema;
