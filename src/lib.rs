//! Schema-to-model pipeline: turns a JSON Schema (draft-07) document into
//! a normalized, flat set of `CommonModel` records. The crate
//! covers input normalization, keyword interpretation, and simplification;
//! language-specific code rendering is a downstream concern this crate
//! does not implement.
//!
//! The entry point is [`process()`]; most callers only need that and
//! [`CommonModel`].
pub mod interpret;
pub mod literal;
pub mod model;
mod number;
pub mod process;
pub mod ptr;
pub mod reflect;
pub mod resolve;
pub mod schema;
pub mod simplify;
pub mod types;

pub use literal::Literal;
pub use model::{CommonModel, FieldShape, Items};
pub use number::Number;
pub use process::{process, process_with_options, should_process, Error, Options, ProcessOutput};
pub use ptr::Pointer;
pub use schema::{Schema, SchemaOrBool};
pub use simplify::Warning;
