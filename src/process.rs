//! Input processor: the pipeline orchestrator. Accepts any
//! JSON value, decides whether it looks like a processable JSON Schema,
//! and — if so — runs it through reflection, resolution, interpretation,
//! and simplification, returning the final model map alongside the
//! caller's original input.
use crate::simplify::{self, Warning};
use crate::{interpret, model::CommonModel, reflect, resolve, schema};
use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

/// The top-level error surface of the pipeline. Each variant
/// either mirrors or wraps a per-stage error; `process` fails fast at the
/// earliest stage that detects a problem.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unsupported JSON Schema draft: '{0}'")]
    UnsupportedSchemaDraft(String),
    #[error("could not resolve reference: {0}")]
    UnresolvedReference(String),
    #[error("invalid input: {0}")]
    InvalidInput(#[source] schema::Error),
    #[error("$ref resolution exceeded the maximum depth of {0}")]
    DepthExceeded(usize),
}

impl From<resolve::Error> for Error {
    fn from(e: resolve::Error) -> Self {
        match e {
            resolve::Error::UnresolvedReference(r) => Error::UnresolvedReference(r),
            resolve::Error::DepthExceeded(d) => Error::DepthExceeded(d),
        }
    }
}

impl From<schema::Error> for Error {
    fn from(e: schema::Error) -> Self {
        Error::InvalidInput(e)
    }
}

/// Caller-supplied knobs: the name reflector's root seed, and the
/// reference resolver's recursion guard.
#[derive(Debug, Clone)]
pub struct Options {
    pub root_name: String,
    pub limits: resolve::Limits,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            root_name: "root".to_string(),
            limits: resolve::Limits::default(),
        }
    }
}

/// The result of a successful `process()` run: the flat, deduplicated
/// model map, the caller's verbatim input, and any non-fatal warnings the
/// simplifier recorded, surfaced here as a concrete value rather than
/// left as an implicit side channel.
#[derive(Debug)]
pub struct ProcessOutput {
    pub models: IndexMap<String, CommonModel>,
    pub original_input: Value,
    pub warnings: Vec<Warning>,
}

const SUPPORTED_DRAFT: &str = "draft-07";

/// `true` iff `input` is a boolean, or an object whose `$schema` is
/// absent or names a supported draft. Matching is a
/// substring check against the draft token rather than exact-string
/// comparison, since real documents vary the URI's scheme and trailing
/// slash for the same draft.
pub fn should_process(input: &Value) -> bool {
    match input {
        Value::Bool(_) => true,
        Value::Object(map) => match map.get("$schema") {
            None => true,
            Some(Value::String(s)) => s.contains(SUPPORTED_DRAFT),
            Some(_) => false,
        },
        _ => false,
    }
}

/// Runs the full pipeline over `input` with default [`Options`].
pub fn process(input: Value) -> Result<ProcessOutput, Error> {
    process_with_options(input, &Options::default())
}

/// Runs the full pipeline over `input`:
/// detect draft → reflect → resolve → convert → interpret → simplify.
#[tracing::instrument(level = "debug", skip(input))]
pub fn process_with_options(input: Value, options: &Options) -> Result<ProcessOutput, Error> {
    if let Value::Object(map) = &input {
        if let Some(Value::String(s)) = map.get("$schema") {
            if !s.contains(SUPPORTED_DRAFT) {
                return Err(Error::UnsupportedSchemaDraft(s.clone()));
            }
        }
    } else if !matches!(input, Value::Bool(_)) {
        return Err(Error::InvalidInput(schema::Error::ExpectedSchema(
            "object or boolean",
        )));
    }

    let mut reflected = input.clone();
    reflect::reflect(&mut reflected, &options.root_name);
    tracing::debug!("reflected schema with root name '{}'", options.root_name);

    let resolved = resolve::resolve(&reflected, &options.limits)?;
    tracing::debug!("resolved all $ref references");

    let sob = schema::SchemaOrBool::from_value(&resolved)?;
    let interpreted = interpret::interpret(&sob);
    tracing::debug!(models = interpreted.len(), "interpreted schema into models");

    let (models, warnings) = simplify::simplify(interpreted);
    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    Ok(ProcessOutput {
        models,
        original_input: input,
        warnings,
    })
}
