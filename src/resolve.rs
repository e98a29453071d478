//! Reference resolver. Takes a reflected schema and returns
//! an equivalent tree with every `$ref` inlined. `$ref` is resolved as a
//! JSON Pointer fragment against the root document only — external or
//! HTTP-qualified references are out of scope and fail with
//! [`Error::UnresolvedReference`].
//!
//! Cycle-breaking follows the `visited`-stack idiom used elsewhere in this
//! codebase for recursive shape inference: a ref target already on the
//! current resolution path is replaced by a sentinel empty object schema
//! rather than recursed into again.
use crate::ptr::Pointer;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not resolve $ref '{0}'")]
    UnresolvedReference(String),
    #[error("$ref resolution exceeded the maximum depth of {0}")]
    DepthExceeded(usize),
}

/// Bounds on resolution work, so a pathologically long (but acyclic)
/// chain of `$ref`s fails fast instead of recursing unboundedly.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_ref_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits { max_ref_depth: 64 }
    }
}

fn sentinel() -> Value {
    serde_json::json!({"type": "object", "properties": {}})
}

/// Resolves every `$ref` in `root`, returning the equivalent tree. `root`
/// itself is not mutated; call sites that want in-place semantics assign
/// the result back.
pub fn resolve(root: &Value, limits: &Limits) -> Result<Value, Error> {
    let mut stack: Vec<String> = Vec::new();
    resolve_node(root, root, &mut stack, 0, limits)
}

fn resolve_node(
    node: &Value,
    root: &Value,
    stack: &mut Vec<String>,
    depth: usize,
    limits: &Limits,
) -> Result<Value, Error> {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(r)) = map.get("$ref") {
                if stack.iter().any(|s| s == r) {
                    return Ok(sentinel());
                }
                if depth >= limits.max_ref_depth {
                    return Err(Error::DepthExceeded(limits.max_ref_depth));
                }
                let target = Pointer::from_fragment(r)
                    .query(root)
                    .ok_or_else(|| Error::UnresolvedReference(r.clone()))?;

                stack.push(r.clone());
                let resolved = resolve_node(target, root, stack, depth + 1, limits);
                stack.pop();
                return resolved;
            }

            let mut out = Map::new();
            for (k, v) in map {
                if k == "definitions" {
                    // Members have been inlined wherever referenced; the
                    // container itself may remain, but emptied.
                    out.insert(k.clone(), Value::Object(Map::new()));
                } else {
                    out.insert(k.clone(), resolve_node(v, root, stack, depth, limits)?);
                }
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => Ok(Value::Array(
            items
                .iter()
                .map(|i| resolve_node(i, root, stack, depth, limits))
                .collect::<Result<_, _>>()?,
        )),
        other => Ok(other.clone()),
    }
}
