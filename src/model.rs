//! `CommonModel`: the flat, normalized record the whole pipeline produces.
//! Where [`crate::schema::Schema`] mirrors what a schema
//! author wrote, `CommonModel` is the interpreter's and simplifier's output
//! form — one entry per nameable shape, with `$ref`-style cross-references
//! expressed as plain name strings rather than JSON Pointers.
use crate::literal::Literal;
use crate::types;
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use std::collections::BTreeSet;

/// A single property, tuple slot, or pattern-matched slot of an object or
/// array model. Distinct from a top-level [`CommonModel`] entry: a field
/// either embeds its shape inline (simple scalar types) or points at
/// another model by name (anything the simplifier promoted to a
/// top-level entry).
#[derive(Debug, Clone)]
pub enum FieldShape {
    Inline(Box<CommonModel>),
    Ref(String),
}

impl FieldShape {
    pub fn name(&self) -> Option<&str> {
        match self {
            FieldShape::Ref(n) => Some(n),
            FieldShape::Inline(_) => None,
        }
    }
}

/// `items` of an array model: either a single shape describing every
/// element, or an ordered, per-position list of shapes (tuple semantics).
#[derive(Debug, Clone)]
pub enum Items {
    Single(Box<FieldShape>),
    Tuple(Vec<FieldShape>),
}

/// One normalized model produced from a schema (or a fragment of one).
/// `$id`, if the originating schema declared one, is carried through
/// unchanged; otherwise a model is identified only by the map key the
/// [`crate::simplify`] stage assigns it.
#[derive(Debug, Clone, Default)]
pub struct CommonModel {
    pub id: Option<String>,
    pub type_: types::Set,
    pub enum_: BTreeSet<Literal>,

    pub properties: IndexMap<String, FieldShape>,
    pub items: Option<Items>,
    pub additional_properties: Option<Box<FieldShape>>,
    pub pattern_properties: IndexMap<String, FieldShape>,
    pub required: IndexSet<String>,

    /// Names of sibling models this one inherits from via `allOf`, kept
    /// around so the simplifier's duplicate-merge rule can re-trace
    /// provenance when two `extend` lists collide.
    pub extend: Vec<String>,

    /// The schema fragment this model was interpreted from, preserved
    /// verbatim for tooling that wants to inspect constraints the common
    /// model doesn't itself represent (formats, additional keywords).
    pub original_schema: Value,
}

impl CommonModel {
    pub fn new(original_schema: Value) -> CommonModel {
        CommonModel {
            original_schema,
            ..Default::default()
        }
    }

    /// True once `properties` or `patternProperties` carries at least one
    /// entry, or `type` includes `object` — the distinction between an
    /// "object model" (has nameable children the simplifier may promote)
    /// and a "simple model" (scalar, or array of scalars).
    pub fn is_object_model(&self) -> bool {
        // A model whose type set is the full seven tags is always treated
        // as a simple "any" model, even though `object` is technically a
        // member.
        !self.type_.is_any()
            && self.type_.overlaps(types::OBJECT)
            && (!self.properties.is_empty()
                || !self.pattern_properties.is_empty()
                || !self.extend.is_empty()
                || self.additional_properties.is_some())
    }

    pub fn is_unsatisfiable(&self) -> bool {
        self.type_.is_empty() && self.enum_.is_empty()
    }
}
