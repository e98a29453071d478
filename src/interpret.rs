//! Interpreter. Walks a single reflected, resolved
//! [`crate::schema::Schema`] and projects its keywords into one or more
//! [`CommonModel`]s. Keyword handlers are independent of one another
//! except where noted (`allOf` vs `anyOf`/`oneOf`), so
//! they're dispatched in field order here rather than through a generic
//! handler table — the table indirection buys nothing when there are only
//! a dozen keywords and no plugin surface.
use crate::literal::Literal;
use crate::model::{CommonModel, FieldShape, Items as ModelItems};
use crate::schema::{Dependency, Items as SchemaItems, Schema, SchemaOrBool};
use crate::types::{self, Set};
use serde_json::Value;

/// Maps a literal value to the type tag the interpreter assigns it when a
/// schema's `type` keyword is absent and the type must be inferred from
/// `enum`/`const` members.
/// Unlike [`Set::for_value`], this distinguishes `integer` from `number`:
/// a JSON number with no fractional component infers as `integer`.
pub fn infer_enum_type(v: &Value) -> Set {
    match v {
        Value::Number(n) if n.is_u64() || n.is_i64() => types::INTEGER,
        other => Set::for_value(other),
    }
}

/// Entry point: interprets the root schema value, seeded with `"root"`
/// when the caller supplies no inferred name of its own.
pub fn interpret(schema: &SchemaOrBool) -> Vec<CommonModel> {
    interpret_with_hint(schema, "root")
}

fn interpret_with_hint(schema: &SchemaOrBool, hint: &str) -> Vec<CommonModel> {
    match schema {
        SchemaOrBool::Bool(true) => {
            let mut m = CommonModel::new(Value::Bool(true));
            m.id = Some(hint.to_string());
            m.type_ = types::ANY;
            vec![m]
        }
        SchemaOrBool::Bool(false) => {
            let mut m = CommonModel::new(Value::Bool(false));
            m.id = Some(hint.to_string());
            vec![m]
        }
        SchemaOrBool::Schema(s) => interpret_schema(s, hint),
    }
}

fn interpret_schema(schema: &Schema, hint: &str) -> Vec<CommonModel> {
    let id = schema
        .id
        .clone()
        .or_else(|| schema.title.clone())
        .or_else(|| schema.inferred_name.clone())
        .unwrap_or_else(|| hint.to_string());

    let mut model = CommonModel::new(schema.raw.clone());
    model.id = Some(id);
    let mut aux: Vec<CommonModel> = Vec::new();

    // type / enum / const.
    if let Some(t) = schema.type_ {
        model.type_ = t;
    }
    if let Some(e) = &schema.enum_ {
        model.enum_.extend(e.iter().cloned());
    }
    if let Some(c) = &schema.const_ {
        model.enum_.insert(c.clone());
    }
    if schema.type_.is_none() && !model.enum_.is_empty() {
        model.type_ = model.enum_.iter().map(|l| infer_enum_type(l.get())).collect();
    }

    // properties: each value is always interpreted as its own sub-model.
    let base = schema
        .inferred_name
        .clone()
        .unwrap_or_else(|| hint.to_string());
    for (k, child) in &schema.properties {
        let results = interpret_with_hint(child, &format!("{base}_{k}"));
        let (first, rest) = split_first(results);
        model
            .properties
            .insert(k.clone(), FieldShape::Inline(Box::new(first)));
        aux.extend(rest);
    }

    // items.
    match &schema.items {
        None => {}
        Some(SchemaItems::Single(child)) => {
            let results = interpret_with_hint(child, &format!("{base}_items"));
            let (first, rest) = split_first(results);
            model.items = Some(ModelItems::Single(Box::new(FieldShape::Inline(Box::new(first)))));
            aux.extend(rest);
        }
        Some(SchemaItems::Tuple(children)) => {
            let mut shapes = Vec::with_capacity(children.len());
            for (i, child) in children.iter().enumerate() {
                let results = interpret_with_hint(child, &format!("{base}_items_{i}"));
                let (first, rest) = split_first(results);
                shapes.push(FieldShape::Inline(Box::new(first)));
                aux.extend(rest);
            }
            model.items = Some(ModelItems::Tuple(shapes));
        }
    }

    // additionalProperties defaults to `true` (any) when absent.
    let ap = schema
        .additional_properties
        .as_deref()
        .cloned()
        .unwrap_or(SchemaOrBool::Bool(true));
    let results = interpret_with_hint(&ap, &format!("{base}_additionalProperty"));
    let (first, rest) = split_first(results);
    model.additional_properties = Some(Box::new(FieldShape::Inline(Box::new(first))));
    aux.extend(rest);

    // patternProperties, in declaration order (sequential index, matching
    // the name reflector's own numbering).
    for (index, (pattern, child)) in schema.pattern_properties.iter().enumerate() {
        let results = interpret_with_hint(child, &format!("{base}_pattern_property_{index}"));
        let (first, rest) = split_first(results);
        model
            .pattern_properties
            .insert(pattern.clone(), FieldShape::Inline(Box::new(first)));
        aux.extend(rest);
    }

    // required.
    model.required = schema.required.clone();

    // allOf: object-typed members become `extend` entries; scalar members
    // merge their type/enum into the parent directly. allOf models
    // inheritance while anyOf/oneOf model union alternatives, so the two
    // are handled asymmetrically on purpose.
    for (i, member) in schema.all_of.iter().enumerate() {
        let results = interpret_with_hint(member, &format!("{base}_allOf_{i}"));
        let (first, rest) = split_first(results);
        if first.is_object_model() {
            if let Some(id) = &first.id {
                model.extend.push(id.clone());
            }
            aux.push(first);
        } else {
            model.type_ |= first.type_;
            model.enum_.extend(first.enum_.iter().cloned());
        }
        aux.extend(rest);
    }

    // anyOf / oneOf: every member is kept as an independent sibling model;
    // the parent only absorbs the union of their types.
    for kw in ["anyOf", "oneOf"] {
        let members = if kw == "anyOf" { &schema.any_of } else { &schema.one_of };
        for (i, member) in members.iter().enumerate() {
            let results = interpret_with_hint(member, &format!("{base}_{kw}_{i}"));
            let (first, rest) = split_first(results);
            model.type_ |= first.type_;
            aux.push(first);
            aux.extend(rest);
        }
    }

    // not: a best-effort approximation — only enum
    // subtraction is attempted; the negated model is never registered as
    // a sibling.
    if let Some(not) = &schema.not {
        let results = interpret_with_hint(not, &format!("{base}_not"));
        if let Some(negated) = results.into_iter().next() {
            if !negated.enum_.is_empty() && !model.enum_.is_empty() {
                model.enum_.retain(|v| !negated.enum_.contains(v));
            }
        }
    }

    // dependencies: schema-valued dependencies merge their constraints
    // into the parent; property-name dependencies aren't subschemas and
    // have nothing to interpret.
    for (k, dep) in &schema.dependencies {
        if let Dependency::Schema(member) = dep {
            let results = interpret_with_hint(member, &format!("{base}_{k}"));
            let (first, rest) = split_first(results);
            model.type_ |= first.type_;
            model.enum_.extend(first.enum_.iter().cloned());
            model.required.extend(first.required.iter().cloned());
            aux.extend(rest);
        }
    }

    // object type inference: properties/patternProperties imply `object`
    // when no explicit `type` was written.
    if schema.type_.is_none()
        && (!schema.properties.is_empty() || !schema.pattern_properties.is_empty())
    {
        model.type_ |= types::OBJECT;
    }

    let mut out = vec![model];
    out.extend(aux);
    out
}

fn split_first(mut results: Vec<CommonModel>) -> (CommonModel, Vec<CommonModel>) {
    let first = results.remove(0);
    (first, results)
}
