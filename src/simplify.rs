//! Simplifier. Takes the flat list of CommonModels an
//! interpreter run produced — the primary model for the schema plus every
//! auxiliary sibling discovered along the way — and folds it into the
//! final `$id -> CommonModel` map: object-typed (and enum-only) children
//! are promoted to top-level entries, and models sharing an `$id` are
//! merged.
use crate::model::{CommonModel, FieldShape, Items as ModelItems};
use indexmap::IndexMap;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum Warning {
    #[error("merge conflict for '{id}': {detail}")]
    MergeConflict { id: String, detail: String },
}

/// Folds `models` into a deduplicated `$id -> CommonModel` map, promoting
/// nested object/enum children to top-level entries as it goes.
pub fn simplify(models: Vec<CommonModel>) -> (IndexMap<String, CommonModel>, Vec<Warning>) {
    let mut out = IndexMap::new();
    let mut warnings = Vec::new();
    for model in models {
        insert_model(model, &mut out, &mut warnings);
    }
    (out, warnings)
}

fn insert_model(mut model: CommonModel, out: &mut IndexMap<String, CommonModel>, warnings: &mut Vec<Warning>) {
    extract_nested(&mut model, out, warnings);
    merge_insert(out, model, warnings);
}

/// Walks `model`'s child positions depth-first, promoting any object- or
/// enum-typed child it finds to a top-level entry in `out` and leaving a
/// [`FieldShape::Ref`] behind in its place.
fn extract_nested(model: &mut CommonModel, out: &mut IndexMap<String, CommonModel>, warnings: &mut Vec<Warning>) {
    for shape in model.properties.values_mut() {
        promote(shape, out, warnings);
    }
    if let Some(ap) = model.additional_properties.as_mut() {
        promote(ap, out, warnings);
    }
    for shape in model.pattern_properties.values_mut() {
        promote(shape, out, warnings);
    }
    match &mut model.items {
        Some(ModelItems::Single(shape)) => promote(shape, out, warnings),
        Some(ModelItems::Tuple(shapes)) => {
            for shape in shapes.iter_mut() {
                promote(shape, out, warnings);
            }
        }
        None => {}
    }
}

fn should_extract(m: &CommonModel) -> bool {
    let is_enum_only = !m.enum_.is_empty()
        && m.properties.is_empty()
        && m.pattern_properties.is_empty()
        && m.extend.is_empty();
    m.is_object_model() || is_enum_only
}

fn promote(shape: &mut FieldShape, out: &mut IndexMap<String, CommonModel>, warnings: &mut Vec<Warning>) {
    let FieldShape::Inline(child) = shape else {
        return;
    };
    extract_nested(child, out, warnings);
    if should_extract(child) {
        let id = child
            .id
            .clone()
            .expect("CommonModel invariant: every model has a non-empty $id");
        merge_insert(out, (**child).clone(), warnings);
        *shape = FieldShape::Ref(id);
    }
}

fn merge_insert(out: &mut IndexMap<String, CommonModel>, model: CommonModel, warnings: &mut Vec<Warning>) {
    let id = model
        .id
        .clone()
        .expect("CommonModel invariant: every model has a non-empty $id");
    match out.shift_remove(&id) {
        None => {
            out.insert(id, model);
        }
        Some(existing) => {
            let merged = merge(existing, model, &id, warnings);
            out.insert(id, merged);
        }
    }
}

/// Merges `b` (the newer model) into `a`. Where the two are
/// irreconcilable, `b` wins and a [`Warning::MergeConflict`] is recorded
/// rather than failing the whole run.
fn merge(mut a: CommonModel, b: CommonModel, id: &str, warnings: &mut Vec<Warning>) -> CommonModel {
    a.type_ |= b.type_;
    a.enum_.extend(b.enum_);
    a.required.extend(b.required);
    a.id = a.id.or(b.id);

    for (k, shape) in b.properties {
        let merged = match a.properties.shift_remove(&k) {
            Some(existing) => merge_field_shape(existing, shape, warnings, id),
            None => shape,
        };
        a.properties.insert(k, merged);
    }
    for (pattern, shape) in b.pattern_properties {
        let merged = match a.pattern_properties.shift_remove(&pattern) {
            Some(existing) => merge_field_shape(existing, shape, warnings, id),
            None => shape,
        };
        a.pattern_properties.insert(pattern, merged);
    }

    for e in b.extend {
        if !a.extend.contains(&e) {
            a.extend.push(e);
        }
    }

    a.items = match (a.items.take(), b.items) {
        (None, x) => x,
        (x, None) => x,
        (Some(ai), Some(bi)) => Some(merge_items(ai, bi, warnings, id)),
    };

    a.additional_properties = match (a.additional_properties.take(), b.additional_properties) {
        (None, x) => x,
        (x, None) => x,
        (Some(ax), Some(bx)) => Some(Box::new(merge_field_shape(*ax, *bx, warnings, id))),
    };

    a
}

fn merge_field_shape(a: FieldShape, b: FieldShape, warnings: &mut Vec<Warning>, owner: &str) -> FieldShape {
    match (a, b) {
        (FieldShape::Ref(ra), FieldShape::Ref(rb)) => {
            if ra == rb {
                FieldShape::Ref(ra)
            } else {
                warnings.push(Warning::MergeConflict {
                    id: owner.to_string(),
                    detail: format!("a property referenced both '{ra}' and '{rb}'"),
                });
                FieldShape::Ref(rb)
            }
        }
        (FieldShape::Inline(ia), FieldShape::Inline(ib)) => {
            FieldShape::Inline(Box::new(merge(*ia, *ib, owner, warnings)))
        }
        (_, b) => {
            warnings.push(Warning::MergeConflict {
                id: owner.to_string(),
                detail: "incompatible property shapes; keeping the newer one".to_string(),
            });
            b
        }
    }
}

fn merge_items(a: ModelItems, b: ModelItems, warnings: &mut Vec<Warning>, owner: &str) -> ModelItems {
    match (a, b) {
        (ModelItems::Single(sa), ModelItems::Single(sb)) => {
            ModelItems::Single(Box::new(merge_field_shape(*sa, *sb, warnings, owner)))
        }
        (ModelItems::Tuple(ta), ModelItems::Tuple(tb)) if ta.len() == tb.len() => ModelItems::Tuple(
            ta.into_iter()
                .zip(tb)
                .map(|(x, y)| merge_field_shape(x, y, warnings, owner))
                .collect(),
        ),
        (_, b) => {
            warnings.push(Warning::MergeConflict {
                id: owner.to_string(),
                detail: "incompatible items shapes (single vs tuple); keeping the newer one".to_string(),
            });
            b
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::interpret::interpret;
    use crate::schema::SchemaOrBool;
    use crate::types;
    use serde_json::json;

    fn run(v: serde_json::Value) -> (IndexMap<String, CommonModel>, Vec<Warning>) {
        let sob = SchemaOrBool::from_value(&v).unwrap();
        simplify(interpret(&sob))
    }

    #[test]
    fn simple_object_extracts_its_string_property() {
        let (map, warnings) = run(json!({
            "$id": "A",
            "type": "object",
            "properties": {"x": {"$id": "x", "type": "string"}},
        }));
        assert!(warnings.is_empty());
        assert!(map.contains_key("A"));
        assert!(map.contains_key("x"));
        match &map["A"].properties["x"] {
            FieldShape::Ref(id) => assert_eq!(id, "x"),
            FieldShape::Inline(_) => panic!("expected property to be extracted"),
        }
    }

    #[test]
    fn enum_only_model_is_always_extracted() {
        let (map, _) = run(json!({
            "$id": "A",
            "type": "object",
            "properties": {"x": {"$id": "Color", "enum": ["red", "green"]}},
        }));
        assert!(map.contains_key("Color"));
        assert_eq!(map["Color"].enum_.len(), 2);
    }

    #[test]
    fn all_types_model_is_never_extracted_even_as_a_property() {
        let (map, _) = run(json!({
            "$id": "A",
            "type": "object",
            "properties": {
                "x": {
                    "$id": "Anything",
                    "type": ["null","boolean","integer","number","string","array","object"],
                }
            },
        }));
        assert!(!map.contains_key("Anything"));
        match &map["A"].properties["x"] {
            FieldShape::Inline(m) => assert!(m.type_.is_any()),
            FieldShape::Ref(_) => panic!("any-typed property must stay inline"),
        }
    }

    #[test]
    fn duplicate_ids_merge_type_and_enum_unions() {
        let mut map = IndexMap::new();
        let mut warnings = Vec::new();
        let mut a = CommonModel::new(json!({}));
        a.id = Some("S".to_string());
        a.type_ = types::STRING;
        a.enum_.insert(crate::literal::Literal::new(json!("a")));
        let mut b = CommonModel::new(json!({}));
        b.id = Some("S".to_string());
        b.type_ = types::INTEGER;
        b.enum_.insert(crate::literal::Literal::new(json!("b")));

        merge_insert(&mut map, a, &mut warnings);
        merge_insert(&mut map, b, &mut warnings);

        let merged = &map["S"];
        assert!(merged.type_.overlaps(types::STRING));
        assert!(merged.type_.overlaps(types::INTEGER));
        assert_eq!(merged.enum_.len(), 2);
    }

    #[test]
    fn duplicate_ids_recursively_merge_inline_property_shapes() {
        // Two subschemas share a $id/title ("Dup"), each with a "list"
        // property that is itself inline (array-typed, not yet promoted)
        // and whose own `items` point at distinct sibling models. The
        // merge must recurse into the inline property, not just union its
        // scalar type/enum, and must warn about the conflicting `items`.
        let mut map = IndexMap::new();
        let mut warnings = Vec::new();

        let mut list_a = CommonModel::new(json!({}));
        list_a.type_ = types::ARRAY;
        list_a.items = Some(ModelItems::Single(Box::new(FieldShape::Ref("ItemA".to_string()))));
        let mut a = CommonModel::new(json!({}));
        a.id = Some("Dup".to_string());
        a.type_ = types::OBJECT;
        a.properties
            .insert("list".to_string(), FieldShape::Inline(Box::new(list_a)));

        let mut list_b = CommonModel::new(json!({}));
        list_b.type_ = types::ARRAY;
        list_b.items = Some(ModelItems::Single(Box::new(FieldShape::Ref("ItemB".to_string()))));
        let mut b = CommonModel::new(json!({}));
        b.id = Some("Dup".to_string());
        b.type_ = types::OBJECT;
        b.properties
            .insert("list".to_string(), FieldShape::Inline(Box::new(list_b)));

        merge_insert(&mut map, a, &mut warnings);
        merge_insert(&mut map, b, &mut warnings);

        let list = match &map["Dup"].properties["list"] {
            FieldShape::Inline(m) => m,
            FieldShape::Ref(_) => panic!("expected the 'list' property to stay inline"),
        };
        match &list.items {
            Some(ModelItems::Single(shape)) => assert!(matches!(**shape, FieldShape::Ref(_))),
            other => panic!("expected single items, got {other:?}"),
        }
        assert!(
            warnings.iter().any(|w| matches!(w, Warning::MergeConflict { .. })),
            "conflicting items refs on a merged inline property should warn"
        );
    }

    #[test]
    fn cyclic_schema_produces_an_empty_object_child_model() {
        let v = json!({
            "$ref": "#/definitions/node",
            "definitions": {
                "node": {
                    "$id": "node",
                    "type": "object",
                    "properties": {
                        "child": {"$ref": "#/definitions/node"},
                    },
                },
            },
        });
        let mut reflected = v.clone();
        crate::reflect::reflect(&mut reflected, "root");
        let resolved = crate::resolve::resolve(&reflected, &crate::resolve::Limits::default()).unwrap();
        let sob = SchemaOrBool::from_value(&resolved).unwrap();
        let (map, _) = simplify(interpret(&sob));
        assert!(map.contains_key("node"));
        match &map["node"].properties["child"] {
            FieldShape::Inline(m) => {
                assert!(m.type_.overlaps(types::OBJECT));
                assert!(m.properties.is_empty());
            }
            FieldShape::Ref(name) => {
                let child = &map[name];
                assert!(child.type_.overlaps(types::OBJECT));
                assert!(child.properties.is_empty());
            }
        }
    }
}
