//! Name reflector. Walks a raw schema tree once, writing
//! [`crate::schema::INFERRED_NAME`] into every object-valued subschema at a
//! position that may become a model, so later stages never have to invent
//! identity for an anonymous node.
//!
//! Operates directly on `serde_json::Value`, mutating it in place rather
//! than building a new tree.
use crate::schema::INFERRED_NAME;
use serde_json::Value;

/// Runs the name reflector over `root`, seeding the top-level name with
/// `seed` (`"root"` unless the caller supplies its own).
pub fn reflect(root: &mut Value, seed: &str) {
    walk(root, seed);
}

fn is_object_schema(v: &Value) -> bool {
    matches!(v, Value::Object(_))
}

fn set_name(v: &mut Value, name: &str) {
    let Value::Object(map) = v else { return };
    if !map.contains_key(INFERRED_NAME) {
        map.insert(INFERRED_NAME.to_string(), Value::String(name.to_string()));
    }
}

fn child_name(parent: &str, key: &str) -> String {
    format!("{parent}_{key}")
}

/// Walks one schema node. `name` is this node's own (already-decided) name.
fn walk(v: &mut Value, name: &str) {
    if !is_object_schema(v) {
        // Boolean schemas are skipped.
        return;
    }
    set_name(v, name);

    // Re-read the name actually stored: a caller-preseeded attribute wins
    // over `name`, since reflection skips positions where it is already
    // present.
    let effective_name = v
        .get(INFERRED_NAME)
        .and_then(Value::as_str)
        .unwrap_or(name)
        .to_string();

    let Value::Object(map) = v else { return };

    if let Some(Value::Object(props)) = map.get_mut("properties") {
        for (k, child) in props.iter_mut() {
            let child_name = child_name(&effective_name, k);
            walk(child, &child_name);
        }
    }

    for kw in ["allOf", "anyOf", "oneOf"] {
        if let Some(Value::Array(items)) = map.get_mut(kw) {
            for (i, child) in items.iter_mut().enumerate() {
                let child_name = child_name(&effective_name, &format!("{kw}_{i}"));
                walk(child, &child_name);
            }
        }
    }

    match map.get_mut("items") {
        Some(Value::Array(items)) => {
            for (i, child) in items.iter_mut().enumerate() {
                let child_name = child_name(&effective_name, &format!("items_{i}"));
                walk(child, &child_name);
            }
        }
        Some(items @ Value::Object(_)) => {
            let child_name = child_name(&effective_name, "items");
            walk(items, &child_name);
        }
        _ => {}
    }

    if let Some(ap @ Value::Object(_)) = map.get_mut("additionalProperties") {
        let child_name = child_name(&effective_name, "additionalProperty");
        walk(ap, &child_name);
    }

    if let Some(Value::Object(patterns)) = map.get_mut("patternProperties") {
        // Sequential index, not the pattern itself.
        let mut index = 0usize;
        for (_, child) in patterns.iter_mut() {
            let child_name = child_name(&effective_name, &format!("pattern_property_{index}"));
            walk(child, &child_name);
            index += 1;
        }
    }

    if let Some(Value::Object(deps)) = map.get_mut("dependencies") {
        for (k, child) in deps.iter_mut() {
            if is_object_schema(child) {
                let child_name = child_name(&effective_name, k);
                walk(child, &child_name);
            }
        }
    }

    if let Some(Value::Object(defs)) = map.get_mut("definitions") {
        // Definitions are reflected with the key alone, not prefixed by
        // the parent.
        for (k, child) in defs.iter_mut() {
            walk(child, k);
        }
    }

    if let Some(not @ Value::Object(_)) = map.get_mut("not") {
        let child_name = child_name(&effective_name, "not");
        walk(not, &child_name);
    }
}
