//! The canonical in-memory form of a JSON Schema (draft-07) node. A
//! `Schema` is only ever built from a document that has already
//! passed through [`crate::reflect`] and [`crate::resolve`] — by the time a
//! `Schema` exists, every nameable position has an inferred name and no
//! `$ref` remains, so this type carries no `$ref` field at all.
//!
//! Construction is a single pass over an object's keys, dispatching each
//! recognized keyword into a field of the model being built, and ignoring
//! anything else unrecognized.
use crate::literal::Literal;
use crate::types;
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use thiserror::Error;

/// The extension attribute the name reflector writes.
pub const INFERRED_NAME: &str = "x-modelgen-inferred-name";

#[derive(Error, Debug)]
pub enum Error {
    #[error("expected an object or boolean schema, found {0}")]
    ExpectedSchema(&'static str),
    #[error("expected an object for keyword '{0}'")]
    ExpectedObject(&'static str),
    #[error("expected an array for keyword '{0}'")]
    ExpectedArray(&'static str),
    #[error("expected a string for keyword '{0}'")]
    ExpectedString(&'static str),
    #[error("invalid 'type' keyword: {0}")]
    InvalidType(#[source] serde_json::Error),
    #[error("invalid regular expression in patternProperties '{0}': {1}")]
    InvalidPattern(String, #[source] regex::Error),
    #[error("at '{at}': {source}")]
    At {
        at: String,
        #[source]
        source: Box<Error>,
    },
}

/// A schema value may be a full schema object, or a plain boolean: `true`
/// matches anything, `false` matches nothing.
#[derive(Debug, Clone)]
pub enum SchemaOrBool {
    Bool(bool),
    Schema(Box<Schema>),
}

impl SchemaOrBool {
    pub fn from_value(v: &Value) -> Result<SchemaOrBool, Error> {
        match v {
            Value::Bool(b) => Ok(SchemaOrBool::Bool(*b)),
            Value::Object(_) => Ok(SchemaOrBool::Schema(Box::new(Schema::from_value(v)?))),
            other => Err(Error::ExpectedSchema(type_name(other))),
        }
    }

    pub fn as_schema(&self) -> Option<&Schema> {
        match self {
            SchemaOrBool::Schema(s) => Some(s),
            SchemaOrBool::Bool(_) => None,
        }
    }
}

/// `items` may be a single schema applying to every element, or an
/// ordered sequence of per-position schemas (tuple semantics).
#[derive(Debug, Clone)]
pub enum Items {
    Single(Box<SchemaOrBool>),
    Tuple(Vec<SchemaOrBool>),
}

/// draft-07 `dependencies`: a value is either a subschema ("schema
/// dependency") or an array of required property names ("property
/// dependency"). The interpreter only projects the former.
#[derive(Debug, Clone)]
pub enum Dependency {
    Schema(SchemaOrBool),
    PropertyNames(Vec<String>),
}

#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub inferred_name: Option<String>,

    pub type_: Option<types::Set>,
    pub enum_: Option<Vec<Literal>>,
    pub const_: Option<Literal>,

    pub properties: IndexMap<String, SchemaOrBool>,
    pub items: Option<Items>,
    pub additional_properties: Option<Box<SchemaOrBool>>,
    pub pattern_properties: IndexMap<String, SchemaOrBool>,
    pub required: IndexSet<String>,

    pub all_of: Vec<SchemaOrBool>,
    pub any_of: Vec<SchemaOrBool>,
    pub one_of: Vec<SchemaOrBool>,
    pub not: Option<Box<SchemaOrBool>>,

    pub dependencies: IndexMap<String, Dependency>,
    pub definitions: IndexMap<String, SchemaOrBool>,

    /// The JSON value this schema was built from, kept verbatim as the
    /// `originalSchema` back-pointer the interpreter attaches to every
    /// CommonModel.
    pub raw: Value,
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn at(keyword: &'static str, e: Error) -> Error {
    Error::At {
        at: keyword.to_string(),
        source: Box::new(e),
    }
}

impl Schema {
    /// Builds a canonical [`Schema`] from a reflected, resolved JSON value.
    /// A top-level `true`/`false` schema has no attributes to carry — pass
    /// it through [`SchemaOrBool::from_value`] instead when the boolean
    /// case matters to the caller (the root of a pipeline run is handled
    /// this way by [`crate::process`]).
    pub fn from_value(v: &Value) -> Result<Schema, Error> {
        let obj = match v {
            Value::Object(m) => m,
            other => return Err(Error::ExpectedSchema(type_name(other))),
        };

        let mut schema = Schema::default();
        schema.raw = v.clone();

        if let Some(id) = obj.get("$id").and_then(Value::as_str) {
            schema.id = Some(id.to_string());
        }
        if let Some(title) = obj.get("title").and_then(Value::as_str) {
            schema.title = Some(title.to_string());
        }
        if let Some(desc) = obj.get("description").and_then(Value::as_str) {
            schema.description = Some(desc.to_string());
        }
        if let Some(name) = obj.get(INFERRED_NAME).and_then(Value::as_str) {
            schema.inferred_name = Some(name.to_string());
        }

        if let Some(ty) = obj.get("type") {
            schema.type_ = Some(
                serde_json::from_value::<types::Set>(ty.clone()).map_err(Error::InvalidType)?,
            );
        }
        if let Some(e) = obj.get("enum") {
            let Value::Array(items) = e else {
                return Err(at("enum", Error::ExpectedArray("enum")));
            };
            schema.enum_ = Some(items.iter().cloned().map(Literal::new).collect());
        }
        if let Some(c) = obj.get("const") {
            schema.const_ = Some(Literal::new(c.clone()));
        }

        if let Some(p) = obj.get("properties") {
            let Value::Object(m) = p else {
                return Err(at("properties", Error::ExpectedObject("properties")));
            };
            for (k, v) in m {
                schema.properties.insert(
                    k.clone(),
                    SchemaOrBool::from_value(v).map_err(|e| at("properties", e))?,
                );
            }
        }

        if let Some(items) = obj.get("items") {
            schema.items = Some(match items {
                Value::Array(seq) => Items::Tuple(
                    seq.iter()
                        .map(SchemaOrBool::from_value)
                        .collect::<Result<_, _>>()
                        .map_err(|e| at("items", e))?,
                ),
                other => Items::Single(Box::new(
                    SchemaOrBool::from_value(other).map_err(|e| at("items", e))?,
                )),
            });
        }

        // additionalProperties defaults to `true` when absent;
        // that default is applied by the interpreter, not here — an absent
        // keyword and an explicit `true` are indistinguishable to the
        // interpreter either way, so leaving this `None` is sufficient.
        if let Some(ap) = obj.get("additionalProperties") {
            schema.additional_properties = Some(Box::new(
                SchemaOrBool::from_value(ap).map_err(|e| at("additionalProperties", e))?,
            ));
        }

        if let Some(pp) = obj.get("patternProperties") {
            let Value::Object(m) = pp else {
                return Err(at(
                    "patternProperties",
                    Error::ExpectedObject("patternProperties"),
                ));
            };
            for (pattern, v) in m {
                regex::Regex::new(pattern)
                    .map_err(|e| Error::InvalidPattern(pattern.clone(), e))?;
                schema.pattern_properties.insert(
                    pattern.clone(),
                    SchemaOrBool::from_value(v).map_err(|e| at("patternProperties", e))?,
                );
            }
        }

        if let Some(req) = obj.get("required") {
            let Value::Array(items) = req else {
                return Err(at("required", Error::ExpectedArray("required")));
            };
            for item in items {
                let Some(s) = item.as_str() else {
                    return Err(at("required", Error::ExpectedString("required")));
                };
                schema.required.insert(s.to_string());
            }
        }

        schema.all_of = read_schema_array(obj, "allOf")?;
        schema.any_of = read_schema_array(obj, "anyOf")?;
        schema.one_of = read_schema_array(obj, "oneOf")?;

        if let Some(not) = obj.get("not") {
            schema.not = Some(Box::new(
                SchemaOrBool::from_value(not).map_err(|e| at("not", e))?,
            ));
        }

        if let Some(deps) = obj.get("dependencies") {
            let Value::Object(m) = deps else {
                return Err(at("dependencies", Error::ExpectedObject("dependencies")));
            };
            for (k, v) in m {
                let dep = match v {
                    Value::Array(names) => Dependency::PropertyNames(
                        names
                            .iter()
                            .map(|n| {
                                n.as_str()
                                    .map(str::to_string)
                                    .ok_or(Error::ExpectedString("dependencies"))
                            })
                            .collect::<Result<_, _>>()?,
                    ),
                    other => Dependency::Schema(
                        SchemaOrBool::from_value(other).map_err(|e| at("dependencies", e))?,
                    ),
                };
                schema.dependencies.insert(k.clone(), dep);
            }
        }

        if let Some(defs) = obj.get("definitions") {
            let Value::Object(m) = defs else {
                return Err(at("definitions", Error::ExpectedObject("definitions")));
            };
            for (k, v) in m {
                schema.definitions.insert(
                    k.clone(),
                    SchemaOrBool::from_value(v).map_err(|e| at("definitions", e))?,
                );
            }
        }

        Ok(schema)
    }

    /// True if `properties` or `patternProperties` is non-empty and no
    /// explicit `type` was given.
    pub fn infers_object_type(&self) -> bool {
        self.type_.is_none() && (!self.properties.is_empty() || !self.pattern_properties.is_empty())
    }
}

fn read_schema_array(
    obj: &serde_json::Map<String, Value>,
    keyword: &'static str,
) -> Result<Vec<SchemaOrBool>, Error> {
    let Some(v) = obj.get(keyword) else {
        return Ok(Vec::new());
    };
    let Value::Array(items) = v else {
        return Err(at(keyword, Error::ExpectedArray(keyword)));
    };
    items
        .iter()
        .map(SchemaOrBool::from_value)
        .collect::<Result<_, _>>()
        .map_err(|e| at(keyword, e))
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_basic_object_schema() {
        let v = json!({
            "$id": "A",
            "type": "object",
            "properties": {"x": {"type": "string"}},
            "required": ["x"],
        });
        let s = Schema::from_value(&v).unwrap();
        assert_eq!(s.id.as_deref(), Some("A"));
        assert_eq!(s.type_, Some(types::OBJECT));
        assert!(s.properties.contains_key("x"));
        assert!(s.required.contains("x"));
    }

    #[test]
    fn parses_enum_and_const() {
        let v = json!({"type": "string", "enum": ["a", "b", "c"]});
        let s = Schema::from_value(&v).unwrap();
        assert_eq!(s.enum_.unwrap().len(), 3);

        let v = json!({"const": 42});
        let s = Schema::from_value(&v).unwrap();
        assert_eq!(s.const_.unwrap().get(), &json!(42));
    }

    #[test]
    fn parses_items_single_and_tuple() {
        let v = json!({"items": {"type": "string"}});
        let s = Schema::from_value(&v).unwrap();
        assert!(matches!(s.items, Some(Items::Single(_))));

        let v = json!({"items": [{"type": "string"}, false]});
        let s = Schema::from_value(&v).unwrap();
        match s.items {
            Some(Items::Tuple(v)) => assert_eq!(v.len(), 2),
            _ => panic!("expected tuple items"),
        }
    }

    #[test]
    fn boolean_schema_values_are_preserved_in_properties() {
        let v = json!({"properties": {"ring": true, "ling": false}});
        let s = Schema::from_value(&v).unwrap();
        assert!(matches!(s.properties["ring"], SchemaOrBool::Bool(true)));
        assert!(matches!(s.properties["ling"], SchemaOrBool::Bool(false)));
    }

    #[test]
    fn rejects_malformed_required() {
        let v = json!({"required": "not-an-array"});
        assert!(Schema::from_value(&v).is_err());
    }

    #[test]
    fn object_type_is_inferred_from_properties() {
        let v = json!({"properties": {"x": true}});
        let s = Schema::from_value(&v).unwrap();
        assert!(s.infers_object_type());

        let v = json!({"type": "string", "properties": {"x": true}});
        let s = Schema::from_value(&v).unwrap();
        assert!(!s.infers_object_type());
    }

    #[test]
    fn dependencies_may_be_schema_or_property_names() {
        let v = json!({
            "dependencies": {
                "a": {"required": ["b"]},
                "c": ["d", "e"],
            }
        });
        let s = Schema::from_value(&v).unwrap();
        assert!(matches!(s.dependencies["a"], Dependency::Schema(_)));
        match &s.dependencies["c"] {
            Dependency::PropertyNames(names) => assert_eq!(names, &["d".to_string(), "e".to_string()]),
            _ => panic!("expected property-names dependency"),
        }
    }
}
