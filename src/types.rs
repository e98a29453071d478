//! A compact set of the seven JSON-Schema type tags.
//!
//! A validator typically folds `integer` into `number` (a `FRACTIONAL`/
//! `INTEGER` split used to decide whether an instance value satisfies
//! `"type": "number"`), but this crate only ever *renders* the tags a schema
//! author wrote. `"integer"` and `"number"` are kept as two independent bits
//! rather than one subtyping the other, since a renderer needs to
//! distinguish the two as first-class tags.
use serde_json::Value;
use std::fmt;

#[derive(Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Set(u8);

pub const INVALID: Set = Set(0b0000000);
pub const NULL: Set = Set(0b0000001);
pub const BOOLEAN: Set = Set(0b0000010);
pub const INTEGER: Set = Set(0b0000100);
pub const NUMBER: Set = Set(0b0001000);
pub const STRING: Set = Set(0b0010000);
pub const ARRAY: Set = Set(0b0100000);
pub const OBJECT: Set = Set(0b1000000);

/// The union of all seven tags. A `Set` equal to `ANY` is collapsed to a
/// simple "any" model by the simplifier rather than
/// being treated as an object model, even though `OBJECT` is technically
/// a member.
pub const ANY: Set = Set(
    NULL.0 | BOOLEAN.0 | INTEGER.0 | NUMBER.0 | STRING.0 | ARRAY.0 | OBJECT.0,
);

impl Default for Set {
    /// The empty set, matching an unsatisfiable model with no declared
    /// `type` (the boolean-`false`-schema case).
    fn default() -> Self {
        INVALID
    }
}

impl std::ops::BitOr for Set {
    type Output = Self;
    #[inline]
    fn bitor(self, other: Self) -> Self::Output {
        Set(self.0 | other.0)
    }
}

impl std::ops::BitOrAssign for Set {
    #[inline]
    fn bitor_assign(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl std::ops::BitAnd for Set {
    type Output = Self;
    #[inline]
    fn bitand(self, other: Self) -> Self::Output {
        Set(self.0 & other.0)
    }
}

impl std::ops::Sub for Set {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self::Output {
        Set(self.0 & !other.0)
    }
}

pub struct Iter {
    types: Set,
    index: usize,
}

const ITER_ORDER: &[(Set, &str)] = &[
    (NULL, "null"),
    (BOOLEAN, "boolean"),
    (INTEGER, "integer"),
    (NUMBER, "number"),
    (STRING, "string"),
    (ARRAY, "array"),
    (OBJECT, "object"),
];

impl Iterator for Iter {
    type Item = &'static str;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (ty, name) = ITER_ORDER.get(self.index)?;
            self.index += 1;
            if self.types.overlaps(*ty) {
                return Some(name);
            }
        }
    }
}

impl Set {
    pub fn iter(&self) -> Iter {
        Iter {
            types: *self,
            index: 0,
        }
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(String::from).collect()
    }

    pub fn for_type_name(name: &str) -> Option<Set> {
        ITER_ORDER
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(ty, _)| *ty)
    }

    pub fn for_value(val: &Value) -> Set {
        match val {
            Value::Array(_) => ARRAY,
            Value::Bool(_) => BOOLEAN,
            Value::Null => NULL,
            // A JSON number without a fractional part still only yields
            // "number" here; deciding "integer" vs "number" requires
            // inspecting the literal itself, see
            // `crate::interpret::infer_enum_type`.
            Value::Number(_) => NUMBER,
            Value::Object(_) => OBJECT,
            Value::String(_) => STRING,
        }
    }

    #[inline]
    pub fn overlaps(&self, other: Self) -> bool {
        *self & other != INVALID
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == INVALID
    }

    /// True for a `Set` that must be treated as a simple "any" model,
    /// never extracted as an object sub-model.
    #[inline]
    pub fn is_any(&self) -> bool {
        *self == ANY
    }
}

impl std::iter::FromIterator<Set> for Set {
    fn from_iter<T: IntoIterator<Item = Set>>(iter: T) -> Self {
        iter.into_iter().fold(INVALID, |acc, ty| acc | ty)
    }
}

impl<A> std::iter::FromIterator<A> for Set
where
    A: AsRef<str>,
{
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = A>,
    {
        let mut s = INVALID;
        for ty in iter {
            match Set::for_type_name(ty.as_ref()) {
                Some(t) => s |= t,
                None => return INVALID,
            }
        }
        s
    }
}

impl fmt::Debug for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use itertools::Itertools;
        write!(f, "{{{}}}", self.iter().format(", "))
    }
}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl serde::Serialize for Set {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

struct SetVisitor;

impl<'de> serde::de::Visitor<'de> for SetVisitor {
    type Value = Set;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a JSON-Schema type name, or an array of type names")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Set::for_type_name(value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid type name: '{value}'")))
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        self.visit_str(&value)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut s = INVALID;
        while let Some(name) = seq.next_element::<String>()? {
            s |= Set::for_type_name(&name)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid type name: '{name}'")))?;
        }
        Ok(s)
    }
}

impl<'de> serde::Deserialize<'de> for Set {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        deserializer.deserialize_any(SetVisitor)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn type_name_round_trips() {
        for (ty, name) in ITER_ORDER {
            assert_eq!(Set::for_type_name(name), Some(*ty));
        }
        assert_eq!(Set::for_type_name("not a real type"), None);
    }

    #[test]
    fn set_is_deserialized_from_string_or_array() {
        assert_eq!(STRING, serde_json::from_str("\"string\"").unwrap());
        assert_eq!(
            STRING | NULL,
            serde_json::from_str(r#"["string","null"]"#).unwrap()
        );
    }

    #[test]
    fn any_is_the_union_of_all_seven_tags() {
        let all: Set = ITER_ORDER.iter().map(|(ty, _)| *ty).collect();
        assert_eq!(all, ANY);
        assert!(ANY.is_any());
        assert!(!(ANY - OBJECT).is_any());
    }

    #[test]
    fn iteration_is_in_canonical_order() {
        let ty = OBJECT | NULL | STRING;
        assert_eq!(ty.iter().collect::<Vec<_>>(), vec!["null", "string", "object"]);
    }

    #[test]
    fn for_value_maps_json_values_to_tags() {
        assert_eq!(Set::for_value(&Value::Null), NULL);
        assert_eq!(Set::for_value(&serde_json::json!(true)), BOOLEAN);
        assert_eq!(Set::for_value(&serde_json::json!(1)), NUMBER);
        assert_eq!(Set::for_value(&serde_json::json!("s")), STRING);
        assert_eq!(Set::for_value(&serde_json::json!([1])), ARRAY);
        assert_eq!(Set::for_value(&serde_json::json!({})), OBJECT);
    }
}
