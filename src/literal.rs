//! Ordering over JSON literal values, used to de-duplicate a model's
//! `enum`/`const` members. `serde_json::Value` has no `Ord`/`Hash` impl of its own
//! (its `Number` may be unsigned, signed, or float), so `Literal` wraps a
//! value with the total order this crate needs to store literals in a
//! `BTreeSet`.
use crate::number::Number;
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone)]
pub struct Literal(Value);

impl Literal {
    pub fn new(v: Value) -> Literal {
        Literal(v)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }

    pub fn get(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for Literal {
    fn from(v: Value) -> Self {
        Literal(v)
    }
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Literal {}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Literal {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(&self.0, &other.0)
    }
}

/// Evaluates a total, arbitrary ordering of `lhs` and `rhs`. Objects and
/// arrays compare lexicographically over their ordered items or
/// lexicographically-sorted properties; numbers compare by value
/// regardless of whether they were parsed as unsigned, signed, or float.
pub fn compare(lhs: &Value, rhs: &Value) -> Ordering {
    use itertools::{EitherOrBoth, Itertools};

    match (lhs, rhs) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(l), Value::Bool(r)) => l.cmp(r),
        (Value::Number(l), Value::Number(r)) => Number::from(l).cmp(&Number::from(r)),
        (Value::String(l), Value::String(r)) => l.cmp(r),
        (Value::Array(l), Value::Array(r)) => l
            .iter()
            .zip_longest(r.iter())
            .map(|eob| match eob {
                EitherOrBoth::Both(l, r) => compare(l, r),
                EitherOrBoth::Right(_) => Ordering::Less,
                EitherOrBoth::Left(_) => Ordering::Greater,
            })
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal),
        (Value::Object(l), Value::Object(r)) => {
            let (mut l, mut r): (Vec<_>, Vec<_>) = (l.iter().collect(), r.iter().collect());
            l.sort_by(|a, b| a.0.cmp(b.0));
            r.sort_by(|a, b| a.0.cmp(b.0));

            l.into_iter()
                .zip_longest(r.into_iter())
                .map(|eob| match eob {
                    EitherOrBoth::Both((lk, lv), (rk, rv)) => match lk.cmp(rk) {
                        Ordering::Equal => compare(lv, rv),
                        other => other,
                    },
                    EitherOrBoth::Right(_) => Ordering::Less,
                    EitherOrBoth::Left(_) => Ordering::Greater,
                })
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        }

        // Types are not otherwise comparable; impose an arbitrary total order.
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Bool(_), _) => Ordering::Less,
        (_, Value::Bool(_)) => Ordering::Greater,
        (Value::Number(_), _) => Ordering::Less,
        (_, Value::Number(_)) => Ordering::Greater,
        (Value::String(_), _) => Ordering::Less,
        (_, Value::String(_)) => Ordering::Greater,
        (Value::Array(_), _) => Ordering::Less,
        (_, Value::Array(_)) => Ordering::Greater,
    }
}
