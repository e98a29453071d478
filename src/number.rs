//! `Number` gives JSON's numeric literals (which may arrive as unsigned,
//! signed, or floating-point depending on how `serde_json` parsed them) a
//! single total order and hash, so that `enum`/`const` literals can live in
//! an ordered set regardless of which representation a schema author wrote.
use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::{Hash, Hasher};

#[derive(Debug, Copy, Clone)]
pub enum Number {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}
use Number::*;

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unsigned(n) => write!(f, "{n}"),
            Signed(n) => write!(f, "{n}"),
            Float(n) => write!(f, "{n}"),
        }
    }
}

impl From<&serde_json::Number> for Number {
    fn from(n: &serde_json::Number) -> Self {
        if let Some(n) = n.as_u64() {
            Unsigned(n)
        } else if let Some(n) = n.as_i64() {
            Signed(n)
        } else {
            Float(n.as_f64().unwrap())
        }
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Unsigned(lhs), Unsigned(rhs)) => lhs.cmp(rhs),
            (Unsigned(_), Signed(rhs)) if *rhs < 0 => Ordering::Greater,
            (Unsigned(lhs), Signed(rhs)) => lhs.cmp(&(*rhs as u64)),
            (Unsigned(lhs), Float(rhs)) => f64_cmp(&(*lhs as f64), rhs),

            (Signed(lhs), Unsigned(_)) if *lhs < 0 => Ordering::Less,
            (Signed(lhs), Unsigned(rhs)) => (*lhs as u64).cmp(rhs),
            (Signed(lhs), Signed(rhs)) => lhs.cmp(rhs),
            (Signed(lhs), Float(rhs)) => f64_cmp(&(*lhs as f64), rhs),

            (Float(lhs), Unsigned(rhs)) => f64_cmp(lhs, &(*rhs as f64)),
            (Float(lhs), Signed(rhs)) => f64_cmp(lhs, &(*rhs as f64)),
            (Float(lhs), Float(rhs)) => f64_cmp(lhs, rhs),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // All three variants must hash identically for numerically-equal
        // values (20u64, 20i64 and 20.0f64 are the same `enum` literal).
        // Integral floats are hashed as their integer value; only a
        // genuine fractional part takes the float path.
        match self {
            Unsigned(n) => n.hash(state),
            Signed(n) if *n >= 0 => (*n as u64).hash(state),
            Signed(n) => n.hash(state),
            Float(n) if n.fract() == 0.0 && *n >= 0.0 => (*n as u64).hash(state),
            Float(n) if n.fract() == 0.0 => (*n as i64).hash(state),
            Float(n) => n.to_bits().hash(state),
        }
    }
}

fn f64_cmp(lhs: &f64, rhs: &f64) -> Ordering {
    lhs.partial_cmp(rhs).unwrap_or_else(|| {
        if lhs.is_nan() && rhs.is_nan() {
            Ordering::Equal
        } else if lhs.is_nan() {
            Ordering::Less
        } else if rhs.is_nan() {
            Ordering::Greater
        } else {
            panic!("couldn't compare {lhs} and {rhs}");
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_number_conversion() {
        fn from(s: &str) -> Number {
            let n: serde_json::Number = serde_json::from_str(s).unwrap();
            Number::from(&n)
        }

        assert_eq!(from("1234"), Unsigned(1234));
        assert_eq!(from("-1234"), Signed(-1234));
        assert_eq!(from("12.34"), Float(12.34));
        assert_eq!(from("18446744073709551615"), Unsigned(18446744073709551615));
    }

    #[test]
    fn test_equality() {
        assert_eq!(Unsigned(10), Unsigned(10));
        assert_eq!(Signed(-10), Signed(-10));
        assert_eq!(Float(1.0), Float(1.0));
        assert_eq!(Unsigned(20), Signed(20));
        assert_eq!(Unsigned(20), Float(20.00));
        assert_eq!(Signed(-20), Float(-20.00));
    }

    #[test]
    fn test_ordering() {
        assert_eq!(Unsigned(10).cmp(&Unsigned(11)), Ordering::Less);
        assert_eq!(Signed(-11).cmp(&Signed(-10)), Ordering::Less);
        assert_eq!(Unsigned(10).cmp(&Float(10.1)), Ordering::Less);
        assert_eq!(Signed(-10).cmp(&Unsigned(0)), Ordering::Less);
        assert_eq!(
            Signed(-20).cmp(&Unsigned(10000000000000000000u64)),
            Ordering::Less
        );
    }

    #[test]
    fn equal_numbers_hash_equal() {
        use std::collections::hash_map::DefaultHasher;

        fn hash_of(n: Number) -> u64 {
            let mut h = DefaultHasher::new();
            n.hash(&mut h);
            h.finish()
        }

        assert_eq!(hash_of(Unsigned(20)), hash_of(Signed(20)));
        assert_eq!(hash_of(Unsigned(20)), hash_of(Float(20.0)));
        assert_eq!(hash_of(Signed(-20)), hash_of(Float(-20.0)));
    }
}
