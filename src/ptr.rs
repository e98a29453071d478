//! JSON Pointer (RFC 6901) parsing and resolution, used by
//! [`crate::resolve`] to interpret `$ref` targets relative to the root
//! document.
use std::str::FromStr;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Token {
    /// Integer index of a JSON array. May also serve as an object property
    /// name, since JSON Pointer does not distinguish the two syntactically.
    Index(usize),
    /// JSON object property name.
    Property(String),
}

impl Token {
    fn from_str(s: &str) -> Self {
        if s.starts_with('+') || (s.starts_with('0') && s.len() > 1) {
            Token::Property(s.to_string())
        } else if let Ok(ind) = usize::from_str(s) {
            Token::Index(ind)
        } else {
            Token::Property(s.to_string())
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Index(ind) => write!(f, "{ind}"),
            Token::Property(prop) => write!(f, "{prop}"),
        }
    }
}

/// A parsed JSON Pointer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Pointer(pub Vec<Token>);

impl Pointer {
    pub fn empty() -> Pointer {
        Pointer(Vec::new())
    }

    /// Parses a `$ref` fragment, e.g. `"#/definitions/node"`, into a
    /// [`Pointer`]. A leading `#` is stripped; it is not itself a pointer
    /// token.
    pub fn from_fragment(s: &str) -> Pointer {
        let s = s.strip_prefix('#').unwrap_or(s);
        Pointer::from_str(s)
    }

    pub fn from_str(s: &str) -> Pointer {
        if s.is_empty() {
            return Pointer::empty();
        }
        let mut ptr = Self::empty();
        for token in s
            .split('/')
            .skip(if s.starts_with('/') { 1 } else { 0 })
            .map(|t| t.replace("~1", "/").replace("~0", "~"))
        {
            ptr.push(Token::from_str(&token));
        }
        ptr
    }

    pub fn push(&mut self, token: Token) -> &mut Pointer {
        self.0.push(token);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolves this pointer against `root`, returning `None` if the
    /// pointed-to location (or a parent thereof) does not exist.
    pub fn query<'v>(&self, root: &'v serde_json::Value) -> Option<&'v serde_json::Value> {
        use serde_json::Value;

        let mut node = root;
        for token in self.iter() {
            let next = match node {
                Value::Object(fields) => match token {
                    Token::Index(ind) => fields.get(&ind.to_string()),
                    Token::Property(prop) => fields.get(prop),
                },
                Value::Array(items) => match token {
                    Token::Index(ind) => items.get(*ind),
                    Token::Property(_) => None,
                },
                _ => None,
            };
            node = next?;
        }
        Some(node)
    }
}

impl std::fmt::Display for Pointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn replace_escapes(s: &str) -> String {
            s.replace('~', "~0").replace('/', "~1")
        }
        for token in self.iter() {
            write!(f, "/")?;
            match token {
                Token::Property(p) => write!(f, "{}", replace_escapes(p))?,
                Token::Index(i) => write!(f, "{i}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ptr_parsing() {
        use Token::*;

        let ptr = Pointer::from_str("/p1/2/p3");
        assert_eq!(
            ptr.0,
            vec![Property("p1".to_string()), Index(2), Property("p3".to_string())]
        );

        assert!(Pointer::from_str("").0.is_empty());

        let ptr = Pointer::from_str("/p~01/~12");
        assert_eq!(
            ptr.0,
            vec![Property("p~1".to_string()), Property("/2".to_string())]
        );
    }

    #[test]
    fn test_from_fragment_strips_hash() {
        assert_eq!(
            Pointer::from_fragment("#/definitions/node"),
            Pointer::from_str("/definitions/node")
        );
        assert_eq!(Pointer::from_fragment("#"), Pointer::empty());
    }

    #[test]
    fn test_ptr_query() {
        let doc = json!({
            "definitions": {
                "node": {"type": "object"},
            },
            "items": ["a", "b"],
        });

        assert_eq!(
            Pointer::from_str("/definitions/node").query(&doc),
            Some(&json!({"type": "object"}))
        );
        assert_eq!(Pointer::from_str("/items/1").query(&doc), Some(&json!("b")));
        assert_eq!(Pointer::from_str("/missing").query(&doc), None);
        assert_eq!(Pointer::from_str("/items/5").query(&doc), None);
        assert_eq!(Pointer::from_str("").query(&doc), Some(&doc));
    }

    #[test]
    fn test_ptr_to_string_round_trips() {
        for case in ["/foo/2/a~1b", "/foo/0", "/bar", "/foo/2/4"] {
            assert_eq!(Pointer::from_str(case).to_string(), case);
        }
    }
}
