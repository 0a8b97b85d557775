//! Native dynamic value
//!
//! `Var` is the native half of the marshaling contract: every value a
//! script can hand to native code (and every value native code can hand
//! back) is one of these variants.

use indexmap::IndexMap;
use std::fmt;

/// Key/value property set
pub type Properties = IndexMap<String, Var>;

/// Native dynamic value
#[derive(Debug, Clone, Default)]
pub enum Var {
    /// Script `undefined`
    Undefined,
    /// The empty sentinel; script `null` decodes to this
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Var>),
    Object(Properties),
}

impl Var {
    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Var::Undefined)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Var::Empty)
    }

    /// `Undefined` or `Empty`
    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self, Var::Undefined | Var::Empty)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Var::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Var::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Number as `f32`, the unit layout works in
    pub fn as_f32(&self) -> Option<f32> {
        self.as_f64().map(|n| n as f32)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Var::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Var]> {
        match self {
            Var::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Properties> {
        match self {
            Var::Object(props) => Some(props),
            _ => None,
        }
    }

    /// Property lookup on an object value
    pub fn get(&self, key: &str) -> Option<&Var> {
        self.as_object().and_then(|props| props.get(key))
    }

    /// Name of the variant, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Var::Undefined => "undefined",
            Var::Empty => "null",
            Var::Bool(_) => "boolean",
            Var::Number(_) => "number",
            Var::String(_) => "string",
            Var::Array(_) => "array",
            Var::Object(_) => "object",
        }
    }
}

/// Arrays compare element-wise, objects compare as key/value sets.
impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Var::Undefined, Var::Undefined) | (Var::Empty, Var::Empty) => true,
            (Var::Bool(a), Var::Bool(b)) => a == b,
            // NaN equals NaN
            (Var::Number(a), Var::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Var::String(a), Var::String(b)) => a == b,
            (Var::Array(a), Var::Array(b)) => a == b,
            (Var::Object(a), Var::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Var::Undefined => f.write_str("undefined"),
            Var::Empty => f.write_str("null"),
            Var::Bool(b) => write!(f, "{}", b),
            Var::Number(n) => write!(f, "{}", n),
            Var::String(s) => f.write_str(s),
            Var::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Var::Object(props) => {
                f.write_str("{")?;
                for (i, (key, value)) in props.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for Var {
    fn from(b: bool) -> Self {
        Var::Bool(b)
    }
}

impl From<f64> for Var {
    fn from(n: f64) -> Self {
        Var::Number(n)
    }
}

impl From<f32> for Var {
    fn from(n: f32) -> Self {
        Var::Number(n as f64)
    }
}

impl From<i32> for Var {
    fn from(n: i32) -> Self {
        Var::Number(n as f64)
    }
}

impl From<u32> for Var {
    fn from(n: u32) -> Self {
        Var::Number(n as f64)
    }
}

impl From<&str> for Var {
    fn from(s: &str) -> Self {
        Var::String(s.to_string())
    }
}

impl From<String> for Var {
    fn from(s: String) -> Self {
        Var::String(s)
    }
}

impl From<Vec<Var>> for Var {
    fn from(items: Vec<Var>) -> Self {
        Var::Array(items)
    }
}

impl From<Properties> for Var {
    fn from(props: Properties) -> Self {
        Var::Object(props)
    }
}

impl<K: Into<String>, V: Into<Var>> FromIterator<(K, V)> for Var {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Var::Object(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(Var::default().is_empty());
        assert!(!Var::Undefined.is_empty());
        assert_ne!(Var::Undefined, Var::Empty);
    }

    #[test]
    fn test_object_equality_ignores_order() {
        let a: Var = [("width", 100), ("height", 40)].into_iter().collect();
        let b: Var = [("height", 40), ("width", 100)].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_nan_equals_nan() {
        assert_eq!(Var::from(f64::NAN), Var::from(f64::NAN));
        assert_eq!(
            Var::from(vec![Var::from(f64::NAN)]),
            Var::from(vec![Var::from(-f64::NAN)])
        );
        assert_ne!(Var::from(f64::NAN), Var::from(0.0));
        assert_eq!(Var::from(0.0), Var::from(-0.0));
    }

    #[test]
    fn test_array_equality_is_ordered() {
        let a = Var::from(vec![Var::from(1), Var::from(2)]);
        let b = Var::from(vec![Var::from(2), Var::from(1)]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_accessors() {
        let v: Var = [("refId", "header")].into_iter().collect();
        assert_eq!(v.get("refId").and_then(Var::as_str), Some("header"));
        assert_eq!(Var::from(2.5).as_f32(), Some(2.5));
        assert_eq!(Var::from(true).as_bool(), Some(true));
        assert!(Var::from("x").as_f64().is_none());
    }

    #[test]
    fn test_display() {
        let v = Var::from(vec![Var::from(1), Var::from("a"), Var::Empty]);
        assert_eq!(v.to_string(), "[1, a, null]");
    }
}
