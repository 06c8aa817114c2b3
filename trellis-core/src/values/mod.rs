use std::fmt;

pub use self::collections::{List, Map};
pub use self::notifications::Change;

mod collections;
mod notifications;

// -----------------------------------------------------------------------------
//   - Number -
// -----------------------------------------------------------------------------
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Number {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl Number {
    pub fn is_zero(&self) -> bool {
        match *self {
            Self::Signed(n) => n == 0,
            Self::Unsigned(n) => n == 0,
            Self::Float(n) => n == 0.0 || n.is_nan(),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signed(n) => write!(f, "{n}"),
            Self::Unsigned(n) => write!(f, "{n}"),
            Self::Float(n) if n.is_finite() && n.fract() == 0.0 => write!(f, "{n:.0}"),
            Self::Float(n) => write!(f, "{n}"),
        }
    }
}

// -----------------------------------------------------------------------------
//   - Value -
// -----------------------------------------------------------------------------
/// A value in a data record.
///
/// Every value has a string form (what the renderer writes into the tree)
/// and a truthiness (what visibility and toggle bindings test).
/// `Null` stands in for a missing key and renders as an empty string.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(List),
    Map(Map),
}

impl Value {
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => !n.is_zero(),
            Self::String(s) => !s.is_empty(),
            Self::List(_) | Self::Map(_) => true,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::List(list) => {
                for (i, value) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
            Self::Map(_) => f.write_str("[object]"),
        }
    }
}

// -----------------------------------------------------------------------------
//   - Conversions -
// -----------------------------------------------------------------------------
macro_rules! from_int {
    ($variant:ident, $cast:ty, $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(Number::$variant(n as $cast))
                }
            }
        )*
    };
}

from_int!(Signed, i64, i8, i16, i32, i64, isize);
from_int!(Unsigned, u64, u8, u16, u32, u64, usize);
from_int!(Float, f64, f32, f64);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<List> for Value {
    fn from(list: List) -> Self {
        Self::List(list)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Self::Map(map)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

macro_rules! try_ref {
    ($variant:ident, $t:ty) => {
        impl<'a> TryFrom<&'a Value> for &'a $t {
            type Error = ();

            fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
                match value {
                    Value::$variant(inner) => Ok(inner),
                    _ => Err(()),
                }
            }
        }

        impl<'a> TryFrom<&'a mut Value> for &'a mut $t {
            type Error = ();

            fn try_from(value: &'a mut Value) -> Result<Self, Self::Error> {
                match value {
                    Value::$variant(inner) => Ok(inner),
                    _ => Err(()),
                }
            }
        }
    };
}

try_ref!(Bool, bool);
try_ref!(Number, Number);
try_ref!(String, String);
try_ref!(List, List);
try_ref!(Map, Map);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from(false).is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::from(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::from("0").is_truthy());
        assert!(Value::from(-1).is_truthy());
        assert!(Value::List(List::default()).is_truthy());
        assert!(Value::Map(Map::empty()).is_truthy());
    }

    #[test]
    fn string_form() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from(3.0).to_string(), "3");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(7u8).to_string(), "7");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(vec![1, 2, 3]).to_string(), "1,2,3");
        assert_eq!(Value::Map(Map::empty()).to_string(), "[object]");
    }
}
