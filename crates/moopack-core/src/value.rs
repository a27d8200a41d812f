//! The in-memory value tree exchanged by the encoder and decoder.

/// A decoded packet value.
///
/// Integers and floats are separate variants: an `Integer` takes the smallest
/// integer opcode that fits, a `Float` always travels as float64. Maps are
/// key/value pairs in wire (insertion) order, so re-encoding a decoded map
/// reproduces its key order exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    /// Key-value pairs in insertion order. Keys are not required to be unique;
    /// lookups resolve duplicates to the last pair.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Short name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Look up a string key in a map. Later duplicates shadow earlier ones.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?
            .iter()
            .rev()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Look up an arbitrary key in a map. Later duplicates shadow earlier ones.
    pub fn get_key(&self, key: &Value) -> Option<&Value> {
        self.as_map()?
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Insert into a map, replacing the value in place when the key already
    /// exists. Returns the previous value. Non-map values are left untouched
    /// and `None` is returned.
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        let Value::Map(pairs) = self else {
            return None;
        };
        let key = key.into();
        let value = value.into();
        match pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                pairs.push((key, value));
                None
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Integer(i64::from(n))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f64::from(f))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Nil, Into::into)
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_prefers_last_duplicate() {
        let map = Value::Map(vec![
            ("a".into(), 1.into()),
            ("a".into(), 2.into()),
        ]);
        assert_eq!(map.get("a"), Some(&Value::Integer(2)));
        assert_eq!(map.get("b"), None);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut map: Value = [("a", 1), ("b", 2)].into_iter().collect();
        let prev = map.insert("a", 3);
        assert_eq!(prev, Some(Value::Integer(1)));
        assert_eq!(
            map,
            Value::Map(vec![("a".into(), 3.into()), ("b".into(), 2.into())])
        );
    }

    #[test]
    fn insert_on_non_map_is_noop() {
        let mut v = Value::Integer(1);
        assert_eq!(v.insert("a", 1), None);
        assert_eq!(v, Value::Integer(1));
    }

    #[test]
    fn option_none_is_nil() {
        assert_eq!(Value::from(None::<i32>), Value::Nil);
        assert_eq!(Value::from(Some("x")), Value::String("x".into()));
    }

    #[test]
    fn integer_key_lookup() {
        let map = Value::Map(vec![(Value::Integer(7), "seven".into())]);
        assert_eq!(map.get_key(&7.into()), Some(&Value::from("seven")));
        assert_eq!(map.get("7"), None);
    }
}
