use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use chrono::SecondsFormat;
use serde_core::de::{self, MapAccess, SeqAccess, Unexpected, Visitor};
use serde_core::ser::{SerializeMap, SerializeSeq};
use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Map, Value};

// -----------------------------------------------------------------------------
// Serialize

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Nil => serializer.serialize_unit(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::Str(v) => serializer.serialize_str(v),
            Self::Time(v) => {
                serializer.serialize_str(&v.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, item) in map {
                    out.serialize_entry(key, item)?;
                }
                out.end()
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Deserialize

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any marshal value")
    }

    #[inline]
    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Nil)
    }

    #[inline]
    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Nil)
    }

    #[inline]
    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    #[inline]
    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    #[inline]
    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    // Integers beyond `i64::MAX` are rejected, like `FieldType::to_value` does.
    #[inline]
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &"an integer within i64 range"))
    }

    #[inline]
    fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    #[inline]
    fn visit_str<E>(self, v: &str) -> Result<Value, E> {
        Ok(Value::Str(v.into()))
    }

    #[inline]
    fn visit_string<E>(self, v: String) -> Result<Value, E> {
        Ok(Value::Str(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(256));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut map = Map::new();
        while let Some((key, item)) = access.next_entry::<String, Value>()? {
            map.insert(key, item);
        }
        Ok(Value::Map(map))
    }
}

impl<'de> Deserialize<'de> for Value {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use chrono::DateTime;

    use crate::value::{Map, Value};

    #[test]
    fn json_object_becomes_map() {
        let value: Value =
            serde_json::from_str(r#"{"id": 7, "tags": ["a", null], "ratio": 0.5, "ok": true}"#)
                .unwrap();

        let map = value.as_map().unwrap();
        assert_eq!(map.get("id"), Some(&Value::Int(7)));
        assert_eq!(
            map.get("tags"),
            Some(&Value::List([Value::from("a"), Value::Nil].into()))
        );
        assert_eq!(map.get("ratio"), Some(&Value::Float(0.5)));
        assert_eq!(map.get("ok"), Some(&Value::Bool(true)));
    }

    #[test]
    fn time_serializes_as_string() {
        let mut map = Map::new();
        map.insert(
            "at".into(),
            Value::Time(DateTime::from_timestamp(86_400, 0).unwrap()),
        );

        let json = serde_json::to_string(&Value::Map(map)).unwrap();
        assert_eq!(json, r#"{"at":"1970-01-02T00:00:00Z"}"#);
    }

    #[test]
    fn integers_beyond_i64_are_rejected() {
        let max: Value = serde_json::from_str("9223372036854775807").unwrap();
        assert_eq!(max, Value::Int(i64::MAX));
        let min: Value = serde_json::from_str("-9223372036854775808").unwrap();
        assert_eq!(min, Value::Int(i64::MIN));

        assert!(serde_json::from_str::<Value>("18446744073709551615").is_err());
    }

    #[test]
    fn nil_is_null() {
        assert_eq!(serde_json::to_string(&Value::Nil).unwrap(), "null");
        assert_eq!(Value::Nil.to_string(), "nil");
    }
}
