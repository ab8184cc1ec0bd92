//! Wire payload: `{"value": <integer>}`.
//!
//! Decoding follows the lenient rules of the clients this service grew up
//! with: the field name matches case-insensitively, later occurrences win, and
//! an occurrence that is not an integer leaves the previous value in place.

use std::fmt;

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

/// The single integer datum exchanged with callers. Created per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterValue {
    pub value: i64,
}

impl CounterValue {
    pub fn new(value: i64) -> Self {
        Self { value }
    }
}

impl<'de> Deserialize<'de> for CounterValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CounterValueVisitor)
    }
}

struct CounterValueVisitor;

impl<'de> Visitor<'de> for CounterValueVisitor {
    type Value = CounterValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with an integer `value` field")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<CounterValue, A::Error> {
        let mut out = CounterValue::default();
        while let Some(key) = map.next_key::<String>()? {
            if !key.eq_ignore_ascii_case("value") {
                map.next_value::<IgnoredAny>()?;
                continue;
            }
            // Floats, strings, null and out-of-i64 numbers keep the prior value.
            if let serde_json::Value::Number(n) = map.next_value::<serde_json::Value>()? {
                if let Some(v) = n.as_i64() {
                    out.value = v;
                }
            }
        }
        Ok(out)
    }
}

/// Decode a request body, falling back to `value = 0`.
///
/// Empty bodies and malformed JSON never reject the request; unknown fields
/// are ignored.
pub fn decode_lenient(body: &[u8]) -> CounterValue {
    if body.iter().all(u8::is_ascii_whitespace) {
        return CounterValue::default();
    }
    match serde_json::from_slice::<CounterValue>(body) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(error = %e, len = body.len(), "counter payload decode failed; using 0");
            CounterValue::default()
        }
    }
}
