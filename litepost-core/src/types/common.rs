use std::collections::BTreeMap;

/// Header, query, variable and auth maps. Ordered so every pass over a
/// request visits fields in the same order.
pub type StringMap = BTreeMap<String, String>;

/// Opaque identifier for stored entities.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Serializes a `Duration` as whole milliseconds.
pub mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let ms = u64::deserialize(d)?;
        Ok(Duration::from_millis(ms))
    }
}
