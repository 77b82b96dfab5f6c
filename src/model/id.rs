use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// The identifier the backend assigns to a stored record.
///
/// The client never interprets an id. Whatever JSON number or string the backend sends is kept as
/// is, serialized back unchanged, and rendered into item paths as text. Two ids are equal when
/// their text is equal, so an id typed on the command line matches the backend's `7` or `"7"`.
#[derive(Debug, Clone)]
pub struct Id(Value);

impl Id {
    /// The id as an integer, when it is one. Used to order records that the in-memory backend
    /// numbers itself.
    pub fn as_i64(&self) -> Option<i64> {
        match &self.0 {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    fn text(&self) -> String {
        match &self.0 {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

impl PartialEq for Id {
    fn eq(&self, other: &Self) -> bool {
        self.text() == other.text()
    }
}

impl Eq for Id {}

impl Hash for Id {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text().hash(state)
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id(Value::from(value))
    }
}

impl FromStr for Id {
    type Err = Infallible;

    /// Integers become numeric ids, anything else is kept as text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) => Id::from(n),
            Err(_) => Id(Value::String(s.to_string())),
        })
    }
}

impl Serialize for Id {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            value @ (Value::Number(_) | Value::String(_)) => Ok(Id(value)),
            other => Err(serde::de::Error::custom(format!(
                "an id must be a number or a string, got {other}"
            ))),
        }
    }
}
