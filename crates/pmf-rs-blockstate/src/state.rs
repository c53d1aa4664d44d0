//! Modern block states: a name plus a typed property map.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

pub const AIR_NAME: &str = "minecraft:air";

/// A block state property value, as Bedrock stores it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RawStateValue")]
pub enum StateValue {
    Int(i32),
    Byte(i8),
    Str(String),
}

/// JSON booleans are byte states, numbers are int states.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawStateValue {
    Bool(bool),
    Int(i32),
    Str(String),
}

impl From<RawStateValue> for StateValue {
    fn from(raw: RawStateValue) -> Self {
        match raw {
            RawStateValue::Bool(b) => StateValue::Byte(b as i8),
            RawStateValue::Int(v) => StateValue::Int(v),
            RawStateValue::Str(s) => StateValue::Str(s),
        }
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateValue::Int(v) => write!(f, "{v}"),
            StateValue::Byte(0) => f.write_str("false"),
            StateValue::Byte(1) => f.write_str("true"),
            StateValue::Byte(v) => write!(f, "{v}b"),
            StateValue::Str(s) => write!(f, "{s:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBlockState {
    pub name: String,
    pub properties: BTreeMap<String, StateValue>,
}

impl CanonicalBlockState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn air() -> Self {
        Self::new(AIR_NAME)
    }

    pub fn with(mut self, key: impl Into<String>, value: StateValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn is_air(&self) -> bool {
        self.name == AIR_NAME
    }

    pub fn property(&self, key: &str) -> Option<&StateValue> {
        self.properties.get(key)
    }
}

/// `minecraft:wheat[growth=3]`
impl fmt::Display for CanonicalBlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.properties.is_empty() {
            return Ok(());
        }
        f.write_str("[")?;
        for (i, (key, value)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str("]")
    }
}
