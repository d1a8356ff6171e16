use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::{schema, UcanError, UcanResult, RE_ABILITY, RE_AS_DID, RE_URI};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

const REASON_STRING: &str = "value must be a string";
const REASON_URI: &str = "value must be a valid URI string";
const REASON_SEGMENT: &str = "value must have at least one path segment";
const REASON_RESERVED: &str = "caveat name is reserved";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A grant of an ability `can` over a resource `with`.
///
/// Any other field of the grant is a caveat and is carried along untouched. Caveats are JSON data
/// model values held in key order, so a capability reads the same in both token formats.
///
/// The resource is a URI such as `mailto:alice@example.com`, `my:*` or `as:<did>:*`. The ability is
/// `*` or a `/` separated path of at least two segments such as `store/put` or `account/*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    with: String,
    can: String,
    caveats: Map<String, Value>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Capability {
    /// Creates a capability without caveats.
    pub fn new(with: impl Into<String>, can: impl Into<String>) -> UcanResult<Self> {
        Self::with_caveats(with, can, Map::new())
    }

    /// Creates a capability carrying extra caveat fields.
    pub fn with_caveats(
        with: impl Into<String>,
        can: impl Into<String>,
        caveats: Map<String, Value>,
    ) -> UcanResult<Self> {
        let capability = Self {
            with: with.into(),
            can: can.into(),
            caveats,
        };

        capability.validate()?;
        Ok(capability)
    }

    /// Reads a capability from the fields of a JSON object.
    pub fn from_map(map: &Map<String, Value>) -> UcanResult<Self> {
        let with = read_string_field(map, "with")?;
        let can = read_string_field(map, "can")?;
        let caveats = map
            .iter()
            .filter(|(key, _)| key.as_str() != "with" && key.as_str() != "can")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self::with_caveats(with, can, caveats)
    }

    /// Checks the capability against the capability grammar.
    pub fn validate(&self) -> UcanResult<()> {
        if !is_valid_resource(&self.with) {
            return Err(invalid("with", Value::from(self.with.as_str()), REASON_URI));
        }

        if !is_valid_ability(&self.can) {
            return Err(invalid("can", Value::from(self.can.as_str()), REASON_SEGMENT));
        }

        for (key, value) in self.caveats.iter() {
            if key == "with" || key == "can" {
                return Err(invalid(key, value.clone(), REASON_RESERVED));
            }
        }

        Ok(())
    }

    /// The resource the capability is granted over.
    pub fn with(&self) -> &str {
        &self.with
    }

    /// The ability granted.
    pub fn can(&self) -> &str {
        &self.can
    }

    /// The caveat fields of the grant.
    pub fn caveats(&self) -> &Map<String, Value> {
        &self.caveats
    }

    /// Returns a single caveat by name.
    pub fn caveat(&self, name: &str) -> Option<&Value> {
        self.caveats.get(name)
    }

    /// Returns the capability as a JSON object with `with`, `can` and the caveats side by side.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = self.caveats.clone();
        map.insert("with".to_string(), Value::from(self.with.as_str()));
        map.insert("can".to_string(), Value::from(self.can.as_str()));
        map
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

fn is_valid_resource(with: &str) -> bool {
    with == "my:*" || RE_AS_DID.is_match(with) || RE_URI.is_match(with)
}

fn is_valid_ability(can: &str) -> bool {
    can == "*" || RE_ABILITY.is_match(can)
}

fn read_string_field(map: &Map<String, Value>, field: &str) -> UcanResult<String> {
    match map.get(field) {
        Some(Value::String(value)) => Ok(value.clone()),
        value => Err(UcanError::InvalidCapability {
            field: field.to_string(),
            received: schema::describe(value),
            reason: REASON_STRING,
        }),
    }
}

fn invalid(field: &str, received: Value, reason: &'static str) -> UcanError {
    UcanError::InvalidCapability {
        field: field.to_string(),
        received: received.to_string(),
        reason,
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl TryFrom<Value> for Capability {
    type Error = UcanError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Self::from_map(&map),
            value => Err(UcanError::ExpectedObject {
                field: "capability".to_string(),
                received: value.to_string(),
            }),
        }
    }
}

impl From<Capability> for Value {
    fn from(capability: Capability) -> Self {
        Value::Object(capability.to_map())
    }
}

impl Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_map().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Capability::try_from(value).map_err(serde::de::Error::custom)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
