//! Codec options. Both structs deserialize from camelCase config, with every
//! field optional.

use serde::{Deserialize, Serialize};

/// How special values are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WireEncoding {
    /// `{"__fsSerializer__": "special", ...}` objects.
    #[default]
    Tagged,
    /// `__Kind__payload` strings, for consumers that predate tagged objects.
    Legacy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SerializeOptions {
    pub encoding: WireEncoding,
    pub pretty: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeserializeOptions {
    /// Also accept legacy prefixed strings. Off by default, in which case such
    /// strings stay plain text.
    pub backwards_compatibility: bool,
}

impl DeserializeOptions {
    pub fn backwards_compatible() -> Self {
        Self {
            backwards_compatibility: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let ser = SerializeOptions::default();
        assert_eq!(ser.encoding, WireEncoding::Tagged);
        assert!(!ser.pretty);
        assert!(!DeserializeOptions::default().backwards_compatibility);
    }

    #[test]
    fn loads_camel_case_config() {
        let de: DeserializeOptions =
            serde_json::from_str(r#"{"backwardsCompatibility": true}"#).unwrap();
        assert_eq!(de, DeserializeOptions::backwards_compatible());

        let ser: SerializeOptions = serde_json::from_str(r#"{"encoding": "legacy"}"#).unwrap();
        assert_eq!(ser.encoding, WireEncoding::Legacy);
        assert!(!ser.pretty);

        let empty: DeserializeOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, DeserializeOptions::default());
    }
}
