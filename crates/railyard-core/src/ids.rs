//! Strongly-typed identifiers for declared entries and applications.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

macro_rules! define_name_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(name: impl Into<String>) -> Self {
                Self(name.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_name_id!(EntryId);
define_name_id!(AppId);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_entry_id_display() {
        let id = EntryId::new("unit-tests");
        assert_eq!(id.to_string(), "unit-tests");
        assert_eq!(id.as_str(), "unit-tests");
    }

    #[test]
    fn test_app_id_lookup_by_str() {
        let mut map = BTreeMap::new();
        map.insert(AppId::from("core"), 1);
        assert_eq!(map.get("core"), Some(&1));
    }

    #[test]
    fn test_id_serializes_transparently() {
        let json = serde_json::to_string(&AppId::new("web")).unwrap();
        assert_eq!(json, "\"web\"");
    }
}
