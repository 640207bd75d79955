//! Shared identifier and value types.
//!
//! Identifiers are thin `String` newtypes so that a kind name can never be passed
//! where a type name is expected. All of them serialize as plain strings.

use std::fmt;

use crate::error::RegistryError;

/// Returns `true` when `s` is a plain identifier: a letter or `_` followed by
/// letters, digits or `_`.
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a capability kind, e.g. `Fly`.
    KindId
);

string_id!(
    /// Identifier of a registration namespace, e.g. `zoo::birds`.
    Namespace
);

string_id!(
    /// Identifier of a concrete type that capabilities are assigned to.
    TypeName
);

string_id!(
    /// Parent category of a capability kind.
    Category
);

impl KindId {
    /// Parses a kind identifier, rejecting anything that is not a plain identifier.
    pub fn parse(s: &str) -> Result<Self, RegistryError> {
        let id = KindId::from(s);
        id.validate()?;
        Ok(id)
    }

    pub(crate) fn validate(&self) -> Result<(), RegistryError> {
        if is_identifier(&self.0) {
            Ok(())
        } else {
            Err(RegistryError::Usage(format!(
                "`{}` is not a valid capability identifier",
                self.0
            )))
        }
    }
}

impl Namespace {
    /// Parses a `::`-separated namespace path such as `zoo::birds`.
    pub fn parse(s: &str) -> Result<Self, RegistryError> {
        if s.split("::").all(is_identifier) {
            Ok(Namespace::from(s))
        } else {
            Err(RegistryError::Usage(format!("`{}` is not a valid namespace path", s)))
        }
    }
}

impl TypeName {
    /// The type identifier of a Rust type, as reported by `std::any::type_name`.
    pub fn of<T: ?Sized>() -> Self {
        TypeName(std::any::type_name::<T>().to_owned())
    }
}

impl Category {
    /// The root category every kind belongs to unless told otherwise.
    pub const UNIVERSAL: &'static str = "Any";

    pub fn universal() -> Self {
        Category::from(Self::UNIVERSAL)
    }

    pub fn is_universal(&self) -> bool {
        self.0 == Self::UNIVERSAL
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::universal()
    }
}

/// Per-(kind, type) verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CapabilityValue {
    /// The type has the capability.
    Asserted,
    /// The type lacks the capability (or nothing says otherwise).
    Unasserted,
}

impl CapabilityValue {
    #[inline]
    pub fn is_asserted(self) -> bool {
        self == CapabilityValue::Asserted
    }
}

impl From<bool> for CapabilityValue {
    fn from(b: bool) -> Self {
        if b {
            CapabilityValue::Asserted
        } else {
            CapabilityValue::Unasserted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_id_parse() {
        assert!(KindId::parse("Fly").is_ok());
        assert!(KindId::parse("_private2").is_ok());
        assert!(matches!(KindId::parse(""), Err(RegistryError::Usage(_))));
        assert!(matches!(KindId::parse("2Fast"), Err(RegistryError::Usage(_))));
        assert!(matches!(KindId::parse("Can Fly"), Err(RegistryError::Usage(_))));
    }

    #[test]
    fn test_namespace_parse() {
        assert_eq!(Namespace::parse("zoo::birds").unwrap().as_str(), "zoo::birds");
        assert!(Namespace::parse("zoo").is_ok());
        assert!(Namespace::parse("zoo::").is_err());
        assert!(Namespace::parse("::zoo").is_err());
    }

    #[test]
    fn test_type_name_of() {
        struct Frog;
        let name = TypeName::of::<Frog>();
        assert!(name.as_str().ends_with("Frog"));
        assert_ne!(name, TypeName::of::<u8>());
    }

    #[test]
    fn test_capability_value_from_bool() {
        assert_eq!(CapabilityValue::from(true), CapabilityValue::Asserted);
        assert!(!CapabilityValue::from(false).is_asserted());
    }
}
