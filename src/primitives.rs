use std::fmt;

use crate::error::RegistryError;
use crate::types::{CapabilityValue, Category, KindId, TypeName};

// --- Variant labels ---------------------------------------------------------

/// The two labels naming the "has" / "lacks" variants of a capability kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Prefixes {
    pub positive: String,
    pub negative: String,
}

impl Prefixes {
    pub const DEFAULT_POSITIVE: &'static str = "Can";
    pub const DEFAULT_NEGATIVE: &'static str = "Cannot";

    /// Builds a label pair. Both labels must be non-empty, distinct, and free of whitespace.
    pub fn new(positive: impl Into<String>, negative: impl Into<String>) -> Result<Self, RegistryError> {
        let prefixes = Prefixes { positive: positive.into(), negative: negative.into() };
        prefixes.validate()?;
        Ok(prefixes)
    }

    pub(crate) fn validate(&self) -> Result<(), RegistryError> {
        for label in [&self.positive, &self.negative] {
            if label.is_empty() || label.chars().any(char::is_whitespace) {
                return Err(RegistryError::Usage(format!("invalid capability prefix `{}`", label)));
            }
        }
        if self.positive == self.negative {
            return Err(RegistryError::Usage(format!(
                "positive and negative prefixes must differ (both `{}`)",
                self.positive
            )));
        }
        Ok(())
    }

    /// The label for `value`.
    pub fn for_value(&self, value: CapabilityValue) -> &str {
        match value {
            CapabilityValue::Asserted => &self.positive,
            CapabilityValue::Unasserted => &self.negative,
        }
    }
}

impl Default for Prefixes {
    fn default() -> Self {
        Prefixes {
            positive: Self::DEFAULT_POSITIVE.to_owned(),
            negative: Self::DEFAULT_NEGATIVE.to_owned(),
        }
    }
}

// --- Capability kinds -------------------------------------------------------

/// Introspection rule of a capability kind.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Rule {
    /// Unasserted unless an assignment record exists for the type.
    Primitive,
    /// Asserted iff every constituent is asserted. Never consults assignments.
    Composite(Vec<KindId>),
}

/// A defined capability kind.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CapabilityKind {
    pub id: KindId,
    pub category: Category,
    pub prefixes: Prefixes,
    pub rule: Rule,
}

impl CapabilityKind {
    pub fn is_composite(&self) -> bool {
        matches!(self.rule, Rule::Composite(_))
    }

    /// Constituent kinds, in declaration order. Empty for primitive kinds.
    pub fn constituents(&self) -> &[KindId] {
        match &self.rule {
            Rule::Primitive => &[],
            Rule::Composite(parts) => parts,
        }
    }

    /// Name of the variant for `value`, e.g. `CanFly` or `CannotFly`.
    pub fn label(&self, value: CapabilityValue) -> String {
        format!("{}{}", self.prefixes.for_value(value), self.id)
    }
}

// --- Structural signatures --------------------------------------------------

/// One position of a structural signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum ParamType {
    /// The position taken by the type claiming the capability.
    Implementor,
    /// Any other named type.
    Named(String),
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Implementor => f.write_str("Self"),
            ParamType::Named(name) => f.write_str(name),
        }
    }
}

/// Required call signature: a callable name, its argument positions, and its return type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Signature {
    pub name: String,
    pub params: Vec<ParamType>,
    pub returns: ParamType,
}

impl Signature {
    pub fn new(name: impl Into<String>, params: Vec<ParamType>, returns: ParamType) -> Self {
        Signature { name: name.into(), params, returns }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, ") -> {}", self.returns)
    }
}

// --- Facts ------------------------------------------------------------------

/// `(type, kind)` forced to Asserted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AssignmentRecord {
    pub ty: TypeName,
    pub kind: KindId,
}

/// Any type asserting `kind` must provide a callable matching `signature`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct InterfaceContract {
    pub kind: KindId,
    pub signature: Signature,
}
