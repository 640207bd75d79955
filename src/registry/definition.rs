//! Capability kind definitions.

use crate::config::generated;
use crate::error::RegistryError;
use crate::primitives::{CapabilityKind, Prefixes, Rule};
use crate::registry::core::Registry;
use crate::types::{Category, KindId, Namespace};

/// Declaration of a new capability kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindDecl {
    pub name: KindId,
    pub category: Category,
    /// `None` keeps whatever pair is (or will be) installed for the kind.
    pub prefixes: Option<Prefixes>,
    /// Empty for a primitive kind; at least two distinct kinds for a composite.
    pub constituents: Vec<KindId>,
}

impl KindDecl {
    pub fn primitive(name: impl Into<KindId>) -> Self {
        KindDecl {
            name: name.into(),
            category: Category::universal(),
            prefixes: None,
            constituents: Vec::new(),
        }
    }

    pub fn composite<I, K>(name: impl Into<KindId>, constituents: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<KindId>,
    {
        KindDecl {
            constituents: constituents.into_iter().map(Into::into).collect(),
            ..Self::primitive(name)
        }
    }

    pub fn category(mut self, category: impl Into<Category>) -> Self {
        self.category = category.into();
        self
    }

    pub fn prefixes(mut self, prefixes: Prefixes) -> Self {
        self.prefixes = Some(prefixes);
        self
    }
}

impl Registry {
    /// Defines a capability kind in `namespace`'s local tier.
    ///
    /// All checks run before anything is written, so a failed definition leaves the
    /// registry untouched.
    ///
    /// Kind names are process-wide: a name already defined by any namespace, merged
    /// or not, is a duplicate, even if `namespace` cannot see that definition yet.
    ///
    /// With `allow_redefinition`, the new rule replaces the old one outright. The
    /// kind's constituents and contracts are dropped from `namespace` and the global
    /// tier before the new facts are written.
    ///
    /// # Errors
    /// * `Usage` - the name or prefixes are malformed.
    /// * `DuplicateDefinition` - the name is already a capability kind (unless the
    ///   registry allows redefinition).
    /// * `InvalidComposite` - fewer than two distinct constituents, or a constituent
    ///   that leads back to the kind being defined.
    /// * `UnknownCapability` - a constituent is not reachable from `namespace`.
    pub fn define(&mut self, namespace: &Namespace, decl: KindDecl) -> Result<CapabilityKind, RegistryError> {
        let KindDecl { name, category, prefixes, constituents } = decl;
        name.validate()?;
        if let Some(p) = &prefixes {
            p.validate()?;
        }

        let redefining = self.is_capability_kind(&name);
        if redefining {
            if !self.config.allow_redefinition {
                return Err(RegistryError::DuplicateDefinition(name));
            }
            tracing::warn!(registry = %self.instance(), kind = %name, "redefining capability kind");
        }

        let rule = self.composite_rule(namespace, &name, constituents)?;

        if let Some(p) = prefixes {
            self.prefixes.set_prefix(namespace, &name, p);
        }
        let kind = CapabilityKind {
            prefixes: self.prefixes.get_prefix(namespace, &name),
            id: name.clone(),
            category,
            rule,
        };

        if redefining {
            self.composites.forget(namespace, &name);
            self.contracts.forget(namespace, &name);
        }
        if let Rule::Composite(parts) = &kind.rule {
            self.composites.write(namespace, name.clone(), parts.iter().cloned());
            for part in parts {
                let inherited = self.contracts.read_all(namespace, part);
                self.contracts.write(namespace, name.clone(), inherited);
            }
        }
        self.rules.insert(name.clone(), kind.rule.clone());
        self.definitions.insert(namespace, kind.clone());

        tracing::debug!(
            registry = %self.instance(),
            %namespace,
            kind = %name,
            composite = kind.is_composite(),
            "defined capability kind"
        );
        generated!(
            %namespace,
            "define {} <: {} => {{{}, {}}}{}",
            name,
            kind.category,
            kind.label(true.into()),
            kind.label(false.into()),
            describe_parts(kind.constituents())
        );
        Ok(kind)
    }

    /// Validates `constituents` and turns them into the kind's rule.
    fn composite_rule(
        &self,
        namespace: &Namespace,
        name: &KindId,
        constituents: Vec<KindId>,
    ) -> Result<Rule, RegistryError> {
        if constituents.is_empty() {
            return Ok(Rule::Primitive);
        }
        let mut parts: Vec<KindId> = Vec::with_capacity(constituents.len());
        for part in constituents {
            if !parts.contains(&part) {
                parts.push(part);
            }
        }
        if parts.len() < 2 {
            return Err(RegistryError::InvalidComposite {
                kind: name.clone(),
                reason: format!("needs at least two distinct constituents, got {}", parts.len()),
            });
        }
        for part in &parts {
            if self.kind(namespace, part).is_none() {
                return Err(RegistryError::UnknownCapability(part.clone()));
            }
            if self.reaches(part, name) {
                return Err(RegistryError::InvalidComposite {
                    kind: name.clone(),
                    reason: format!("constituent `{}` depends on `{}`", part, name),
                });
            }
        }
        Ok(Rule::Composite(parts))
    }
}

fn describe_parts(parts: &[KindId]) -> String {
    if parts.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = parts.iter().map(KindId::as_str).collect();
    format!(" from [{}]", names.join(", "))
}
