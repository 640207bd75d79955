//!
//! Per-namespace variant labels.
//!
//! Each `(namespace, kind)` pair carries exactly one [`Prefixes`] pair for its
//! whole lifetime. The first reader or writer installs it; later writers are ignored.

use std::collections::HashMap;

use crate::primitives::Prefixes;
use crate::types::{KindId, Namespace};

#[derive(Debug, Clone, Default)]
pub struct PrefixRegistry {
    defaults: Prefixes,
    installed: HashMap<(Namespace, KindId), Prefixes>,
}

impl PrefixRegistry {
    /// A registry whose lazily installed pair is `defaults` instead of `(Can, Cannot)`.
    pub fn with_defaults(defaults: Prefixes) -> Self {
        PrefixRegistry { defaults, installed: HashMap::new() }
    }

    pub fn defaults(&self) -> &Prefixes {
        &self.defaults
    }

    /// Returns the pair for `(namespace, kind)`, installing the defaults on first use.
    pub fn get_prefix(&mut self, namespace: &Namespace, kind: &KindId) -> Prefixes {
        self.installed
            .entry((namespace.clone(), kind.clone()))
            .or_insert_with(|| self.defaults.clone())
            .clone()
    }

    /// Installs `prefixes` unless a pair is already installed.
    ///
    /// # Returns
    /// `true` if `prefixes` took effect, `false` if an earlier pair was kept.
    pub fn set_prefix(&mut self, namespace: &Namespace, kind: &KindId, prefixes: Prefixes) -> bool {
        let key = (namespace.clone(), kind.clone());
        if self.installed.contains_key(&key) {
            tracing::trace!(%namespace, %kind, "prefix already installed, keeping first writer");
            return false;
        }
        self.installed.insert(key, prefixes);
        true
    }

    /// Read-only lookup; does not install anything.
    pub fn peek(&self, namespace: &Namespace, kind: &KindId) -> Option<&Prefixes> {
        self.installed.get(&(namespace.clone(), kind.clone()))
    }
}
