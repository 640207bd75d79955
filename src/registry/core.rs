//!
//! The capability registry: tiered fact maps plus the process-wide introspection table.
//!
//! # Concurrency
//! The registry holds no locks. Every mutation takes `&mut self`, so callers that share
//! one registry between threads wrap it in a `Mutex` or `RwLock`; that lock is also what
//! serialises merges from different namespaces into the global tier. Lookups through
//! `&Registry` never mutate and may run concurrently.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use uuid::Uuid;

use crate::config::{self, generated, RegistryConfig};
use crate::prefix::PrefixRegistry;
use crate::primitives::{CapabilityKind, Prefixes, Rule, Signature};
use crate::registry::storage::{DefinitionTable, FactMap};
use crate::types::{CapabilityValue, KindId, Namespace, TypeName};

/// Counts of facts promoted by one [`Registry::merge_to_global`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub definitions: usize,
    pub assignments: usize,
    pub contracts: usize,
    pub composites: usize,
}

impl MergeSummary {
    pub fn total(&self) -> usize {
        self.definitions + self.assignments + self.contracts + self.composites
    }
}

/// Capability registry. Build one per process (or one per test).
#[derive(Debug, Clone)]
pub struct Registry {
    instance: Uuid,
    pub(crate) config: RegistryConfig,
    pub(crate) prefixes: PrefixRegistry,
    pub(crate) definitions: DefinitionTable,
    /// Introspection table. Visible to every namespace as soon as a kind is defined.
    pub(crate) rules: HashMap<KindId, Rule>,
    /// Per-kind set of types whose value is forced to Asserted.
    pub(crate) overrides: HashMap<KindId, HashSet<TypeName>>,
    /// type → assigned kinds
    pub(crate) assignments: FactMap<TypeName, KindId>,
    /// kind → required signatures
    pub(crate) contracts: FactMap<KindId, Signature>,
    /// composite kind → constituent kinds
    pub(crate) composites: FactMap<KindId, KindId>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Builds a registry from `config`. Setting `config.verbose` turns the process-wide
    /// generated-operation trace on.
    pub fn with_config(config: RegistryConfig) -> Self {
        if config.verbose {
            config::set_verbose(true);
        }
        let instance = Uuid::new_v4();
        tracing::debug!(registry = %instance, ?config, "capability registry created");
        Registry {
            instance,
            prefixes: PrefixRegistry::with_defaults(config.default_prefixes.clone()),
            config,
            definitions: DefinitionTable::default(),
            rules: HashMap::new(),
            overrides: HashMap::new(),
            assignments: FactMap::new("assignments"),
            contracts: FactMap::new("contracts"),
            composites: FactMap::new("composites"),
        }
    }

    pub fn instance(&self) -> Uuid {
        self.instance
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // --- Storage access -----------------------------------------------------

    pub fn assignments(&self) -> &FactMap<TypeName, KindId> {
        &self.assignments
    }

    pub fn contracts(&self) -> &FactMap<KindId, Signature> {
        &self.contracts
    }

    pub fn composites(&self) -> &FactMap<KindId, KindId> {
        &self.composites
    }

    // --- Prefixes -----------------------------------------------------------

    pub fn get_prefix(&mut self, namespace: &Namespace, kind: &KindId) -> Prefixes {
        self.prefixes.get_prefix(namespace, kind)
    }

    pub fn set_prefix(&mut self, namespace: &Namespace, kind: &KindId, prefixes: Prefixes) -> bool {
        self.prefixes.set_prefix(namespace, kind, prefixes)
    }

    // --- Introspection ------------------------------------------------------

    /// `true` once `id` has been defined by any namespace.
    pub fn is_capability_kind(&self, id: &KindId) -> bool {
        self.rules.contains_key(id)
    }

    /// The definition of `id` as seen from `namespace` (local tier first).
    pub fn kind(&self, namespace: &Namespace, id: &KindId) -> Option<&CapabilityKind> {
        self.definitions.lookup(namespace, id)
    }

    /// Every kind id reachable from `namespace`.
    pub fn kinds(&self, namespace: &Namespace) -> BTreeSet<KindId> {
        self.definitions.reachable(namespace)
    }

    /// Value of capability `kind` for type `ty`. Total: unknown kinds are Unasserted.
    pub fn value_of(&self, kind: &KindId, ty: &TypeName) -> CapabilityValue {
        let value = match self.rules.get(kind) {
            None => CapabilityValue::Unasserted,
            Some(Rule::Primitive) => self
                .overrides
                .get(kind)
                .is_some_and(|types| types.contains(ty))
                .into(),
            // `all` stops at the first Unasserted constituent.
            Some(Rule::Composite(parts)) => parts
                .iter()
                .all(|part| self.value_of(part, ty).is_asserted())
                .into(),
        };
        tracing::trace!(%kind, %ty, ?value, "value_of");
        value
    }

    /// Variant label for `(kind, ty)` as seen from `namespace`, e.g. `CanFly`.
    pub fn label_of(&self, namespace: &Namespace, kind: &KindId, ty: &TypeName) -> Option<String> {
        self.kind(namespace, kind).map(|k| k.label(self.value_of(kind, ty)))
    }

    /// Kinds explicitly assigned to `ty`, as seen from `namespace`.
    pub fn capabilities_of(&self, namespace: &Namespace, ty: &TypeName) -> BTreeSet<KindId> {
        self.assignments.read(namespace, ty)
    }

    /// Constituents recorded for a composite `kind`. Empty for primitives.
    pub fn constituents_of(&self, namespace: &Namespace, kind: &KindId) -> BTreeSet<KindId> {
        self.composites.read(namespace, kind)
    }

    /// Whether the closure of `from`'s constituents includes `target`.
    pub(crate) fn reaches(&self, from: &KindId, target: &KindId) -> bool {
        let mut stack = vec![from];
        let mut seen = HashSet::new();
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if !seen.insert(id) {
                continue;
            }
            if let Some(Rule::Composite(parts)) = self.rules.get(id) {
                stack.extend(parts.iter());
            }
        }
        false
    }

    // --- Merge protocol -----------------------------------------------------

    /// Drops residual empty buckets and spare capacity from `namespace`'s local tier.
    pub fn compact(&mut self, namespace: &Namespace) {
        self.definitions.compact(namespace);
        self.assignments.compact(namespace);
        self.contracts.compact(namespace);
        self.composites.compact(namespace);
    }

    /// Publishes everything `namespace` registered locally to the global tier and
    /// clears its local tier. Calling it again without new writes is a no-op.
    pub fn merge_to_global(&mut self, namespace: &Namespace) -> MergeSummary {
        self.compact(namespace);
        let summary = MergeSummary {
            definitions: self.definitions.merge_to_global(namespace),
            assignments: self.assignments.merge_to_global(namespace),
            contracts: self.contracts.merge_to_global(namespace),
            composites: self.composites.merge_to_global(namespace),
        };
        tracing::debug!(registry = %self.instance, %namespace, ?summary, "merged namespace into global tier");
        generated!(%namespace, promoted = summary.total(), "merge_to_global");
        summary
    }

    /// Whether `namespace` has local facts that are not yet global.
    pub fn has_pending(&self, namespace: &Namespace) -> bool {
        self.definitions.has_pending(namespace)
            || self.assignments.has_pending(namespace)
            || self.contracts.has_pending(namespace)
            || self.composites.has_pending(namespace)
    }

    // --- Snapshot -----------------------------------------------------------

    /// Serializable copy of the global tier.
    pub fn snapshot(&self) -> RegistrySnapshot {
        fn sorted<K: Ord + Clone, V: Ord + Clone>(
            tier: &HashMap<K, BTreeSet<V>>,
        ) -> BTreeMap<K, BTreeSet<V>> {
            tier.iter()
                .filter(|(_, set)| !set.is_empty())
                .map(|(k, set)| (k.clone(), set.clone()))
                .collect()
        }
        RegistrySnapshot {
            instance: self.instance,
            definitions: self
                .definitions
                .global()
                .iter()
                .map(|(id, kind)| (id.clone(), kind.clone()))
                .collect(),
            assignments: sorted(self.assignments.global()),
            contracts: sorted(self.contracts.global()),
            composites: sorted(self.composites.global()),
        }
    }
}

/// The published (global) state of a registry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegistrySnapshot {
    pub instance: Uuid,
    pub definitions: BTreeMap<KindId, CapabilityKind>,
    pub assignments: BTreeMap<TypeName, BTreeSet<KindId>>,
    pub contracts: BTreeMap<KindId, BTreeSet<Signature>>,
    pub composites: BTreeMap<KindId, BTreeSet<KindId>>,
}

impl RegistrySnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
