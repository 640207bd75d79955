//! Two-tier fact storage.
//!
//! Every map has one *local* tier per namespace and a single *global* tier.
//! Writes only ever touch the writer's local tier; [`FactMap::merge_to_global`]
//! is the one path from local to global.
//!
//! Lookups treat an empty local bucket as absent, so [`FactMap::compact`] can drop
//! empty buckets without changing what [`FactMap::read`] returns.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

use crate::primitives::CapabilityKind;
use crate::types::{KindId, Namespace};

/// One tier of a fact map: key → set of values.
pub type Tier<K, V> = HashMap<K, BTreeSet<V>>;

/// Scoped key → set-of-values store.
#[derive(Debug, Clone)]
pub struct FactMap<K, V> {
    name: &'static str,
    local: HashMap<Namespace, Tier<K, V>>,
    global: Tier<K, V>,
}

impl<K, V> FactMap<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Ord + Clone,
{
    pub fn new(name: &'static str) -> Self {
        FactMap { name, local: HashMap::new(), global: HashMap::new() }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Borrowing form of [`FactMap::read`]. `None` when the key is absent from both tiers.
    pub fn lookup(&self, namespace: &Namespace, key: &K) -> Option<&BTreeSet<V>> {
        let local = self
            .local
            .get(namespace)
            .and_then(|tier| tier.get(key))
            .filter(|set| !set.is_empty());
        local.or_else(|| self.global.get(key).filter(|set| !set.is_empty()))
    }

    /// Local-then-global lookup. A local entry shadows the global one entirely.
    pub fn read(&self, namespace: &Namespace, key: &K) -> BTreeSet<V> {
        self.lookup(namespace, key).cloned().unwrap_or_default()
    }

    /// Union of the local and global buckets for `key`. Unlike [`FactMap::read`],
    /// merged facts stay visible after the namespace writes the key again.
    pub fn read_all(&self, namespace: &Namespace, key: &K) -> BTreeSet<V> {
        let mut all = self.global.get(key).cloned().unwrap_or_default();
        if let Some(local) = self.local.get(namespace).and_then(|tier| tier.get(key)) {
            all.extend(local.iter().cloned());
        }
        all
    }

    pub fn contains(&self, namespace: &Namespace, key: &K, value: &V) -> bool {
        self.lookup(namespace, key).is_some_and(|set| set.contains(value))
    }

    /// Unions `values` into the local set for `key`, creating it if absent.
    ///
    /// Pass a single value as `[v]` or `Some(v)`, or a whole set.
    pub fn write<I>(&mut self, namespace: &Namespace, key: K, values: I)
    where
        I: IntoIterator<Item = V>,
    {
        self.local
            .entry(namespace.clone())
            .or_default()
            .entry(key)
            .or_default()
            .extend(values);
    }

    pub fn insert(&mut self, namespace: &Namespace, key: K, value: V) {
        self.write(namespace, key, [value]);
    }

    /// Removes `key` from the namespace's local tier and from the global tier.
    ///
    /// The only operation that deletes published facts; used when a kind is redefined.
    pub fn forget(&mut self, namespace: &Namespace, key: &K) {
        if let Some(tier) = self.local.get_mut(namespace) {
            tier.remove(key);
        }
        self.global.remove(key);
    }

    /// Drops empty buckets and stale capacity from the namespace's local tier.
    pub fn compact(&mut self, namespace: &Namespace) {
        let Some(tier) = self.local.get_mut(namespace) else {
            return;
        };
        tier.retain(|_, set| !set.is_empty());
        if tier.is_empty() {
            self.local.remove(namespace);
        } else {
            tier.shrink_to_fit();
        }
    }

    /// Unions every local set of `namespace` into the global tier and clears the local tier.
    ///
    /// # Returns
    /// The number of values that were not already present globally.
    pub fn merge_to_global(&mut self, namespace: &Namespace) -> usize {
        self.compact(namespace);
        let Some(tier) = self.local.remove(namespace) else {
            return 0;
        };
        let mut promoted = 0;
        for (key, set) in tier {
            let global = self.global.entry(key).or_default();
            for value in set {
                if global.insert(value) {
                    promoted += 1;
                }
            }
        }
        tracing::trace!(map = self.name, %namespace, promoted, "merged local tier");
        promoted
    }

    /// Whether `namespace` holds any unmerged facts in this map.
    pub fn has_pending(&self, namespace: &Namespace) -> bool {
        self.local
            .get(namespace)
            .is_some_and(|tier| tier.values().any(|set| !set.is_empty()))
    }

    pub fn local(&self, namespace: &Namespace) -> Option<&Tier<K, V>> {
        self.local.get(namespace)
    }

    pub fn global(&self) -> &Tier<K, V> {
        &self.global
    }
}

/// Tiered table of capability kind definitions.
#[derive(Debug, Clone, Default)]
pub struct DefinitionTable {
    local: HashMap<Namespace, HashMap<KindId, CapabilityKind>>,
    global: HashMap<KindId, CapabilityKind>,
}

impl DefinitionTable {
    pub fn lookup(&self, namespace: &Namespace, id: &KindId) -> Option<&CapabilityKind> {
        self.local
            .get(namespace)
            .and_then(|defs| defs.get(id))
            .or_else(|| self.global.get(id))
    }

    pub fn insert(&mut self, namespace: &Namespace, kind: CapabilityKind) {
        self.local.entry(namespace.clone()).or_default().insert(kind.id.clone(), kind);
    }

    /// Every kind id reachable from `namespace`.
    pub fn reachable(&self, namespace: &Namespace) -> BTreeSet<KindId> {
        let mut ids: BTreeSet<KindId> = self.global.keys().cloned().collect();
        if let Some(defs) = self.local.get(namespace) {
            ids.extend(defs.keys().cloned());
        }
        ids
    }

    pub fn compact(&mut self, namespace: &Namespace) {
        if self.local.get(namespace).is_some_and(HashMap::is_empty) {
            self.local.remove(namespace);
        } else if let Some(defs) = self.local.get_mut(namespace) {
            defs.shrink_to_fit();
        }
    }

    /// Moves the namespace's local definitions into the global tier.
    /// A later definition replaces an earlier global one of the same id.
    pub fn merge_to_global(&mut self, namespace: &Namespace) -> usize {
        let Some(defs) = self.local.remove(namespace) else {
            return 0;
        };
        let promoted = defs.len();
        self.global.extend(defs);
        promoted
    }

    pub fn has_pending(&self, namespace: &Namespace) -> bool {
        self.local.get(namespace).is_some_and(|defs| !defs.is_empty())
    }

    pub fn global(&self) -> &HashMap<KindId, CapabilityKind> {
        &self.global
    }
}
