#![cfg(test)]

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use crate::config::{self, RegistryConfig};
use crate::error::RegistryError;
use crate::primitives::{ParamType, Prefixes, Signature};
use crate::registry::core::{Registry, RegistrySnapshot};
use crate::registry::definition::KindDecl;
use crate::types::{CapabilityValue, KindId, Namespace, TypeName};

// --- Test Utilities ---

fn ns(name: &str) -> Namespace {
    Namespace::from(name)
}

fn kind(name: &str) -> KindId {
    KindId::from(name)
}

fn ty(name: &str) -> TypeName {
    TypeName::from(name)
}

fn unit_sig(name: &str) -> Signature {
    Signature::new(name, vec![ParamType::Implementor], ParamType::Named("()".into()))
}

fn animals(namespace: &Namespace) -> Registry {
    let mut reg = Registry::new();
    reg.define(namespace, KindDecl::primitive("Swim")).unwrap();
    reg.define(namespace, KindDecl::primitive("Fly")).unwrap();
    reg.define(namespace, KindDecl::composite("Amphibious", ["Swim", "Fly"])).unwrap();
    reg
}

// --- Test Cases ---

#[test]
fn test_registry_new_is_empty() {
    let reg = Registry::new();
    assert!(reg.kinds(&ns("zoo")).is_empty());
    assert!(reg.assignments().global().is_empty());
    assert!(reg.contracts().global().is_empty());
    assert!(reg.composites().global().is_empty());
    assert_eq!(reg.value_of(&kind("Fly"), &ty("Frog")), CapabilityValue::Unasserted);
}

#[test]
fn test_fresh_registries_do_not_leak() {
    let a = animals(&ns("zoo"));
    let b = Registry::new();
    assert!(a.is_capability_kind(&kind("Swim")));
    assert!(!b.is_capability_kind(&kind("Swim")));
    assert_ne!(a.instance(), b.instance());
}

#[test]
fn test_frog_scenario() {
    let zoo = ns("zoo");
    let mut reg = animals(&zoo);
    let frog = ty("Frog");

    reg.assign(&zoo, &frog, &[kind("Swim")]).unwrap();
    assert_eq!(reg.value_of(&kind("Swim"), &frog), CapabilityValue::Asserted);
    assert_eq!(reg.value_of(&kind("Fly"), &frog), CapabilityValue::Unasserted);
    assert_eq!(reg.value_of(&kind("Amphibious"), &frog), CapabilityValue::Unasserted);

    reg.assign(&zoo, &frog, &[kind("Fly")]).unwrap();
    assert_eq!(reg.value_of(&kind("Amphibious"), &frog), CapabilityValue::Asserted);
    assert_eq!(reg.label_of(&zoo, &kind("Amphibious"), &frog).as_deref(), Some("CanAmphibious"));
    assert_eq!(reg.label_of(&zoo, &kind("Amphibious"), &ty("Rock")).as_deref(), Some("CannotAmphibious"));
}

#[test]
fn test_nested_composites() {
    let zoo = ns("zoo");
    let mut reg = animals(&zoo);
    reg.define(&zoo, KindDecl::primitive("Breathe")).unwrap();
    reg.define(&zoo, KindDecl::composite("Duckish", ["Amphibious", "Breathe"])).unwrap();

    let duck = ty("Duck");
    reg.assign(&zoo, &duck, &[kind("Swim"), kind("Breathe")]).unwrap();
    assert!(!reg.value_of(&kind("Duckish"), &duck).is_asserted());
    reg.assign(&zoo, &duck, &[kind("Fly")]).unwrap();
    assert!(reg.value_of(&kind("Duckish"), &duck).is_asserted());
}

#[test]
fn test_merge_publishes_to_other_namespaces() {
    let zoo = ns("zoo");
    let farm = ns("farm");
    let mut reg = animals(&zoo);
    let frog = ty("Frog");
    reg.assign(&zoo, &frog, &[kind("Swim")]).unwrap();
    reg.register_contract(&zoo, &kind("Swim"), unit_sig("swim")).unwrap();

    assert!(reg.kind(&farm, &kind("Swim")).is_none());
    assert!(reg.capabilities_of(&farm, &frog).is_empty());
    assert!(reg.has_pending(&zoo));

    let summary = reg.merge_to_global(&zoo);
    assert_eq!(summary.definitions, 3);
    assert_eq!(summary.assignments, 1);
    assert_eq!(summary.contracts, 1);
    assert_eq!(summary.composites, 2);
    assert!(!reg.has_pending(&zoo));

    assert!(reg.kind(&farm, &kind("Swim")).is_some());
    assert_eq!(reg.capabilities_of(&farm, &frog), BTreeSet::from([kind("Swim")]));
    assert!(reg.contracts().contains(&farm, &kind("Swim"), &unit_sig("swim")));
    // The merged namespace still sees its own facts through the global tier.
    assert_eq!(reg.capabilities_of(&zoo, &frog), BTreeSet::from([kind("Swim")]));
}

#[test]
fn test_merge_twice_is_noop() {
    let zoo = ns("zoo");
    let mut reg = animals(&zoo);
    reg.assign(&zoo, &ty("Frog"), &[kind("Swim")]).unwrap();

    reg.merge_to_global(&zoo);
    let first = reg.snapshot();
    let summary = reg.merge_to_global(&zoo);
    assert_eq!(summary.total(), 0);
    assert_eq!(reg.snapshot(), first);
}

#[test]
fn test_merge_never_written_namespace() {
    let mut reg = Registry::new();
    let summary = reg.merge_to_global(&ns("ghost"));
    assert_eq!(summary, Default::default());
}

#[test]
fn test_local_assignments_shadow_global() {
    let zoo = ns("zoo");
    let mut reg = animals(&zoo);
    let frog = ty("Frog");
    reg.assign(&zoo, &frog, &[kind("Swim")]).unwrap();
    reg.merge_to_global(&zoo);
    reg.assign(&zoo, &frog, &[kind("Fly")]).unwrap();

    // The local bucket for Frog wins over the global one until the next merge.
    assert_eq!(reg.capabilities_of(&zoo, &frog), BTreeSet::from([kind("Fly")]));
    reg.merge_to_global(&zoo);
    assert_eq!(reg.capabilities_of(&zoo, &frog), BTreeSet::from([kind("Fly"), kind("Swim")]));
    // Values were never scoped: both were Asserted all along.
    assert!(reg.value_of(&kind("Amphibious"), &frog).is_asserted());
}

#[test]
fn test_define_in_other_namespace_after_merge_is_duplicate() {
    let zoo = ns("zoo");
    let mut reg = animals(&zoo);
    reg.merge_to_global(&zoo);
    let err = reg.define(&ns("farm"), KindDecl::primitive("Swim")).unwrap_err();
    assert_eq!(err, RegistryError::DuplicateDefinition(kind("Swim")));
}

#[test]
fn test_prefixes_are_per_namespace() {
    let zoo = ns("zoo");
    let mut reg = Registry::with_config(RegistryConfig {
        default_prefixes: Prefixes::new("Is", "IsNot").unwrap(),
        ..Default::default()
    });
    let hairy = reg.define(&zoo, KindDecl::primitive("Hairy")).unwrap();
    assert_eq!(hairy.label(CapabilityValue::Asserted), "IsHairy");
    assert_eq!(reg.get_prefix(&ns("farm"), &kind("Hairy")).positive, "Is");
}

#[test]
fn test_snapshot_json() {
    let zoo = ns("zoo");
    let mut reg = animals(&zoo);
    reg.assign(&zoo, &ty("Frog"), &[kind("Swim")]).unwrap();
    assert!(reg.snapshot().definitions.is_empty());

    reg.merge_to_global(&zoo);
    let snapshot = reg.snapshot();
    assert_eq!(snapshot.instance, reg.instance());
    assert_eq!(snapshot.definitions.len(), 3);

    let json = snapshot.to_json().unwrap();
    assert!(json.contains("\"Amphibious\""));
    let back: RegistrySnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snapshot);
}

#[test]
fn test_verbose_does_not_change_semantics() {
    let zoo = ns("zoo");
    config::set_verbose(true);
    let mut reg = animals(&zoo);
    reg.assign(&zoo, &ty("Frog"), &[kind("Swim"), kind("Fly")]).unwrap();
    let summary = reg.merge_to_global(&zoo);
    config::set_verbose(false);

    assert!(reg.value_of(&kind("Amphibious"), &ty("Frog")).is_asserted());
    assert_eq!(summary.assignments, 2);
}

#[test]
fn test_registry_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Registry>();
}

#[test]
fn test_shared_registry_serialises_merges() {
    let reg = Arc::new(Mutex::new(Registry::new()));
    {
        let mut guard = reg.lock().unwrap();
        let base = ns("base");
        guard.define(&base, KindDecl::primitive("Swim")).unwrap();
        guard.merge_to_global(&base);
    }

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let reg = Arc::clone(&reg);
            std::thread::spawn(move || {
                let namespace = ns(&format!("worker{}", i));
                let mut guard = reg.lock().unwrap();
                guard.assign(&namespace, &ty(&format!("Fish{}", i)), &[kind("Swim")]).unwrap();
                guard.merge_to_global(&namespace);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let guard = reg.lock().unwrap();
    assert_eq!(guard.assignments().global().len(), 4);
    for i in 0..4 {
        assert!(guard.value_of(&kind("Swim"), &ty(&format!("Fish{}", i))).is_asserted());
    }
}
