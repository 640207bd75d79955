//! Fixtures shared by unit, integration and property tests.

use crate::primitives::{ParamType, Signature};
use crate::registry::{KindDecl, Registry};
use crate::types::{KindId, Namespace};

pub const ZOO: &str = "zoo";

pub fn zoo() -> Namespace {
    Namespace::from(ZOO)
}

/// Registry with `Swim`, `Fly` and the composite `Amphibious = Swim & Fly`, all still
/// local to [`zoo`].
pub fn animal_registry() -> Registry {
    let zoo = zoo();
    let mut reg = Registry::new();
    reg.define(&zoo, KindDecl::primitive("Swim")).expect("define Swim");
    reg.define(&zoo, KindDecl::primitive("Fly")).expect("define Fly");
    reg.define(&zoo, KindDecl::composite("Amphibious", ["Swim", "Fly"]))
        .expect("define Amphibious");
    reg
}

/// Defines `count` primitive kinds `P0..P{count}` in `namespace`.
pub fn define_primitives(reg: &mut Registry, namespace: &Namespace, count: usize) -> Vec<KindId> {
    (0..count)
        .map(|i| {
            reg.define(namespace, KindDecl::primitive(format!("P{}", i)))
                .expect("define primitive")
                .id
        })
        .collect()
}

/// `name(Self) -> ()`
pub fn unit_signature(name: &str) -> Signature {
    Signature::new(name, vec![ParamType::Implementor], ParamType::Named("()".into()))
}
