#![no_main]

// Harness: registry_ops
// Strategy: drive arbitrary define/assign/contract/merge sequences over a small
// identifier alphabet and check that value_of stays total and composites stay
// conjunctions of their constituents.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use cando_core::{KindDecl, KindId, Namespace, ParamType, Registry, Signature, TypeName};

#[derive(Arbitrary, Debug, Clone)]
enum Op {
    Define { ns: u8, kind: u8, parts: Vec<u8> },
    Assign { ns: u8, ty: u8, kinds: Vec<u8> },
    Contract { ns: u8, kind: u8, name: u8 },
    Merge { ns: u8 },
}

fn ns(i: u8) -> Namespace {
    Namespace::from(format!("ns{}", i % 3))
}

fn kind(i: u8) -> KindId {
    KindId::from(format!("K{}", i % 8))
}

fn ty(i: u8) -> TypeName {
    TypeName::from(format!("T{}", i % 4))
}

fuzz_target!(|ops: Vec<Op>| {
    let mut reg = Registry::new();
    for op in ops {
        match op {
            Op::Define { ns: n, kind: k, parts } => {
                let decl = KindDecl::composite(kind(k), parts.into_iter().take(4).map(kind));
                let _ = reg.define(&ns(n), decl);
            }
            Op::Assign { ns: n, ty: t, kinds } => {
                let kinds: Vec<KindId> = kinds.into_iter().take(4).map(kind).collect();
                let _ = reg.assign(&ns(n), &ty(t), &kinds);
            }
            Op::Contract { ns: n, kind: k, name } => {
                let sig = Signature::new(format!("f{}", name % 4), vec![ParamType::Implementor], ParamType::Implementor);
                let _ = reg.register_contract(&ns(n), &kind(k), sig);
            }
            Op::Merge { ns: n } => {
                reg.merge_to_global(&ns(n));
            }
        }
    }

    for n in 0..3 {
        for k in reg.kinds(&ns(n)) {
            let Some(def) = reg.kind(&ns(n), &k) else { continue };
            for t in 0..4 {
                let value = reg.value_of(&k, &ty(t)).is_asserted();
                if def.is_composite() {
                    let expected = def.constituents().iter().all(|c| reg.value_of(c, &ty(t)).is_asserted());
                    assert_eq!(value, expected);
                }
            }
        }
    }
});
