#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(deprecated)]

//!
//! Cando-Core is a registry of named capabilities ("traits") for types.
//!
//! A namespace defines capability kinds, assigns them to types, composes them into
//! composite kinds, and registers the call signatures each kind requires. Facts are
//! staged in the namespace's local tier and become visible to everyone once the
//! namespace calls [`Registry::merge_to_global`].
//!
//! ```
//! use cando_core::{KindDecl, Namespace, Registry, TypeName, KindId};
//!
//! let zoo = Namespace::from("zoo");
//! let mut reg = Registry::new();
//! reg.define(&zoo, KindDecl::primitive("Swim")).unwrap();
//! reg.define(&zoo, KindDecl::primitive("Fly")).unwrap();
//! reg.define(&zoo, KindDecl::composite("Amphibious", ["Swim", "Fly"])).unwrap();
//!
//! let frog = TypeName::from("Frog");
//! reg.assign(&zoo, &frog, &[KindId::from("Swim"), KindId::from("Fly")]).unwrap();
//! assert!(reg.value_of(&KindId::from("Amphibious"), &frog).is_asserted());
//! reg.merge_to_global(&zoo);
//! ```

// Identifier newtypes and the capability value.
pub mod types;

// Kinds, prefixes, signatures and fact records.
pub mod primitives;

pub use primitives::*;
pub use types::*;

// Module for registry error types.
pub mod error;

pub mod config;

pub mod prefix;

// Module for the registry itself: storage tiers, definitions, assignments, contracts.
pub mod registry;

pub use registry::{ContractChecker, ContractReport, KindDecl, Registry};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
