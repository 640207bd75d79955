//! Interface contracts and the seam to the contract checker.
//!
//! The registry only records which signatures a capability requires and which
//! capabilities a type holds. Deciding whether a type really provides a callable is
//! the job of a [`ContractChecker`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::config::generated;
use crate::error::RegistryError;
use crate::primitives::{InterfaceContract, Signature};
use crate::registry::core::Registry;
use crate::types::{KindId, Namespace, TypeName};

/// Signatures a type must provide, grouped by the asserted capability that requires them.
pub type RequiredContracts = BTreeMap<KindId, BTreeSet<Signature>>;

/// Outcome of checking one type against its required contracts.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContractReport {
    pub ty: TypeName,
    pub satisfied: Vec<InterfaceContract>,
    pub missing: Vec<InterfaceContract>,
}

impl ContractReport {
    /// An empty report for `ty`.
    pub fn new(ty: &TypeName) -> Self {
        ContractReport { ty: ty.clone(), satisfied: Vec::new(), missing: Vec::new() }
    }

    pub fn is_satisfied(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Matches a type's callables against required signatures.
pub trait ContractChecker {
    fn check(&self, ty: &TypeName, required: &RequiredContracts) -> ContractReport;
}

/// Checker over explicitly declared callables, compared by structural equality.
///
/// A signature required by several kinds (a composite inherits its constituents'
/// contracts) is reported once, under the first kind in `required` order.
#[derive(Debug, Clone, Default)]
pub struct DeclaredCallables {
    callables: HashMap<TypeName, BTreeSet<Signature>>,
}

impl DeclaredCallables {
    pub fn declare(&mut self, ty: TypeName, signature: Signature) -> &mut Self {
        self.callables.entry(ty).or_default().insert(signature);
        self
    }
}

impl ContractChecker for DeclaredCallables {
    fn check(&self, ty: &TypeName, required: &RequiredContracts) -> ContractReport {
        let declared = self.callables.get(ty);
        let mut report = ContractReport::new(ty);
        let mut seen: BTreeSet<&Signature> = BTreeSet::new();
        for (kind, signatures) in required {
            for signature in signatures {
                if !seen.insert(signature) {
                    continue;
                }
                let contract = InterfaceContract { kind: kind.clone(), signature: signature.clone() };
                if declared.is_some_and(|d| d.contains(signature)) {
                    report.satisfied.push(contract);
                } else {
                    report.missing.push(contract);
                }
            }
        }
        report
    }
}

impl Registry {
    /// Records that every type asserting `kind` must provide `signature`.
    ///
    /// # Errors
    /// * `UnknownCapability` - `kind` is not reachable from `namespace`.
    pub fn register_contract(
        &mut self,
        namespace: &Namespace,
        kind: &KindId,
        signature: Signature,
    ) -> Result<InterfaceContract, RegistryError> {
        if self.kind(namespace, kind).is_none() {
            return Err(RegistryError::UnknownCapability(kind.clone()));
        }
        tracing::debug!(registry = %self.instance(), %namespace, %kind, %signature, "registered contract");
        generated!(%namespace, "contract {} requires {}", kind, signature);
        self.contracts.insert(namespace, kind.clone(), signature.clone());
        Ok(InterfaceContract { kind: kind.clone(), signature })
    }

    /// Every signature `ty` must provide: the contracts of each reachable kind that is
    /// Asserted for `ty`. Local and merged contracts are both included.
    pub fn required_contracts(&self, namespace: &Namespace, ty: &TypeName) -> RequiredContracts {
        self.kinds(namespace)
            .into_iter()
            .filter(|kind| self.value_of(kind, ty).is_asserted())
            .filter_map(|kind| {
                let signatures = self.contracts.read_all(namespace, &kind);
                (!signatures.is_empty()).then_some((kind, signatures))
            })
            .collect()
    }

    /// Hands `ty`'s complete set of required contracts to `checker`.
    pub fn check<C: ContractChecker + ?Sized>(
        &self,
        namespace: &Namespace,
        ty: &TypeName,
        checker: &C,
    ) -> ContractReport {
        let required = self.required_contracts(namespace, ty);
        let report = checker.check(ty, &required);
        tracing::debug!(
            registry = %self.instance(),
            %namespace,
            %ty,
            satisfied = report.satisfied.len(),
            missing = report.missing.len(),
            "checked contracts"
        );
        report
    }
}
