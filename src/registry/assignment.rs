//! Assigning capabilities to types.

use crate::config::generated;
use crate::error::RegistryError;
use crate::primitives::AssignmentRecord;
use crate::registry::core::Registry;
use crate::types::{KindId, Namespace, TypeName};

impl Registry {
    /// Records that `ty` has every capability in `kinds`, in order.
    ///
    /// After a successful assignment `value_of(kind, ty)` is Asserted; no other type is
    /// affected. Assignment is not atomic: when kind *i* fails, kinds before it stay
    /// assigned. Use [`Registry::validate_assignment`] first when all-or-nothing matters.
    ///
    /// # Errors
    /// * `UnknownCapability` - a kind is not reachable from `namespace`.
    /// * `CompositeAssignment` - a kind is composite.
    pub fn assign(
        &mut self,
        namespace: &Namespace,
        ty: &TypeName,
        kinds: &[KindId],
    ) -> Result<Vec<AssignmentRecord>, RegistryError> {
        let mut written = Vec::with_capacity(kinds.len());
        for kind in kinds {
            self.check_assignable(namespace, kind)?;

            self.assignments.insert(namespace, ty.clone(), kind.clone());
            self.overrides.entry(kind.clone()).or_default().insert(ty.clone());

            tracing::debug!(registry = %self.instance(), %namespace, %ty, %kind, "assigned capability");
            generated!(%namespace, "assign {} => {}", ty, kind);
            written.push(AssignmentRecord { ty: ty.clone(), kind: kind.clone() });
        }
        Ok(written)
    }

    /// Runs the checks of [`Registry::assign`] for every kind without writing anything.
    pub fn validate_assignment(&self, namespace: &Namespace, kinds: &[KindId]) -> Result<(), RegistryError> {
        kinds.iter().try_for_each(|kind| self.check_assignable(namespace, kind))
    }

    fn check_assignable(&self, namespace: &Namespace, kind: &KindId) -> Result<(), RegistryError> {
        let def = self
            .kind(namespace, kind)
            .ok_or_else(|| RegistryError::UnknownCapability(kind.clone()))?;
        if def.is_composite() {
            return Err(RegistryError::CompositeAssignment(kind.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::definition::KindDecl;
    use crate::types::CapabilityValue;

    fn setup() -> (Registry, Namespace) {
        let ns = Namespace::from("zoo");
        let mut reg = Registry::new();
        reg.define(&ns, KindDecl::primitive("Swim")).unwrap();
        reg.define(&ns, KindDecl::primitive("Fly")).unwrap();
        reg.define(&ns, KindDecl::composite("Amphibious", ["Swim", "Fly"])).unwrap();
        (reg, ns)
    }

    #[test]
    fn test_assign_overrides_only_that_type() {
        let (mut reg, ns) = setup();
        let frog = TypeName::from("Frog");
        let rock = TypeName::from("Rock");
        let swim = KindId::from("Swim");

        let records = reg.assign(&ns, &frog, &[swim.clone()]).unwrap();
        assert_eq!(records, vec![AssignmentRecord { ty: frog.clone(), kind: swim.clone() }]);
        assert_eq!(reg.value_of(&swim, &frog), CapabilityValue::Asserted);
        assert_eq!(reg.value_of(&swim, &rock), CapabilityValue::Unasserted);
        assert_eq!(reg.capabilities_of(&ns, &frog), [swim].into_iter().collect());
    }

    #[test]
    fn test_assign_unknown_kind() {
        let (mut reg, ns) = setup();
        let err = reg.assign(&ns, &TypeName::from("Frog"), &[KindId::from("Climb")]).unwrap_err();
        assert_eq!(err, RegistryError::UnknownCapability(KindId::from("Climb")));
    }

    #[test]
    fn test_assign_composite_rejected_without_record() {
        let (mut reg, ns) = setup();
        let frog = TypeName::from("Frog");
        let amph = KindId::from("Amphibious");
        let err = reg.assign(&ns, &frog, &[amph.clone()]).unwrap_err();
        assert_eq!(err, RegistryError::CompositeAssignment(amph.clone()));
        assert!(reg.capabilities_of(&ns, &frog).is_empty());
        assert_eq!(reg.value_of(&amph, &frog), CapabilityValue::Unasserted);
    }

    #[test]
    fn test_assign_is_not_atomic() {
        let (mut reg, ns) = setup();
        let frog = TypeName::from("Frog");
        let kinds = [KindId::from("Swim"), KindId::from("Amphibious"), KindId::from("Fly")];
        assert!(reg.validate_assignment(&ns, &kinds).is_err());

        let err = reg.assign(&ns, &frog, &kinds).unwrap_err();
        assert!(matches!(err, RegistryError::CompositeAssignment(_)));
        assert!(reg.value_of(&KindId::from("Swim"), &frog).is_asserted());
        assert!(!reg.value_of(&KindId::from("Fly"), &frog).is_asserted());
    }

    #[test]
    fn test_assign_sees_only_reachable_definitions() {
        let (mut reg, zoo) = setup();
        let farm = Namespace::from("farm");
        let duck = TypeName::from("Duck");

        // `Swim` is still local to `zoo`.
        let err = reg.assign(&farm, &duck, &[KindId::from("Swim")]).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownCapability(_)));

        reg.merge_to_global(&zoo);
        reg.assign(&farm, &duck, &[KindId::from("Swim")]).unwrap();
        assert!(reg.value_of(&KindId::from("Swim"), &duck).is_asserted());
    }

    #[test]
    fn test_reassign_is_harmless() {
        let (mut reg, ns) = setup();
        let frog = TypeName::from("Frog");
        let swim = KindId::from("Swim");
        reg.assign(&ns, &frog, &[swim.clone()]).unwrap();
        reg.assign(&ns, &frog, &[swim.clone()]).unwrap();
        assert_eq!(reg.capabilities_of(&ns, &frog).len(), 1);
        assert!(reg.value_of(&swim, &frog).is_asserted());
    }
}
