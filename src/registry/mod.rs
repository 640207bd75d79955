pub mod assignment;
pub mod contract;
pub mod core;
pub mod definition;
pub mod storage;

#[cfg(test)]
mod tests;

// Re-export the primary types so callers can stay at `crate::registry::*`.
pub use contract::{ContractChecker, ContractReport, DeclaredCallables, RequiredContracts};
pub use self::core::{MergeSummary, Registry, RegistrySnapshot};
pub use definition::KindDecl;
pub use storage::{DefinitionTable, FactMap, Tier};
