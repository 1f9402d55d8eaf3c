use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{CategoryScope, EntryKind};

/// Categorises ledger activity for budgeting and reporting.
///
/// Built-in categories are seeded into every ledger and cannot be removed;
/// custom ones may be deleted while nothing references them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub kind: EntryKind,
    pub scope: CategoryScope,
    pub is_custom: bool,
}

impl Category {
    /// Creates a user-defined category.
    pub fn new(name: impl Into<String>, kind: EntryKind, scope: CategoryScope) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            scope,
            is_custom: true,
        }
    }

    pub(crate) fn builtin(name: &str, kind: EntryKind, scope: CategoryScope) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            kind,
            scope,
            is_custom: false,
        }
    }
}
