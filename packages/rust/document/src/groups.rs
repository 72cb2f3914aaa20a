//! Definitions grouped by kind, ordered by name.

use std::collections::BTreeMap;

use nfdocs_shared::{Definition, DefinitionKind};

/// Kind → name → definition.
///
/// Iteration yields kinds in `Workflow, Process, Function` order and names in
/// ascending, case-sensitive byte order, independent of insertion order.
#[derive(Debug, Clone, Default)]
pub struct DefinitionGroups {
    groups: BTreeMap<DefinitionKind, BTreeMap<String, Definition>>,
}

impl DefinitionGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition. A definition with the same kind and name replaces
    /// the existing one, which is returned.
    pub fn insert(&mut self, definition: Definition) -> Option<Definition> {
        self.groups
            .entry(definition.kind)
            .or_default()
            .insert(definition.name.clone(), definition)
    }

    /// Definitions of one kind, sorted by name.
    pub fn of_kind(&self, kind: DefinitionKind) -> impl Iterator<Item = &Definition> {
        self.groups.get(&kind).into_iter().flat_map(|g| g.values())
    }

    /// Non-empty groups in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (DefinitionKind, Vec<&Definition>)> {
        self.groups
            .iter()
            .filter(|(_, g)| !g.is_empty())
            .map(|(kind, g)| (*kind, g.values().collect()))
    }

    /// Total number of definitions across all kinds.
    pub fn len(&self) -> usize {
        self.groups.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Definition> for DefinitionGroups {
    fn from_iter<I: IntoIterator<Item = Definition>>(iter: I) -> Self {
        let mut groups = Self::new();
        for definition in iter {
            groups.insert(definition);
        }
        groups
    }
}
