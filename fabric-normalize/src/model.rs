use std::collections::BTreeMap;

use fabric_tree::Node;
use serde::Serialize;

use crate::error::Notice;
use crate::fabric_type::FabricType;

/// Switches of the topology grouped as role → name → management address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SwitchIndex {
    by_role: BTreeMap<String, BTreeMap<String, Option<String>>>,
}

impl SwitchIndex {
    pub fn insert(&mut self, role: &str, name: &str, management: Option<String>) {
        self.by_role
            .entry(role.to_string())
            .or_default()
            .insert(name.to_string(), management);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_role.values().any(|names| names.contains_key(name))
    }

    pub fn role_of(&self, name: &str) -> Option<&str> {
        self.by_role
            .iter()
            .find(|(_, names)| names.contains_key(name))
            .map(|(role, _)| role.as_str())
    }

    pub fn management_address(&self, name: &str) -> Option<&str> {
        self.by_role
            .values()
            .find_map(|names| names.get(name))
            .and_then(|addr| addr.as_deref())
    }

    /// Names of every switch holding `role`, sorted.
    pub fn names_with_role(&self, role: &str) -> Vec<&str> {
        self.by_role
            .get(role)
            .map(|names| names.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_role.is_empty()
    }
}

/// The fully normalized configuration produced by a successful run.
///
/// Only a completed pipeline run can build one, so rule evaluation never sees
/// a partially transformed tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalModel {
    pub fabric_type: FabricType,
    pub fabric_name: String,
    pub switch_index: SwitchIndex,
    pub tree: Node,
}

impl CanonicalModel {
    pub(crate) fn new(
        fabric_type: FabricType,
        fabric_name: String,
        switch_index: SwitchIndex,
        tree: Node,
    ) -> Self {
        Self {
            fabric_type,
            fabric_name,
            switch_index,
            tree,
        }
    }

    /// Return the node under the `vxlan` root for a chain of keys.
    pub fn get(&self, keys: &[&str]) -> Option<&Node> {
        self.tree.get(crate::fabric_type::ROOT_KEY)?.get_in(keys)
    }

    /// Iterate list items under the `vxlan` root; missing lists are empty.
    pub fn list<'a>(&'a self, keys: &[&str]) -> impl Iterator<Item = &'a Node> + 'a {
        self.get(keys)
            .and_then(Node::as_list)
            .unwrap_or_default()
            .iter()
    }
}

/// A successful run: the canonical model plus every notice raised on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizeOutcome {
    pub model: CanonicalModel,
    pub notices: Vec<Notice>,
}
