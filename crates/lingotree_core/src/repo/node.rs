//! In-memory content node staged against the backing store.
//!
//! # Responsibility
//! - Hold one tree entity: identity, named properties, named child nodes.
//! - Stage property and child mutations until the owning session saves.
//!
//! # Invariants
//! - `id` is stable and never reused for another node.
//! - Child names are unique under one parent.
//! - Mutations are invisible to the backing store until `ContentSession::save`.

use crate::model::value::PropertyValue;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Stable content node identifier.
pub type NodeId = Uuid;

/// One node of the content tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    name: String,
    properties: BTreeMap<String, PropertyValue>,
    children: BTreeMap<String, Node>,
}

impl Node {
    /// Creates a detached node with a generated identity.
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Creates a node with a caller-provided identity (store load path).
    pub(crate) fn with_id(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            properties: BTreeMap::new(),
            children: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stages `value` under `name`, replacing any previous value.
    pub fn set_property(&mut self, name: impl Into<String>, value: PropertyValue) {
        self.properties.insert(name.into(), value);
    }

    /// Stages removal of the property; returns whether it existed.
    pub fn remove_property(&mut self, name: &str) -> bool {
        self.properties.remove(name).is_some()
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub(crate) fn properties(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the child named `name`, creating it if absent.
    pub fn ensure_child(&mut self, name: &str) -> &mut Node {
        self.children
            .entry(name.to_string())
            .or_insert_with(|| Node::new(name))
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.get_mut(name)
    }

    /// Stages removal of the child subtree; returns whether it existed.
    pub fn remove_child(&mut self, name: &str) -> bool {
        self.children.remove(name).is_some()
    }

    pub fn child_names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    pub(crate) fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.values()
    }

    pub(crate) fn attach_child(&mut self, child: Node) {
        self.children.insert(child.name.clone(), child);
    }
}
