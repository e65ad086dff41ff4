//! Parent/child structure of models.
//!
//! Every structural change fires `restructured` on the model that changed and
//! then on each of its ancestors, so a container bound to any root hears about
//! changes anywhere below it.

use std::sync::{Arc, Weak};

use horizon_qtypes_core::logging::targets;
use horizon_qtypes_core::{ModelError, Result};

use super::index::clamp_insert_index;
use super::node::Model;

impl Model {
    /// The parent model, if this model has been inserted into a tree.
    pub fn parent(&self) -> Option<Model> {
        self.node.parent.read().upgrade().map(|node| Model { node })
    }

    /// A snapshot of the direct children, in order.
    pub fn children(&self) -> Vec<Model> {
        self.node.children.read().clone()
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.node.children.read().len()
    }

    /// Look up a direct child by name.
    pub fn child(&self, name: &str) -> Option<Model> {
        self.node
            .children
            .read()
            .iter()
            .find(|child| child.name() == name)
            .cloned()
    }

    /// Append a child at the end.
    pub fn append_child(&self, child: impl Into<Model>) -> Result<usize> {
        self.insert_child(isize::MAX, child)
    }

    /// Insert a child, clamping `index` into range.
    ///
    /// Negative indices count from the end. Returns the resolved position.
    pub fn insert_child(&self, index: isize, child: impl Into<Model>) -> Result<usize> {
        let child = child.into();
        if child.parent().is_some() {
            return Err(ModelError::AlreadyParented(child.name().to_string()));
        }
        if self.is_descendant_of(&child) {
            return Err(ModelError::CyclicTree(child.name().to_string()));
        }

        let position = {
            let mut children = self.node.children.write();
            if children.iter().any(|existing| existing.name() == child.name()) {
                return Err(ModelError::DuplicateName(child.name().to_string()));
            }
            let position = clamp_insert_index(index, children.len());
            children.insert(position, child.clone());
            position
        };
        *child.node.parent.write() = Arc::downgrade(&self.node);

        tracing::debug!(
            target: targets::MODEL,
            parent = self.name(),
            child = child.name(),
            position,
            "child inserted"
        );
        self.emit_restructured();
        Ok(position)
    }

    /// Detach and return the child with the given name.
    pub fn remove_child(&self, name: &str) -> Option<Model> {
        let removed = {
            let mut children = self.node.children.write();
            let position = children.iter().position(|child| child.name() == name)?;
            children.remove(position)
        };
        *removed.node.parent.write() = Weak::new();

        tracing::debug!(target: targets::MODEL, parent = self.name(), child = name, "child removed");
        self.emit_restructured();
        Some(removed)
    }

    /// Detach all children.
    pub fn clear_children(&self) {
        let removed = std::mem::take(&mut *self.node.children.write());
        if removed.is_empty() {
            return;
        }
        for child in &removed {
            *child.node.parent.write() = Weak::new();
        }
        self.emit_restructured();
    }

    /// This model and all of its descendants in depth-first pre-order.
    pub fn walk(&self) -> Vec<Model> {
        let mut out = Vec::new();
        self.walk_into(&mut out);
        out
    }

    fn walk_into(&self, out: &mut Vec<Model>) {
        out.push(self.clone());
        for child in self.children() {
            child.walk_into(out);
        }
    }

    /// Number of models in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(Model::node_count)
            .sum::<usize>()
    }

    fn is_descendant_of(&self, other: &Model) -> bool {
        let mut current = Some(self.clone());
        while let Some(model) = current {
            if model.ptr_eq(other) {
                return true;
            }
            current = model.parent();
        }
        false
    }

    fn emit_restructured(&self) {
        let mut current = Some(self.clone());
        while let Some(model) = current {
            model.restructured().emit(());
            current = model.parent();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bool, Null, Number};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_restructured(model: &Model) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        model.restructured().connect(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    #[test]
    fn test_append_and_lookup() {
        let root = Null::new("root");
        root.append_child(Number::new("delay", 0.0)).unwrap();
        root.append_child(Bool::new("shutter", true)).unwrap();

        assert_eq!(root.child_count(), 2);
        let delay = root.child("delay").unwrap();
        assert_eq!(delay.parent().unwrap().name(), "root");
        assert!(root.child("missing").is_none());
        assert_eq!(root.node_count(), 3);
    }

    #[test]
    fn test_insert_clamps() {
        let root = Null::new("root");
        assert_eq!(root.insert_child(-1, Null::new("a")).unwrap(), 0);
        assert_eq!(root.insert_child(100, Null::new("b")).unwrap(), 1);
        assert_eq!(root.insert_child(-1, Null::new("c")).unwrap(), 1);
        assert_eq!(root.insert_child(-100, Null::new("d")).unwrap(), 0);

        let names: Vec<_> = root.children().iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, ["d", "a", "c", "b"]);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let root = Null::new("root");
        root.append_child(Null::new("a")).unwrap();
        let err = root.append_child(Null::new("a")).unwrap_err();
        assert_eq!(err, ModelError::DuplicateName("a".to_string()));
        assert_eq!(root.child_count(), 1);
    }

    #[test]
    fn test_single_parent() {
        let first = Null::new("first");
        let second = Null::new("second");
        let child = Null::new("child");
        first.append_child(&child).unwrap();

        let err = second.append_child(&child).unwrap_err();
        assert_eq!(err, ModelError::AlreadyParented("child".to_string()));

        first.remove_child("child").unwrap();
        assert!(child.parent().is_none());
        second.append_child(&child).unwrap();
    }

    #[test]
    fn test_cycles_rejected() {
        let root = Null::new("root");
        let child = Null::new("child");
        root.append_child(&child).unwrap();

        assert_eq!(
            child.append_child(root.model().clone()).unwrap_err(),
            ModelError::CyclicTree("root".to_string())
        );
        assert_eq!(
            root.model().clone().append_child(root.model().clone()).unwrap_err(),
            ModelError::CyclicTree("root".to_string())
        );
    }

    #[test]
    fn test_restructured_bubbles_to_ancestors() {
        let root = Null::new("root");
        let group = Null::new("group");
        root.append_child(&group).unwrap();

        let root_count = counting_restructured(&root);
        let group_count = counting_restructured(&group);

        group.append_child(Number::new("delay", 0.0)).unwrap();
        assert_eq!(group_count.load(Ordering::SeqCst), 1);
        assert_eq!(root_count.load(Ordering::SeqCst), 1);

        root.remove_child("group").unwrap();
        assert_eq!(root_count.load(Ordering::SeqCst), 2);
        assert_eq!(group_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_walk_is_preorder() {
        let root = Null::new("root");
        let group = Null::new("group");
        group.append_child(Null::new("inner")).unwrap();
        root.append_child(&group).unwrap();
        root.append_child(Null::new("last")).unwrap();

        let names: Vec<_> = root.walk().iter().map(|m| m.name().to_string()).collect();
        assert_eq!(names, ["root", "group", "inner", "last"]);
    }

    #[test]
    fn test_clear_children() {
        let root = Null::new("root");
        let child = Null::new("child");
        root.append_child(&child).unwrap();
        let count = counting_restructured(&root);

        root.clear_children();
        root.clear_children();

        assert_eq!(root.child_count(), 0);
        assert!(child.parent().is_none());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
