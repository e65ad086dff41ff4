//! Hierarchical container mirroring a model tree.
//!
//! A [`TreeWidget`] builds one adapter per model, arranged like the models.
//! Whenever the root (or anything below it) is restructured, every adapter is
//! dropped and the whole tree is rebuilt from the current models.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_qtypes::model::{Bool, Null, Number};
//! use horizon_qtypes::widget::{HeadlessFactory, TreeWidget, TreeWidgetConfig};
//!
//! let root = Null::new("stage");
//! root.append_child(Number::new("position", 1.0))?;
//!
//! let tree = TreeWidget::new(
//!     &root,
//!     TreeWidgetConfig::new().with_include_root(false),
//!     Arc::new(HeadlessFactory::new()),
//! );
//! assert_eq!(tree.widget_count(), 1);
//!
//! root.append_child(Bool::new("homed", false))?;
//! assert_eq!(tree.widget_count(), 2);
//! # Ok::<(), horizon_qtypes::ModelError>(())
//! ```

use std::sync::{Arc, Weak};

use horizon_qtypes_core::logging::{span_names, targets};
use horizon_qtypes_core::{ConnectionId, PerfSpan};
use parking_lot::RwLock;

use super::adapters::{build_widget, ModelWidget};
use super::controls::{ControlFactory, ControlHandle};
use crate::model::{clamp_insert_index, resolve_index, Model};

/// Configuration for [`TreeWidget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeWidgetConfig {
    /// Show the root model as the single top-level entry. When false, the
    /// root's children are the top-level entries.
    pub include_root: bool,
}

impl Default for TreeWidgetConfig {
    fn default() -> Self {
        Self { include_root: true }
    }
}

impl TreeWidgetConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `include_root` using builder pattern.
    pub fn with_include_root(mut self, include_root: bool) -> Self {
        self.include_root = include_root;
        self
    }
}

/// One entry of a [`TreeWidget`]: an adapter and the entries below it.
pub struct TreeItem {
    widget: Box<dyn ModelWidget>,
    children: Vec<TreeItem>,
}

impl TreeItem {
    /// The model's current label.
    pub fn label(&self) -> String {
        self.widget.model().label()
    }

    /// The bound model.
    pub fn model(&self) -> Model {
        self.widget.model()
    }

    /// The bound control.
    pub fn control(&self) -> ControlHandle {
        self.widget.control()
    }

    /// Child entries.
    pub fn children(&self) -> &[TreeItem] {
        &self.children
    }

    fn widget_count(&self) -> usize {
        1 + self.children.iter().map(TreeItem::widget_count).sum::<usize>()
    }

    fn find(&self, name: &str) -> Option<&TreeItem> {
        if self.widget.model().name() == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }
}

impl std::fmt::Debug for TreeItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeItem")
            .field("label", &self.label())
            .field("children", &self.children)
            .finish()
    }
}

/// A top-level entry added with [`TreeWidget::append`] or [`TreeWidget::insert`].
struct External {
    position: usize,
    model: Model,
    connection: ConnectionId,
}

#[derive(Default)]
struct TreeState {
    items: Vec<TreeItem>,
    external: Vec<External>,
}

struct TreeInner {
    root: Model,
    config: TreeWidgetConfig,
    factory: Arc<dyn ControlFactory>,
    root_connection: ConnectionId,
    state: RwLock<TreeState>,
}

impl TreeInner {
    fn top_models(&self, external: &[External]) -> Vec<Model> {
        let mut tops = if self.config.include_root {
            vec![self.root.clone()]
        } else {
            self.root.children()
        };
        for entry in external {
            let position = entry.position.min(tops.len());
            tops.insert(position, entry.model.clone());
        }
        tops
    }

    /// Position of the first top-level entry sharing a model with `model`'s subtree.
    fn overlapping_top(&self, model: &Model) -> Option<usize> {
        let incoming = model.walk();
        let tops = self.top_models(&self.state.read().external);
        tops.iter().position(|top| {
            top.walk()
                .iter()
                .any(|shown| incoming.iter().any(|m| m.ptr_eq(shown)))
        })
    }

    fn build_item(&self, model: &Model) -> TreeItem {
        TreeItem {
            widget: build_widget(model, self.factory.as_ref()),
            children: model
                .children()
                .iter()
                .map(|child| self.build_item(child))
                .collect(),
        }
    }

    fn rebuild(&self) {
        let _span = PerfSpan::new(span_names::REBUILD);
        let mut state = self.state.write();
        // Old adapters disconnect as they drop.
        state.items.clear();
        let tops = self.top_models(&state.external);
        state.items = tops.iter().map(|model| self.build_item(model)).collect();
        tracing::debug!(
            target: targets::CONTAINER,
            root = self.root.name(),
            top_level = state.items.len(),
            widgets = state.items.iter().map(TreeItem::widget_count).sum::<usize>(),
            "tree rebuilt"
        );
    }
}

impl Drop for TreeInner {
    fn drop(&mut self) {
        self.root.restructured().disconnect(self.root_connection);
        for entry in self.state.get_mut().external.drain(..) {
            entry.model.restructured().disconnect(entry.connection);
        }
    }
}

fn connect_rebuild(model: &Model, inner: Weak<TreeInner>) -> ConnectionId {
    model.restructured().connect(move |_| {
        if let Some(inner) = inner.upgrade() {
            inner.rebuild();
        }
    })
}

/// A tree of adapters mirroring a model tree.
pub struct TreeWidget {
    inner: Arc<TreeInner>,
}

impl TreeWidget {
    /// Build a tree for `root` and keep it in step with restructuring.
    pub fn new(
        root: impl Into<Model>,
        config: TreeWidgetConfig,
        factory: Arc<dyn ControlFactory>,
    ) -> Self {
        let root = root.into();
        let inner = Arc::new_cyclic(|weak: &Weak<TreeInner>| TreeInner {
            root_connection: connect_rebuild(&root, weak.clone()),
            root,
            config,
            factory,
            state: RwLock::new(TreeState::default()),
        });
        inner.rebuild();
        Self { inner }
    }

    /// The root model.
    pub fn root(&self) -> &Model {
        &self.inner.root
    }

    /// The configuration.
    pub fn config(&self) -> TreeWidgetConfig {
        self.inner.config
    }

    /// Tear down and rebuild every entry.
    pub fn rebuild(&self) {
        self.inner.rebuild();
    }

    /// Add an extra top-level entry (with its subtree) at the end.
    pub fn append(&self, model: impl Into<Model>) -> usize {
        self.insert(isize::MAX, model)
    }

    /// Add an extra top-level entry at `index`, clamped into range.
    ///
    /// Negative indices count from the end. Returns the resolved position.
    /// The entry survives rebuilds at the same position.
    ///
    /// A model whose subtree overlaps what the tree already shows is skipped,
    /// and the position of the top-level entry it overlaps is returned.
    pub fn insert(&self, index: isize, model: impl Into<Model>) -> usize {
        let model = model.into();
        if let Some(existing) = self.inner.overlapping_top(&model) {
            tracing::debug!(
                target: targets::CONTAINER,
                model = model.name(),
                position = existing,
                "model already shown, not inserted"
            );
            return existing;
        }
        let position = clamp_insert_index(index, self.len());
        let connection = connect_rebuild(&model, Arc::downgrade(&self.inner));
        self.inner.state.write().external.push(External {
            position,
            model,
            connection,
        });
        self.inner.rebuild();
        position
    }

    /// The top-level model at `index`. Negative indices count from the end.
    pub fn get(&self, index: isize) -> Option<Model> {
        let state = self.inner.state.read();
        let position = resolve_index(index, state.items.len()).ok()?;
        Some(state.items[position].model())
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.inner.state.read().items.len()
    }

    /// Whether there are no top-level entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of the top-level models.
    pub fn keys(&self) -> Vec<String> {
        self.values().iter().map(|m| m.name().to_string()).collect()
    }

    /// The top-level models.
    pub fn values(&self) -> Vec<Model> {
        self.inner.state.read().items.iter().map(TreeItem::model).collect()
    }

    /// Iterate over the top-level models.
    pub fn iter(&self) -> std::vec::IntoIter<Model> {
        self.values().into_iter()
    }

    /// Total number of adapters in the tree.
    pub fn widget_count(&self) -> usize {
        self.inner
            .state
            .read()
            .items
            .iter()
            .map(TreeItem::widget_count)
            .sum()
    }

    /// The control bound to the first model named `name`, depth-first.
    pub fn find(&self, name: &str) -> Option<ControlHandle> {
        let state = self.inner.state.read();
        state
            .items
            .iter()
            .find_map(|item| item.find(name))
            .map(TreeItem::control)
    }

    /// Run `f` with the top-level entries.
    ///
    /// `f` must not modify the model tree: the entries are locked meanwhile.
    pub fn with_items<R>(&self, f: impl FnOnce(&[TreeItem]) -> R) -> R {
        f(&self.inner.state.read().items)
    }

    /// Drop every entry, including extra ones. The next restructuring of the
    /// root rebuilds the tree.
    pub fn clear(&self) {
        let mut state = self.inner.state.write();
        state.items.clear();
        for entry in state.external.drain(..) {
            entry.model.restructured().disconnect(entry.connection);
        }
    }
}

impl IntoIterator for &TreeWidget {
    type Item = Model;
    type IntoIter = std::vec::IntoIter<Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for TreeWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeWidget")
            .field("root", &self.inner.root.name())
            .field("config", &self.inner.config)
            .field("len", &self.len())
            .finish()
    }
}
