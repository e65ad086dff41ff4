//! Flat label/control table for a set of models.
//!
//! Each appended model gets one row. Its descendants follow it as indented
//! rows, and a Number with units gets a units selector next to its entry.
//! Rows without a model are headings.
//!
//! The table is append-only: it has no positional insertion or removal, and
//! those operations return [`ModelError::UnsupportedOperation`].

use std::sync::{Arc, Weak};

use horizon_qtypes_core::logging::{span_names, targets};
use horizon_qtypes_core::{ConnectionId, ModelError, PerfSpan, Result};
use parking_lot::RwLock;

use super::adapters::{build_units_widget, build_widget, ModelWidget, UnitsWidget};
use super::controls::{ControlFactory, ControlHandle};
use crate::model::Model;

/// Configuration for [`InputTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputTableConfig {
    /// Add a units selector to rows bound to a Number with units.
    pub units_column: bool,
    /// Add rows for the descendants of appended models.
    pub flatten_children: bool,
}

impl Default for InputTableConfig {
    fn default() -> Self {
        Self {
            units_column: true,
            flatten_children: true,
        }
    }
}

impl InputTableConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `units_column` using builder pattern.
    pub fn with_units_column(mut self, units_column: bool) -> Self {
        self.units_column = units_column;
        self
    }

    /// Set `flatten_children` using builder pattern.
    pub fn with_flatten_children(mut self, flatten_children: bool) -> Self {
        self.flatten_children = flatten_children;
        self
    }
}

/// One row of an [`InputTable`].
pub struct Row {
    label: String,
    depth: usize,
    widget: Option<Box<dyn ModelWidget>>,
    units: Option<UnitsWidget>,
}

impl Row {
    /// The row's label text.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Nesting depth below the appended model. Headings and appended models
    /// are at depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether this row is a heading with no model.
    pub fn is_heading(&self) -> bool {
        self.widget.is_none()
    }

    /// The bound model.
    pub fn model(&self) -> Option<Model> {
        self.widget.as_ref().map(|w| w.model())
    }

    /// The value control.
    pub fn control(&self) -> Option<ControlHandle> {
        self.widget.as_ref().map(|w| w.control())
    }

    /// The units selector, if the row has one.
    pub fn units_control(&self) -> Option<ControlHandle> {
        self.units.as_ref().map(|u| u.control())
    }
}

impl std::fmt::Debug for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Row")
            .field("label", &self.label)
            .field("depth", &self.depth)
            .field("heading", &self.is_heading())
            .field("units", &self.units.is_some())
            .finish()
    }
}

enum Entry {
    Heading(String),
    Model {
        label: String,
        model: Model,
        connection: ConnectionId,
    },
}

#[derive(Default)]
struct TableState {
    entries: Vec<Entry>,
    rows: Vec<Row>,
}

struct TableInner {
    config: InputTableConfig,
    factory: Arc<dyn ControlFactory>,
    state: RwLock<TableState>,
}

impl TableInner {
    fn model_row(&self, label: String, model: &Model, depth: usize) -> Row {
        let factory = self.factory.as_ref();
        Row {
            label,
            depth,
            widget: Some(build_widget(model, factory)),
            units: if self.config.units_column {
                build_units_widget(model, factory)
            } else {
                None
            },
        }
    }

    fn push_descendants(&self, rows: &mut Vec<Row>, model: &Model, depth: usize) {
        for child in model.children() {
            rows.push(self.model_row(child.label(), &child, depth));
            self.push_descendants(rows, &child, depth + 1);
        }
    }

    fn rebuild(&self) {
        let _span = PerfSpan::new(span_names::REBUILD);
        let mut state = self.state.write();
        state.rows.clear();

        let mut rows = Vec::with_capacity(state.entries.len());
        for entry in &state.entries {
            match entry {
                Entry::Heading(label) => rows.push(Row {
                    label: label.clone(),
                    depth: 0,
                    widget: None,
                    units: None,
                }),
                Entry::Model { label, model, .. } => {
                    rows.push(self.model_row(label.clone(), model, 0));
                    if self.config.flatten_children {
                        self.push_descendants(&mut rows, model, 1);
                    }
                }
            }
        }
        state.rows = rows;
        tracing::debug!(target: targets::CONTAINER, rows = state.rows.len(), "input table rebuilt");
    }
}

impl Drop for TableInner {
    fn drop(&mut self) {
        for entry in self.state.get_mut().entries.drain(..) {
            if let Entry::Model {
                model, connection, ..
            } = entry
            {
                model.restructured().disconnect(connection);
            }
        }
    }
}

/// A flat table of labelled controls.
pub struct InputTable {
    inner: Arc<TableInner>,
}

impl InputTable {
    /// An empty table with the default configuration.
    pub fn new(factory: Arc<dyn ControlFactory>) -> Self {
        Self::with_config(InputTableConfig::default(), factory)
    }

    /// An empty table.
    pub fn with_config(config: InputTableConfig, factory: Arc<dyn ControlFactory>) -> Self {
        Self {
            inner: Arc::new(TableInner {
                config,
                factory,
                state: RwLock::new(TableState::default()),
            }),
        }
    }

    /// The configuration.
    pub fn config(&self) -> InputTableConfig {
        self.inner.config
    }

    /// Append a model row, or a heading when `model` is `None`.
    ///
    /// The label defaults to the model's name. Appended model names must be
    /// unique within the table.
    pub fn append(&self, model: Option<Model>, label: Option<&str>) -> Result<()> {
        let entry = match model {
            None => Entry::Heading(label.unwrap_or_default().to_string()),
            Some(model) => {
                if self.get(model.name()).is_some() {
                    return Err(ModelError::DuplicateName(model.name().to_string()));
                }
                let weak: Weak<TableInner> = Arc::downgrade(&self.inner);
                let connection = model.restructured().connect(move |_| {
                    if let Some(inner) = weak.upgrade() {
                        inner.rebuild();
                    }
                });
                Entry::Model {
                    label: label.map_or_else(|| model.name().to_string(), str::to_string),
                    model,
                    connection,
                }
            }
        };
        self.inner.state.write().entries.push(entry);
        self.inner.rebuild();
        Ok(())
    }

    /// Rebuild every row.
    pub fn rebuild(&self) {
        self.inner.rebuild();
    }

    /// Names of the appended models.
    pub fn keys(&self) -> Vec<String> {
        self.values().iter().map(|m| m.name().to_string()).collect()
    }

    /// The appended models, in order.
    pub fn values(&self) -> Vec<Model> {
        self.inner
            .state
            .read()
            .entries
            .iter()
            .filter_map(|entry| match entry {
                Entry::Model { model, .. } => Some(model.clone()),
                Entry::Heading(_) => None,
            })
            .collect()
    }

    /// The appended model named `name`.
    pub fn get(&self, name: &str) -> Option<Model> {
        self.values().into_iter().find(|m| m.name() == name)
    }

    /// Number of rows, including headings and descendant rows.
    pub fn row_count(&self) -> usize {
        self.inner.state.read().rows.len()
    }

    /// Labels of every row, in order.
    pub fn row_labels(&self) -> Vec<String> {
        self.with_rows(|rows| rows.iter().map(|r| r.label.clone()).collect())
    }

    /// Run `f` with the rows.
    ///
    /// `f` must not modify the models' structure: the rows are locked meanwhile.
    pub fn with_rows<R>(&self, f: impl FnOnce(&[Row]) -> R) -> R {
        f(&self.inner.state.read().rows)
    }

    /// The value control of the first row bound to a model named `name`.
    pub fn control(&self, name: &str) -> Option<ControlHandle> {
        self.with_rows(|rows| {
            rows.iter()
                .find(|row| row.model().is_some_and(|m| m.name() == name))
                .and_then(Row::control)
        })
    }

    /// The units selector of the first row bound to a model named `name`.
    pub fn units_control(&self, name: &str) -> Option<ControlHandle> {
        self.with_rows(|rows| {
            rows.iter()
                .find(|row| row.model().is_some_and(|m| m.name() == name))
                .and_then(Row::units_control)
        })
    }

    /// Not supported: the table is append-only.
    pub fn insert(&self, _index: isize, _model: Model) -> Result<()> {
        Err(ModelError::unsupported("insert", "InputTable"))
    }

    /// Not supported: use [`row_count`](Self::row_count) or [`keys`](Self::keys).
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> Result<usize> {
        Err(ModelError::unsupported("len", "InputTable"))
    }

    /// Not supported: the table is append-only.
    pub fn pop(&self) -> Result<Model> {
        Err(ModelError::unsupported("pop", "InputTable"))
    }

    /// Not supported: the table is append-only.
    pub fn remove(&self, _name: &str) -> Result<Model> {
        Err(ModelError::unsupported("remove", "InputTable"))
    }

    /// Not supported: append models one at a time.
    pub fn extend(&self, _models: Vec<Model>) -> Result<()> {
        Err(ModelError::unsupported("extend", "InputTable"))
    }
}

impl std::fmt::Debug for InputTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputTable")
            .field("config", &self.inner.config)
            .field("keys", &self.keys())
            .field("rows", &self.row_count())
            .finish()
    }
}
