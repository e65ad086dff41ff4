//! Logging and debugging facilities for Horizon QTypes.
//!
//! This module provides:
//! - Target names for filtering the crate's `tracing` output by subsystem
//! - Debug visualization for model trees
//! - Performance tracing hooks for profiling
//!
//! # Tracing Integration
//!
//! Horizon QTypes uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_qtypes=debug,horizon_qtypes_core::units=trace")
//!     .init();
//! ```
//!
//! # Debug Visualization
//!
//! Any hierarchy implementing [`DebugTree`] can be rendered with
//! [`TreeDebug`]:
//!
//! ```ignore
//! use horizon_qtypes_core::logging::TreeDebug;
//!
//! println!("{}", TreeDebug::new().format(&root_model));
//! ```

use std::fmt::Write as FmtWrite;

/// Span names used throughout Horizon QTypes for tracing.
pub mod span_names {
    /// Container rebuild span.
    pub const REBUILD: &str = "horizon_qtypes::rebuild";
    /// Unit conversion span.
    pub const CONVERT: &str = "horizon_qtypes::convert";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem. Each sits
/// under its crate's name, so a crate-level directive covers all of them.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_qtypes_core::signal";
    /// Value slots and update suppression.
    pub const VALUE: &str = "horizon_qtypes_core::value";
    /// Unit registry and converter.
    pub const UNITS: &str = "horizon_qtypes_core::units";
    /// Model variants and the model tree.
    pub const MODEL: &str = "horizon_qtypes::model";
    /// Widget adapters and controls.
    pub const WIDGET: &str = "horizon_qtypes::widget";
    /// Tree and table containers.
    pub const CONTAINER: &str = "horizon_qtypes::container";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show the node kind (qtype).
    pub show_types: bool,
    /// Whether to show the node's current value.
    pub show_values: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_types: true,
            show_values: true,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for minimal output: names only.
    pub fn minimal() -> Self {
        Self {
            show_types: false,
            show_values: false,
            ..Default::default()
        }
    }
}

/// A hierarchy that can be rendered by [`TreeDebug`].
pub trait DebugTree: Sized {
    /// Display name of the node.
    fn debug_name(&self) -> String;
    /// Short kind tag, e.g. `"number"`.
    fn debug_kind(&self) -> &'static str;
    /// Rendered current value, if the node has one.
    fn debug_value(&self) -> Option<String>;
    /// Child nodes in order.
    fn debug_children(&self) -> Vec<Self>;
}

/// Debug utility for visualizing trees.
#[derive(Debug, Clone, Default)]
pub struct TreeDebug {
    options: TreeFormatOptions,
}

impl TreeDebug {
    /// Create a new debug visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a debug visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format a tree starting at `root`.
    pub fn format<N: DebugTree>(&self, root: &N) -> String {
        let mut output = String::new();
        self.format_into(root, 0, true, &mut output);
        output
    }

    fn format_into<N: DebugTree>(&self, node: &N, depth: usize, is_last: bool, output: &mut String) {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return;
        }

        output.push_str(&self.build_prefix(depth, is_last));

        let name = node.debug_name();
        output.push_str(if name.is_empty() { "(unnamed)" } else { &name });

        // Writing into a String cannot fail.
        if self.options.show_types {
            let _ = write!(output, " ({})", node.debug_kind());
        }
        if self.options.show_values {
            if let Some(value) = node.debug_value() {
                let _ = write!(output, " = {value}");
            }
        }
        output.push('\n');

        let children = node.debug_children();
        let child_count = children.len();
        for (i, child) in children.iter().enumerate() {
            self.format_into(child, depth + 1, i + 1 == child_count, output);
        }
    }

    /// Build the prefix string for a tree node.
    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, corner, last) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            for _ in 0..self.options.indent_size {
                prefix.push(' ');
            }
        }
        prefix.push_str(if is_last { last } else { corner });
        prefix.push(' ');
        prefix
    }
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to time container rebuilds and conversions.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "horizon_qtypes::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}
