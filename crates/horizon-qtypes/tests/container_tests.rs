//! Integration tests for the tree widget and the input table.

use std::sync::Arc;

use horizon_qtypes::model::{Bool, Button, Enum, Model, Null, Number, Text};
use horizon_qtypes::widget::{
    ComboBox, ControlHandle, HeadlessFactory, InputTable, LineEdit, TreeWidget, TreeWidgetConfig,
};
use horizon_qtypes::ModelError;

fn factory() -> Arc<HeadlessFactory> {
    Arc::new(HeadlessFactory::new())
}

fn instrument() -> Null {
    let root = Null::new("instrument");
    let laser = Null::new("laser");
    laser
        .append_child(Number::builder("delay").value(0.5).units("ps").build().unwrap())
        .unwrap();
    laser.append_child(Bool::new("enabled", false)).unwrap();
    laser
        .append_child(Enum::new("mode", ["cw", "pulsed"]))
        .unwrap();
    root.append_child(&laser).unwrap();
    root.append_child(Text::new("operator", "")).unwrap();
    root.append_child(Button::new("fire")).unwrap();
    root
}

#[test]
fn test_tree_widget_count_tracks_node_count() {
    let root = instrument();
    let tree = TreeWidget::new(&root, TreeWidgetConfig::new(), factory());
    assert_eq!(tree.widget_count(), root.node_count());

    let laser = root.child("laser").unwrap();
    laser.append_child(Number::new("wavelength", 800.0)).unwrap();
    assert_eq!(tree.widget_count(), root.node_count());

    root.remove_child("operator").unwrap();
    assert_eq!(tree.widget_count(), root.node_count());
}

#[test]
fn test_tree_widget_rebuild_does_not_duplicate_connections() {
    let root = instrument();
    let tree = TreeWidget::new(&root, TreeWidgetConfig::new(), factory());
    let counts = |models: &[Model]| {
        models
            .iter()
            .map(|m| m.updated().connection_count())
            .collect::<Vec<_>>()
    };
    let before = counts(&root.walk());

    for _ in 0..3 {
        root.child("laser")
            .unwrap()
            .append_child(Null::new("spacer"))
            .unwrap();
        root.child("laser").unwrap().remove_child("spacer").unwrap();
    }
    tree.rebuild();

    assert_eq!(counts(&root.walk()), before);
}

#[test]
fn test_tree_widget_controls_write_models() {
    let root = instrument();
    let tree = TreeWidget::new(&root, TreeWidgetConfig::new().with_include_root(false), factory());
    assert_eq!(tree.keys(), ["laser", "operator", "fire"]);

    let mode = tree.find("mode").and_then(|c| c.downcast::<ComboBox>()).unwrap();
    assert!(mode.user_select_text("pulsed"));
    let laser = root.child("laser").unwrap();
    assert_eq!(laser.child("mode").unwrap().as_enum().unwrap().read(), "pulsed");

    let operator = tree.find("operator").and_then(|c| c.downcast::<LineEdit>()).unwrap();
    assert!(operator.user_enter("ada"));
    assert_eq!(root.child("operator").unwrap().as_text().unwrap().read(), "ada");
}

#[test]
fn test_tree_widget_insert_on_empty_returns_zero() {
    let root = Null::new("empty");
    let tree = TreeWidget::new(&root, TreeWidgetConfig::new().with_include_root(false), factory());
    assert_eq!(tree.insert(-1, Number::new("x", 0.0)), 0);
    assert_eq!(tree.len(), 1);
    assert!(matches!(tree.find("x"), Some(ControlHandle::Numeric(_))));
}

#[test]
fn test_input_table_rejects_positional_operations() {
    let table = InputTable::new(factory());
    table.append(Some(instrument().into()), None).unwrap();

    for err in [
        table.insert(0, Null::new("a").into()).unwrap_err(),
        table.len().unwrap_err(),
        table.pop().unwrap_err(),
        table.remove("instrument").unwrap_err(),
        table.extend(vec![Null::new("b").into()]).unwrap_err(),
    ] {
        assert!(matches!(err, ModelError::UnsupportedOperation { target: "InputTable", .. }));
    }
    assert_eq!(table.keys(), ["instrument"]);
}

#[test]
fn test_input_table_units_column() {
    let root = instrument();
    let table = InputTable::new(factory());
    table.append(None, Some("Instrument")).unwrap();
    table.append(Some(root.model().clone()), None).unwrap();

    assert_eq!(
        table.row_labels(),
        ["Instrument", "instrument", "laser", "delay", "enabled", "mode", "operator", "fire"]
    );

    let units = table
        .units_control("delay")
        .and_then(|c| c.downcast::<ComboBox>())
        .unwrap();
    assert!(units.user_select_text("fs"));
    let delay = root.child("laser").unwrap().child("delay").unwrap().as_number().unwrap();
    assert_eq!(delay.units().as_deref(), Some("fs"));
    assert!((delay.read() - 500.0).abs() < 1e-9);
}
