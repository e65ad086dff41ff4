//! Builds a small instrument panel with headless controls, simulates some
//! user input and prints the resulting model tree.
//!
//! Run with `RUST_LOG=horizon_qtypes=debug` to see rebuilds and conversions.

use std::sync::Arc;

use horizon_qtypes::model::{Bool, Enum, Null, Number, NumberLimits};
use horizon_qtypes::widget::{
    CheckBox, ComboBox, HeadlessFactory, InputTable, SpinBox, TreeWidget, TreeWidgetConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let panel = Null::new("panel").with_label("Delay stage");
    let delay = Number::builder("delay")
        .value(1.5)
        .units("ps")
        .limits(NumberLimits::with_units(-100.0, 100.0, "ps")?)
        .label("Delay")
        .build()?;
    panel.append_child(&delay)?;
    panel.append_child(Bool::new("homed", false).with_label("Homed"))?;
    panel.append_child(Enum::new("speed", ["slow", "fast"]).with_label("Speed"))?;

    let factory = Arc::new(HeadlessFactory::new());
    let tree = TreeWidget::new(&panel, TreeWidgetConfig::new(), factory.clone());
    let table = InputTable::new(factory);
    table.append(None, Some("Stage"))?;
    table.append(Some(panel.model().clone()), None)?;

    println!("Tree widgets: {}", tree.widget_count());
    println!("Table rows:   {:?}", table.row_labels());
    println!();

    if let Some(spin_box) = tree.find("delay").and_then(|c| c.downcast::<SpinBox>()) {
        spin_box.user_enter(12.5);
    }
    if let Some(units) = table.units_control("delay").and_then(|c| c.downcast::<ComboBox>()) {
        units.user_select_text("fs");
    }
    if let Some(check_box) = tree.find("homed").and_then(|c| c.downcast::<CheckBox>()) {
        check_box.user_click();
    }

    println!("delay = {} {}", delay.read(), delay.units().unwrap_or_default());
    println!();
    println!("{}", panel.debug_tree());
    println!("{}", panel.snapshot().to_json_string()?);
    Ok(())
}
