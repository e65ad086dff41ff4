//! Integration tests for saving and restoring model trees.

use horizon_qtypes::model::{Bool, Enum, ModelSnapshot, Null, Number, SnapshotError};

fn settings() -> Null {
    let root = Null::new("settings");
    root.append_child(Number::builder("delay").value(1.5).units("ps").build().unwrap())
        .unwrap();
    root.append_child(Number::new("gain", f64::NAN)).unwrap();
    root.append_child(Bool::new("shutter", true)).unwrap();
    root.append_child(Enum::new("mode", ["cw", "pulsed"])).unwrap();
    root
}

#[test]
fn test_json_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let saved = settings();
    saved.child("mode").unwrap().as_enum().unwrap().write("pulsed").unwrap();
    saved.snapshot().save_json(&path).unwrap();

    let target = settings();
    target.child("gain").unwrap().as_number().unwrap().write(2.0);
    target
        .child("delay")
        .unwrap()
        .as_number()
        .unwrap()
        .convert("fs")
        .unwrap();
    target.restore(&ModelSnapshot::load_json(&path).unwrap()).unwrap();

    let delay = target.child("delay").unwrap().as_number().unwrap();
    assert_eq!(delay.units().as_deref(), Some("fs"));
    assert!((delay.read() - 1500.0).abs() < 1e-9);
    assert!(target.child("gain").unwrap().as_number().unwrap().is_nan());
    assert_eq!(target.child("mode").unwrap().as_enum().unwrap().read(), "pulsed");
}

#[test]
fn test_toml_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    let snapshot = settings().snapshot();
    snapshot.save_toml(&path).unwrap();
    assert_eq!(ModelSnapshot::load_toml(&path).unwrap(), snapshot);
    // NaN numbers are stored without a value.
    assert_eq!(snapshot.children[1].value, None);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ModelSnapshot::load_json(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, SnapshotError::Io(_)));
}

#[test]
fn test_shape_mismatch_is_rejected() {
    let snapshot = settings().snapshot();
    let other = Null::new("settings");
    other.append_child(Bool::new("delay", false)).unwrap();
    assert!(other.restore(&snapshot).is_err());
}
