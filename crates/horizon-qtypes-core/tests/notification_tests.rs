//! Integration tests for signals, update locks and unit conversion.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use horizon_qtypes_core::value::{Notifier, Value};
use horizon_qtypes_core::{units, ConversionError, Signal};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_slot_may_disconnect_itself_during_emit() {
    init_tracing();
    let signal = Arc::new(Signal::<u32>::new());
    let hits = Arc::new(AtomicUsize::new(0));
    let id = Arc::new(parking_lot::Mutex::new(None));

    let signal_clone = signal.clone();
    let hits_clone = hits.clone();
    let id_clone = id.clone();
    *id.lock() = Some(signal.connect(move |_| {
        hits_clone.fetch_add(1, Ordering::SeqCst);
        if let Some(id) = id_clone.lock().take() {
            signal_clone.disconnect(id);
        }
    }));

    signal.emit(1);
    signal.emit(2);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(signal.connection_count(), 0);
}

#[test]
fn test_nested_locks_emit_once_on_outermost_release() {
    init_tracing();
    let value = Value::new((0.0_f64, "mm".to_string()));
    let notifier = Notifier::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = hits.clone();
    notifier.updated().connect(move |_| {
        hits_clone.fetch_add(1, Ordering::SeqCst);
    });

    {
        let _outer = notifier.lock();
        {
            let _inner = notifier.lock();
            value.write((1.0, "mm".to_string()));
            notifier.notify();
        }
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        value.write((0.001, "m".to_string()));
        notifier.notify();
    }

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(!notifier.is_locked());
}

#[test]
fn test_lock_without_writes_emits_nothing() {
    let notifier = Notifier::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = hits.clone();
    notifier.updated().connect(move |_| {
        hits_clone.fetch_add(1, Ordering::SeqCst);
    });

    drop(notifier.lock());
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn test_failed_update_leaves_value_untouched() {
    let value = Value::new((2.0_f64, Some("mm".to_string())));
    let result = value.try_update(|(v, u)| {
        Ok::<_, ConversionError>((units::convert(*v, u.as_deref(), Some("ps"))?, Some("ps".to_string())))
    });

    assert!(matches!(result, Err(ConversionError::IncompatibleUnits { .. })));
    assert_eq!(value.read(), (2.0, Some("mm".to_string())));
}

#[test]
fn test_temperature_round_trip() {
    let celsius = units::convert(300.0, Some("K"), Some("deg_C")).unwrap();
    assert!((celsius - 26.85).abs() < 1e-9);
    let back = units::convert(celsius, Some("deg_C"), Some("K")).unwrap();
    assert!((back - 300.0).abs() < 1e-9);
}
