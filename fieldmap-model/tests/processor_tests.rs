use fieldmap_model::{
    FnProcessor, Processor, ProcessorError, ProcessorRef, ProcessorRegistry, ValueProcessor,
};
use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;

/// Stores a boolean as "yes" / "no".
struct YesNo;

impl Processor for YesNo {
    type Native = bool;
    type Serial = String;

    fn encode(&self, value: bool) -> String {
        if value { "yes".into() } else { "no".into() }
    }

    fn decode(&self, serial: String) -> Result<bool, ProcessorError> {
        match serial.as_str() {
            "yes" => Ok(true),
            "no" => Ok(false),
            other => Err(ProcessorError::new(format!("expected yes/no, got '{other}'"))),
        }
    }
}

fn cents() -> FnProcessor<
    i64,
    String,
    impl Fn(i64) -> String + Send + Sync,
    impl Fn(String) -> Result<i64, ProcessorError> + Send + Sync,
> {
    FnProcessor::new(
        |cents: i64| cents.to_string(),
        |s: String| s.parse::<i64>().map_err(|e| ProcessorError::new(e.to_string())),
    )
}

// ── Typed contract ───────────────────────────────────────────────

#[test]
fn typed_processor_round_trip() {
    assert_eq!(YesNo.decode(YesNo.encode(true)), Ok(true));
    assert_eq!(YesNo.decode(YesNo.encode(false)), Ok(false));
}

#[test]
fn typed_decode_reports_rejection() {
    let err = YesNo.decode("maybe".into()).unwrap_err();
    assert!(err.to_string().contains("maybe"));
}

// ── Erased contract ──────────────────────────────────────────────

#[test]
fn value_processor_encodes_through_json() {
    assert_eq!(YesNo.encode_value(json!(true)), Ok(json!("yes")));
    assert_eq!(YesNo.decode_value(json!("no")), Ok(json!(false)));
}

#[test]
fn value_processor_rejects_wrong_native_type() {
    let err = YesNo.encode_value(json!("true")).unwrap_err();
    assert!(err.0.starts_with("invalid native value"));
}

#[test]
fn value_processor_rejects_wrong_serial_type() {
    let err = YesNo.decode_value(json!(1)).unwrap_err();
    assert!(err.0.starts_with("invalid serial value"));
}

#[test]
fn fn_processor_delegates_to_closures() {
    let p = cents();
    assert_eq!(p.encode(1250), "1250");
    assert_eq!(p.decode("99".into()), Ok(99));
    assert!(p.decode("abc".into()).is_err());
}

// ── ProcessorRef ─────────────────────────────────────────────────

#[test]
fn processor_ref_names_the_type() {
    let r = ProcessorRef::new(YesNo);
    assert!(r.name().ends_with("YesNo"));
    assert!(format!("{r:?}").contains("YesNo"));
}

#[test]
fn processor_ref_equality_is_identity() {
    let a = ProcessorRef::new(YesNo);
    let b = a.clone();
    let c = ProcessorRef::new(YesNo);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn processor_ref_from_value_processor() {
    let shared: Arc<dyn ValueProcessor> = Arc::new(YesNo);
    let r = ProcessorRef::from_value_processor("yes_no", shared);
    assert_eq!(r.name(), "yes_no");
    assert_eq!(r.encode(json!(true)), Ok(json!("yes")));
    assert_eq!(r.decode(json!("yes")), Ok(json!(true)));
}

#[test]
fn processor_ref_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ProcessorRef>();
}

// ── Registry ─────────────────────────────────────────────────────

#[test]
fn registry_lookup_by_name() {
    let mut registry = ProcessorRegistry::new();
    assert!(registry.is_empty());
    registry.register("yes_no", YesNo).register("cents", cents());
    assert_eq!(registry.len(), 2);
    assert!(registry.get("yes_no").is_some());
    assert!(registry.get("missing").is_none());
}

#[test]
fn registry_replaces_existing_name() {
    let mut registry = ProcessorRegistry::new();
    let first = ProcessorRef::new(YesNo);
    registry.register_ref("p", first.clone());
    registry.register("p", YesNo);
    assert_eq!(registry.len(), 1);
    assert_ne!(registry.get("p"), Some(&first));
}

// ── Properties ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn cents_processor_round_trips(v in any::<i64>()) {
        let p = cents();
        prop_assert_eq!(p.decode(p.encode(v)), Ok(v));
    }

    #[test]
    fn erased_round_trip_matches_typed(v in any::<bool>()) {
        let serial = YesNo.encode_value(json!(v)).unwrap();
        prop_assert_eq!(YesNo.decode_value(serial), Ok(json!(v)));
    }
}
