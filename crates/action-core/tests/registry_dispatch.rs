//! Dispatching invocations through the registry

mod common;

use action_core::{Action, ActionRegistry, ElementRule, Error, Invocation, RawParam, TupleSchema};
use common::{RecordingLogger, ack_probe};
use serde_json::json;
use std::sync::{Arc, Mutex};

fn marking_action(event: &str, namespace: &str, marks: &Arc<Mutex<Vec<String>>>) -> Action {
    let label = format!("{}#{}", namespace, event);
    let marks = marks.clone();
    Action::builder(event)
        .namespace(namespace)
        .handler(move |_ctx| {
            let marks = marks.clone();
            let label = label.clone();
            async move {
                marks.lock().unwrap().push(label);
                Ok(Vec::new())
            }
        })
}

#[smol_potat::test]
async fn dispatch_routes_by_namespace_and_event() {
    let marks = Arc::new(Mutex::new(Vec::new()));
    let mut registry = ActionRegistry::new();
    registry.register(marking_action("send", "/chat", &marks)).unwrap();
    registry.register(marking_action("send", "/admin", &marks)).unwrap();

    registry
        .dispatch("/admin", "send", Invocation::detached(Vec::new()))
        .await
        .expect("dispatch should succeed");
    registry
        .dispatch("/chat", "send", Invocation::detached(Vec::new()))
        .await
        .expect("dispatch should succeed");

    assert_eq!(
        marks.lock().unwrap().clone(),
        vec!["/admin#send".to_string(), "/chat#send".to_string()]
    );
}

#[smol_potat::test]
async fn unknown_action_fails_without_touching_the_invocation_logger() {
    let registry = ActionRegistry::new();
    let logger = RecordingLogger::new();

    let err = registry
        .dispatch(
            "/",
            "missing",
            Invocation::detached(Vec::new()).with_logger(logger.clone()),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ActionNotFound { .. }));
    assert_eq!(
        err.to_string(),
        "No action registered for 'missing' in namespace '/'"
    );
    // The pipeline never started, so nothing was logged as a pipeline
    // failure; reporting is the host's call.
    assert_eq!(logger.error_count(), 0);
}

#[smol_potat::test]
async fn dispatched_pipeline_failures_still_log_once() {
    let mut registry = ActionRegistry::new();
    registry
        .register(
            Action::builder("send")
                .input(TupleSchema::new(vec![ElementRule::string()]))
                .handler(|_ctx| async { Ok(Vec::new()) }),
        )
        .unwrap();

    let logger = RecordingLogger::new();
    let (callback, probe) = ack_probe();
    let err = registry
        .dispatch(
            "/",
            "send",
            Invocation::detached(vec![
                RawParam::Data(json!(41)),
                RawParam::Callback(callback),
            ])
            .with_logger(logger.clone()),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InputValidation { .. }));
    assert!(!probe.invoked());
    assert_eq!(logger.error_count(), 1);
}

#[test]
fn discovery_listing_carries_both_schemas() {
    let mut registry = ActionRegistry::new();
    registry
        .register(
            Action::builder("send")
                .namespace("/chat")
                .input(TupleSchema::new(vec![
                    ElementRule::string(),
                    ElementRule::string().optional(),
                ]))
                .output(TupleSchema::new(vec![ElementRule::integer()]))
                .handler(|_ctx| async { Ok(vec![json!(1)]) }),
        )
        .unwrap();
    registry
        .register(Action::builder("ping").handler(|_ctx| async { Ok(Vec::new()) }))
        .unwrap();

    let listing = registry.list();
    assert_eq!(listing.len(), 2);

    assert_eq!(listing[0].namespace, "/chat");
    assert_eq!(listing[0].event, "send");
    assert_eq!(listing[0].input_schema["minItems"], json!(1));
    assert_eq!(
        listing[0].output_schema.as_ref().unwrap()["prefixItems"],
        json!([{"type": "integer"}])
    );

    assert_eq!(listing[1].namespace, "/");
    assert!(listing[1].output_schema.is_none());

    let wire = serde_json::to_value(&listing).unwrap();
    assert!(wire[1].get("output_schema").is_none());
}
