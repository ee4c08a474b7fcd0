#![allow(missing_docs, unused_results)]

use std::sync::Arc;
use std::thread;

use assert_matches::assert_matches;
use serde_json::json;
use sift_core::{ContentEvent, ContentEventKind, RuleEvent, UsageEvent};
use sift_settings::{TriggerSettings, load_settings_from_path};
use sift_triggers::{
    Accept, RuleTrigger, TriggerDefinition, TriggerDocument, TriggerError, TriggerSummary,
    matches,
};

fn published_blog_trigger() -> RuleTrigger {
    let doc: TriggerDocument = serde_json::from_value(json!({
        "triggerType": "ContentChangedTriggerV2",
        "schemas": [
            {"schemaId": "blog", "condition": "status == 'published' && !archived"},
            {"schemaId": "news"}
        ]
    }))
    .unwrap();
    doc.into_trigger(&TriggerSettings::default()).unwrap()
}

#[test]
fn legacy_document_migrates_freezes_and_matches() {
    sift_core::logging::init_subscriber("debug");

    let doc: TriggerDocument = serde_json::from_str(
        r#"{"triggerType": "ContentChangedTrigger", "schemaId": "blog", "handleAll": false}"#,
    )
    .unwrap();
    let draft = doc.into_draft(&TriggerSettings::default()).unwrap();
    let mut definition = TriggerDefinition::with_id("trg-legacy", draft);
    assert!(definition.freeze());

    let trigger = definition.trigger().unwrap().clone();
    let blog: RuleEvent =
        ContentEvent::new("blog", ContentEventKind::Published, json!({"title": "x"})).into();
    let news: RuleEvent =
        ContentEvent::new("news", ContentEventKind::Published, json!({"title": "x"})).into();
    assert!(matches(&trigger, &blog));
    assert!(!matches(&trigger, &news));
    assert_eq!(trigger.accept(&mut TriggerSummary), "content changed in blog");

    assert_matches!(
        definition.edit(|_| Ok(())),
        Err(TriggerError::ImmutableState { .. })
    );
}

#[test]
fn sealed_trigger_is_evaluated_from_many_threads() {
    let trigger = Arc::new(published_blog_trigger());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let trigger = Arc::clone(&trigger);
            thread::spawn(move || {
                let status = if i % 2 == 0 { "published" } else { "draft" };
                let event: RuleEvent = ContentEvent::new(
                    "blog",
                    ContentEventKind::Updated,
                    json!({"status": status, "archived": false}),
                )
                .into();
                (0..100).all(|_| matches(&trigger, &event) == (i % 2 == 0))
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

#[test]
fn conditions_are_fail_safe_on_malformed_payloads() {
    let trigger = published_blog_trigger();
    for data in [
        json!(null),
        json!([1, 2, 3]),
        json!("published"),
        json!({"status": 42}),
        json!({"status": {"nested": true}}),
    ] {
        let event: RuleEvent = ContentEvent::new("blog", ContentEventKind::Updated, data).into();
        assert!(!matches(&trigger, &event));
    }
    // Unconditional schema is unaffected by payload shape
    let event: RuleEvent = ContentEvent::new("news", ContentEventKind::Updated, json!(null)).into();
    assert!(matches(&trigger, &event));
    // Never crosses event families
    assert!(!matches(&trigger, &UsageEvent::new(1, 1).into()));
}

#[test]
fn limits_from_settings_file_are_enforced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{"triggers": {"maxSchemasPerTrigger": 2, "rejectDuplicateSchemas": true}}"#,
    )
    .unwrap();
    let settings = load_settings_from_path(&path).unwrap();
    assert_eq!(settings.triggers.max_schemas_per_trigger, 2);

    let too_many: TriggerDocument = serde_json::from_value(json!({
        "triggerType": "ContentChangedTriggerV2",
        "schemas": [{"schemaId": "a"}, {"schemaId": "b"}, {"schemaId": "c"}]
    }))
    .unwrap();
    assert_matches!(
        too_many.into_draft(&settings.triggers),
        Err(TriggerError::Validation { .. })
    );

    let duplicated: TriggerDocument = serde_json::from_value(json!({
        "triggerType": "ContentChangedTriggerV2",
        "schemas": [{"schemaId": "a"}, {"schemaId": "a"}]
    }))
    .unwrap();
    assert_matches!(
        duplicated.into_draft(&settings.triggers),
        Err(TriggerError::Validation { .. })
    );
}

#[test]
fn written_documents_read_back_to_the_same_trigger() {
    let trigger = published_blog_trigger();
    let text = serde_json::to_string(&TriggerDocument::from(&trigger)).unwrap();
    let doc: TriggerDocument = serde_json::from_str(&text).unwrap();
    assert!(!doc.is_legacy());
    assert_eq!(doc.into_trigger(&TriggerSettings::default()).unwrap(), trigger);
}
