// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scoped sub-context semantics: LIFO unwinding and thread isolation.

use scopewise::{fields, InMemoryHandler, Logger};
use serde_json::json;
use std::sync::Arc;

fn jobs_logger() -> (Arc<InMemoryHandler>, Logger) {
    let handler = Arc::new(InMemoryHandler::new());
    let logger = Logger::builder()
        .name("jobs")
        .handler(handler.clone())
        .build()
        .expect("complete configuration");
    (handler, logger)
}

#[test]
fn same_key_nesting_unwinds_through_three_values() {
    let (handler, logger) = jobs_logger();
    logger.set_context("stage", json!("first"));

    logger.info("persistent");
    {
        let _outer = logger.with_context_params("stage", fields! { "value" => "second" });
        logger.info("outer");
        {
            let _inner = logger.with_context_params("stage", fields! { "value" => "third" });
            logger.info("inner");
        }
        logger.info("outer again");
    }
    logger.info("persistent again");

    let stages: Vec<_> = handler
        .drain_records()
        .into_iter()
        .map(|record| record.fields()["jobs"]["stage"].clone())
        .collect();
    assert_eq!(
        stages,
        vec![
            json!("first"),
            json!({"value": "second"}),
            json!({"value": "third"}),
            json!({"value": "second"}),
            json!("first"),
        ]
    );
}

#[test]
fn scopes_under_different_keys_are_independent() {
    let (handler, logger) = jobs_logger();

    let batch = logger.with_context_params("batch", fields! { "id" => 1 });
    let worker = logger.with_context_params("worker", fields! { "id" => 2 });
    logger.info("both");
    drop(batch);
    logger.info("worker only");
    drop(worker);
    logger.info("neither");

    let records = handler.drain_records();
    assert!(records[0].fields()["jobs"].get("batch").is_some());
    assert!(records[0].fields()["jobs"].get("worker").is_some());
    assert!(records[1].fields()["jobs"].get("batch").is_none());
    assert!(records[1].fields()["jobs"].get("worker").is_some());
    assert_eq!(records[2].fields()["jobs"], json!({}));
}

#[test]
fn concurrent_scopes_with_distinct_keys_never_leak_across_threads() {
    let (handler, logger) = jobs_logger();

    std::thread::scope(|threads| {
        for key in ["alpha", "beta", "gamma", "delta"] {
            let logger = &logger;
            threads.spawn(move || {
                let _scope = logger.with_context_params(key, fields! { "owner" => key });
                for _ in 0..50 {
                    logger.info_with("tick", fields! { "thread_key" => key });
                }
            });
        }
    });

    let records = handler.drain_records();
    assert_eq!(records.len(), 200);
    for record in records {
        let own_key = record.fields()["thread_key"].as_str().expect("marker");
        let namespace = record.fields()["jobs"].as_object().expect("namespace");
        assert_eq!(namespace[own_key], json!({"owner": own_key}));
        for key in ["alpha", "beta", "gamma", "delta"] {
            if key != own_key {
                assert!(
                    !namespace.contains_key(key),
                    "scope `{key}` leaked into a record from `{own_key}`"
                );
            }
        }
    }
}

#[test]
fn scope_params_shadow_persistent_fields_only_while_active() {
    let (handler, logger) = jobs_logger();
    logger.set_context("context", json!("persistent"));

    {
        let _scope = logger.with_context_params("context", fields! { "operation" => "sync" });
        logger.info("shadowed");
    }
    logger.info("restored");

    let records = handler.drain_records();
    assert_eq!(
        records[0].fields()["jobs"]["context"],
        json!({"operation": "sync"})
    );
    assert_eq!(records[1].fields()["jobs"]["context"], json!("persistent"));
}
