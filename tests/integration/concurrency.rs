//! Concurrency tests
//!
//! These tests verify that:
//! - Concurrent event creation never hands out the same id twice
//! - Sampling passes interleaved with manual events keep ids unique
//! - Every subscriber sees the same signals in the same order
//! - A stopped actor reports itself unavailable instead of hanging

use std::collections::HashSet;
use std::time::Duration;

use assert_matches::assert_matches;
use itom_monitor::{
    Metric,
    actors::messages::Signal,
    error::MonitorError,
    events::NewEvent,
};

use crate::helpers::*;

#[tokio::test]
async fn test_concurrent_creates_get_unique_ids() {
    let monitor = spawn_calm_monitor(&["laptop-01"]);

    let mut tasks = vec![];
    for i in 0..20 {
        let handle = monitor.clone();
        tasks.push(tokio::spawn(async move {
            let event = NewEvent {
                title: Some(format!("manual {i}")),
                ..Default::default()
            };
            handle.create_event(event).await
        }));
    }

    let mut ids = HashSet::new();
    for task in tasks {
        let event = task.await.unwrap().unwrap();
        assert!(ids.insert(event.id), "duplicate id handed out");
    }

    assert_eq!(ids.len(), 20);
    assert_eq!(monitor.stats().await.unwrap().events, 20);

    monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_sampling_and_manual_events_share_id_sequence() {
    let config = create_test_config(&["laptop-01", "laptop-02"], QUIET_INTERVAL);
    let monitor = itom_monitor::actors::monitor::MonitorHandle::spawn_with_source(
        &config,
        pinned_source("laptop-02", Metric::NetworkTraffic, 97.5),
    );

    let mut tasks = vec![];
    for _ in 0..10 {
        let sampler = monitor.clone();
        tasks.push(tokio::spawn(async move {
            sampler.generate_snapshot().await.map(|_| ())
        }));

        let creator = monitor.clone();
        tasks.push(tokio::spawn(async move {
            creator.create_event(NewEvent::default()).await.map(|_| ())
        }));
    }

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let events = monitor.list_events().await.unwrap();
    assert_eq!(events.len(), 20);

    let ids: HashSet<&str> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids.len(), 20);
    assert!(events.iter().all(|e| e.id == e.number));

    monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_multiple_subscribers_see_the_same_signals() {
    let monitor = spawn_calm_monitor(&["laptop-01"]);

    let mut first = monitor.subscribe().await.unwrap();
    let mut second = monitor.subscribe().await.unwrap();
    assert_eq!(monitor.stats().await.unwrap().subscribers, 2);

    for _ in 0..3 {
        monitor.create_event(NewEvent::default()).await.unwrap();
    }

    for subscription in [&mut first, &mut second] {
        assert_matches!(subscription.recv().await, Some(Signal::Snapshot(_)));

        let mut ids = vec![];
        for _ in 0..3 {
            match subscription.recv().await {
                Some(Signal::EventCreated(event)) => ids.push(event.id),
                other => panic!("unexpected signal: {other:?}"),
            }
        }
        assert_eq!(ids, vec!["EVT1001", "EVT1002", "EVT1003"]);
    }

    first.unsubscribe();
    assert_eq!(monitor.stats().await.unwrap().subscribers, 1);

    monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_requests_after_shutdown_fail_fast() {
    let monitor = spawn_calm_monitor(&["laptop-01"]);
    let clone = monitor.clone();

    monitor.shutdown().await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let result = tokio::time::timeout(Duration::from_secs(1), clone.stats())
        .await
        .expect("request must not hang");
    assert_matches!(result, Err(MonitorError::ActorUnavailable));
}
