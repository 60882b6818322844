//! Contract Test: Read-Verified Record Reconciliation
//!
//! Constraints verified:
//! - The current record is listed (type A, limit 1) before any write
//! - An equal value issues no upsert
//! - A listed record for a different name or type counts as absent
//! - Upserts carry TTL 300 and the target address
//! - Provider failures become ApiError with no further calls

mod common;

use common::*;
use r53dyn_core::{ChangeStatus, RECORD_TTL, RecordReconciler, RecordType, UpdateOutcome, ZoneId};

fn zone() -> ZoneId {
    ZoneId::new("Z1234567890ABC")
}

#[tokio::test]
async fn absent_record_is_created() {
    let provider = ScriptedDnsProvider::new();

    let outcome = RecordReconciler::new(&provider)
        .reconcile(&zone(), &name("host.example.com."), ip("203.0.113.5"))
        .await;

    assert_eq!(
        outcome,
        UpdateOutcome::Updated {
            previous: None,
            new: ip("203.0.113.5"),
            status: ChangeStatus::Pending,
        }
    );

    let upserts = provider.upserts();
    assert_eq!(upserts.len(), 1);
    assert_eq!(upserts[0].zone_id, "Z1234567890ABC");
    assert_eq!(upserts[0].name, "host.example.com.");
    assert_eq!(upserts[0].record_type, RecordType::A);
    assert_eq!(upserts[0].ttl, 300);
    assert_eq!(upserts[0].value, "203.0.113.5");
}

#[tokio::test]
async fn matching_record_needs_no_change() {
    let provider = ScriptedDnsProvider::new();
    provider.with_record("host.example.com.", "203.0.113.5");

    let outcome = RecordReconciler::new(&provider)
        .reconcile(&zone(), &name("host.example.com."), ip("203.0.113.5"))
        .await;

    assert_eq!(outcome, UpdateOutcome::NoChangeNeeded);
    assert!(provider.upserts().is_empty());
}

#[tokio::test]
async fn stale_record_is_updated() {
    let provider = ScriptedDnsProvider::new();
    provider.with_record("host.example.com.", "203.0.113.4");

    let outcome = RecordReconciler::new(&provider)
        .reconcile(&zone(), &name("host.example.com."), ip("203.0.113.5"))
        .await;

    assert_eq!(
        outcome,
        UpdateOutcome::Updated {
            previous: Some("203.0.113.4".to_string()),
            new: ip("203.0.113.5"),
            status: ChangeStatus::Pending,
        }
    );
    assert_eq!(provider.upserts().len(), 1);
    assert_eq!(
        provider.record_value("host.example.com."),
        Some("203.0.113.5".to_string())
    );
}

#[tokio::test]
async fn listing_asks_for_one_a_record_starting_at_the_name() {
    let provider = ScriptedDnsProvider::new();

    RecordReconciler::new(&provider)
        .reconcile(&zone(), &name("host.example.com"), ip("203.0.113.5"))
        .await;

    assert_eq!(
        provider.list_calls(),
        [(
            "Z1234567890ABC".to_string(),
            "host.example.com.".to_string(),
            RecordType::A,
            1
        )]
    );
}

#[tokio::test]
async fn next_record_in_order_is_not_mistaken_for_ours() {
    let provider = ScriptedDnsProvider::new();
    // Sorts after "host.example.com." so the listing returns it
    provider.with_record("www.example.com.", "192.0.2.3");

    let outcome = RecordReconciler::new(&provider)
        .reconcile(&zone(), &name("host.example.com."), ip("192.0.2.3"))
        .await;

    assert_eq!(
        outcome,
        UpdateOutcome::Updated {
            previous: None,
            new: ip("192.0.2.3"),
            status: ChangeStatus::Pending,
        }
    );
    assert_eq!(provider.upserts().len(), 1);
    assert_eq!(provider.upserts()[0].name, "host.example.com.");
}

#[tokio::test]
async fn same_name_with_another_type_is_not_mistaken_for_ours() {
    let provider = ScriptedDnsProvider::new();
    // No A record, so the listing returns the MX set at the same name
    provider.with_other_record("host.example.com.", "MX", "10 mail.example.com.");

    let outcome = RecordReconciler::new(&provider)
        .reconcile(&zone(), &name("host.example.com."), ip("203.0.113.5"))
        .await;

    assert_eq!(
        outcome,
        UpdateOutcome::Updated {
            previous: None,
            new: ip("203.0.113.5"),
            status: ChangeStatus::Pending,
        }
    );
    let upserts = provider.upserts();
    assert_eq!(upserts.len(), 1);
    assert_eq!(upserts[0].record_type, RecordType::A);
    assert_eq!(upserts[0].value, "203.0.113.5");
}

#[tokio::test]
async fn a_record_is_found_alongside_other_types() {
    let provider = ScriptedDnsProvider::new();
    provider
        .with_record("host.example.com.", "203.0.113.5")
        .with_other_record("host.example.com.", "TXT", "\"v=spf1 -all\"");

    let outcome = RecordReconciler::new(&provider)
        .reconcile(&zone(), &name("host.example.com."), ip("203.0.113.5"))
        .await;

    assert_eq!(outcome, UpdateOutcome::NoChangeNeeded);
    assert!(provider.upserts().is_empty());
}

#[tokio::test]
async fn second_reconcile_with_same_ip_is_a_no_op() {
    let provider = ScriptedDnsProvider::new();
    let reconciler = RecordReconciler::new(&provider);

    let first = reconciler
        .reconcile(&zone(), &name("host.example.com."), ip("198.51.100.7"))
        .await;
    let second = reconciler
        .reconcile(&zone(), &name("host.example.com."), ip("198.51.100.7"))
        .await;

    assert!(matches!(first, UpdateOutcome::Updated { .. }));
    assert_eq!(second, UpdateOutcome::NoChangeNeeded);
    assert_eq!(provider.upserts().len(), 1);
}

#[tokio::test]
async fn out_of_band_change_is_seen_on_next_call() {
    let provider = ScriptedDnsProvider::new();
    let reconciler = RecordReconciler::new(&provider);

    reconciler
        .reconcile(&zone(), &name("host.example.com."), ip("198.51.100.7"))
        .await;

    // Someone edits the record by hand between ticks
    provider.with_record("host.example.com.", "198.51.100.99");

    let outcome = reconciler
        .reconcile(&zone(), &name("host.example.com."), ip("198.51.100.7"))
        .await;

    assert_eq!(
        outcome,
        UpdateOutcome::Updated {
            previous: Some("198.51.100.99".to_string()),
            new: ip("198.51.100.7"),
            status: ChangeStatus::Pending,
        }
    );
    assert_eq!(provider.upserts().len(), 2);
}

#[tokio::test]
async fn listing_failure_issues_no_upsert() {
    let provider = ScriptedDnsProvider::new();
    provider.fail_list("Test error");

    let outcome = RecordReconciler::new(&provider)
        .reconcile(&zone(), &name("host.example.com."), ip("192.0.2.1"))
        .await;

    assert_eq!(outcome, UpdateOutcome::ApiError("Test error".to_string()));
    assert!(provider.upserts().is_empty());
}

#[tokio::test]
async fn upsert_failure_is_reported_and_record_untouched() {
    let provider = ScriptedDnsProvider::new();
    provider
        .with_record("host.example.com.", "192.0.2.2")
        .fail_upsert("Test change error");

    let outcome = RecordReconciler::new(&provider)
        .reconcile(&zone(), &name("host.example.com."), ip("192.0.2.1"))
        .await;

    assert_eq!(outcome, UpdateOutcome::ApiError("Test change error".to_string()));
    assert_eq!(provider.upserts().len(), 1);
    assert_eq!(
        provider.record_value("host.example.com."),
        Some("192.0.2.2".to_string())
    );
}

#[test]
fn ttl_is_five_minutes() {
    assert_eq!(RECORD_TTL, 300);
}
