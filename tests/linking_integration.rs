//! Integration tests for Contact -> Account linking
//!
//! Tests verify:
//! 1. Existing Accounts are reused, missing ones created exactly once
//! 2. Fan-out: Contacts sharing a last name share one Account
//! 3. Invalid keys abort before the store is touched
//! 4. Store constraint failures propagate unchanged
//! 5. Opportunity upsert is idempotent across runs
//! 6. Out-of-range close-date offsets are rejected when config loads

use chrono::NaiveDate;
use record_linker::{
    Account, ConfigError, Contact, InMemoryRecordStore, LinkError, LinkerConfig,
    RecordOperations, RecordStore, StoreError,
};

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn ops() -> RecordOperations<InMemoryRecordStore> {
    RecordOperations::new(InMemoryRecordStore::new(), LinkerConfig::default())
}

async fn seed_accounts(
    ops: &RecordOperations<InMemoryRecordStore>,
    names: &[&str],
) -> Vec<Account> {
    ops.store()
        .insert_accounts(names.iter().map(|n| Account::new(*n)).collect())
        .await
        .unwrap()
}

// ============================================================================
// LINKING
// ============================================================================

#[tokio::test]
async fn test_doe_jane_scenario_against_store() {
    let ops = ops();
    let seeded = seed_accounts(&ops, &["Jane"]).await;
    let jane_id = seeded[0].id;

    let outcome = ops
        .link_contacts_to_accounts(vec![
            Contact::new("John", "Doe"),
            Contact::new("Mary", "Jane"),
            Contact::new("Rick", "Doe"),
        ])
        .await
        .unwrap();

    assert_eq!(outcome.report.existing_parents, 1);
    assert_eq!(outcome.report.created_parents, 1);

    let doe = ops
        .store()
        .find_accounts_by_names(&["Doe".to_string()])
        .await
        .unwrap();
    assert_eq!(doe.len(), 1);

    let ids: Vec<_> = outcome.children.iter().map(|c| c.account_id).collect();
    assert_eq!(ids, vec![doe[0].id, jane_id, doe[0].id]);
    assert!(outcome.children.iter().all(|c| c.id.is_some()));
    assert_eq!(ops.store().contacts().await.len(), 3);
}

#[tokio::test]
async fn test_second_pass_creates_no_accounts() {
    let ops = ops();

    ops.link_contacts_to_accounts(vec![Contact::new("John", "Doe")])
        .await
        .unwrap();
    let outcome = ops
        .link_contacts_to_accounts(vec![Contact::new("Jim", "Doe")])
        .await
        .unwrap();

    assert_eq!(outcome.report.created_parents, 0);
    assert_eq!(ops.store().account_count().await, 1);

    let contacts = ops.store().contacts().await;
    assert_eq!(contacts[0].account_id, contacts[1].account_id);
}

#[tokio::test]
async fn test_empty_contact_list_is_noop() {
    let ops = ops();
    let outcome = ops.link_contacts_to_accounts(Vec::new()).await.unwrap();

    assert!(outcome.children.is_empty());
    assert_eq!(ops.store().account_count().await, 0);
}

#[tokio::test]
async fn test_empty_last_name_writes_nothing() {
    let ops = ops();
    let err = ops
        .link_contacts_to_accounts(vec![
            Contact::new("John", "Doe"),
            Contact::new("Anon", ""),
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, LinkError::InvalidKey { index: 1 }));
    assert_eq!(ops.store().account_count().await, 0);
    assert!(ops.store().contacts().await.is_empty());
}

#[tokio::test]
async fn test_whitespace_last_name_is_invalid_key() {
    let ops = ops();
    let err = ops
        .link_contacts_to_accounts(vec![Contact::new("A", "  ")])
        .await
        .unwrap_err();

    assert!(matches!(err, LinkError::InvalidKey { index: 0 }));
    assert_eq!(ops.store().account_count().await, 0);
    assert!(ops.store().contacts().await.is_empty());
}

#[tokio::test]
async fn test_preassigned_contact_id_propagates_store_error() {
    let ops = ops();
    let mut contact = Contact::new("John", "Doe");
    contact.id = Some(uuid::Uuid::new_v4());

    let err = ops
        .link_contacts_to_accounts(vec![contact])
        .await
        .unwrap_err();

    assert!(matches!(err, LinkError::Store(StoreError::Constraint(_))));
    assert!(ops.store().contacts().await.is_empty());
}

#[tokio::test]
async fn test_linked_accounts_cannot_be_bulk_deleted() {
    let ops = ops();
    let outcome = ops
        .link_contacts_to_accounts(vec![Contact::new("John", "Doe")])
        .await
        .unwrap();

    let ids: Vec<_> = outcome.children.iter().filter_map(|c| c.account_id).collect();
    let err = ops.store().delete_accounts(&ids).await.unwrap_err();
    assert!(matches!(err, StoreError::Constraint(_)));
}

// ============================================================================
// UPSERT
// ============================================================================

#[tokio::test]
async fn test_opportunity_upsert_is_idempotent() {
    let ops = ops();
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let names = vec!["Renewal".to_string(), "Upsell".to_string()];

    let first = ops.upsert_opportunities_on(&names, today).await.unwrap();
    let second = ops.upsert_opportunities_on(&names, today).await.unwrap();

    assert_eq!(first.created.len(), 2);
    assert!(second.created.is_empty());
    assert_eq!(first.ids, second.ids);
    assert_eq!(second.matched, second.ids);
    assert_eq!(ops.store().opportunity_count().await, 2);
}

#[tokio::test]
async fn test_opportunity_defaults_from_yaml() {
    let config = LinkerConfig::from_yaml(
        r#"
opportunity_defaults:
  stage_name: "Qualification"
  close_date_offset_days: 7
  amount: 500.0
"#,
    )
    .unwrap();
    let ops = RecordOperations::new(InMemoryRecordStore::new(), config);
    let today = NaiveDate::from_ymd_opt(2024, 12, 28).unwrap();

    let summary = ops
        .upsert_opportunities_on(&["Expansion".to_string()], today)
        .await
        .unwrap();

    let created = &summary.created[0];
    assert_eq!(created.stage_name, "Qualification");
    assert_eq!(created.amount, Some(500.0));
    assert_eq!(created.close_date, NaiveDate::from_ymd_opt(2025, 1, 4).unwrap());
}

#[test]
fn test_unbounded_close_date_offset_rejected_at_load() {
    let err = LinkerConfig::from_yaml(
        r#"
opportunity_defaults:
  close_date_offset_days: 1000000000
"#,
    )
    .unwrap_err();

    assert!(matches!(err, ConfigError::Invalid(_)));
}
