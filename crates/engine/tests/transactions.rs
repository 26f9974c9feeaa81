use sea_orm::Database;

use engine::{
    CreateTransactionCmd, Engine, EngineError, Money, PageRequest, SortDirection, SortField,
    TransactionListFilter, TransactionStatus,
};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build()
}

async fn strict_engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder()
        .database(db)
        .reject_duplicates(true)
        .build()
}

fn transfer(from: &str, to: &str, cents: i64) -> CreateTransactionCmd {
    CreateTransactionCmd::new(from, to, Money::new(cents))
}

#[tokio::test]
async fn identifiers_are_sequential_and_padded() {
    let engine = engine_with_db().await;

    for expected in ["TX0001", "TX0002", "TX0003"] {
        let record = engine.create(transfer("001", "002", 10_00)).await.unwrap();
        assert_eq!(record.id, expected);
    }
}

#[tokio::test]
async fn identifier_sequence_survives_deletion() {
    let engine = engine_with_db().await;

    engine
        .create(transfer("001", "002", 10_00).status(TransactionStatus::Pending))
        .await
        .unwrap();
    let second = engine
        .create(transfer("001", "002", 20_00).status(TransactionStatus::Pending))
        .await
        .unwrap();
    engine.delete(&second.id).await.unwrap();

    // Max-scan allocation: TX0002 is free again after the delete.
    let third = engine.create(transfer("001", "002", 30_00)).await.unwrap();
    assert_eq!(third.id, "TX0002");
}

#[tokio::test]
async fn create_fills_defaults() {
    let engine = engine_with_db().await;

    let record = engine.create(transfer("001", "002", 500_00)).await.unwrap();
    assert_eq!(record.status, TransactionStatus::Completed);
    assert_eq!(record.currency.code(), "ZAR");
    assert_eq!(record.amount, Money::new(500_00));
    assert!(record.description.is_none());
}

#[tokio::test]
async fn create_rejects_same_account_transfer() {
    let engine = engine_with_db().await;

    let err = engine.create(transfer("001", "001", 10_00)).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidOperation(_)));
}

#[tokio::test]
async fn lookup_of_unknown_id_is_not_found() {
    let engine = engine_with_db().await;

    let err = engine.transaction("TX9999").await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("TX9999".to_string()));
}

#[tokio::test]
async fn refunded_status_is_terminal() {
    let engine = engine_with_db().await;

    let record = engine.create(transfer("001", "002", 10_00)).await.unwrap();
    engine
        .update_status(&record.id, TransactionStatus::Refunded)
        .await
        .unwrap();

    let err = engine
        .update_status(&record.id, TransactionStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidOperation(_)));

    // The no-op transition back to refunded is allowed.
    let same = engine
        .update_status(&record.id, TransactionStatus::Refunded)
        .await
        .unwrap();
    assert_eq!(same.status, TransactionStatus::Refunded);
}

#[tokio::test]
async fn completed_records_cannot_be_deleted() {
    let engine = engine_with_db().await;

    let record = engine.create(transfer("001", "002", 10_00)).await.unwrap();
    let err = engine.delete(&record.id).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidOperation(_)));

    // Still present after the rejected delete.
    assert!(engine.transaction(&record.id).await.is_ok());
}

#[tokio::test]
async fn pending_record_delete_then_lookup_is_not_found() {
    let engine = engine_with_db().await;

    let record = engine
        .create(transfer("001", "002", 10_00).status(TransactionStatus::Pending))
        .await
        .unwrap();
    engine.delete(&record.id).await.unwrap();

    let err = engine.transaction(&record.id).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound(record.id));
}

#[tokio::test]
async fn batch_failures_do_not_abort_the_batch() {
    let engine = engine_with_db().await;

    let outcome = engine
        .create_batch(vec![
            transfer("001", "002", 10_00),
            transfer("003", "003", 20_00),
            transfer("002", "001", 30_00),
        ])
        .await
        .unwrap();

    assert_eq!(outcome.success_count, 2);
    assert_eq!(outcome.failure_count, 1);
    assert_eq!(outcome.created_ids, vec!["TX0001", "TX0002"]);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].index, 1);
    assert!(outcome.errors[0].message.contains("003"));
}

#[tokio::test]
async fn duplicate_triple_is_rejected_when_configured() {
    let engine = strict_engine_with_db().await;

    engine.create(transfer("001", "002", 500_00)).await.unwrap();
    let err = engine
        .create(transfer("001", "002", 500_00))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    // A different amount is not a duplicate.
    engine.create(transfer("001", "002", 500_01)).await.unwrap();
}

#[tokio::test]
async fn duplicates_pass_by_default() {
    let engine = engine_with_db().await;

    engine.create(transfer("001", "002", 500_00)).await.unwrap();
    engine.create(transfer("001", "002", 500_00)).await.unwrap();
}

#[tokio::test]
async fn list_filters_by_account_on_either_side() {
    let engine = engine_with_db().await;
    engine.create(transfer("001", "002", 10_00)).await.unwrap();
    engine.create(transfer("002", "003", 20_00)).await.unwrap();
    engine.create(transfer("003", "004", 30_00)).await.unwrap();

    let filter = TransactionListFilter {
        account: Some("002".to_string()),
        status: None,
    };
    let page = engine.list(&filter, &PageRequest::default()).await.unwrap();

    assert_eq!(page.total_elements, 2);
    assert!(
        page.items
            .iter()
            .all(|t| t.from_account == "002" || t.to_account == "002")
    );
}

#[tokio::test]
async fn list_filters_by_status() {
    let engine = engine_with_db().await;
    engine
        .create(transfer("001", "002", 10_00).status(TransactionStatus::Pending))
        .await
        .unwrap();
    engine.create(transfer("001", "002", 20_00)).await.unwrap();

    let filter = TransactionListFilter {
        account: None,
        status: Some(TransactionStatus::Pending),
    };
    let page = engine.list(&filter, &PageRequest::default()).await.unwrap();

    assert_eq!(page.total_elements, 1);
    assert_eq!(page.items[0].status, TransactionStatus::Pending);
}

#[tokio::test]
async fn list_paginates_with_boundary_metadata() {
    let engine = engine_with_db().await;
    for n in 0..25 {
        engine.create(transfer("001", "002", 100 + n)).await.unwrap();
    }

    let filter = TransactionListFilter::default();
    let first = engine.list(&filter, &PageRequest::default()).await.unwrap();
    assert_eq!(first.items.len(), 20);
    assert_eq!(first.total_elements, 25);
    assert_eq!(first.total_pages, 2);
    assert!(first.first);
    assert!(!first.last);

    let second = engine
        .list(
            &filter,
            &PageRequest {
                page: 1,
                ..PageRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(second.items.len(), 5);
    assert!(!second.first);
    assert!(second.last);

    // Out-of-range pages yield an empty slice, not an error.
    let beyond = engine
        .list(
            &filter,
            &PageRequest {
                page: 5,
                ..PageRequest::default()
            },
        )
        .await
        .unwrap();
    assert!(beyond.items.is_empty());
    assert!(beyond.last);
}

#[tokio::test]
async fn list_sorts_by_amount_descending() {
    let engine = engine_with_db().await;
    for cents in [30_00, 10_00, 20_00] {
        engine.create(transfer("001", "002", cents)).await.unwrap();
    }

    let page = engine
        .list(
            &TransactionListFilter::default(),
            &PageRequest {
                sort: SortField::Amount,
                direction: SortDirection::Descending,
                ..PageRequest::default()
            },
        )
        .await
        .unwrap();

    let amounts: Vec<i64> = page.items.iter().map(|t| t.amount.cents()).collect();
    assert_eq!(amounts, vec![30_00, 20_00, 10_00]);
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let engine = engine_with_db().await;
    engine
        .create(transfer("001", "002", 10_00).description("Grocery Shopping"))
        .await
        .unwrap();
    engine
        .create(transfer("001", "002", 20_00).description("rent"))
        .await
        .unwrap();
    engine.create(transfer("001", "002", 30_00)).await.unwrap();

    let hits = engine.search("GROCERY").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].description.as_deref(), Some("Grocery Shopping"));

    let err = engine.search("   ").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidOperation(_)));
}

#[tokio::test]
async fn search_treats_wildcard_characters_literally() {
    let engine = engine_with_db().await;
    engine
        .create(transfer("001", "002", 10_00).description("discount 50% off"))
        .await
        .unwrap();
    engine
        .create(transfer("001", "002", 20_00).description("snack_bar"))
        .await
        .unwrap();

    // "%" and "_" match only themselves, never act as wildcards.
    assert!(engine.search("n% o").await.unwrap().is_empty());
    assert!(engine.search("s_ack").await.unwrap().is_empty());

    let hits = engine.search("50%").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].description.as_deref(), Some("discount 50% off"));

    let hits = engine.search("snack_").await.unwrap();
    assert_eq!(hits.len(), 1);
}

#[tokio::test]
async fn large_transactions_are_strictly_above_threshold() {
    let engine = engine_with_db().await;
    for cents in [1000_00, 1000_01, 999_99] {
        engine.create(transfer("001", "002", cents)).await.unwrap();
    }

    let hits = engine.large_transactions(Money::new(1000_00)).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].amount, Money::new(1000_01));
}

#[tokio::test]
async fn statistics_aggregate_count_total_average_and_breakdown() {
    let engine = engine_with_db().await;
    engine.create(transfer("001", "002", 100_00)).await.unwrap();
    engine.create(transfer("001", "002", 200_00)).await.unwrap();
    engine
        .create(transfer("001", "002", 300_00).status(TransactionStatus::Pending))
        .await
        .unwrap();

    let stats = engine.statistics().await.unwrap();
    assert_eq!(stats.total_transactions, 3);
    assert_eq!(stats.total_amount, Money::new(600_00));
    assert_eq!(stats.average_amount, Money::new(200_00));
    assert_eq!(
        stats.status_breakdown.get(&TransactionStatus::Completed),
        Some(&2)
    );
    assert_eq!(
        stats.status_breakdown.get(&TransactionStatus::Pending),
        Some(&1)
    );
}

#[tokio::test]
async fn statistics_on_empty_store_are_zero() {
    let engine = engine_with_db().await;

    let stats = engine.statistics().await.unwrap();
    assert_eq!(stats.total_transactions, 0);
    assert_eq!(stats.total_amount, Money::ZERO);
    assert_eq!(stats.average_amount, Money::ZERO);
    assert!(stats.status_breakdown.is_empty());
}
