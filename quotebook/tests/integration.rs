//! End-to-end tests for the quote book
//!
//! These tests drive the public API with real storage and sources where
//! practical and mockall mocks where a failure has to be forced.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use quotebook::services::{ManualClock, MemoryStorage, RealFileStorage, SimulatedSource};
use quotebook::*;
use shared::{default_quotes, CategoryFilter, Quote};

mod common;
use common::{BookBuilder, TestFixtures, TestHelpers};

/// Quotes and the selected category survive a restart on disk
#[tokio::test]
async fn test_file_backed_book_survives_reopen() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let open = || {
        QuoteBook::open(
            RealFileStorage::with_base_dir(dir.path().to_path_buf()),
            ManualClock::new(TestFixtures::NOW),
        )
    };
    let book = open().await.unwrap();

    // Act
    let added = book.add("Stay curious.", "Learning").await.unwrap();
    book.select_category(CategoryFilter::named("Learning")).await.unwrap();
    drop(book);
    let reopened = open().await.unwrap();

    // Assert
    assert_eq!(reopened.len().await, 3);
    assert!(reopened.quotes().await.contains(&added));
    assert_eq!(reopened.selected_category().await, CategoryFilter::named("Learning"));
}

/// A fresh book starts from the built-in defaults
#[tokio::test]
async fn test_new_book_starts_with_defaults() {
    let book = BookBuilder::new().build().await;

    assert_eq!(book.quotes().await, default_quotes());
    assert_eq!(book.selected_category().await, CategoryFilter::All);
}

/// Corrupt persisted state is replaced by the defaults instead of failing
#[tokio::test]
async fn test_malformed_persisted_state_falls_back_to_defaults() {
    let book = BookBuilder::new()
        .with_raw(QUOTES_KEY, "{ this is not json")
        .await
        .build()
        .await;

    assert_eq!(book.quotes().await, default_quotes());
}

/// A storage read failure is surfaced rather than masked
#[tokio::test]
async fn test_storage_read_failure_is_reported() {
    let mut storage = MockKeyValueStore::new();
    storage
        .expect_get()
        .returning(|key| Err(QuotebookError::storage("read", key, "disk unavailable")));

    let result = QuoteBook::open(storage, ManualClock::new(TestFixtures::NOW)).await;

    assert!(matches!(result, Err(QuotebookError::StorageError { .. })));
}

/// Syncing with the simulated server merges and persists the result
#[tokio::test]
async fn test_sync_with_simulated_source() {
    // Arrange
    let builder = BookBuilder::new();
    let storage = builder.storage();
    let book = builder.build().await;
    let reconciler = Reconciler::new(SimulatedSource::new().with_delay(Duration::ZERO));

    // Act
    let outcome = reconciler.reconcile(&book).await.unwrap();

    // Assert
    assert_eq!((outcome.added, outcome.updated), (2, 1));
    assert_eq!(TestHelpers::ids(&book.quotes().await), vec!["1", "2", "3", "4"]);
    assert_eq!(book.quotes().await[0].text, "Believe in yourself and all that you are.");
    assert_eq!(TestHelpers::persisted_quotes(&storage).await, book.quotes().await);
}

/// Newer remote copies win, stale ones lose, unknown ids are appended
#[tokio::test]
async fn test_last_writer_wins_across_a_snapshot() {
    let book = TestHelpers::local_book().await;
    let reconciler = Reconciler::new(TestHelpers::source_returning(TestFixtures::remote_snapshot()));

    let outcome = reconciler.reconcile(&*book).await.unwrap();

    assert_eq!(outcome, MergeOutcome { added: 1, updated: 1, unchanged: 1 });
    let quotes = book.quotes().await;
    assert_eq!(TestHelpers::ids(&quotes), vec!["1", "2", "3", "99"]);
    assert_eq!(quotes[0].text, "Believe in yourself, always.");
    assert_eq!(quotes[1].text, "Less, but better.");
}

/// Reconciling the same snapshot twice changes nothing the second time
#[tokio::test]
async fn test_reconcile_is_idempotent() {
    let book = TestHelpers::local_book().await;
    let reconciler = Reconciler::new(TestHelpers::source_returning(TestFixtures::remote_snapshot()));

    reconciler.reconcile(&*book).await.unwrap();
    let after_first = book.quotes().await;
    let second = reconciler.reconcile(&*book).await.unwrap();

    assert!(!second.changed());
    assert_eq!(book.quotes().await, after_first);
}

/// A failed fetch leaves both memory and storage untouched
#[tokio::test]
async fn test_failed_sync_changes_nothing() {
    let builder = BookBuilder::new().with_quotes(&TestFixtures::local_quotes()).await;
    let storage = builder.storage();
    let book = builder.build().await;
    let reconciler = Reconciler::new(TestHelpers::failing_source());

    let err = reconciler.reconcile(&book).await.unwrap_err();

    assert!(matches!(err, QuotebookError::TransportFailure(_)));
    assert_eq!(book.quotes().await, TestFixtures::local_quotes());
    assert_eq!(TestHelpers::persisted_quotes(&storage).await, TestFixtures::local_quotes());
}

/// Quotes added while a fetch is in flight are kept after the merge
#[tokio::test(start_paused = true)]
async fn test_add_during_fetch_is_not_lost() {
    let book = TestHelpers::local_book().await;
    let source = SimulatedSource::with_snapshot(TestFixtures::remote_snapshot())
        .with_delay(Duration::from_secs(1));
    let reconciler = Reconciler::new(source);

    let sync_book = Arc::clone(&book);
    let sync = tokio::spawn(async move { reconciler.reconcile(&*sync_book).await });

    // Let the fetch start, then add while it is pending
    tokio::time::sleep(Duration::from_millis(100)).await;
    let added = book.add("Added mid-sync.", "Live").await.unwrap();

    sync.await.unwrap().unwrap();

    let quotes = book.quotes().await;
    assert_eq!(quotes.len(), 5);
    assert!(quotes.contains(&added));
    assert!(quotes.iter().any(|q| q.text == "Fresh from the server."));
}

/// The scheduler syncs on start and then every period
#[tokio::test(start_paused = true)]
async fn test_scheduler_notifies_on_change_only() {
    let book = TestHelpers::local_book().await;
    let source = SimulatedSource::with_snapshot(TestFixtures::remote_snapshot())
        .with_delay(Duration::from_millis(10));
    let handle = source.clone();
    let mut scheduler = SyncScheduler::new(book.clone(), Reconciler::new(source), DEFAULT_SYNC_INTERVAL);
    let mut events = scheduler.subscribe();
    let shutdown = scheduler.get_shutdown_sender();

    let running = tokio::spawn(async move { scheduler.run().await });

    assert_eq!(events.recv().await.unwrap(), SyncEvent::Updated { added: 1, updated: 1 });
    assert_eq!(events.recv().await.unwrap(), SyncEvent::Unchanged);

    handle
        .replace_snapshot(vec![Quote::new(7, "Late arrival.", "Server", 20)])
        .await;
    assert_eq!(events.recv().await.unwrap(), SyncEvent::Updated { added: 1, updated: 0 });

    shutdown.send(()).await.unwrap();
    assert_eq!(running.await.unwrap().unwrap(), 3);
    assert_eq!(book.len().await, 5);
}

/// Export from one book and import into another keeps every quote
#[tokio::test]
async fn test_export_then_import_into_empty_book() {
    let source = TestHelpers::local_book().await;
    let target = BookBuilder::new().with_raw(QUOTES_KEY, "[]").await.build().await;

    let exported = source.export_json().await.unwrap();
    let report = target.import_json(&exported).await.unwrap();

    assert!(report.is_clean());
    assert_eq!(report.imported_count(), 3);
    let contents = |quotes: Vec<Quote>| -> Vec<(String, String, String)> {
        quotes
            .into_iter()
            .map(|q| (q.id.to_string(), q.text, q.category))
            .collect()
    };
    assert_eq!(contents(target.quotes().await), contents(source.quotes().await));
}

/// Malformed records are skipped and reported; valid ones are imported
#[tokio::test]
async fn test_import_skips_malformed_records() {
    let builder = BookBuilder::new().with_quotes(&TestFixtures::local_quotes()).await;
    let storage = builder.storage();
    let book = builder.build().await;
    let records = match TestFixtures::mixed_import() {
        serde_json::Value::Array(records) => records,
        _ => unreachable!(),
    };

    let report = book.import_records(records).await.unwrap();

    assert_eq!(report.imported_count(), 2);
    let rejected: Vec<usize> = report.rejected.iter().map(|r| r.index).collect();
    assert_eq!(rejected, vec![2, 3, 4]);
    assert_eq!(report.imported[1].id.to_string(), "50");
    assert!(report.imported.iter().all(|q| q.updated_at == TestFixtures::NOW));
    assert_eq!(TestHelpers::persisted_quotes(&storage).await.len(), 5);
}

/// A document that is not an array is rejected without changes
#[tokio::test]
async fn test_malformed_import_document_is_rejected() {
    let book = TestHelpers::local_book().await;

    for raw in ["not json", "{\"text\": \"single\"}"] {
        let err = book.import_json(raw).await.unwrap_err();
        assert!(matches!(err, QuotebookError::MalformedImportDocument { .. }));
    }
    assert_eq!(book.quotes().await, TestFixtures::local_quotes());
}

/// Imported ids that collide with existing ones are replaced
#[tokio::test]
async fn test_import_colliding_id_gets_fresh_one() {
    let book = TestHelpers::local_book().await;

    let report = book
        .import_json(r#"[{ "id": 1, "text": "Clash", "category": "Design" }]"#)
        .await
        .unwrap();

    let imported = &report.imported[0];
    assert_ne!(imported.id.to_string(), "1");
    assert_eq!(book.quotes().await[0].text, "Believe in yourself.");
}

/// Adding persists immediately and timestamps with the clock
#[tokio::test]
async fn test_add_persists_with_clock_time() {
    let builder = BookBuilder::new();
    let storage = builder.storage();
    let clock = builder.clock();
    let book = builder.build().await;
    clock.advance(1_000);

    let quote = book.add("  Padded text  ", " Focus ").await.unwrap();

    assert_eq!(quote.text, "Padded text");
    assert_eq!(quote.category, "Focus");
    assert_eq!(quote.updated_at, TestFixtures::NOW + 1_000);
    assert_eq!(TestHelpers::persisted_quotes(&storage).await.last(), Some(&quote));
}

/// Blank input is rejected and nothing is stored
#[tokio::test]
async fn test_add_rejects_blank_input() {
    let book = TestHelpers::local_book().await;

    let err = book.add("   ", "Design").await.unwrap_err();

    assert!(matches!(err, QuotebookError::InvalidInput { .. }));
    assert_eq!(book.len().await, 3);
}

/// A failing write is reported to the caller and the add is undone
#[tokio::test]
async fn test_add_reports_write_failure() {
    let mut storage = MockKeyValueStore::new();
    storage.expect_get().returning(|_| Ok(None));
    storage
        .expect_set()
        .returning(|key, _| Err(QuotebookError::storage("write", key, "read-only file system")));
    let book = QuoteBook::open(storage, ManualClock::new(TestFixtures::NOW)).await.unwrap();

    let err = book.add("Keep going.", "Motivation").await.unwrap_err();

    assert!(matches!(err, QuotebookError::StorageError { .. }));
    assert_eq!(book.quotes().await, default_quotes());
}

/// A saved category that disappeared falls back to all
#[tokio::test]
async fn test_vanished_selected_category_falls_back_to_all() {
    let book = BookBuilder::new()
        .with_quotes(&TestFixtures::local_quotes())
        .await
        .with_raw(SELECTED_CATEGORY_KEY, "Cooking")
        .await
        .build()
        .await;

    assert_eq!(book.selected_category().await, CategoryFilter::All);
}

/// Random quotes come from the selected category and are remembered
#[tokio::test]
async fn test_show_random_respects_selection() {
    let book = TestHelpers::local_book().await;
    book.select_category(CategoryFilter::named(TestFixtures::DESIGN))
        .await
        .unwrap();

    for _ in 0..5 {
        let shown = book.show_random().await.unwrap().unwrap();
        assert_eq!(shown.category, TestFixtures::DESIGN);
        assert_eq!(book.last_viewed().await.unwrap(), Some(shown));
    }
}

/// An empty filter result shows nothing
#[tokio::test]
async fn test_show_random_with_no_match() {
    let book = TestHelpers::local_book().await;
    book.select_category(CategoryFilter::named("Nowhere")).await.unwrap();

    assert_eq!(book.show_random().await.unwrap(), None);
    assert_eq!(book.last_viewed().await.unwrap(), None);
}

/// Filter options list all first, then categories in first-seen order
#[tokio::test]
async fn test_filter_options_order() {
    let book = TestHelpers::local_book().await;
    book.add("Ship it.", "Action").await.unwrap();

    let options: Vec<String> = book
        .filter_options()
        .await
        .into_iter()
        .map(|option| option.to_string())
        .collect();

    assert_eq!(options, vec!["all", "Motivation", "Design", "Action"]);
}

/// The session key never reaches persistent storage
#[tokio::test]
async fn test_last_viewed_is_session_only() {
    let storage = MemoryStorage::new();
    let book = QuoteBook::open(storage.clone(), ManualClock::new(TestFixtures::NOW))
        .await
        .unwrap();

    book.show_random().await.unwrap();

    assert_eq!(storage.get(LAST_VIEWED_KEY).await.unwrap(), None);
}
