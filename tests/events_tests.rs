/* tests/events_tests.rs */

#![cfg(feature = "events")]

use std::time::Duration;

use paddy_store::{Collection, CollectionStore, Medicine, StoreEvent};

#[tokio::test]
async fn test_events_follow_commit_order() {
	let dir = tempfile::tempdir().unwrap();
	let store = CollectionStore::<Medicine>::open(dir.path().join("medicines.json"))
		.await
		.unwrap();
	let mut rx = store.subscribe();

	store.insert_record("blast", Medicine::named("A")).await.unwrap();
	store.update_record("blast", 0, Medicine::named("B")).await.unwrap();
	store.delete_record("blast", 0).await.unwrap();
	store.delete_category("blast").await.unwrap();

	match rx.recv().await.unwrap() {
		StoreEvent::Inserted { key, index, record, version } => {
			assert_eq!(key, "blast");
			assert_eq!(index, 0);
			assert_eq!(record.name, "A");
			assert_eq!(version, 1);
		}
		other => panic!("expected insert, got {:?}", other),
	}
	match rx.recv().await.unwrap() {
		StoreEvent::Updated { old, new, version, .. } => {
			assert_eq!(old.name, "A");
			assert_eq!(new.name, "B");
			assert_eq!(version, 2);
		}
		other => panic!("expected update, got {:?}", other),
	}
	match rx.recv().await.unwrap() {
		StoreEvent::Deleted { record, version, .. } => {
			assert_eq!(record.name, "B");
			assert_eq!(version, 3);
		}
		other => panic!("expected delete, got {:?}", other),
	}
	let last = rx.recv().await.unwrap();
	assert!(matches!(last, StoreEvent::CategoryDeleted { ref records, .. } if records.is_empty()));
	assert_eq!(last.key(), "blast");
	assert_eq!(last.version(), 4);
}

#[tokio::test]
async fn test_failed_changes_emit_nothing() {
	let dir = tempfile::tempdir().unwrap();
	let store = CollectionStore::<Medicine>::open(dir.path().join("medicines.json"))
		.await
		.unwrap();
	let mut rx = store.subscribe();

	assert!(store.delete_record("blast", 0).await.is_err());
	assert!(store.insert_record("blast", Medicine::named("")).await.is_err());

	assert!(rx.try_recv().is_err());
	assert_eq!(store.version(), 0);
}

#[tokio::test]
async fn test_event_sent_when_caller_is_cancelled() {
	let dir = tempfile::tempdir().unwrap();
	let mut seed = Collection::new();
	seed.insert(
		"tungro".to_string(),
		(0..2_000).map(|i| Medicine::named(format!("seed-{}", i))).collect(),
	);
	let store = CollectionStore::<Medicine>::builder()
		.path(dir.path().join("medicines.json"))
		.seed(seed)
		.no_lock_timeout()
		.open()
		.await
		.unwrap();
	let mut rx = store.subscribe();

	let caller = {
		let store = store.clone();
		tokio::spawn(async move {
			store
				.insert_record("blast", Medicine::named("Detached"))
				.await
		})
	};
	let _ = tokio::time::timeout(Duration::from_secs(5), async {
		while !store.locks().is_locked("blast") {
			tokio::task::yield_now().await;
		}
	})
	.await;
	caller.abort();
	let _ = caller.await;

	let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
		.await
		.unwrap()
		.unwrap();
	assert!(matches!(event, StoreEvent::Inserted { index: 0, version: 1, .. }));
	assert_eq!(event.key(), "blast");
}
