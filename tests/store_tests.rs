/* tests/store_tests.rs */

use std::path::PathBuf;

use paddy_store::{Collection, CollectionStore, ErrorKind, Medicine, StoreError};
use tempfile::TempDir;

async fn open_store() -> (TempDir, PathBuf, CollectionStore<Medicine>) {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("disease_medicines.json");
	let store = CollectionStore::open(&path).await.unwrap();
	(dir, path, store)
}

#[tokio::test]
async fn test_insert_list_delete_scenario() {
	let (_dir, _path, store) = open_store().await;
	let medicine = Medicine::named("Tricyclazole 75% WP").with_priority(1);

	let index = store.insert_record("blast", medicine.clone()).await.unwrap();
	assert_eq!(index, 0);
	assert_eq!(store.list_records("blast").await.unwrap(), vec![medicine.clone()]);

	let removed = store.delete_record("blast", 0).await.unwrap();
	assert_eq!(removed, medicine);
	assert!(store.list_records("blast").await.unwrap().is_empty());
	assert_eq!(store.list_categories().await.unwrap(), vec!["blast"]);
}

#[tokio::test]
async fn test_delete_shifts_later_indices() {
	let (_dir, _path, store) = open_store().await;
	let r0 = Medicine::named("R0");
	let r1 = Medicine::named("R1");
	let r2 = Medicine::named("R2");

	for record in [&r0, &r1, &r2] {
		store.insert_record("blast", record.clone()).await.unwrap();
	}

	assert_eq!(store.delete_record("blast", 1).await.unwrap(), r1);
	assert_eq!(store.list_records("blast").await.unwrap(), vec![r0.clone(), r2.clone()]);
	assert_eq!(store.get_record("blast", 0).await.unwrap(), r0);
	assert_eq!(store.get_record("blast", 1).await.unwrap(), r2);
}

#[tokio::test]
async fn test_insert_appends_and_allows_duplicates() {
	let (_dir, _path, store) = open_store().await;

	assert_eq!(store.insert_record("blast", Medicine::named("Same")).await.unwrap(), 0);
	assert_eq!(store.insert_record("blast", Medicine::named("Same")).await.unwrap(), 1);
	assert_eq!(store.insert_record("brown_spot", Medicine::named("Same")).await.unwrap(), 0);

	assert_eq!(store.list_records("blast").await.unwrap().len(), 2);
	assert_eq!(
		store.list_categories().await.unwrap(),
		vec!["blast".to_string(), "brown_spot".to_string()]
	);
}

#[tokio::test]
async fn test_keys_are_case_sensitive() {
	let (_dir, _path, store) = open_store().await;
	store.insert_record("blast", Medicine::named("A")).await.unwrap();

	let err = store.list_records("Blast").await.unwrap_err();
	assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn test_update_replaces_record_wholesale() {
	let (_dir, _path, store) = open_store().await;
	let original = Medicine {
		brand: "Beam".to_string(),
		..Medicine::named("Tricyclazole").with_priority(2)
	};
	store.insert_record("blast", original).await.unwrap();

	let replacement = Medicine::named("Tricyclazole 75% WP");
	let updated = store.update_record("blast", 0, replacement.clone()).await.unwrap();

	assert_eq!(updated, replacement);
	let stored = store.get_record("blast", 0).await.unwrap();
	assert_eq!(stored.brand, "");
	assert_eq!(stored.priority, None);
}

#[tokio::test]
async fn test_modify_record_applies_in_place() {
	let (_dir, _path, store) = open_store().await;
	store
		.insert_record("blast", Medicine::named("Tricyclazole").with_priority(3))
		.await
		.unwrap();

	let modified = store
		.modify_record("blast", 0, |m| m.note = "apply at booting stage".to_string())
		.await
		.unwrap();

	assert_eq!(modified.priority, Some(3));
	assert_eq!(modified.note, "apply at booting stage");
	assert_eq!(store.get_record("blast", 0).await.unwrap(), modified);
}

#[tokio::test]
async fn test_missing_category_and_index_errors() {
	let (_dir, _path, store) = open_store().await;
	store.insert_record("blast", Medicine::named("A")).await.unwrap();

	let err = store.list_records("tungro").await.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::NotFound);
	assert_eq!(err.status_code(), 404);

	let err = store.get_record("tungro", 0).await.unwrap_err();
	assert!(matches!(err, StoreError::NotFound { ref key } if key == "tungro"));

	let err = store.get_record("blast", 1).await.unwrap_err();
	assert!(matches!(
		err,
		StoreError::IndexOutOfRange { index: 1, len: 1, .. }
	));
	assert_eq!(err.status_code(), 404);

	let err = store.delete_record("blast", 7).await.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);

	let err = store.update_record("tungro", 0, Medicine::named("B")).await.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::NotFound);

	let err = store.delete_category("tungro").await.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_out_of_range_update_leaves_document_unchanged() {
	let (_dir, path, store) = open_store().await;
	store.insert_record("blast", Medicine::named("A")).await.unwrap();
	let before = std::fs::read(&path).unwrap();

	let err = store
		.update_record("blast", 5, Medicine::named("B"))
		.await
		.unwrap_err();

	assert!(matches!(err, StoreError::IndexOutOfRange { index: 5, len: 1, .. }));
	assert_eq!(std::fs::read(&path).unwrap(), before);
	assert_eq!(store.version(), 1);
}

#[tokio::test]
async fn test_validation_rejects_without_writing() {
	let (_dir, path, store) = open_store().await;
	let before = std::fs::read(&path).unwrap();

	let err = store.insert_record("blast", Medicine::named("")).await.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Validation);
	assert_eq!(err.status_code(), 400);

	let err = store
		.insert_record("blast", Medicine::named("Zero").with_priority(0))
		.await
		.unwrap_err();
	assert!(matches!(err, StoreError::Validation(_)));

	assert_eq!(std::fs::read(&path).unwrap(), before);
	assert!(store.list_categories().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_modify_record_validates_result() {
	let (_dir, path, store) = open_store().await;
	store.insert_record("blast", Medicine::named("A")).await.unwrap();
	let before = std::fs::read(&path).unwrap();

	let err = store
		.modify_record("blast", 0, |m| m.name.clear())
		.await
		.unwrap_err();

	assert_eq!(err.kind(), ErrorKind::Validation);
	assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[tokio::test]
async fn test_delete_category_removes_key() {
	let (_dir, _path, store) = open_store().await;
	store.insert_record("blast", Medicine::named("A")).await.unwrap();
	store.insert_record("tungro", Medicine::named("B")).await.unwrap();

	store.delete_category("blast").await.unwrap();

	assert_eq!(store.list_categories().await.unwrap(), vec!["tungro"]);
	assert!(matches!(
		store.list_records("blast").await,
		Err(StoreError::NotFound { .. })
	));
}

#[tokio::test]
async fn test_list_by_priority_orders_for_display_only() {
	let (_dir, _path, store) = open_store().await;
	let records = [
		Medicine::named("A").with_priority(3),
		Medicine::named("B"),
		Medicine::named("C").with_priority(1),
		Medicine::named("D").with_priority(3),
	];
	for record in &records {
		store.insert_record("blast", record.clone()).await.unwrap();
	}

	let ordered = store.list_by_priority("blast").await.unwrap();
	let view: Vec<(usize, &str)> = ordered
		.iter()
		.map(|entry| (entry.index, entry.record.name.as_str()))
		.collect();
	assert_eq!(view, vec![(2, "C"), (0, "A"), (3, "D"), (1, "B")]);

	// Storage order is untouched.
	assert_eq!(store.list_records("blast").await.unwrap(), records.to_vec());
}

#[tokio::test]
async fn test_first_open_writes_seed() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("nested").join("disease_medicines.json");
	let mut seed = Collection::new();
	seed.insert("blast".to_string(), vec![Medicine::named("Seeded")]);

	let store = CollectionStore::<Medicine>::builder()
		.path(&path)
		.seed(seed.clone())
		.open()
		.await
		.unwrap();

	assert!(path.exists());
	assert_eq!(store.snapshot().await.unwrap(), seed);

	// An existing document is never replaced by the seed.
	store.insert_record("blast", Medicine::named("Added")).await.unwrap();
	let reopened = CollectionStore::<Medicine>::builder()
		.path(&path)
		.seed(Collection::new())
		.open()
		.await
		.unwrap();
	assert_eq!(reopened.list_records("blast").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_undecodable_document_is_reset_on_open() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("disease_medicines.json");
	std::fs::write(&path, b"{\"blast\": [").unwrap();

	let store = CollectionStore::<Medicine>::open(&path).await.unwrap();

	assert!(store.list_categories().await.unwrap().is_empty());
	assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}\n");
}

#[tokio::test]
async fn test_corruption_after_open_fails_operations_only() {
	let (_dir, path, store) = open_store().await;
	store.insert_record("blast", Medicine::named("A")).await.unwrap();

	std::fs::write(&path, b"[1, 2, 3]").unwrap();

	let err = store.list_records("blast").await.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Decode);
	assert_eq!(err.status_code(), 500);

	let err = store.insert_record("blast", Medicine::named("B")).await.unwrap_err();
	assert!(matches!(err, StoreError::Codec { .. }));
	assert_eq!(std::fs::read(&path).unwrap(), b"[1, 2, 3]");

	// A readable document makes the store usable again.
	std::fs::write(&path, b"{\"blast\": [{\"name\": \"A\"}]}").unwrap();
	assert_eq!(store.insert_record("blast", Medicine::named("B")).await.unwrap(), 1);
}

#[tokio::test]
async fn test_removed_file_reads_empty_and_is_recreated() {
	let (_dir, path, store) = open_store().await;
	store.insert_record("blast", Medicine::named("A")).await.unwrap();

	std::fs::remove_file(&path).unwrap();

	assert!(store.list_categories().await.unwrap().is_empty());
	assert_eq!(store.insert_record("tungro", Medicine::named("B")).await.unwrap(), 0);
	assert!(path.exists());
}

#[tokio::test]
async fn test_persisted_document_is_plain_json() {
	let (_dir, path, store) = open_store().await;
	store
		.insert_record("blast", Medicine::named("Tricyclazole 75% WP").with_priority(1))
		.await
		.unwrap();

	let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();

	assert_eq!(raw["blast"][0]["name"], "Tricyclazole 75% WP");
	assert_eq!(raw["blast"][0]["priority"], 1);
	assert_eq!(raw["blast"][0]["brand"], "");
}

#[tokio::test]
async fn test_builder_requires_path() {
	let err = CollectionStore::<Medicine>::builder().open().await.unwrap_err();
	assert!(matches!(err, StoreError::Builder(_)));
}

#[tokio::test]
async fn test_unmodeled_fields_kept_in_untouched_categories() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("disease_medicines.json");
	std::fs::write(&path, br#"{"blast": [{"name": "A", "dosage": "2 g/L"}]}"#).unwrap();
	let store = CollectionStore::<Medicine>::open(&path).await.unwrap();

	store.insert_record("tungro", Medicine::named("B")).await.unwrap();

	let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
	assert_eq!(raw["blast"][0]["dosage"], "2 g/L");
	assert_eq!(raw["tungro"][0]["name"], "B");
	assert_eq!(store.get_record("blast", 0).await.unwrap().extra["dosage"], "2 g/L");
}
