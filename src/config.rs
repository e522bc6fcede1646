/* src/config.rs */

//!
//! Store configuration and the two-document catalog.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use validator::Validate;

use crate::StoreError;
use crate::codec::{AnyFormat, Format};
use crate::record::{DiseaseInfo, Medicine, Record};
use crate::store::{CollectionStore, CollectionStoreBuilder};

fn default_disease_info_file() -> String {
	"disease_info.json".to_string()
}

fn default_medicines_file() -> String {
	"disease_medicines.json".to_string()
}

fn default_lock_timeout_ms() -> u64 {
	5_000
}

/// Where the collection documents live and how they are accessed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct StoreConfig {
	/// Directory holding both documents. Created if absent.
	pub data_dir: PathBuf,
	#[serde(default = "default_disease_info_file")]
	#[validate(length(min = 1))]
	pub disease_info_file: String,
	#[serde(default = "default_medicines_file")]
	#[validate(length(min = 1))]
	pub medicines_file: String,
	/// Lock wait limit in milliseconds. `0` waits indefinitely.
	#[serde(default = "default_lock_timeout_ms")]
	pub lock_timeout_ms: u64,
	#[serde(default)]
	pub format: AnyFormat,
}

impl StoreConfig {
	/// A configuration with default file names under `data_dir`.
	pub fn new(data_dir: impl Into<PathBuf>) -> Self {
		Self {
			data_dir: data_dir.into(),
			disease_info_file: default_disease_info_file(),
			medicines_file: default_medicines_file(),
			lock_timeout_ms: default_lock_timeout_ms(),
			format: AnyFormat::default(),
		}
	}

	/// Reads a configuration file, choosing the parser by its extension.
	pub async fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
		let path = path.as_ref();
		let format = AnyFormat::from_path(path).ok_or_else(|| {
			StoreError::Config(format!("unsupported config file: {}", path.display()))
		})?;
		let bytes = tokio::fs::read(path)
			.await
			.map_err(|e| StoreError::io(path, e))?;
		let config: Self = format
			.parse(&bytes)
			.map_err(|e| StoreError::Config(e.to_string()))?;
		config.check()?;
		Ok(config)
	}

	/// Validates field values and that the two documents are distinct files.
	pub fn check(&self) -> Result<(), StoreError> {
		self.validate()?;
		if self.disease_info_path() == self.medicines_path() {
			return Err(StoreError::Config(format!(
				"disease info and medicines share one file: {}",
				self.medicines_path().display()
			)));
		}
		Ok(())
	}

	pub fn lock_timeout(&self) -> Option<Duration> {
		(self.lock_timeout_ms > 0).then(|| Duration::from_millis(self.lock_timeout_ms))
	}

	pub fn disease_info_path(&self) -> PathBuf {
		self.data_dir.join(&self.disease_info_file)
	}

	pub fn medicines_path(&self) -> PathBuf {
		self.data_dir.join(&self.medicines_file)
	}
}

/// The disease metadata and medicine documents, opened side by side.
///
/// The two documents are independent: each has its own file and locks.
#[derive(Debug, Clone)]
pub struct Catalog {
	diseases: CollectionStore<DiseaseInfo>,
	medicines: CollectionStore<Medicine>,
}

impl Catalog {
	pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
		config.check()?;

		let diseases = configure(CollectionStore::builder(), config)
			.path(config.disease_info_path())
			.open()
			.await?;
		let medicines = configure(CollectionStore::builder(), config)
			.path(config.medicines_path())
			.open()
			.await?;

		Ok(Self {
			diseases,
			medicines,
		})
	}

	pub fn diseases(&self) -> &CollectionStore<DiseaseInfo> {
		&self.diseases
	}

	pub fn medicines(&self) -> &CollectionStore<Medicine> {
		&self.medicines
	}
}

fn configure<R: Record>(
	builder: CollectionStoreBuilder<R>,
	config: &StoreConfig,
) -> CollectionStoreBuilder<R> {
	let builder = builder.format(config.format);
	match config.lock_timeout() {
		Some(timeout) => builder.lock_timeout(timeout),
		None => builder.no_lock_timeout(),
	}
}
