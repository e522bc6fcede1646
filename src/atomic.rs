/* src/atomic.rs */

//!
//! Whole-file replacement that readers never observe half-done.
//!
//! New content goes to a temporary file beside the target, is synced, and is
//! then renamed over the target. The rename is the only step that changes
//! what readers see; any failure before it leaves the target untouched and
//! removes the temporary file.

use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::StoreError;

static STAGE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Atomically replaces `path` with `bytes`.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
	StagedFile::stage(path, bytes).await?.commit().await
}

/// Content written and synced beside its target, not yet visible to readers.
///
/// Dropping a staged file without committing it removes the temporary file,
/// which is exactly the state an interrupted write leaves behind.
#[derive(Debug)]
pub struct StagedFile {
	target: PathBuf,
	temp: PathBuf,
	committed: bool,
}

impl StagedFile {
	/// Writes `bytes` to a fresh temporary file in the target's directory.
	pub async fn stage(target: &Path, bytes: &[u8]) -> Result<Self, StoreError> {
		let temp = temp_path_for(target)?;

		let file = fs::OpenOptions::new()
			.write(true)
			.create_new(true)
			.open(&temp)
			.await
			.map_err(|e| staging_failed(&temp, e))?;

		if let Err(e) = write_synced(file, bytes).await {
			let _ = fs::remove_file(&temp).await;
			return Err(staging_failed(&temp, e));
		}

		Ok(Self {
			target: target.to_path_buf(),
			temp,
			committed: false,
		})
	}

	pub fn target(&self) -> &Path {
		&self.target
	}

	pub fn temp_path(&self) -> &Path {
		&self.temp
	}

	/// Renames the temporary file over the target.
	pub async fn commit(mut self) -> Result<(), StoreError> {
		match fs::rename(&self.temp, &self.target).await {
			Ok(()) => {
				self.committed = true;
				Ok(())
			}
			Err(e) => {
				#[cfg(feature = "logging")]
				log::error!("failed to replace {}: {}", self.target.display(), e);
				Err(StoreError::io(&self.target, e))
			}
		}
	}
}

impl Drop for StagedFile {
	// A single blocking unlink; only reached for staged files never committed.
	fn drop(&mut self) {
		if !self.committed {
			let _ = std::fs::remove_file(&self.temp);
		}
	}
}

async fn write_synced(mut file: fs::File, bytes: &[u8]) -> io::Result<()> {
	file.write_all(bytes).await?;
	file.flush().await?;
	file.sync_all().await
}

fn staging_failed(temp: &Path, e: io::Error) -> StoreError {
	#[cfg(feature = "logging")]
	log::error!("failed to stage {}: {}", temp.display(), e);
	StoreError::io(temp, e)
}

fn temp_path_for(target: &Path) -> Result<PathBuf, StoreError> {
	let file_name = target.file_name().ok_or_else(|| {
		StoreError::io(
			target,
			io::Error::new(io::ErrorKind::InvalidInput, "target has no file name"),
		)
	})?;

	let seq = STAGE_SEQ.fetch_add(1, Ordering::Relaxed);
	let temp_name = format!(
		".{}.{}.{}.tmp",
		file_name.to_string_lossy(),
		process::id(),
		seq
	);

	Ok(match target.parent() {
		Some(dir) if !dir.as_os_str().is_empty() => dir.join(temp_name),
		_ => PathBuf::from(temp_name),
	})
}
