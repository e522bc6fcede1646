/* src/store/session.rs */

use std::sync::Arc;
use std::time::Instant;

use crate::StoreError;
use crate::codec::Collection;
use crate::record::Record;

use super::Document;

/// Where a change session is in its read-modify-write cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
	Idle,
	Locked,
	Loaded,
	Mutated,
	Persisted,
	Failed,
}

impl Phase {
	fn can_advance_to(self, next: Phase) -> bool {
		matches!(
			(self, next),
			(Phase::Idle, Phase::Locked)
				| (Phase::Locked, Phase::Loaded)
				| (Phase::Loaded, Phase::Mutated)
				| (Phase::Mutated, Phase::Persisted)
				| (Phase::Persisted, Phase::Idle)
				| (Phase::Locked | Phase::Loaded | Phase::Mutated, Phase::Failed)
				| (Phase::Failed, Phase::Idle)
		)
	}
}

/// One read-modify-write cycle over a document, scoped to one category key.
///
/// Success: `Idle -> Locked -> Loaded -> Mutated -> Persisted -> Idle`.
/// Failure: `Locked -> .. -> Failed -> Idle`, with no write performed.
/// The mutation works on a freshly decoded copy, so discarding that copy on
/// failure is the whole rollback.
pub(crate) struct ChangeSession {
	doc: Arc<Document>,
	key: String,
	phase: Phase,
}

impl ChangeSession {
	pub(crate) fn new(doc: Arc<Document>, key: impl Into<String>) -> Self {
		Self {
			doc,
			key: key.into(),
			phase: Phase::Idle,
		}
	}

	/// Runs `mutation` against the latest snapshot and persists the result.
	///
	/// Lock waits are bounded by the document's timeout and may be abandoned
	/// by dropping the returned future. Once both locks are held the cycle
	/// runs on its own task and completes even if the caller goes away.
	/// `on_commit` runs on that task after the write, with both locks still
	/// held, so commits are observed in the order they reached the disk.
	pub(crate) async fn run<R, T, F, C>(mut self, mutation: F, on_commit: C) -> Result<T, StoreError>
	where
		R: Record,
		T: Send + 'static,
		F: FnOnce(&mut Collection<R>) -> Result<T, StoreError> + Send + 'static,
		C: FnOnce(&T) + Send + 'static,
	{
		let started = Instant::now();
		let timeout = self.doc.lock_timeout;

		let key_guard = self.doc.locks.acquire(&self.key, timeout).await?;
		let remaining = timeout.map(|limit| limit.saturating_sub(started.elapsed()));
		let doc_guard = self.doc.locks.acquire_document(remaining).await?;
		self.advance(Phase::Locked);

		let task = tokio::spawn(async move {
			let outcome = self.cycle(mutation, on_commit).await;
			drop(doc_guard);
			drop(key_guard);
			self.advance(Phase::Idle);
			outcome
		});

		task.await
			.map_err(|e| StoreError::Aborted(e.to_string()))?
	}

	async fn cycle<R, T, F, C>(&mut self, mutation: F, on_commit: C) -> Result<T, StoreError>
	where
		R: Record,
		F: FnOnce(&mut Collection<R>) -> Result<T, StoreError>,
		C: FnOnce(&T),
	{
		let mut collection = match self.doc.load::<R>().await {
			Ok(collection) => collection,
			Err(e) => return self.fail(e),
		};
		self.advance(Phase::Loaded);

		let output = match mutation(&mut collection) {
			Ok(output) => output,
			Err(e) => return self.fail(e),
		};
		self.advance(Phase::Mutated);

		if let Err(e) = self.doc.persist(&collection).await {
			return self.fail(e);
		}
		self.advance(Phase::Persisted);
		on_commit(&output);

		Ok(output)
	}

	fn fail<T>(&mut self, error: StoreError) -> Result<T, StoreError> {
		#[cfg(feature = "logging")]
		log::debug!(
			"change to '{}' in {} failed after {:?}: {}",
			self.key,
			self.doc.path.display(),
			self.phase,
			error
		);
		self.advance(Phase::Failed);
		Err(error)
	}

	fn advance(&mut self, next: Phase) {
		debug_assert!(
			self.phase.can_advance_to(next),
			"invalid session transition {:?} -> {:?}",
			self.phase,
			next
		);
		#[cfg(feature = "logging")]
		log::trace!("session '{}': {:?} -> {:?}", self.key, self.phase, next);
		self.phase = next;
	}
}
