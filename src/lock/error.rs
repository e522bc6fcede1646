/* src/lock/error.rs */

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LockError {
	/// The wait for a lock exceeded its limit. Nothing was held or changed.
	#[error("timed out after {waited:?} waiting for lock on '{key}'")]
	Timeout { key: String, waited: Duration },
}
