// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! TalentFlow mutation engine: optimistic updates, confirmation and
//! rollback, per-entity serialization and write-behind persistence

mod coordinator;
mod error;
mod hydrate;
mod locks;
mod persist;

pub use coordinator::{MutationCoordinator, RequestStatus};
pub use error::{EngineError, MutationError};
pub use hydrate::{hydrate, load_snapshot};
pub use locks::{KeyGuard, KeyedLocks, LockKey};
pub use persist::{PersistStats, WriteBehind};
