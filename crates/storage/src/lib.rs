// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tf-storage: file-backed persistence for the TalentFlow pipeline

pub mod seed;
pub mod store;

pub use store::{
    file_stem, validate_key, Collection, Dataset, PersistentStore, Record, StorageError,
};
