//! # assertd store
//!
//! Storage abstraction for assertd. Provides a trait-based interface for
//! assertion persistence with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The [`Backstore`] trait keeps the current revision of every assertion,
//! keyed by type and primary key. The database layer runs all signature
//! and trust checks before writing, so a backstore only enforces revision
//! ordering.
//!
//! ## Key Types
//!
//! - [`Backstore`] - The async trait for all storage operations
//! - [`SqliteBackstore`] - SQLite-based persistent storage
//! - [`MemoryBackstore`] - In-memory storage
//! - [`PutResult`] - Result of putting an assertion
//!
//! ## Usage
//!
//! ```rust,no_run
//! use assertd_store::{Backstore, SqliteBackstore};
//! use assertd_core::AssertionType;
//!
//! async fn example() -> assertd_store::Result<()> {
//!     let store = SqliteBackstore::open("assertions.db")?;
//!
//!     let stores = store.search(AssertionType::EnterpriseStore, &[]).await?;
//!     println!("{} stores", stores.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Idempotent puts**: Putting the same revision twice returns `Unchanged`
//! - **Monotonic revisions**: A lower revision returns `Stale` and is not written
//! - **Verified reads**: Rows are decoded and classified again when read

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryBackstore;
pub use sqlite::SqliteBackstore;
pub use traits::{matches_filter, Backstore, PutResult};
