//! # storage-adapters
//!
//! Infrastructure implementations of the `domains` ports: the SQLite
//! content/account repositories, the in-memory session store, the local
//! picture store, and the outbound search gateway.

pub mod media;
pub mod search;
pub mod session;
pub mod sqlite;

pub use media::LocalMediaStore;
pub use search::{DisabledSearch, SearchApiGateway};
pub use session::MemorySessionStore;
pub use sqlite::SqliteRepo;
