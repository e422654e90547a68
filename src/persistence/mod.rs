//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! PersistenceConfig (URI + fixed options)
//!     → mongo.rs (one connect attempt, confirmed with a ping)
//!     → SharedStore
//!     → handed to the HTTP application layer
//! ```
//!
//! # Design Decisions
//! - Store sits behind a trait; schema and queries live in the application layer
//! - A failed connect yields no store at all, never a half-open one

pub mod mongo;
pub mod store;

pub use mongo::{MongoConnector, MongoStore};
pub use store::{PersistenceConnector, PersistenceError, SharedStore, Store};
