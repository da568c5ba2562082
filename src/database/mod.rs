pub mod collection;
pub mod pool;
pub mod schema;
pub mod sqlite_store;
pub mod store;

pub use collection::{Collection, Record};
pub use sqlite_store::SqliteStore;
pub use store::{DocumentStore, IndexValue, Query, SortOrder};
