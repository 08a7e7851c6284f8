pub mod appwrite;
pub mod model;
pub mod repo;
pub mod sqlite;

pub use appwrite::AppwriteStore;
pub use model::*;
pub use repo::*;
pub use sqlite::SqliteStore;
