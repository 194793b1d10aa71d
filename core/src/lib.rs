pub mod cache;
pub mod clock;
pub mod error;
pub mod import;
pub mod models;
pub mod store;

// Re-export commonly used items
pub use cache::{CacheStore, DEFAULT_TTL_SECONDS, ResponseCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CatalogError, Result};
pub use import::{ImportReport, response_results};
pub use models::{
    CacheEntry, CatalogTrack, FavoriteChange, ListeningStats, NewPlay, PlayRecord, StoreCounts,
    StoredTrack,
};
pub use store::SqliteStore;
