pub mod catalog;
pub mod memory;
pub mod persistence;
pub mod seed;
pub mod traits;

pub use catalog::CatalogSource;
pub use memory::MemoryStore;
pub use persistence::{FileSessionPersistence, MemorySessionPersistence};
pub use traits::{PropertySource, SessionPersistence, UserStore};
