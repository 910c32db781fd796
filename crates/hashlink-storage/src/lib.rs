//! Mapping stores for the hashlink URL shortener.

pub mod json_file;
pub mod memory;

pub use hashlink_core::repository::{
    InsertOutcome, Mapping, ReadRepository, Repository, Result, ShortCollision,
};
pub use hashlink_core::StorageError;
pub use json_file::JsonFileRepository;
pub use memory::InMemoryRepository;
