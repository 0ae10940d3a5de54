mod fs;
mod memory;
mod sqlite;

pub use self::{fs::FileSystemRepository, memory::MemoryRepository, sqlite::SqliteRepository};
