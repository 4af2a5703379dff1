// src/infrastructure/mod.rs
pub mod http;
pub mod storage;

pub use http::HttpClient;
pub use storage::{FileStore, MemoryStore};
