// Generated Statements of Work: prompt assembly, the completion call, and storage.
// A SOW is immutable once generated; it can only be listed, read, exported or deleted.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod store;
