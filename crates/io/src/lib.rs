//! File-backed line storage.
//!
//! Every mutation is a full read of the backing file, an in-memory edit of the
//! line sequence, and a full rewrite. Nothing is cached between calls.

pub mod errors;
pub mod line_store;
pub mod lines;
pub mod mmap;
