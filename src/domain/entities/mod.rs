pub mod chunk;
pub mod document;

pub use chunk::DocumentChunk;
pub use document::{Document, NewDocument};
