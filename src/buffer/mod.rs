//! Buffer module: The bounded window of recent chunks.
//!
//! The engine keeps two views of what it has ingested:
//! - the display log, unbounded, owned by the engine, used for painting and export
//! - [`ChunkBuffer`], a fixed-capacity FIFO window used for sampling
//!
//! Only the window lives here.

mod chunk_buffer;

pub use chunk_buffer::ChunkBuffer;
