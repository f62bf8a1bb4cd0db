//! Vector store implementations.
//!
//! - [`LanceRecordStore`]: persistent, one LanceDB table per corpus.
//! - [`InMemoryVectorStore`]: exact search in process memory.

pub mod codec;
pub mod lance;
pub mod memory;
pub mod schema;
pub mod table;

pub use codec::ArrowRecord;
pub use lance::LanceConnection;
pub use memory::InMemoryVectorStore;
pub use table::LanceRecordStore;
