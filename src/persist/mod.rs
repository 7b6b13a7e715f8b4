//! Persistence: flat save record codec and the storage seam.
//!
//! ## Key Types
//!
//! - `SavedGame` / `SavedCard`: the flat record, tolerant of corruption
//! - `encode` / `decode`, `to_json` / `from_json`: the codec (never fails)
//! - `SaveStore`: narrow read/write/clear over one named record
//! - `MemoryStore`, `FileStore`: the two bundled media

pub mod codec;
pub mod store;

pub use codec::{decode, encode, from_json, to_json, SavedCard, SavedGame};
pub use store::{FileStore, MemoryStore, SaveStore, SAVE_KEY};
