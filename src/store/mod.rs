//! Session persistence: the record store abstraction, its backends, and the
//! session store that implements the daily create/replace/patch lifecycle.

mod clock;
mod file;
mod memory;
mod records;
mod sessions;
mod slug;

pub use clock::{Clock, ManualClock, SystemClock};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use records::{RecordStore, SessionPatch};
pub use sessions::SessionStore;
pub use slug::{new_slug, SLUG_ALPHABET, SLUG_LEN};
