pub mod cursor;
pub mod draft;
pub mod item;

pub use cursor::ItemId;
pub use draft::{Attachment, Draft, MAX_ATTACHMENTS};
pub use item::{Author, Item, MediaRef, Metrics};
