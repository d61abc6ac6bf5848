pub mod file;

use crate::app::Result;
use crate::domain::ItemId;

pub use file::JsonStateStore;

/// Durable home of the unread cursor: the newest mention id the user has
/// seen.
pub trait StateStore: Send + Sync {
    /// Returns `None` on first run and when the stored state is unreadable.
    fn load(&self) -> Option<ItemId>;

    /// Persists `cursor` unless an equal or newer cursor is already stored.
    fn save(&self, cursor: &ItemId) -> Result<()>;
}
