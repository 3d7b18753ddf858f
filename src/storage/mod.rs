pub mod sqlite;

pub use sqlite::Storage;

use crate::error::Result;
use crate::models::{Board, ClassificationUpdate, Solution};

/// Store surface the batch analyzer depends on.
///
/// `commit_classifications` is a single unit of work: either every update in
/// the slice is persisted or none is.
pub trait Repository: Send + Sync {
    fn get_board(&self, board_id: i64) -> Result<Option<Board>>;

    fn list_solutions(&self, board_id: i64) -> Result<Vec<Solution>>;

    /// Returns how many solutions were written. Updates for solutions deleted
    /// while the batch was running are dropped.
    fn commit_classifications(&self, updates: &[ClassificationUpdate]) -> Result<usize>;
}
