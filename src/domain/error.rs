use super::model::id::BookId;
use super::patch::PatchError;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// Displayの文言はDeleteOneの404ボディにそのまま載るワイヤ契約。
    #[error("Book with id:{0} could not found.")]
    BookNotFound(BookId),

    #[error("Parameters do not match")]
    IdMismatch { route: BookId, body: BookId },

    #[error(transparent)]
    Patch(#[from] PatchError),

    #[error("patched record is no longer a valid book: {0}")]
    InvalidPatchedBook(#[source] serde_json::Error),
}
