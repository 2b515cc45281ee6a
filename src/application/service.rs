use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::model::book::Book;
use crate::domain::model::id::BookId;
use crate::domain::model::store::BookStore;
use crate::domain::patch::PatchOp;

use super::error::AppError;

/// Book Storeに対するユースケース。プロセス全体で共有される1つのStoreを
/// 単一のMutexで守り、全操作を直列化する。操作は同期・非ブロッキングで
/// 中断なく完走する。
#[derive(Clone)]
pub struct BookService {
    store: Arc<Mutex<BookStore>>,
}

impl BookService {
    pub fn new(store: BookStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// 全Bookを挿入順で返す。
    pub fn list_all(&self) -> Result<Vec<Book>, AppError> {
        Ok(self.lock()?.list().to_vec())
    }

    /// idが一致する最初のBookを返す。
    pub fn get_by_id(&self, id: BookId) -> Result<Book, AppError> {
        Ok(self.lock()?.get(id)?.clone())
    }

    /// Bookを末尾に追加する。
    pub fn create(&self, book: Book) -> Result<Book, AppError> {
        Ok(self.lock()?.create(book))
    }

    /// idのBookを置換する。ルートidとボディidの不一致は拒否する。
    pub fn replace(&self, id: BookId, book: Book) -> Result<Book, AppError> {
        Ok(self.lock()?.replace(id, book)?)
    }

    /// idのBookにpatchドキュメントを適用する（all-or-nothing）。
    pub fn patch_one(&self, id: BookId, ops: &[PatchOp]) -> Result<(), AppError> {
        Ok(self.lock()?.patch(id, ops)?)
    }

    /// idのBookを削除する。
    pub fn delete_one(&self, id: BookId) -> Result<(), AppError> {
        self.lock()?.remove(id)?;
        Ok(())
    }

    /// 全Bookを削除する。
    pub fn delete_all(&self) -> Result<(), AppError> {
        self.lock()?.clear();
        Ok(())
    }

    // --- private ---

    fn lock(&self) -> Result<MutexGuard<'_, BookStore>, AppError> {
        self.store.lock().map_err(|_| AppError::LockPoisoned)
    }
}
