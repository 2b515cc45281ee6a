use super::book::Book;
use super::id::BookId;
use crate::domain::error::DomainError;
use crate::domain::patch::{self, PatchOp};

/// Book Store — 挿入順を保持するインメモリのBookコレクション。集約ルートとして
/// 全Book操作はここを経由する。idの一意性は呼び出し側の責務で、createでは
/// 重複チェックしない（重複時は先勝ちルックアップで後のレコードが影になる）。
#[derive(Debug, Clone, Default)]
pub struct BookStore {
    books: Vec<Book>,
}

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 起動時のサンプルセット。プロセス再起動でのみこの状態に戻る。
    pub fn seeded() -> Self {
        Self {
            books: vec![
                Book::new(1, "The Great Gatsby", 75.0),
                Book::new(2, "Pride and Prejudice", 60.0),
                Book::new(3, "The Catcher in the Rye", 85.0),
            ],
        }
    }

    pub fn list(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// idが一致する最初のBookを返す（先勝ち）。
    pub fn get(&self, id: BookId) -> Result<&Book, DomainError> {
        self.books
            .iter()
            .find(|b| b.id == id)
            .ok_or(DomainError::BookNotFound(id))
    }

    /// 無条件に末尾へ追加し、格納したBookを返す。id重複も拒否しないが、
    /// 後からの同id検索では届かなくなるため警告だけ残す。
    pub fn create(&mut self, book: Book) -> Book {
        if self.books.iter().any(|b| b.id == book.id) {
            tracing::warn!(id = %book.id, "creating book with duplicate id; it will be shadowed by the first match");
        }
        self.books.push(book.clone());
        book
    }

    /// 最初の一致レコードを取り除き、新しいBookを末尾に追加する。
    /// 置換でレコードの位置は末尾に移る（インプレースではない）。
    /// ルートidとボディidの一致はハードな前提条件で、idの存在確認より先に
    /// 検査する。不一致は正規化せず拒否する。
    pub fn replace(&mut self, id: BookId, mut book: Book) -> Result<Book, DomainError> {
        if book.id != id {
            return Err(DomainError::IdMismatch {
                route: id,
                body: book.id,
            });
        }
        let pos = self
            .books
            .iter()
            .position(|b| b.id == id)
            .ok_or(DomainError::BookNotFound(id))?;
        let old = self.books.remove(pos);
        book.id = old.id;
        self.books.push(book.clone());
        Ok(book)
    }

    /// 最初の一致レコードにpatchドキュメントを適用する。位置は変わらない。
    /// opはスクラッチコピー上で評価し、全op成功時のみコミットする
    /// （all-or-nothing）。失敗時はレコードは元のまま。
    pub fn patch(&mut self, id: BookId, ops: &[PatchOp]) -> Result<(), DomainError> {
        let pos = self
            .books
            .iter()
            .position(|b| b.id == id)
            .ok_or(DomainError::BookNotFound(id))?;

        let mut doc = serde_json::to_value(&self.books[pos])
            .map_err(DomainError::InvalidPatchedBook)?;
        patch::apply(&mut doc, ops)?;
        let patched: Book =
            serde_json::from_value(doc).map_err(DomainError::InvalidPatchedBook)?;

        self.books[pos] = patched;
        Ok(())
    }

    /// 最初の一致レコードを取り除いて返す。
    pub fn remove(&mut self, id: BookId) -> Result<Book, DomainError> {
        let pos = self
            .books
            .iter()
            .position(|b| b.id == id)
            .ok_or(DomainError::BookNotFound(id))?;
        Ok(self.books.remove(pos))
    }

    /// 全レコードを無条件に削除する。
    pub fn clear(&mut self) {
        self.books.clear();
    }
}
