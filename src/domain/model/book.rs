use serde::{Deserialize, Serialize};

use super::id::BookId;

/// Storeに保存される1冊分のレコード。ワイヤ表現は `{id, title, price}`。
///
/// `title` / `price` はserdeのデフォルトを持つ。patchの `remove` でフィールドが
/// 落ちたレコードもBookとして復元でき、その場合は各フィールドが初期値に戻る。
/// `id` は必須で、落とすとレコードごと不正になる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: f64,
}

impl Book {
    pub fn new(id: impl Into<BookId>, title: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape() {
        let book = Book::new(1, "The Great Gatsby", 75.0);
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "title": "The Great Gatsby", "price": 75.0})
        );
    }

    #[test]
    fn missing_optional_fields_fall_back_to_defaults() {
        let book: Book = serde_json::from_str(r#"{"id": 9}"#).unwrap();
        assert_eq!(book.id, BookId::new(9));
        assert_eq!(book.title, "");
        assert_eq!(book.price, 0.0);
    }

    #[test]
    fn missing_id_is_rejected() {
        let result = serde_json::from_str::<Book>(r#"{"title": "No Id", "price": 1.0}"#);
        assert!(result.is_err());
    }
}
