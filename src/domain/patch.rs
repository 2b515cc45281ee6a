//! RFC 6902 JSON Patch evaluation over `serde_json::Value`.
//!
//! 6 operations: add, remove, replace, move, copy, test.
//! 適用順序はドキュメント記載順。失敗したopで即座に中断する（部分適用の
//! コミット可否は呼び出し側が決める。`BookStore::patch` はスクラッチコピーに
//! 適用してall-or-nothingにしている）。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Patchドキュメント中の1操作。ワイヤ表現はRFC 6902そのまま
/// （`{"op": "replace", "path": "/title", "value": "..."}` 等）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOp {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Value },
}

#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("invalid JSON pointer: {0}")]
    InvalidPointer(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("array index out of bounds: {0}")]
    IndexOutOfBounds(String),

    #[error("cannot move {from} into its own child {path}")]
    MoveIntoChild { from: String, path: String },

    #[error("test failed at {path}: expected {expected}, found {actual}")]
    TestFailed {
        path: String,
        expected: Value,
        actual: Value,
    },
}

/// Patchドキュメント全体を順に適用する。最初に失敗したopのエラーを返し、
/// それ以降のopは評価しない。`doc` には失敗したopの直前までが反映される。
pub fn apply(doc: &mut Value, ops: &[PatchOp]) -> Result<(), PatchError> {
    for op in ops {
        apply_one(doc, op)?;
    }
    Ok(())
}

fn apply_one(doc: &mut Value, op: &PatchOp) -> Result<(), PatchError> {
    match op {
        PatchOp::Add { path, value } => add(doc, path, value.clone()),
        PatchOp::Remove { path } => remove(doc, path).map(|_| ()),
        PatchOp::Replace { path, value } => {
            let target = doc
                .pointer_mut(path)
                .ok_or_else(|| PatchError::PathNotFound(path.clone()))?;
            *target = value.clone();
            Ok(())
        }
        PatchOp::Move { from, path } => {
            if from == path {
                // RFC 6902 §4.4: 同一locationへのmoveはno-op
                return Ok(());
            }
            if path.starts_with(&format!("{from}/")) {
                return Err(PatchError::MoveIntoChild {
                    from: from.clone(),
                    path: path.clone(),
                });
            }
            let value = remove(doc, from)?;
            add(doc, path, value)
        }
        PatchOp::Copy { from, path } => {
            let value = doc
                .pointer(from)
                .cloned()
                .ok_or_else(|| PatchError::PathNotFound(from.clone()))?;
            add(doc, path, value)
        }
        PatchOp::Test { path, value } => {
            let actual = doc
                .pointer(path)
                .ok_or_else(|| PatchError::PathNotFound(path.clone()))?;
            if !values_equal(actual, value) {
                return Err(PatchError::TestFailed {
                    path: path.clone(),
                    expected: value.clone(),
                    actual: actual.clone(),
                });
            }
            Ok(())
        }
    }
}

/// RFC 6902 §4.6の等価判定。数値は表現ではなく数値として比較する
/// （`60` と `60.0` は等しい）。配列・オブジェクトは再帰的に比較する。
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

// --- Pointer helpers ---

/// ポインタを (親ポインタ, 末尾トークン) に分割する。末尾トークンはunescape済み。
fn split_pointer(path: &str) -> Result<(&str, String), PatchError> {
    if !path.starts_with('/') {
        return Err(PatchError::InvalidPointer(path.to_string()));
    }
    let idx = path.rfind('/').unwrap_or(0);
    let token = path[idx + 1..].replace("~1", "/").replace("~0", "~");
    Ok((&path[..idx], token))
}

fn parse_index(token: &str, path: &str) -> Result<usize, PatchError> {
    // RFC 6901: 先頭ゼロ付きのインデックスは不正
    if token.len() > 1 && token.starts_with('0') {
        return Err(PatchError::InvalidPointer(path.to_string()));
    }
    token
        .parse::<usize>()
        .map_err(|_| PatchError::InvalidPointer(path.to_string()))
}

fn add(doc: &mut Value, path: &str, value: Value) -> Result<(), PatchError> {
    if path.is_empty() {
        *doc = value;
        return Ok(());
    }
    let (parent, token) = split_pointer(path)?;
    let target = doc
        .pointer_mut(parent)
        .ok_or_else(|| PatchError::PathNotFound(path.to_string()))?;
    match target {
        Value::Object(map) => {
            map.insert(token, value);
            Ok(())
        }
        Value::Array(arr) => {
            let idx = if token == "-" {
                arr.len()
            } else {
                parse_index(&token, path)?
            };
            if idx > arr.len() {
                return Err(PatchError::IndexOutOfBounds(path.to_string()));
            }
            arr.insert(idx, value);
            Ok(())
        }
        _ => Err(PatchError::PathNotFound(path.to_string())),
    }
}

fn remove(doc: &mut Value, path: &str) -> Result<Value, PatchError> {
    if path.is_empty() {
        return Err(PatchError::InvalidPointer(
            "cannot remove the document root".to_string(),
        ));
    }
    let (parent, token) = split_pointer(path)?;
    let target = doc
        .pointer_mut(parent)
        .ok_or_else(|| PatchError::PathNotFound(path.to_string()))?;
    match target {
        Value::Object(map) => map
            .remove(&token)
            .ok_or_else(|| PatchError::PathNotFound(path.to_string())),
        Value::Array(arr) => {
            let idx = parse_index(&token, path)?;
            if idx >= arr.len() {
                return Err(PatchError::IndexOutOfBounds(path.to_string()));
            }
            Ok(arr.remove(idx))
        }
        _ => Err(PatchError::PathNotFound(path.to_string())),
    }
}
