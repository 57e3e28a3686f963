//! IDX データセットコンテナフォーマット
//!
//! endianness 明示・行指向・多次元のバイナリデータセット。
//! ヘッダレイアウトの詳細は [`IdxContainer`] 参照。

mod codec;
mod container;

pub use codec::{DataFormat, Endianness, IdxElement};
pub use container::IdxContainer;
