//! エラー型
//!
//! コンテナ / モデル操作の失敗はすべてこの分類で呼び出し側へ返す。
//! 内部での retry は行わない。行の途中で I/O が失敗した場合、
//! 論理行数は変化しないが該当行のバイト列は不定になる。

use thiserror::Error;

/// rboltz-core 全体のエラー分類
#[derive(Debug, Error)]
pub enum Error {
    /// ヘッダが壊れている（endianness マーカー / フォーマットコード / 次元数）
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// RBM マジックタグが ".RBM" でない
    #[error("invalid magic: expected \".RBM\", got {0:?}")]
    InvalidMagic([u8; 4]),

    /// ヘッダが宣言するサイズよりストリームが短い
    #[error("truncated stream: expected {expected} bytes, stream has {actual}")]
    TruncatedStream { expected: u64, actual: u64 },

    /// 行 / ユニット index が範囲外
    #[error("index out of range: index {index}, rows {rows}")]
    IndexOutOfRange { index: u32, rows: u32 },

    /// バッファの要素型がコンテナのフォーマットと一致しない
    #[error("format mismatch: container is {container:?}, buffer is {buffer:?}")]
    FormatMismatch {
        container: crate::idx::DataFormat,
        buffer: crate::idx::DataFormat,
    },

    /// バッファ長が期待値と一致しない
    #[error("size mismatch: expected {expected} elements, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// 読み取り専用コンテナへの書き込み
    #[error("container is read-only")]
    ReadOnlyContainer,

    /// モデル構成上サポートされない操作
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// 行カウンタが u32 を超える
    #[error("row counter overflow")]
    Overflow,

    /// 引数が不正（空の次元リスト、サイズ 0 の次元など）
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// モデルの JSON 表現が壊れている
    #[error("invalid model json: {0}")]
    InvalidJson(String),

    /// 下層の I/O エラー
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
