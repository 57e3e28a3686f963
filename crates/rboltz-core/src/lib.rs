//! rboltz-core — IDX データセットコンテナと RBM 推論コア
//!
//! 2つのバイナリコンテナフォーマットと、その上で動く CPU 推論ルーチンを提供する。
//!
//! - **IDX**: endianness 明示・行指向・多次元のデータセットコンテナ。
//!   シーケンシャル / ランダムな行読み出しと、行単位の追記書き込みをサポート。
//! - **RBM**: 学習済み Restricted Boltzmann Machine のスナップショット。
//!   hidden activation / probability / stochastic state、visible 再構成、
//!   free energy のフォワード計算を持つ。
//!
//! 非線形関数（sigmoid / softplus）は量子化ルックアップテーブルで近似する
//! （[`activation`] モジュール参照）。
//!
//! # スレッド安全性
//!
//! コンテナとモデルはストリーム位置 / PRNG 状態を内部で書き換えるため、
//! 同一インスタンスへの並行アクセスは外部同期が必要。
//! activation テーブルは構築後 immutable であり自由に共有できる。

pub mod activation;
pub mod error;
pub mod idx;
pub mod rbm;

pub use error::{Error, Result};
pub use idx::{DataFormat, Endianness, IdxContainer, IdxElement};
pub use rbm::{RbmModel, VisibleType};
