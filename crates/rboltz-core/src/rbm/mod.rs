//! Restricted Boltzmann Machine のスナップショットとフォワード推論
//!
//! - [`model`]: モデル本体と CPU 推論（activation / probability / state /
//!   visible 再構成 / free energy）
//! - [`io`]: バイナリフォーマット（".RBM"）の read / write
//! - [`json`]: JSON 表現の import / export

mod io;
mod json;
mod model;

pub use io::RBM_MAGIC;
pub use model::{RbmModel, VisibleType};
