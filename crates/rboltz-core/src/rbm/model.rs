//! RBM モデル本体とフォワード推論
//!
//! 学習済みスナップショットの保持と CPU 側フォワード計算。
//! weight 行列は両方向で二重保持する:
//!
//! - `hidden_features`: \[visible\]\[hidden\]（ディスク上の自然な順）
//! - `visible_features`: \[hidden\]\[visible\]（hidden activation 計算の自然な順）
//!
//! 転置コピーは load 時に一度だけ構築し、以後独立に変更されることはない
//! （ホットループでの転置 index 演算を避けるための意図的なトレードオフ）。
//!
//! モデルは構築後 immutable。唯一の例外は hidden unit ごとの LCG 状態で、
//! [`RbmModel::calc_hidden_states`] の呼び出しごとに決定的に進む。
//! 同一インスタンスへの並行サンプリングは外部ロックが必要。

use crate::activation::{sigmoid, softplus};
use crate::error::{Error, Result};

use serde::{Deserialize, Serialize};

/// Numerical Recipes の LCG 乗数
const LCG_A: u32 = 1664525;

/// Numerical Recipes の LCG 加算項
const LCG_C: u32 = 1013904223;

/// visible unit の種類
///
/// コード値は RBM バイナリフォーマットの 1 バイト visible-type フィールドそのもの。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibleType {
    /// 2 値 unit。再構成時に sigmoid を適用する
    Sigmoid,
    /// 実数値 unit。unit ごとの正規化統計（mean / stddev）を持つ
    Linear,
}

impl VisibleType {
    /// フォーマット上のコード値
    pub const fn code(self) -> u8 {
        match self {
            Self::Sigmoid => 0x00,
            Self::Linear => 0xFF,
        }
    }

    /// コード値から復元。0x00 / 0xFF 以外は None
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(Self::Sigmoid),
            0xFF => Some(Self::Linear),
            _ => None,
        }
    }
}

/// 学習済み RBM のスナップショット
///
/// load 系ファクトリでのみ構築される。バイアス x2、weight 配列 x2、
/// LCG 状態配列をすべて排他所有し、drop で一括解放される。
#[derive(Debug)]
pub struct RbmModel {
    visible_count: u16,
    hidden_count: u16,
    visible_type: VisibleType,

    /// Linear モデルのみ: visible unit ごとの平均（長さ = visible_count）
    visible_means: Option<Box<[f32]>>,
    /// Linear モデルのみ: visible unit ごとの標準偏差
    visible_stddevs: Option<Box<[f32]>>,

    visible_biases: Box<[f32]>,
    hidden_biases: Box<[f32]>,

    /// weight\[i\]\[j\]: flat row-major \[visible\]\[hidden\]
    hidden_features: Box<[f32]>,
    /// weight\[j\]\[i\]: flat row-major \[hidden\]\[visible\]（load 時の転置コピー）
    visible_features: Box<[f32]>,

    /// hidden unit ごとの LCG 状態（host entropy で初期化、ロード間の再現性なし）
    random: Box<[u32]>,
}

impl RbmModel {
    /// デシリアライズ済みの部品からモデルを組み立てる
    ///
    /// 転置コピーの構築と LCG 状態の初期化はここで行う。
    pub(crate) fn from_parts(
        visible_count: u16,
        hidden_count: u16,
        visible_type: VisibleType,
        visible_means: Option<Box<[f32]>>,
        visible_stddevs: Option<Box<[f32]>>,
        visible_biases: Box<[f32]>,
        hidden_biases: Box<[f32]>,
        hidden_features: Box<[f32]>,
    ) -> Self {
        let v = visible_count as usize;
        let h = hidden_count as usize;
        debug_assert_eq!(visible_biases.len(), v);
        debug_assert_eq!(hidden_biases.len(), h);
        debug_assert_eq!(hidden_features.len(), v * h);

        // 転置コピー: visible_features[j][i] = hidden_features[i][j]
        let mut visible_features = vec![0.0f32; h * v];
        for i in 0..v {
            for j in 0..h {
                visible_features[j * v + i] = hidden_features[i * h + j];
            }
        }

        let mut rng = rand::rng();
        let random: Vec<u32> = (0..h).map(|_| rand::Rng::random(&mut rng)).collect();

        Self {
            visible_count,
            hidden_count,
            visible_type,
            visible_means,
            visible_stddevs,
            visible_biases,
            hidden_biases,
            hidden_features,
            visible_features: visible_features.into_boxed_slice(),
            random: random.into_boxed_slice(),
        }
    }

    /// visible unit 数
    #[inline]
    pub fn visible_count(&self) -> usize {
        self.visible_count as usize
    }

    /// hidden unit 数
    #[inline]
    pub fn hidden_count(&self) -> usize {
        self.hidden_count as usize
    }

    /// visible unit の種類
    #[inline]
    pub fn visible_type(&self) -> VisibleType {
        self.visible_type
    }

    /// weight w\[i\]\[j\]（visible i → hidden j）
    #[inline]
    pub fn weight(&self, i: usize, j: usize) -> f32 {
        self.hidden_features[i * self.hidden_count() + j]
    }

    /// visible バイアスベクトル
    #[inline]
    pub fn visible_biases(&self) -> &[f32] {
        &self.visible_biases
    }

    /// hidden バイアスベクトル
    #[inline]
    pub fn hidden_biases(&self) -> &[f32] {
        &self.hidden_biases
    }

    /// 正規化統計の平均（Linear モデルのみ Some）
    #[inline]
    pub fn visible_means(&self) -> Option<&[f32]> {
        self.visible_means.as_deref()
    }

    /// 正規化統計の標準偏差（Linear モデルのみ Some）
    #[inline]
    pub fn visible_stddevs(&self) -> Option<&[f32]> {
        self.visible_stddevs.as_deref()
    }

    pub(crate) fn hidden_features_flat(&self) -> &[f32] {
        &self.hidden_features
    }

    pub(crate) fn visible_features_flat(&self) -> &[f32] {
        &self.visible_features
    }

    fn check_visible_len(&self, len: usize) -> Result<()> {
        if len == self.visible_count() {
            Ok(())
        } else {
            Err(Error::SizeMismatch {
                expected: self.visible_count(),
                actual: len,
            })
        }
    }

    fn check_hidden_len(&self, len: usize) -> Result<()> {
        if len == self.hidden_count() {
            Ok(())
        } else {
            Err(Error::SizeMismatch {
                expected: self.hidden_count(),
                actual: len,
            })
        }
    }

    /// hidden activation（非線形なしの線形パス）
    ///
    /// `hidden[j] = hidden_bias[j] + Σ_i w[j][i] * visible[i]`
    pub fn calc_hidden_activations(&self, visible: &[f32], hidden: &mut [f32]) -> Result<()> {
        self.check_visible_len(visible.len())?;
        self.check_hidden_len(hidden.len())?;

        let v = self.visible_count();
        for (j, out) in hidden.iter_mut().enumerate() {
            let weights = &self.visible_features[j * v..(j + 1) * v];
            let mut acc = self.hidden_biases[j];
            for (&w, &x) in weights.iter().zip(visible) {
                acc += w * x;
            }
            *out = acc;
        }
        Ok(())
    }

    /// hidden probability（activation に sigmoid テーブルを適用）
    pub fn calc_hidden_probabilities(&self, visible: &[f32], hidden: &mut [f32]) -> Result<()> {
        self.calc_hidden_activations(visible, hidden)?;
        for p in hidden.iter_mut() {
            *p = sigmoid(*p);
        }
        Ok(())
    }

    /// hidden state の確率的サンプリング
    ///
    /// probability を計算した後、unit ごとの LCG を 1 ステップ進め、
    /// `seed < probability * u32::MAX` なら 1.0、そうでなければ 0.0 を出力する。
    /// 呼び出しごとに LCG 状態が進むため、同じ入力でも毎回新しいサンプルになる。
    pub fn calc_hidden_states(&mut self, visible: &[f32], hidden: &mut [f32]) -> Result<()> {
        self.calc_hidden_probabilities(visible, hidden)?;
        for (j, state) in hidden.iter_mut().enumerate() {
            let seed = self.random[j].wrapping_mul(LCG_A).wrapping_add(LCG_C);
            self.random[j] = seed;
            *state = if (seed as f32) < *state * u32::MAX as f32 {
                1.0
            } else {
                0.0
            };
        }
        Ok(())
    }

    /// visible 再構成
    ///
    /// `visible[i] = visible_bias[i] + Σ_j w[i][j] * hidden[j]`。
    /// Sigmoid visible は各要素に sigmoid を適用、Linear は線形出力のまま
    /// （必要なら呼び出し側が mean / stddev で逆正規化する）。
    pub fn calc_visible(&self, hidden: &[f32], visible: &mut [f32]) -> Result<()> {
        self.check_hidden_len(hidden.len())?;
        self.check_visible_len(visible.len())?;

        let h = self.hidden_count();
        for (i, out) in visible.iter_mut().enumerate() {
            let weights = &self.hidden_features[i * h..(i + 1) * h];
            let mut acc = self.visible_biases[i];
            for (&w, &x) in weights.iter().zip(hidden) {
                acc += w * x;
            }
            *out = acc;
        }

        if self.visible_type == VisibleType::Sigmoid {
            for out in visible.iter_mut() {
                *out = sigmoid(*out);
            }
        }
        Ok(())
    }

    /// free energy F(v)
    ///
    /// Sigmoid visible: `F(v) = -Σ_i b_i·v_i - Σ_j softplus(c_j + Σ_i w_ji·v_i)`
    /// （Hinton, Practical Guide, eq. 25）。
    /// Linear visible: `F(v) = 0.5·Σ_i (b_i·v_i)² - Σ_j softplus(...)`。
    /// 学習の監視・診断用スコアであり、重み更新には使わない。
    pub fn calc_free_energy(&self, visible: &[f32]) -> Result<f32> {
        self.check_visible_len(visible.len())?;

        let mut free_energy = match self.visible_type {
            VisibleType::Sigmoid => {
                let mut bias_sum = 0.0f32;
                for (&b, &x) in self.visible_biases.iter().zip(visible) {
                    bias_sum += b * x;
                }
                -bias_sum
            }
            VisibleType::Linear => {
                let mut square_sum = 0.0f32;
                for (&b, &x) in self.visible_biases.iter().zip(visible) {
                    let diff = b * x;
                    square_sum += diff * diff;
                }
                0.5 * square_sum
            }
        };

        let v = self.visible_count();
        for j in 0..self.hidden_count() {
            let weights = &self.visible_features[j * v..(j + 1) * v];
            let mut acc = self.hidden_biases[j];
            for (&w, &x) in weights.iter().zip(visible) {
                acc += w * x;
            }
            free_energy -= softplus(acc);
        }
        Ok(free_energy)
    }

    /// visible ベクトルを in-place で正規化する: `v_i ← (v_i - mean_i) / stddev_i`
    ///
    /// Linear モデルのみ有効。Sigmoid モデルには統計が存在しないため
    /// `UnsupportedOperation`。
    pub fn normalize_visible(&self, visible: &mut [f32]) -> Result<()> {
        let (Some(means), Some(stddevs)) = (&self.visible_means, &self.visible_stddevs) else {
            return Err(Error::UnsupportedOperation(
                "normalization requires a Linear visible model",
            ));
        };
        self.check_visible_len(visible.len())?;

        for ((x, &mean), &stddev) in visible.iter_mut().zip(means.iter()).zip(stddevs.iter()) {
            *x = (*x - mean) / stddev;
        }
        Ok(())
    }

    /// sampler の LCG 状態を明示的に再シードする
    ///
    /// `seeds.len() == hidden_count()` を要求する。決定的なサンプリング列が
    /// 必要なテスト / 実験向け。通常は load 時の host entropy 初期化のままでよい。
    pub fn reseed_sampler(&mut self, seeds: &[u32]) -> Result<()> {
        self.check_hidden_len(seeds.len())?;
        self.random.copy_from_slice(seeds);
        Ok(())
    }
}
