//! 量子化ルックアップテーブルによる活性化関数
//!
//! sigmoid `1/(1+e^-x)` と softplus `ln(1+e^x)` を、`[0, MAX]` を 2048 分割した
//! 事前計算テーブル + 負領域ミラーで近似する。学習パス（本クレートの範囲外）では
//! 1 pass あたり数百万回評価されるため、超越関数の再評価をテーブル参照で置き換える。
//!
//! 量子化誤差はサンプリング間隔 `MAX/(COUNT-1) ≈ 0.0073`（x 軸）で抑えられ、
//! 中間域で sub-percent、飽和域近傍ではさらに小さい。
//!
//! テーブルはプロセス生存期間の immutable な singleton（`OnceLock`）で、
//! 構築後はスレッド間で自由に共有できる。

use std::sync::OnceLock;

/// テーブルのサンプル数
const COUNT: usize = 2048;

/// 正領域の上限。`x >= MAX` で sigmoid は 1、softplus は x 自身に飽和する
const MAX: f32 = 15.0;

/// x からテーブル index へのスケール係数
const SCALE: f32 = (COUNT as f32 - 1.0) / MAX;

/// 片側 2048 サンプルの量子化テーブル（正領域 + 負領域ミラー）
pub struct LookupTable {
    pos: Box<[f32]>,
    neg: Box<[f32]>,
}

impl LookupTable {
    /// `pos[k] = f(k/scale)`, `neg[k] = f(-k/scale)` を f64 でサンプルして構築する
    fn build(f: impl Fn(f64) -> f64) -> Self {
        // index 計算は f32 だが、サンプル値は f64 で評価してから丸める
        let dscale = (COUNT as f64 - 1.0) / MAX as f64;

        let mut pos = vec![0.0f32; COUNT];
        let mut neg = vec![0.0f32; COUNT];
        for k in 0..COUNT {
            let x = k as f64 / dscale;
            pos[k] = f(x) as f32;
            neg[k] = f(-x) as f32;
        }

        Self {
            pos: pos.into_boxed_slice(),
            neg: neg.into_boxed_slice(),
        }
    }

    /// 最近傍サンプルを引く。呼び出し側が `|x| < MAX` を保証する
    #[inline]
    fn lookup(&self, x: f32) -> f32 {
        if x > 0.0 {
            self.pos[(x * SCALE + 0.5) as usize]
        } else {
            self.neg[(-x * SCALE + 0.5) as usize]
        }
    }
}

fn sigmoid_table() -> &'static LookupTable {
    static TABLE: OnceLock<LookupTable> = OnceLock::new();
    TABLE.get_or_init(|| LookupTable::build(|x| 1.0 / (1.0 + (-x).exp())))
}

fn softplus_table() -> &'static LookupTable {
    static TABLE: OnceLock<LookupTable> = OnceLock::new();
    TABLE.get_or_init(|| LookupTable::build(|x| (1.0 + x.exp()).ln()))
}

/// sigmoid `1/(1+e^-x)` のテーブル近似
///
/// `x <= -MAX` で 0、`x >= MAX` で 1、`x == 0` で正確に 0.5 を返す。
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    if x <= -MAX {
        return 0.0;
    }
    if x >= MAX {
        return 1.0;
    }
    if x == 0.0 {
        return 0.5;
    }

    sigmoid_table().lookup(x)
}

/// softplus `ln(1+e^x)` のテーブル近似
///
/// `x <= -MAX` で 0、`x >= MAX` で漸近線形領域として x 自身、
/// `x == 0` で正確に ln(2) を返す。
#[inline]
pub fn softplus(x: f32) -> f32 {
    if x <= -MAX {
        return 0.0;
    }
    if x >= MAX {
        return x;
    }
    if x == 0.0 {
        return std::f32::consts::LN_2;
    }

    softplus_table().lookup(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_exact_points() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert_eq!(sigmoid(-MAX), 0.0);
        assert_eq!(sigmoid(MAX), 1.0);
        assert_eq!(sigmoid(-100.0), 0.0);
        assert_eq!(sigmoid(100.0), 1.0);
    }

    #[test]
    fn test_sigmoid_monotonic() {
        // サンプル点ごとに非減少であること
        let mut prev = sigmoid(-MAX);
        let steps = 4096;
        for k in 0..=steps {
            let x = -MAX + 2.0 * MAX * (k as f32 / steps as f32);
            let y = sigmoid(x);
            assert!(y >= prev, "sigmoid not monotonic at x={x}: {y} < {prev}");
            prev = y;
        }
    }

    #[test]
    fn test_sigmoid_error_bound() {
        // 中間域の相対誤差がサンプリング間隔相当で抑えられていること
        for k in -1400..1400 {
            let x = k as f32 / 100.0;
            let exact = 1.0 / (1.0 + (-x).exp());
            let approx = sigmoid(x);
            assert!(
                (approx - exact).abs() < 2e-3,
                "sigmoid({x}) = {approx}, exact {exact}"
            );
        }
    }

    #[test]
    fn test_sigmoid_symmetry() {
        // sigmoid(-x) == 1 - sigmoid(x)（ミラーテーブルの性質）
        for k in 1..1000 {
            let x = k as f32 / 70.0;
            let sum = sigmoid(x) + sigmoid(-x);
            assert!((sum - 1.0).abs() < 1e-6, "sigmoid symmetry broken at x={x}");
        }
    }

    #[test]
    fn test_softplus_exact_points() {
        assert_eq!(softplus(0.0), std::f32::consts::LN_2);
        assert_eq!(softplus(-MAX - 0.1), 0.0);
        assert_eq!(softplus(MAX), MAX);
        assert_eq!(softplus(20.0), 20.0);
    }

    #[test]
    fn test_softplus_asymptotics() {
        // 正の大きい x では x 自身に、負の大きい x では 0 に漸近する
        let x = MAX - 0.01;
        assert!((softplus(x) - x).abs() < 1e-3);
        assert!(softplus(-MAX + 0.01) < 1e-5);
    }

    #[test]
    fn test_softplus_error_bound() {
        for k in -1400..1400 {
            let x = k as f32 / 100.0;
            let exact = (1.0 + (x as f64).exp()).ln() as f32;
            let approx = softplus(x);
            assert!(
                (approx - exact).abs() < 6e-3,
                "softplus({x}) = {approx}, exact {exact}"
            );
        }
    }
}
