//! RBM モデルの JSON import / export
//!
//! バイナリフォーマットと違い、他ツールとの交換・目視確認向けの表現。
//! weight は hidden unit ごとの行（長さ = visible unit 数）の配列で持つ。
//! LCG 状態は表現に含まれない。

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rbm::model::{RbmModel, VisibleType};

const MODEL_TYPE: &str = "RestrictedBoltzmannMachine";

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RbmJson {
    #[serde(rename = "Type")]
    model_type: String,
    visible_count: u16,
    hidden_count: u16,
    visible_type: VisibleType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    visible_means: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    visible_stddevs: Option<Vec<f32>>,
    visible_biases: Vec<f32>,
    hidden_biases: Vec<f32>,
    /// hidden unit ごとの weight 行（visible_count 要素 x hidden_count 行）
    weights: Vec<Vec<f32>>,
}

impl RbmModel {
    /// JSON 文字列へシリアライズする
    pub fn to_json_string(&self) -> Result<String> {
        let v = self.visible_count();
        let h = self.hidden_count();

        let weights: Vec<Vec<f32>> = (0..h)
            .map(|j| self.visible_features_flat()[j * v..(j + 1) * v].to_vec())
            .collect();

        let json = RbmJson {
            model_type: MODEL_TYPE.to_owned(),
            visible_count: v as u16,
            hidden_count: h as u16,
            visible_type: self.visible_type(),
            visible_means: self.visible_means().map(<[f32]>::to_vec),
            visible_stddevs: self.visible_stddevs().map(<[f32]>::to_vec),
            visible_biases: self.visible_biases().to_vec(),
            hidden_biases: self.hidden_biases().to_vec(),
            weights,
        };
        serde_json::to_string_pretty(&json).map_err(|e| Error::InvalidJson(e.to_string()))
    }

    /// JSON 文字列からデシリアライズする
    ///
    /// 配列長が宣言された unit 数と食い違う場合は `InvalidJson`。
    pub fn from_json_str(text: &str) -> Result<Self> {
        let json: RbmJson =
            serde_json::from_str(text).map_err(|e| Error::InvalidJson(e.to_string()))?;

        if json.model_type != MODEL_TYPE {
            return Err(Error::InvalidJson(format!(
                "unexpected model type {:?}",
                json.model_type
            )));
        }
        if json.visible_count == 0 || json.hidden_count == 0 {
            return Err(Error::InvalidJson(format!(
                "unit counts must be non-zero: visible={}, hidden={}",
                json.visible_count, json.hidden_count
            )));
        }
        let v = json.visible_count as usize;
        let h = json.hidden_count as usize;

        check_len("VisibleBiases", json.visible_biases.len(), v)?;
        check_len("HiddenBiases", json.hidden_biases.len(), h)?;
        check_len("Weights", json.weights.len(), h)?;
        for (j, row) in json.weights.iter().enumerate() {
            check_len(&format!("Weights[{j}]"), row.len(), v)?;
        }

        let (means, stddevs) = match json.visible_type {
            VisibleType::Sigmoid => {
                if json.visible_means.is_some() || json.visible_stddevs.is_some() {
                    return Err(Error::InvalidJson(
                        "Sigmoid model carries no normalization statistics".to_owned(),
                    ));
                }
                (None, None)
            }
            VisibleType::Linear => {
                let means = json.visible_means.ok_or_else(|| {
                    Error::InvalidJson("Linear model requires VisibleMeans".to_owned())
                })?;
                let stddevs = json.visible_stddevs.ok_or_else(|| {
                    Error::InvalidJson("Linear model requires VisibleStddevs".to_owned())
                })?;
                check_len("VisibleMeans", means.len(), v)?;
                check_len("VisibleStddevs", stddevs.len(), v)?;
                (
                    Some(means.into_boxed_slice()),
                    Some(stddevs.into_boxed_slice()),
                )
            }
        };

        // JSON の [hidden][visible] 行からディスク順 [visible][hidden] へ並べ替える
        let mut hidden_features = vec![0.0f32; v * h];
        for (j, row) in json.weights.iter().enumerate() {
            for (i, &w) in row.iter().enumerate() {
                hidden_features[i * h + j] = w;
            }
        }

        Ok(Self::from_parts(
            json.visible_count,
            json.hidden_count,
            json.visible_type,
            means,
            stddevs,
            json.visible_biases.into_boxed_slice(),
            json.hidden_biases.into_boxed_slice(),
            hidden_features.into_boxed_slice(),
        ))
    }
}

fn check_len(field: &str, actual: usize, expected: usize) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(Error::InvalidJson(format!(
            "{field} has {actual} elements, expected {expected}"
        )))
    }
}
