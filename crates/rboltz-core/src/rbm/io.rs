//! RBM バイナリフォーマットの read / write
//!
//! レイアウト（すべて little-endian、ホストのバイト順に依存しない）:
//!
//! ```text
//! offset  size             field
//! 0       4                magic ".RBM" (0x2E 0x52 0x42 0x4D)
//! 4       1                visible type (0x00 = Sigmoid, 0xFF = Linear)
//! 5       2                visible unit 数 (u16)
//! 7       2                hidden unit 数 (u16)
//! 9      [4 * V]           visible means  (Linear のみ)
//!        [4 * V]           visible stddevs (Linear のみ)
//!         4 * V            visible biases
//!         4 * H            hidden biases
//!         4 * V * H        weights, row-major [visible][hidden]
//! ```

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::rbm::model::{RbmModel, VisibleType};

/// ファイル先頭 4 バイトのマジックタグ
pub const RBM_MAGIC: [u8; 4] = *b".RBM";

/// 読み出しオフセットを数える Read ラッパー
///
/// EOF を `TruncatedStream`（どこまで読めたか付き）へ変換するために使う。
struct CountingReader<'a, R> {
    inner: &'a mut R,
    offset: u64,
}

impl<'a, R: Read> CountingReader<'a, R> {
    fn new(inner: &'a mut R) -> Self {
        Self { inner, offset: 0 }
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.offset += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(Error::TruncatedStream {
                expected: self.offset + buf.len() as u64,
                actual: self.offset,
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf)?;
        Ok(buf[0])
    }

    fn read_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.fill(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn read_f32_vec(&mut self, count: usize) -> Result<Box<[f32]>> {
        let mut raw = vec![0u8; count * 4];
        self.fill(&mut raw)?;
        let values: Vec<f32> = raw
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Ok(values.into_boxed_slice())
    }
}

impl RbmModel {
    /// ストリームからモデルをロードする
    ///
    /// # エラー
    ///
    /// - `InvalidMagic`: 先頭 4 バイトが ".RBM" でない
    /// - `InvalidHeader`: visible type が未知、または unit 数が 0
    /// - `TruncatedStream`: ヘッダが要求する本体長より前に EOF
    pub fn load<R: Read>(reader: &mut R) -> Result<Self> {
        let mut r = CountingReader::new(reader);

        let mut magic = [0u8; 4];
        r.fill(&mut magic)?;
        if magic != RBM_MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        let type_code = r.read_u8()?;
        let visible_type = VisibleType::from_code(type_code).ok_or_else(|| {
            Error::InvalidHeader(format!("unknown visible type code 0x{type_code:02X}"))
        })?;

        let visible_count = r.read_u16()?;
        let hidden_count = r.read_u16()?;
        if visible_count == 0 || hidden_count == 0 {
            return Err(Error::InvalidHeader(format!(
                "unit counts must be non-zero: visible={visible_count}, hidden={hidden_count}"
            )));
        }
        let v = visible_count as usize;
        let h = hidden_count as usize;

        let (visible_means, visible_stddevs) = match visible_type {
            VisibleType::Sigmoid => (None, None),
            VisibleType::Linear => (Some(r.read_f32_vec(v)?), Some(r.read_f32_vec(v)?)),
        };

        let visible_biases = r.read_f32_vec(v)?;
        let hidden_biases = r.read_f32_vec(h)?;
        let hidden_features = r.read_f32_vec(v * h)?;

        let model = Self::from_parts(
            visible_count,
            hidden_count,
            visible_type,
            visible_means,
            visible_stddevs,
            visible_biases,
            hidden_biases,
            hidden_features,
        );

        log::info!(
            "[RBM Load] visible={v}, hidden={h}, type={visible_type:?}, {} bytes",
            r.offset
        );
        if log::log_enabled!(log::Level::Debug) {
            let weights = model.hidden_features_flat();
            let min = weights.iter().copied().fold(f32::INFINITY, f32::min);
            let max = weights.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            log::debug!("[RBM Load] weight range [{min}, {max}]");
        }

        Ok(model)
    }

    /// ファイルからモデルをロードする
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::load(&mut reader)
    }

    /// ストリームへモデルを書き出す
    ///
    /// [`RbmModel::load`] と対称。出力は入力と byte-exact に一致する
    /// （LCG 状態はフォーマットに含まれない）。
    pub fn save<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&RBM_MAGIC)?;
        writer.write_all(&[self.visible_type().code()])?;
        writer.write_all(&(self.visible_count() as u16).to_le_bytes())?;
        writer.write_all(&(self.hidden_count() as u16).to_le_bytes())?;

        if let (Some(means), Some(stddevs)) = (self.visible_means(), self.visible_stddevs()) {
            write_f32_slice(writer, means)?;
            write_f32_slice(writer, stddevs)?;
        }

        write_f32_slice(writer, self.visible_biases())?;
        write_f32_slice(writer, self.hidden_biases())?;
        write_f32_slice(writer, self.hidden_features_flat())?;
        Ok(())
    }

    /// ファイルへモデルを書き出す
    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.save(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

fn write_f32_slice<W: Write>(writer: &mut W, values: &[f32]) -> Result<()> {
    for &value in values {
        writer.write_all(&value.to_le_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// v=2, h=1 の Sigmoid モデルを手組みする
    fn sigmoid_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b".RBM");
        bytes.push(0x00); // Sigmoid
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        // visible biases
        bytes.extend_from_slice(&0.25f32.to_le_bytes());
        bytes.extend_from_slice(&(-0.5f32).to_le_bytes());
        // hidden biases
        bytes.extend_from_slice(&1.5f32.to_le_bytes());
        // weights [visible][hidden]
        bytes.extend_from_slice(&2.0f32.to_le_bytes());
        bytes.extend_from_slice(&(-3.0f32).to_le_bytes());
        bytes
    }

    #[test]
    fn test_load_sigmoid_model() {
        let model = RbmModel::load(&mut Cursor::new(sigmoid_bytes())).unwrap();

        assert_eq!(model.visible_count(), 2);
        assert_eq!(model.hidden_count(), 1);
        assert_eq!(model.visible_type(), VisibleType::Sigmoid);
        assert!(model.visible_means().is_none());
        assert_eq!(model.visible_biases(), &[0.25, -0.5]);
        assert_eq!(model.hidden_biases(), &[1.5]);
        assert_eq!(model.weight(0, 0), 2.0);
        assert_eq!(model.weight(1, 0), -3.0);
        // 転置コピーも一致すること
        assert_eq!(model.visible_features_flat(), &[2.0, -3.0]);
    }

    #[test]
    fn test_save_roundtrip_byte_exact() {
        let bytes = sigmoid_bytes();
        let model = RbmModel::load(&mut Cursor::new(bytes.clone())).unwrap();

        let mut out = Vec::new();
        model.save(&mut out).unwrap();
        assert_eq!(out, bytes);
    }

    #[test]
    fn test_linear_model_roundtrip() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b".RBM");
        bytes.push(0xFF); // Linear
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        for value in [
            0.5f32, // mean
            2.0,    // stddev
            0.1,    // visible bias
            0.2, 0.3, // hidden biases
            1.0, -1.0, // weights
        ] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }

        let model = RbmModel::load(&mut Cursor::new(bytes.clone())).unwrap();
        assert_eq!(model.visible_type(), VisibleType::Linear);
        assert_eq!(model.visible_means(), Some(&[0.5f32][..]));
        assert_eq!(model.visible_stddevs(), Some(&[2.0f32][..]));

        let mut out = Vec::new();
        model.save(&mut out).unwrap();
        assert_eq!(out, bytes);
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = sigmoid_bytes();
        bytes[0] = b'X';
        let err = RbmModel::load(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, Error::InvalidMagic(m) if m == *b"XRBM"));
    }

    #[test]
    fn test_unknown_visible_type() {
        let mut bytes = sigmoid_bytes();
        bytes[4] = 0x42;
        assert!(matches!(
            RbmModel::load(&mut Cursor::new(bytes)),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_zero_unit_count() {
        let mut bytes = sigmoid_bytes();
        bytes[5..7].copy_from_slice(&0u16.to_le_bytes());
        assert!(matches!(
            RbmModel::load(&mut Cursor::new(bytes)),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_truncated_body() {
        let bytes = sigmoid_bytes();
        let cut = bytes.len() - 3;
        let err = RbmModel::load(&mut Cursor::new(&bytes[..cut])).unwrap_err();
        assert!(matches!(err, Error::TruncatedStream { .. }));
    }

    #[test]
    fn test_truncated_header() {
        let err = RbmModel::load(&mut Cursor::new(b".RB".to_vec())).unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedStream {
                expected: 4,
                actual: 0,
            }
        ));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.rbm");

        let model = RbmModel::load(&mut Cursor::new(sigmoid_bytes())).unwrap();
        model.save_file(&path).unwrap();

        let reloaded = RbmModel::load_file(&path).unwrap();
        assert_eq!(reloaded.visible_biases(), model.visible_biases());
        assert_eq!(
            reloaded.hidden_features_flat(),
            model.hidden_features_flat()
        );
    }
}
