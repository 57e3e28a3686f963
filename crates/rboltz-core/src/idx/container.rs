//! IDX データセットコンテナ
//!
//! ヘッダ + 行データのバイナリコンテナ。ヘッダレイアウト:
//!
//! ```text
//! offset size field
//!      0    2 endianness マーカー（0x0000=Big, 0xFFFF=Little）
//!      2    1 データフォーマットコード（DataFormat 参照）
//!      3    1 次元数 N（>= 1）
//!      4  4*N u32 次元サイズ x N。dims[0]=行数、dims[1..] の積が行長
//! ```
//!
//! 行データはヘッダ直後に row-major・パディングなしで続く。
//!
//! コンテナはヘッダ由来のメタデータ（行ジオメトリ）だけを保持し、
//! 行の read/write は毎回バッキングストリームに対する seek + 一括 I/O で行う。
//! データセットはメモリより大きくなり得るため、ファイル全体のバッファリングはしない。

use std::io::{Read, Seek, SeekFrom, Write};

use super::codec::{self, DataFormat, Endianness, IdxElement};
use crate::error::{Error, Result};

/// ヘッダの固定部サイズ（マーカー 2 + フォーマット 1 + 次元数 1）
const FIXED_HEADER: u64 = 4;

/// 行数フィールド（dims[0]）のストリームオフセット
const ROW_COUNT_OFFSET: u64 = 4;

/// IDX コンテナ
///
/// ヘッダレイアウト:
///
/// ```text
/// offset size field
///      0    2 endianness マーカー（0x0000=Big, 0xFFFF=Little）
///      2    1 データフォーマットコード
///      3    1 次元数 N（>= 1）
///      4  4*N u32 次元サイズ x N。dims[0]=行数、dims[1..] の積が行長
/// ```
///
/// バッキングストリーム `S` は呼び出し側が所有権ごと渡す。
/// read 操作は `S: Read + Seek`、write 操作は追加で `S: Write` を要求する。
/// 行 index `i` が有効なのは `0 <= i < rows()` の間のみ。
pub struct IdxContainer<S> {
    stream: S,
    endianness: Endianness,
    format: DataFormat,
    /// dims[0] は現在の行数（write モードでは追記のたびに増える）
    dims: Box<[u32]>,
    /// dims[1..] の積（要素数）
    row_length: u32,
    /// 1 行のバイト数
    row_length_bytes: u64,
    /// データ領域の開始オフセット
    header_size: u64,
    writing: bool,
}

impl<S> IdxContainer<S> {
    /// 現在の行数
    #[inline]
    pub fn rows(&self) -> u32 {
        self.dims[0]
    }

    /// 1 行の要素数（dims[1..] の積）
    #[inline]
    pub fn row_length(&self) -> u32 {
        self.row_length
    }

    /// 1 行のバイト数
    #[inline]
    pub fn row_length_bytes(&self) -> u64 {
        self.row_length_bytes
    }

    /// 要素データフォーマット
    #[inline]
    pub fn data_format(&self) -> DataFormat {
        self.format
    }

    /// ファイルが宣言する endianness
    #[inline]
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// 次元リスト（dims[0] は行数）
    #[inline]
    pub fn dimensions(&self) -> &[u32] {
        &self.dims
    }

    /// ヘッダのバイトサイズ（= データ領域の開始オフセット）
    #[inline]
    pub fn header_size(&self) -> u64 {
        self.header_size
    }

    /// write モードかどうか
    #[inline]
    pub fn is_writable(&self) -> bool {
        self.writing
    }

    /// バッキングストリームを取り出してコンテナを破棄する
    pub fn into_inner(self) -> S {
        self.stream
    }

    fn require_writable(&self) -> Result<()> {
        if self.writing {
            Ok(())
        } else {
            Err(Error::ReadOnlyContainer)
        }
    }

    fn check_index(&self, index: u32) -> Result<()> {
        if index < self.dims[0] {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index,
                rows: self.dims[0],
            })
        }
    }

    fn check_format(&self, buffer: DataFormat) -> Result<()> {
        if buffer == self.format {
            Ok(())
        } else {
            Err(Error::FormatMismatch {
                container: self.format,
                buffer,
            })
        }
    }

    fn check_row_len(&self, len: usize) -> Result<()> {
        if len == self.row_length as usize {
            Ok(())
        } else {
            Err(Error::SizeMismatch {
                expected: self.row_length as usize,
                actual: len,
            })
        }
    }

    #[inline]
    fn row_offset(&self, index: u32) -> u64 {
        self.header_size + u64::from(index) * self.row_length_bytes
    }
}

impl<S: Read + Seek> IdxContainer<S> {
    /// 既存ストリームのヘッダをパースして read モードで開く
    ///
    /// 行数は open 時点で固定される。ヘッダが宣言するサイズより
    /// ストリームが短い場合は `TruncatedStream`。
    pub fn open(stream: S) -> Result<Self> {
        Self::parse(stream, false)
    }

    /// 既存ストリームを write モードで開く（行の追記 / 上書きが可能）
    pub fn open_rw(stream: S) -> Result<Self> {
        Self::parse(stream, true)
    }

    fn parse(mut stream: S, writing: bool) -> Result<Self> {
        let stream_len = stream.seek(SeekFrom::End(0))?;
        stream.seek(SeekFrom::Start(0))?;

        if stream_len < FIXED_HEADER {
            return Err(Error::TruncatedStream {
                expected: FIXED_HEADER,
                actual: stream_len,
            });
        }

        // endianness マーカー（2 バイト、どちらの解釈でも同値）
        let marker =
            u16::from_be_bytes([codec::read_u8(&mut stream)?, codec::read_u8(&mut stream)?]);
        let endianness = Endianness::from_marker(marker).ok_or_else(|| {
            Error::InvalidHeader(format!("bad endianness marker {marker:#06x}"))
        })?;

        let code = codec::read_u8(&mut stream)?;
        let format = DataFormat::from_code(code)
            .ok_or_else(|| Error::InvalidHeader(format!("unknown data format code {code:#04x}")))?;

        let dim_count = codec::read_u8(&mut stream)?;
        if dim_count == 0 {
            return Err(Error::InvalidHeader("dimension count is zero".to_string()));
        }

        let header_size = FIXED_HEADER + 4 * u64::from(dim_count);
        if stream_len < header_size {
            return Err(Error::TruncatedStream {
                expected: header_size,
                actual: stream_len,
            });
        }

        let mut dims = vec![0u32; dim_count as usize];
        for dim in dims.iter_mut() {
            *dim = codec::read_u32(&mut stream, endianness)?;
        }

        // dims[0] は行数。残りの積が行長
        let row_length = dims[1..]
            .iter()
            .try_fold(1u32, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| Error::InvalidHeader("row length overflows u32".to_string()))?;
        let row_length_bytes = u64::from(row_length) * format.width() as u64;

        let expected = u64::from(dims[0])
            .checked_mul(row_length_bytes)
            .and_then(|data| data.checked_add(header_size))
            .ok_or_else(|| Error::InvalidHeader("dataset size overflows u64".to_string()))?;
        if stream_len < expected {
            return Err(Error::TruncatedStream {
                expected,
                actual: stream_len,
            });
        }

        Ok(Self {
            stream,
            endianness,
            format,
            dims: dims.into_boxed_slice(),
            row_length,
            row_length_bytes,
            header_size,
            writing,
        })
    }

    /// 行を型付きバッファへ読む
    ///
    /// `T` はコンテナのフォーマットと一致し、`buffer.len() == row_length()`
    /// でなければならない。要素は宣言 endianness からホスト表現へ変換される。
    pub fn read_row<T: IdxElement>(&mut self, index: u32, buffer: &mut [T]) -> Result<()> {
        self.check_format(T::FORMAT)?;
        self.check_index(index)?;
        self.check_row_len(buffer.len())?;

        self.stream.seek(SeekFrom::Start(self.row_offset(index)))?;
        let mut raw = vec![0u8; self.row_length_bytes as usize];
        self.stream.read_exact(&mut raw)?;

        for (elem, chunk) in buffer.iter_mut().zip(raw.chunks_exact(T::WIDTH)) {
            *elem = T::from_bytes(chunk, self.endianness);
        }
        Ok(())
    }

    /// 行をファイルのバイト順のまま読む（変換なし）
    ///
    /// `buffer.len() == row_length_bytes()` でなければならない。
    /// endianness が同じコンテナ間のコピーに使う。
    pub fn read_row_bytes(&mut self, index: u32, buffer: &mut [u8]) -> Result<()> {
        self.check_index(index)?;
        if buffer.len() != self.row_length_bytes as usize {
            return Err(Error::SizeMismatch {
                expected: self.row_length_bytes as usize,
                actual: buffer.len(),
            });
        }

        self.stream.seek(SeekFrom::Start(self.row_offset(index)))?;
        self.stream.read_exact(buffer)?;
        Ok(())
    }
}

impl<S: Write + Seek> IdxContainer<S> {
    /// 新しいヘッダを書いて write モードのコンテナを作る
    ///
    /// `row_dims` は行の形（行数次元を除く）。dims[0] = 行数は 0 から始まり、
    /// 追記操作でのみ増える。空の `row_dims` やサイズ 0 の次元は `InvalidArgument`。
    pub fn create(
        mut stream: S,
        endianness: Endianness,
        format: DataFormat,
        row_dims: &[u32],
    ) -> Result<Self> {
        if row_dims.is_empty() {
            return Err(Error::InvalidArgument(
                "at least one row dimension is required".to_string(),
            ));
        }
        if row_dims.len() > (u8::MAX as usize) - 1 {
            return Err(Error::InvalidArgument(format!(
                "too many dimensions: {}",
                row_dims.len()
            )));
        }
        if let Some(pos) = row_dims.iter().position(|&d| d == 0) {
            return Err(Error::InvalidArgument(format!(
                "row dimension {pos} is zero"
            )));
        }
        let row_length = row_dims
            .iter()
            .try_fold(1u32, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| Error::InvalidArgument("row length overflows u32".to_string()))?;

        let mut dims = Vec::with_capacity(row_dims.len() + 1);
        dims.push(0); // 行数は 0 から
        dims.extend_from_slice(row_dims);

        stream.seek(SeekFrom::Start(0))?;
        let marker_byte = match endianness {
            Endianness::Big => 0x00,
            Endianness::Little => 0xFF,
        };
        codec::write_u8(&mut stream, marker_byte)?;
        codec::write_u8(&mut stream, marker_byte)?;
        codec::write_u8(&mut stream, format.code())?;
        codec::write_u8(&mut stream, dims.len() as u8)?;
        for &dim in &dims {
            codec::write_u32(&mut stream, dim, endianness)?;
        }

        let header_size = FIXED_HEADER + 4 * dims.len() as u64;
        let row_length_bytes = u64::from(row_length) * format.width() as u64;

        Ok(Self {
            stream,
            endianness,
            format,
            dims: dims.into_boxed_slice(),
            row_length,
            row_length_bytes,
            header_size,
            writing: true,
        })
    }

    /// ゼロ埋めの行を 1 行追記し、追記前の index を返す
    pub fn add_row(&mut self) -> Result<u32> {
        let index = self.dims[0];
        self.add_rows(1)?;
        Ok(index)
    }

    /// ゼロ埋めの行を `count` 行まとめて追記する
    ///
    /// `count == 0` は `InvalidArgument`、行カウンタが u32 を超える場合は `Overflow`。
    pub fn add_rows(&mut self, count: u32) -> Result<()> {
        self.require_writable()?;
        if count == 0 {
            return Err(Error::InvalidArgument("row count must be positive".to_string()));
        }
        let rows = self.dims[0];
        let new_rows = rows.checked_add(count).ok_or(Error::Overflow)?;

        self.stream.seek(SeekFrom::Start(self.row_offset(rows)))?;
        let zero = vec![0u8; self.row_length_bytes as usize];
        for _ in 0..count {
            self.stream.write_all(&zero)?;
        }

        self.dims[0] = new_rows;
        self.persist_row_count()
    }

    /// 既存行を型付きバッファで上書きする
    ///
    /// write モード、フォーマット一致、`buffer.len() == row_length()`、
    /// `index < rows()` を要求する。
    pub fn write_row<T: IdxElement>(&mut self, index: u32, buffer: &[T]) -> Result<()> {
        self.require_writable()?;
        self.check_format(T::FORMAT)?;
        self.check_index(index)?;
        self.check_row_len(buffer.len())?;

        let mut raw = vec![0u8; self.row_length_bytes as usize];
        for (elem, chunk) in buffer.iter().zip(raw.chunks_exact_mut(T::WIDTH)) {
            elem.to_bytes(chunk, self.endianness);
        }

        self.stream.seek(SeekFrom::Start(self.row_offset(index)))?;
        self.stream.write_all(&raw)?;
        Ok(())
    }

    /// 行の追記と書き込みを 1 回で行い、新しい行の index を返す
    pub fn append_row<T: IdxElement>(&mut self, buffer: &[T]) -> Result<u32> {
        let index = self.add_row()?;
        self.write_row(index, buffer)?;
        Ok(index)
    }

    /// ファイルのバイト順のままの行を追記する（変換なし）
    pub fn append_row_bytes(&mut self, buffer: &[u8]) -> Result<u32> {
        self.require_writable()?;
        if buffer.len() != self.row_length_bytes as usize {
            return Err(Error::SizeMismatch {
                expected: self.row_length_bytes as usize,
                actual: buffer.len(),
            });
        }
        let rows = self.dims[0];
        let new_rows = rows.checked_add(1).ok_or(Error::Overflow)?;

        self.stream.seek(SeekFrom::Start(self.row_offset(rows)))?;
        self.stream.write_all(buffer)?;

        self.dims[0] = new_rows;
        self.persist_row_count()?;
        Ok(rows)
    }

    /// バッキングストリームを flush する
    pub fn flush(&mut self) -> Result<()> {
        self.stream.flush()?;
        Ok(())
    }

    /// ヘッダ上の行数フィールドを現在値で書き直す
    ///
    /// 追記のたびに呼ぶことで、ストリームを開き直した読み手が
    /// 常に正しい行数を観測できる。
    fn persist_row_count(&mut self) -> Result<()> {
        self.stream.seek(SeekFrom::Start(ROW_COUNT_OFFSET))?;
        codec::write_u32(&mut self.stream, self.dims[0], self.endianness)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Debug;
    use std::io::Cursor;

    fn new_cursor() -> Cursor<Vec<u8>> {
        Cursor::new(Vec::new())
    }

    /// フォーマット / endianness ごとの write → read round-trip
    fn roundtrip<T: IdxElement + PartialEq + Debug>(endianness: Endianness, values: &[T]) {
        let mut idx = IdxContainer::create(
            new_cursor(),
            endianness,
            T::FORMAT,
            &[values.len() as u32],
        )
        .unwrap();

        idx.add_row().unwrap();
        idx.write_row(0, values).unwrap();

        let mut read_back = vec![T::default(); values.len()];
        idx.read_row(0, &mut read_back).unwrap();
        assert_eq!(read_back, values);

        // 開き直しても同じバイト列が読めること
        let mut reopened = IdxContainer::open(idx.into_inner()).unwrap();
        reopened.read_row(0, &mut read_back).unwrap();
        assert_eq!(read_back, values);
    }

    #[test]
    fn test_roundtrip_all_formats_both_endianness() {
        for endianness in [Endianness::Big, Endianness::Little] {
            roundtrip::<u8>(endianness, &[0, 1, 127, 255]);
            roundtrip::<i8>(endianness, &[-128, -1, 0, 127]);
            roundtrip::<i16>(endianness, &[i16::MIN, -2, 0, 0x0102, i16::MAX]);
            roundtrip::<i32>(endianness, &[i32::MIN, -3, 0, 0x01020304, i32::MAX]);
            roundtrip::<f32>(endianness, &[0.0, -1.5, 0.1, f32::MAX]);
            roundtrip::<f64>(endianness, &[0.0, -2.5, 0.2, f64::MIN_POSITIVE]);
        }
    }

    #[test]
    fn test_create_reopen_reports_header() {
        // Little / Single / 行形 [4] のコンテナに 2 行書いて開き直す
        let mut idx =
            IdxContainer::create(new_cursor(), Endianness::Little, DataFormat::Single, &[4])
                .unwrap();
        assert_eq!(idx.add_row().unwrap(), 0);
        assert_eq!(idx.add_row().unwrap(), 1);
        idx.write_row(0, &[0.1f32, 0.2, 0.3, 0.4]).unwrap();
        idx.write_row(1, &[1.0f32, 2.0, 3.0, 4.0]).unwrap();

        let mut reopened = IdxContainer::open(idx.into_inner()).unwrap();
        assert_eq!(reopened.rows(), 2);
        assert_eq!(reopened.row_length(), 4);
        assert_eq!(reopened.data_format(), DataFormat::Single);
        assert_eq!(reopened.endianness(), Endianness::Little);
        assert_eq!(reopened.dimensions(), &[2, 4]);

        let mut buf = [0.0f32; 4];
        reopened.read_row(1, &mut buf).unwrap();
        assert_eq!(buf, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_header_bytes_little_single() {
        let idx =
            IdxContainer::create(new_cursor(), Endianness::Little, DataFormat::Single, &[2, 3])
                .unwrap();
        assert_eq!(idx.row_length(), 6);
        assert_eq!(idx.row_length_bytes(), 24);
        assert_eq!(idx.header_size(), 4 + 4 * 3);

        let bytes = idx.into_inner().into_inner();
        assert_eq!(
            bytes,
            [
                0xFF, 0xFF, // endianness マーカー
                0x0D, // Single
                0x03, // 次元数（行数次元を含む）
                0x00, 0x00, 0x00, 0x00, // 行数 = 0
                0x02, 0x00, 0x00, 0x00, // dim 1
                0x03, 0x00, 0x00, 0x00, // dim 2
            ]
        );
    }

    #[test]
    fn test_big_endian_row_bytes() {
        let mut idx =
            IdxContainer::create(new_cursor(), Endianness::Big, DataFormat::SInt16, &[2]).unwrap();
        idx.append_row(&[0x0102i16, 0x0304]).unwrap();

        let bytes = idx.into_inner().into_inner();
        // ヘッダ 4 + 4*2 = 12 バイトの後に big-endian の行
        assert_eq!(&bytes[12..], &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_index_boundary() {
        let mut idx =
            IdxContainer::create(new_cursor(), Endianness::Little, DataFormat::UInt8, &[3])
                .unwrap();
        idx.add_rows(2).unwrap();

        let mut buf = [0u8; 3];
        idx.read_row(1, &mut buf).unwrap();
        assert!(matches!(
            idx.read_row(2, &mut buf),
            Err(Error::IndexOutOfRange { index: 2, rows: 2 })
        ));
        assert!(matches!(
            idx.write_row(2, &buf),
            Err(Error::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_added_rows_are_zero_filled() {
        let mut idx =
            IdxContainer::create(new_cursor(), Endianness::Big, DataFormat::Double, &[2]).unwrap();
        idx.add_rows(3).unwrap();
        assert_eq!(idx.rows(), 3);

        let mut buf = [1.0f64; 2];
        idx.read_row(2, &mut buf).unwrap();
        assert_eq!(buf, [0.0, 0.0]);
    }

    #[test]
    fn test_read_only_container_rejects_writes() {
        let mut idx =
            IdxContainer::create(new_cursor(), Endianness::Little, DataFormat::UInt8, &[1])
                .unwrap();
        idx.add_row().unwrap();

        let mut reopened = IdxContainer::open(idx.into_inner()).unwrap();
        assert!(matches!(reopened.add_row(), Err(Error::ReadOnlyContainer)));
        assert!(matches!(
            reopened.write_row(0, &[1u8]),
            Err(Error::ReadOnlyContainer)
        ));
    }

    #[test]
    fn test_open_rw_appends() {
        let mut idx =
            IdxContainer::create(new_cursor(), Endianness::Little, DataFormat::SInt32, &[2])
                .unwrap();
        idx.append_row(&[1i32, 2]).unwrap();

        let mut rw = IdxContainer::open_rw(idx.into_inner()).unwrap();
        rw.append_row(&[3i32, 4]).unwrap();
        assert_eq!(rw.rows(), 2);

        let mut reopened = IdxContainer::open(rw.into_inner()).unwrap();
        assert_eq!(reopened.rows(), 2);
        let mut buf = [0i32; 2];
        reopened.read_row(1, &mut buf).unwrap();
        assert_eq!(buf, [3, 4]);
    }

    #[test]
    fn test_format_mismatch() {
        let mut idx =
            IdxContainer::create(new_cursor(), Endianness::Little, DataFormat::Single, &[2])
                .unwrap();
        idx.add_row().unwrap();

        let mut buf = [0i32; 2];
        assert!(matches!(
            idx.read_row(0, &mut buf),
            Err(Error::FormatMismatch {
                container: DataFormat::Single,
                buffer: DataFormat::SInt32,
            })
        ));
    }

    #[test]
    fn test_size_mismatch() {
        let mut idx =
            IdxContainer::create(new_cursor(), Endianness::Little, DataFormat::UInt8, &[4])
                .unwrap();
        idx.add_row().unwrap();

        let mut buf = [0u8; 3];
        assert!(matches!(
            idx.read_row(0, &mut buf),
            Err(Error::SizeMismatch {
                expected: 4,
                actual: 3,
            })
        ));
    }

    #[test]
    fn test_invalid_create_arguments() {
        assert!(matches!(
            IdxContainer::create(new_cursor(), Endianness::Little, DataFormat::UInt8, &[]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            IdxContainer::create(new_cursor(), Endianness::Little, DataFormat::UInt8, &[2, 0]),
            Err(Error::InvalidArgument(_))
        ));

        let mut idx =
            IdxContainer::create(new_cursor(), Endianness::Little, DataFormat::UInt8, &[1])
                .unwrap();
        assert!(matches!(
            idx.add_rows(0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_invalid_header() {
        // 不正な endianness マーカー
        let bad_marker = vec![0x00, 0xFF, 0x0D, 0x01, 0, 0, 0, 0];
        assert!(matches!(
            IdxContainer::open(Cursor::new(bad_marker)),
            Err(Error::InvalidHeader(_))
        ));

        // 未知のフォーマットコード
        let bad_format = vec![0xFF, 0xFF, 0x0A, 0x01, 0, 0, 0, 0];
        assert!(matches!(
            IdxContainer::open(Cursor::new(bad_format)),
            Err(Error::InvalidHeader(_))
        ));

        // 次元数 0
        let no_dims = vec![0xFF, 0xFF, 0x08, 0x00];
        assert!(matches!(
            IdxContainer::open(Cursor::new(no_dims)),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_truncated_stream() {
        let mut idx =
            IdxContainer::create(new_cursor(), Endianness::Little, DataFormat::Single, &[4])
                .unwrap();
        idx.add_rows(2).unwrap();
        let mut bytes = idx.into_inner().into_inner();

        // 最後の行の途中で切り詰める
        bytes.truncate(bytes.len() - 5);
        assert!(matches!(
            IdxContainer::open(Cursor::new(bytes.clone())),
            Err(Error::TruncatedStream { .. })
        ));

        // ヘッダ途中で切り詰める
        bytes.truncate(6);
        assert!(matches!(
            IdxContainer::open(Cursor::new(bytes)),
            Err(Error::TruncatedStream { .. })
        ));
    }

    #[test]
    fn test_raw_row_copy() {
        let mut src =
            IdxContainer::create(new_cursor(), Endianness::Big, DataFormat::Single, &[3]).unwrap();
        src.append_row(&[1.0f32, 2.0, 3.0]).unwrap();

        let mut raw = vec![0u8; src.row_length_bytes() as usize];
        src.read_row_bytes(0, &mut raw).unwrap();

        // 同じ endianness のコンテナへ変換なしでコピー
        let mut dst =
            IdxContainer::create(new_cursor(), Endianness::Big, DataFormat::Single, &[3]).unwrap();
        dst.append_row_bytes(&raw).unwrap();

        let mut buf = [0.0f32; 3];
        dst.read_row(0, &mut buf).unwrap();
        assert_eq!(buf, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_file_backed_roundtrip() {
        let file = tempfile::tempfile().unwrap();
        let mut idx =
            IdxContainer::create(file, Endianness::Little, DataFormat::Single, &[2]).unwrap();
        for k in 0..100 {
            idx.append_row(&[k as f32, -(k as f32)]).unwrap();
        }
        idx.flush().unwrap();

        let mut reopened = IdxContainer::open(idx.into_inner()).unwrap();
        assert_eq!(reopened.rows(), 100);
        let mut buf = [0.0f32; 2];
        reopened.read_row(42, &mut buf).unwrap();
        assert_eq!(buf, [42.0, -42.0]);
    }
}
