//! endianness 対応のバイナリプリミティブ
//!
//! IDX / RBM 両フォーマットが共有する低レベル read/write。
//! コンテナが宣言する endianness とホストのネイティブ順が異なる場合のみ
//! バイトスワップする。行 / 次元のセマンティクスは一切持たない。
//!
//! 同一ストリームハンドルへのマルチスレッド同時アクセスは不可
//! （ストリーム位置が呼び出しごとに動く）。

use std::io::{self, Read, Write};

/// マルチバイト値のバイト順
///
/// コンテナごとにファイル自身が宣言する。ホストのバイト順とは独立。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    /// 上位バイト先頭（IDX ヘッダマーカー 0x0000）
    Big,
    /// 下位バイト先頭（IDX ヘッダマーカー 0xFFFF）
    Little,
}

impl Endianness {
    /// ホストのネイティブバイト順
    pub const fn native() -> Self {
        if cfg!(target_endian = "little") {
            Self::Little
        } else {
            Self::Big
        }
    }

    /// IDX ヘッダの 2 バイトマーカー値
    pub const fn marker(self) -> u16 {
        match self {
            Self::Big => 0x0000,
            Self::Little => 0xFFFF,
        }
    }

    /// マーカー値から復元。0x0000 / 0xFFFF 以外は None
    pub const fn from_marker(marker: u16) -> Option<Self> {
        match marker {
            0x0000 => Some(Self::Big),
            0xFFFF => Some(Self::Little),
            _ => None,
        }
    }
}

/// IDX の要素データフォーマット
///
/// コード値はファイルヘッダの 1 バイトフォーマットコードそのもの。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DataFormat {
    UInt8 = 0x08,
    SInt8 = 0x09,
    SInt16 = 0x0B,
    SInt32 = 0x0C,
    Single = 0x0D,
    Double = 0x0E,
}

impl DataFormat {
    /// ヘッダのフォーマットコード
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// 1 要素のバイト幅
    pub const fn width(self) -> usize {
        match self {
            Self::UInt8 | Self::SInt8 => 1,
            Self::SInt16 => 2,
            Self::SInt32 | Self::Single => 4,
            Self::Double => 8,
        }
    }

    /// フォーマットコードから復元。未知のコードは None
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x08 => Some(Self::UInt8),
            0x09 => Some(Self::SInt8),
            0x0B => Some(Self::SInt16),
            0x0C => Some(Self::SInt32),
            0x0D => Some(Self::Single),
            0x0E => Some(Self::Double),
            _ => None,
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for i8 {}
    impl Sealed for i16 {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// IDX の行要素となれる型
///
/// 6 つの [`DataFormat`] に 1:1 対応する。宣言 endianness に対する
/// 1 要素分のエンコード / デコードを提供する。
pub trait IdxElement: sealed::Sealed + Copy + Default {
    /// この型に対応するフォーマットコード
    const FORMAT: DataFormat;

    /// 1 要素のバイト幅
    const WIDTH: usize;

    /// `bytes[..WIDTH]` を宣言 endianness でデコードする
    fn from_bytes(bytes: &[u8], endianness: Endianness) -> Self;

    /// `out[..WIDTH]` へ宣言 endianness でエンコードする
    fn to_bytes(self, out: &mut [u8], endianness: Endianness);
}

macro_rules! impl_idx_element {
    ($ty:ty, $format:expr, $width:expr) => {
        impl IdxElement for $ty {
            const FORMAT: DataFormat = $format;
            const WIDTH: usize = $width;

            #[inline]
            fn from_bytes(bytes: &[u8], endianness: Endianness) -> Self {
                let mut raw = [0u8; $width];
                raw.copy_from_slice(&bytes[..$width]);
                match endianness {
                    Endianness::Big => <$ty>::from_be_bytes(raw),
                    Endianness::Little => <$ty>::from_le_bytes(raw),
                }
            }

            #[inline]
            fn to_bytes(self, out: &mut [u8], endianness: Endianness) {
                let raw = match endianness {
                    Endianness::Big => self.to_be_bytes(),
                    Endianness::Little => self.to_le_bytes(),
                };
                out[..$width].copy_from_slice(&raw);
            }
        }
    };
}

impl_idx_element!(u8, DataFormat::UInt8, 1);
impl_idx_element!(i8, DataFormat::SInt8, 1);
impl_idx_element!(i16, DataFormat::SInt16, 2);
impl_idx_element!(i32, DataFormat::SInt32, 4);
impl_idx_element!(f32, DataFormat::Single, 4);
impl_idx_element!(f64, DataFormat::Double, 8);

/// 1 バイト読む
pub(crate) fn read_u8<R: Read>(reader: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// 宣言 endianness で u32 を読む（ヘッダの次元値用）
pub(crate) fn read_u32<R: Read>(reader: &mut R, endianness: Endianness) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(match endianness {
        Endianness::Big => u32::from_be_bytes(buf),
        Endianness::Little => u32::from_le_bytes(buf),
    })
}

/// 1 バイト書く
pub(crate) fn write_u8<W: Write>(writer: &mut W, value: u8) -> io::Result<()> {
    writer.write_all(&[value])
}

/// 宣言 endianness で u32 を書く
pub(crate) fn write_u32<W: Write>(
    writer: &mut W,
    value: u32,
    endianness: Endianness,
) -> io::Result<()> {
    let buf = match endianness {
        Endianness::Big => value.to_be_bytes(),
        Endianness::Little => value.to_le_bytes(),
    };
    writer.write_all(&buf)
}
