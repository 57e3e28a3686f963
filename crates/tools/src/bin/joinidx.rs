//! IDX 結合ツール
//!
//! 行数の等しい複数の IDX ファイルを列方向に結合し、各行を連結した
//! 1 つの出力ファイルを作る。すべての入力はフォーマットと行数が一致
//! している必要がある。出力の endianness は最初の入力に合わせる。

use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use rboltz_core::{DataFormat, IdxContainer, IdxElement};

#[derive(Parser, Debug)]
#[command(name = "joinidx")]
#[command(about = "行数の等しい IDX ファイルを列方向に結合する")]
struct Cli {
    /// 出力 IDX ファイル
    #[arg(short, long)]
    output: PathBuf,

    /// 入力 IDX ファイル（2 つ以上）
    #[arg(required = true, num_args = 2..)]
    inputs: Vec<PathBuf>,
}

/// 各入力の行を読み、連結した行を出力へ追記する
fn join<T, S>(inputs: &mut [IdxContainer<File>], dst: &mut IdxContainer<S>) -> Result<()>
where
    T: IdxElement,
    S: Read + Write + Seek,
{
    let rows = inputs[0].rows();
    let mut joined = vec![T::default(); dst.row_length() as usize];
    for index in 0..rows {
        let mut offset = 0usize;
        for src in inputs.iter_mut() {
            let len = src.row_length() as usize;
            src.read_row(index, &mut joined[offset..offset + len])?;
            offset += len;
        }
        dst.append_row(&joined)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut inputs = Vec::with_capacity(cli.inputs.len());
    for path in &cli.inputs {
        let file = File::open(path).with_context(|| format!("開けません: {}", path.display()))?;
        let idx = IdxContainer::open(file)
            .with_context(|| format!("IDX として読めません: {}", path.display()))?;
        inputs.push(idx);
    }

    // 最初の入力がフォーマット / 行数 / 出力 endianness を決める
    let format = inputs[0].data_format();
    let rows = inputs[0].rows();
    let endianness = inputs[0].endianness();
    let mut joined_length = 0u32;
    for (idx, path) in inputs.iter().zip(&cli.inputs) {
        if idx.data_format() != format {
            bail!(
                "{}: フォーマット不一致 ({:?}, 期待 {:?})",
                path.display(),
                idx.data_format(),
                format
            );
        }
        if idx.rows() != rows {
            bail!(
                "{}: 行数不一致 ({}, 期待 {})",
                path.display(),
                idx.rows(),
                rows
            );
        }
        joined_length = joined_length
            .checked_add(idx.row_length())
            .context("結合後の行長が u32 を超えます")?;
        log::info!("{}: {} 要素/行", path.display(), idx.row_length());
    }

    let out_file = File::options()
        .read(true)
        .write(true)
        .create_new(true)
        .open(&cli.output)
        .with_context(|| format!("作れません: {}", cli.output.display()))?;
    let mut dst = IdxContainer::create(out_file, endianness, format, &[joined_length])?;

    match format {
        DataFormat::UInt8 => join::<u8, _>(&mut inputs, &mut dst)?,
        DataFormat::SInt8 => join::<i8, _>(&mut inputs, &mut dst)?,
        DataFormat::SInt16 => join::<i16, _>(&mut inputs, &mut dst)?,
        DataFormat::SInt32 => join::<i32, _>(&mut inputs, &mut dst)?,
        DataFormat::Single => join::<f32, _>(&mut inputs, &mut dst)?,
        DataFormat::Double => join::<f64, _>(&mut inputs, &mut dst)?,
    }

    dst.flush()?;
    println!(
        "{}: {} 行 x {} 要素",
        cli.output.display(),
        dst.rows(),
        dst.row_length()
    );
    Ok(())
}
