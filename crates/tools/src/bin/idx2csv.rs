//! IDX → CSV ダンプツール
//!
//! 1 行 = 1 レコードで、要素をカンマ区切りのテキストに書き出す。
//! 次元が 3 以上でも flat な行として扱う。

use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use rboltz_core::{DataFormat, IdxContainer, IdxElement};

#[derive(Parser, Debug)]
#[command(name = "idx2csv")]
#[command(about = "IDX ファイルの行データを CSV に書き出す")]
struct Cli {
    /// 入力 IDX ファイル
    #[arg(long)]
    input: PathBuf,

    /// 出力 CSV ファイル（省略時は標準出力）
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn dump<T, S, W>(idx: &mut IdxContainer<S>, out: &mut W) -> Result<()>
where
    T: IdxElement + Display,
    S: std::io::Read + std::io::Seek,
    W: Write,
{
    let mut row = vec![T::default(); idx.row_length() as usize];
    let mut line = String::new();
    for index in 0..idx.rows() {
        idx.read_row(index, &mut row)?;
        line.clear();
        for (k, value) in row.iter().enumerate() {
            if k > 0 {
                line.push(',');
            }
            line.push_str(&value.to_string());
        }
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let file =
        File::open(&cli.input).with_context(|| format!("開けません: {}", cli.input.display()))?;
    let mut idx = IdxContainer::open(file)
        .with_context(|| format!("IDX として読めません: {}", cli.input.display()))?;

    let stdout = std::io::stdout();
    let mut out: BufWriter<Box<dyn Write>> = match &cli.output {
        Some(path) => BufWriter::new(Box::new(
            File::create(path).with_context(|| format!("作れません: {}", path.display()))?,
        )),
        None => BufWriter::new(Box::new(stdout.lock())),
    };

    match idx.data_format() {
        DataFormat::UInt8 => dump::<u8, _, _>(&mut idx, &mut out)?,
        DataFormat::SInt8 => dump::<i8, _, _>(&mut idx, &mut out)?,
        DataFormat::SInt16 => dump::<i16, _, _>(&mut idx, &mut out)?,
        DataFormat::SInt32 => dump::<i32, _, _>(&mut idx, &mut out)?,
        DataFormat::Single => dump::<f32, _, _>(&mut idx, &mut out)?,
        DataFormat::Double => dump::<f64, _, _>(&mut idx, &mut out)?,
    }
    out.flush()?;

    log::info!("{} 行を書き出しました", idx.rows());
    Ok(())
}
