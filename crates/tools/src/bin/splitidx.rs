//! IDX 部分抽出ツール
//!
//! 入力 IDX の行範囲 \[from, from + count) を新しい IDX ファイルへコピーする。
//! count を省略すると from 以降の全行をコピーする。
//! フォーマット・行の形・endianness は入力のまま保たれる。

use std::fs::File;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use rboltz_core::IdxContainer;

#[derive(Parser, Debug)]
#[command(name = "splitidx")]
#[command(about = "IDX ファイルの行範囲を新しいファイルへコピーする")]
struct Cli {
    /// 入力 IDX ファイル
    #[arg(long)]
    input: PathBuf,

    /// 出力 IDX ファイル
    #[arg(short, long)]
    output: PathBuf,

    /// コピー開始の行 index
    #[arg(long)]
    from: u32,

    /// コピーする行数（省略時は from 以降の全行）
    #[arg(long)]
    count: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let file =
        File::open(&cli.input).with_context(|| format!("開けません: {}", cli.input.display()))?;
    let mut src = IdxContainer::open(file)
        .with_context(|| format!("IDX として読めません: {}", cli.input.display()))?;

    if cli.from >= src.rows() {
        bail!(
            "開始 index が範囲外です: from={} (入力は {} 行)",
            cli.from,
            src.rows()
        );
    }
    let count = match cli.count {
        Some(count) => {
            if cli.from.checked_add(count).is_none_or(|end| end > src.rows()) {
                bail!(
                    "from + count が入力の行数を超えます: from={}, count={}, 入力は {} 行",
                    cli.from,
                    count,
                    src.rows()
                );
            }
            count
        }
        None => src.rows() - cli.from,
    };

    let out_file = File::options()
        .read(true)
        .write(true)
        .create_new(true)
        .open(&cli.output)
        .with_context(|| format!("作れません: {}", cli.output.display()))?;
    let mut dst = IdxContainer::create(
        out_file,
        src.endianness(),
        src.data_format(),
        &src.dimensions()[1..],
    )?;

    // endianness が同じなので raw コピーで足りる
    let mut row = vec![0u8; src.row_length_bytes() as usize];
    for index in cli.from..cli.from + count {
        src.read_row_bytes(index, &mut row)?;
        dst.append_row_bytes(&row)?;
    }

    dst.flush()?;
    println!("{}: {} 行", cli.output.display(), dst.rows());
    Ok(())
}
