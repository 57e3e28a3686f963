//! IDX ヘッダ情報表示ツール
//!
//! ファイルを開いてヘッダをパースし、endianness / フォーマット / 次元 /
//! 行数を表示する。行データは読まない。

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use rboltz_core::IdxContainer;

#[derive(Parser, Debug)]
#[command(name = "idxinfo")]
#[command(about = "IDX ファイルのヘッダ情報を表示する")]
struct Cli {
    /// 対象の IDX ファイル（複数可）
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    for path in &cli.inputs {
        let file = File::open(path).with_context(|| format!("開けません: {}", path.display()))?;
        let idx = IdxContainer::open(file)
            .with_context(|| format!("IDX として読めません: {}", path.display()))?;

        println!("{}:", path.display());
        println!("  endianness : {:?}", idx.endianness());
        println!(
            "  format     : {:?} ({} bytes/element)",
            idx.data_format(),
            idx.data_format().width()
        );
        println!("  dimensions : {:?}", idx.dimensions());
        println!("  rows       : {}", idx.rows());
        println!(
            "  row length : {} elements ({} bytes)",
            idx.row_length(),
            idx.row_length_bytes()
        );
    }
    Ok(())
}
