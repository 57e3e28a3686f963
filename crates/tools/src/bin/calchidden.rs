//! hidden 値計算ツール
//!
//! 学習済み RBM を IDX データセットの各行に適用し、hidden probability
//! （または activation / 確率的サンプルした state）を新しい IDX に書き出す。
//! モデルはバイナリ（".RBM"）と JSON のどちらでもよく、先頭バイトで判別する。

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use rboltz_core::rbm::RBM_MAGIC;
use rboltz_core::{DataFormat, IdxContainer, RbmModel};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// 非線形なしの hidden activation
    Activations,
    /// sigmoid を適用した hidden probability
    Probabilities,
    /// 確率的にサンプルした 0/1 の hidden state
    States,
}

#[derive(Parser, Debug)]
#[command(name = "calchidden")]
#[command(about = "RBM を IDX データセットに適用して hidden 値を書き出す")]
struct Cli {
    /// 学習済みモデル（.rbm バイナリまたは JSON）
    #[arg(long)]
    model: PathBuf,

    /// 入力 IDX ファイル（Single フォーマット、行長 = visible unit 数）
    #[arg(long)]
    input: PathBuf,

    /// 出力 IDX ファイル（Single、行長 = hidden unit 数）
    #[arg(short, long)]
    output: PathBuf,

    /// 出力する hidden 値の種類
    #[arg(long, value_enum, default_value_t = Mode::Probabilities)]
    mode: Mode,

    /// 進捗表示の間隔（行数）
    #[arg(long, default_value_t = 100_000)]
    progress_interval: u32,
}

/// 先頭 4 バイトで binary / JSON を判別してロードする
fn load_model(path: &Path) -> Result<RbmModel> {
    let mut file = File::open(path).with_context(|| format!("開けません: {}", path.display()))?;
    let mut magic = [0u8; 4];
    let n = file.read(&mut magic)?;
    drop(file);

    if n == 4 && magic == RBM_MAGIC {
        Ok(RbmModel::load_file(path)?)
    } else {
        let text = std::fs::read_to_string(path)?;
        Ok(RbmModel::from_json_str(&text)?)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut model = load_model(&cli.model)?;
    log::info!(
        "モデル: visible={}, hidden={}, type={:?}",
        model.visible_count(),
        model.hidden_count(),
        model.visible_type()
    );

    let file =
        File::open(&cli.input).with_context(|| format!("開けません: {}", cli.input.display()))?;
    let mut src = IdxContainer::open(file)
        .with_context(|| format!("IDX として読めません: {}", cli.input.display()))?;

    if src.data_format() != DataFormat::Single {
        bail!(
            "入力は Single フォーマットが必要です（{:?} が指定されました）",
            src.data_format()
        );
    }
    if src.row_length() as usize != model.visible_count() {
        bail!(
            "行長 {} がモデルの visible unit 数 {} と一致しません",
            src.row_length(),
            model.visible_count()
        );
    }

    let out_file = File::options()
        .read(true)
        .write(true)
        .create_new(true)
        .open(&cli.output)
        .with_context(|| format!("作れません: {}", cli.output.display()))?;
    let mut dst = IdxContainer::create(
        out_file,
        src.endianness(),
        DataFormat::Single,
        &[model.hidden_count() as u32],
    )?;

    let mut visible = vec![0.0f32; model.visible_count()];
    let mut hidden = vec![0.0f32; model.hidden_count()];
    for index in 0..src.rows() {
        src.read_row(index, &mut visible)?;
        match cli.mode {
            Mode::Activations => model.calc_hidden_activations(&visible, &mut hidden)?,
            Mode::Probabilities => model.calc_hidden_probabilities(&visible, &mut hidden)?,
            Mode::States => model.calc_hidden_states(&visible, &mut hidden)?,
        }
        dst.append_row(&hidden)?;

        if cli.progress_interval > 0 && (index + 1) % cli.progress_interval == 0 {
            eprintln!("{} / {} 行", index + 1, src.rows());
        }
    }

    dst.flush()?;
    println!("{}: {} 行", cli.output.display(), dst.rows());
    Ok(())
}
