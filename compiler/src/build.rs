//! バイナリ辞書のビルドモジュール
//!
//! TSV形式(1行1ペア)の単語ペアからrkyvバイナリ辞書を構築します。
//! 出力は同じディレクトリの一時ファイルに書き込まれた後、所定のパスに移動されます。

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use ja_hypernym::dictionary::DictionaryInner;
use ja_hypernym::errors::HypernymError;
use ja_hypernym::DictionaryBuilder;
use tempfile::NamedTempFile;

/// ビルドコマンドの引数
#[derive(Parser, Debug)]
#[clap(
    name = "build",
    about = "A program to build the hypernym dictionary."
)]
pub struct Args {
    /// Word pairs in TSV (one `word1<TAB>word2` per line).
    #[clap(short = 'i', long)]
    pairs_in: PathBuf,

    /// File to which the binary dictionary is output.
    #[clap(short = 'o', long)]
    dic_out: PathBuf,

    /// Compresses the output with Zstandard.
    #[clap(long)]
    zstd: bool,

    /// Zstandard compression level.
    #[clap(long, default_value = "19")]
    level: i32,
}

/// ビルド処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 辞書構築エラー
    #[error("Dictionary building failed: {0}")]
    Hypernym(#[from] HypernymError),

    /// 一時ファイルの永続化エラー
    #[error(transparent)]
    PathPersist(#[from] tempfile::PersistError),
}

/// ビルドコマンドを実行する
pub fn run(args: Args) -> Result<(), BuildError> {
    eprintln!("Compiling the hypernym dictionary...");
    let dict = DictionaryBuilder::from_reader(File::open(&args.pairs_in)?)?;
    eprintln!("{} unique pairs", dict.len());

    eprintln!("Writing the hypernym dictionary...");
    let level = args.zstd.then_some(args.level);
    write_dictionary(&dict, &args.dic_out, level)?;

    eprintln!("Successfully built the dictionary to {}", args.dic_out.display());
    Ok(())
}

/// 辞書を`path`に書き出す
///
/// `zstd_level`が指定された場合はZstandardで圧縮します。
pub fn write_dictionary(
    dict: &DictionaryInner,
    path: &Path,
    zstd_level: Option<i32>,
) -> Result<(), BuildError> {
    let out_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(out_dir)?;

    let mut temp_file = NamedTempFile::new_in(out_dir)?;
    {
        let mut wtr = BufWriter::new(temp_file.as_file_mut());
        match zstd_level {
            Some(level) => {
                let mut encoder = zstd::Encoder::new(&mut wtr, level)?;
                dict.write(&mut encoder)?;
                encoder.finish()?;
            }
            None => dict.write(&mut wtr)?,
        }
        wtr.flush()?;
    }
    temp_file.persist(path)?;

    Ok(())
}
