//! 辞書のTSV書き出しモジュール

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use ja_hypernym::errors::HypernymError;
use ja_hypernym::Dictionary;

/// 書き出しコマンドの引数
#[derive(Parser, Debug)]
#[clap(
    name = "dump",
    about = "A program to write a hypernym dictionary as TSV."
)]
pub struct Args {
    /// Dictionary to read (binary, zstd-compressed binary or TSV).
    #[clap(short = 'i', long)]
    dic_in: PathBuf,

    /// File to which the pairs are output. Defaults to stdout.
    #[clap(short = 'o', long)]
    pairs_out: Option<PathBuf>,
}

/// 書き出し処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 辞書読み込みエラー
    #[error("Dictionary loading failed: {0}")]
    Hypernym(#[from] HypernymError),
}

/// 書き出しコマンドを実行する
pub fn run(args: Args) -> Result<(), DumpError> {
    eprintln!("Loading the dictionary...");
    let dict = Dictionary::from_path(&args.dic_in)?;

    match &args.pairs_out {
        Some(path) => write_pairs(&dict, BufWriter::new(File::create(path)?))?,
        None => write_pairs(&dict, BufWriter::new(io::stdout().lock()))?,
    }

    eprintln!("Wrote {} pairs", dict.len());
    Ok(())
}

/// 辞書のペアをTSVとして書き出す
pub fn write_pairs<W: Write>(dict: &Dictionary, mut wtr: W) -> io::Result<()> {
    for key in dict.keys() {
        wtr.write_all(key.as_bytes())?;
        wtr.write_all(b"\n")?;
    }
    wtr.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    use ja_hypernym::DictionaryBuilder;

    #[test]
    fn test_write_pairs_round_trips_through_builder() {
        let input = "勉強する\t学習\n学校\t教育機関\n学校\t教育機関\n";
        let dict = Dictionary::from_inner(DictionaryBuilder::from_reader(input.as_bytes()).unwrap());

        let mut out = vec![];
        write_pairs(&dict, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().count(), 2);

        let rebuilt = DictionaryBuilder::from_reader(out.as_bytes()).unwrap();
        let keys: Vec<&str> = dict.keys().collect();
        assert_eq!(rebuilt.keys().collect::<Vec<_>>(), keys);
    }
}
