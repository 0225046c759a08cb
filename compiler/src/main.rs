//! ja-hypernym 辞書コンパイラのメインエントリーポイント
//!
//! TSV形式の単語ペアからバイナリ辞書を構築するサブコマンドと、
//! 既存の辞書をTSVとして書き出すサブコマンドを提供します。

mod build;
mod dump;

use clap::Parser;
use thiserror::Error;

use crate::{build::BuildError, dump::DumpError};

/// コマンドライン引数の構造体
#[derive(Parser, Debug)]
#[clap(name = "compile", version)]
struct Cli {
    /// 実行するサブコマンド
    #[clap(subcommand)]
    command: Command,
}

/// 利用可能なサブコマンド
#[derive(Parser, Debug)]
enum Command {
    /// TSV形式の単語ペアからバイナリ辞書を構築します
    Build(build::Args),

    /// 辞書をTSV形式で書き出します
    ///
    /// rkyvバイナリ、zstd圧縮バイナリ、TSVのいずれの辞書も読み込めます。
    Dump(dump::Args),
}

/// コンパイラの実行中に発生する可能性のあるエラー
#[derive(Debug, Error)]
pub enum CompileError {
    /// 辞書ビルド中のエラー
    #[error(transparent)]
    BuildError(#[from] BuildError),
    /// 辞書書き出し中のエラー
    #[error(transparent)]
    DumpError(#[from] DumpError),
}

fn main() -> Result<(), CompileError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Build(args) => Ok(build::run(args)?),
        Command::Dump(args) => Ok(dump::run(args)?),
    }
}
