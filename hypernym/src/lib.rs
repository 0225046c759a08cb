//! # ja-hypernym
//!
//! 日本語の2語が上位語(is-a)関係にあるかを判定するライブラリです。
//!
//! ## 概要
//!
//! 事前に計算された単語ペアの集合(辞書)を一度だけ読み込み、メモリ上で検索します。
//! 多くの名詞は「する」を付けて動詞化できるため、検索ではそれぞれの語に「する」を
//! 付けた形も含めた4通りのペアキーを試します。
//!
//! ## 主な機能
//!
//! - **ゼロコピー読み込み**: rkyvとメモリマップによる辞書の読み込み
//! - **複数の辞書形式**: rkyvバイナリ、Zstandard圧縮バイナリ、TSVテキスト
//! - **明示的な初期化**: 読み込み済みの辞書を所有する[`HypernymLookup`]
//! - **共有辞書**: 一度だけ遅延初期化されるプロセス全体の[`LazyHypernymLookup`]
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use ja_hypernym::{Dictionary, DictionaryBuilder, HypernymLookup, SuffixVariant};
//!
//! let pairs = "学校\t教育機関\n勉強する\t学習\n";
//! let dict = DictionaryBuilder::from_reader(pairs.as_bytes())?;
//! let lookup = HypernymLookup::new(Dictionary::from_inner(dict));
//!
//! assert!(lookup.lookup("学校", "教育機関"));
//! assert!(lookup.lookup("勉強", "学習"));
//! assert!(!lookup.lookup("教育機関", "学校"));
//! assert!(!lookup.lookup("犬", "猫"));
//!
//! assert_eq!(lookup.find_match("勉強", "学習"), Some(SuffixVariant::FirstVerbalized));
//! # Ok(())
//! # }
//! ```

/// 辞書データ構造とビルダー
pub mod dictionary;

/// エラー型の定義
pub mod errors;

/// 上位語関係の検索
pub mod lookup;

/// 遅延初期化される共有検索器
pub mod shared;

#[cfg(test)]
mod tests;

// Re-exports
pub use dictionary::{Dictionary, DictionaryBuilder, DictionaryFormat};
pub use lookup::{HypernymLookup, SuffixVariant, VERBALIZING_SUFFIX};
pub use shared::{DEFAULT_DICTIONARY_PATH, LazyHypernymLookup, initialize, lookup};

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
