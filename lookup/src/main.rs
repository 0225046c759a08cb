//! 上位語関係を判定するユーティリティ
//!
//! このバイナリは、標準入力から`単語1\t単語2`形式の行を読み込み、
//! 指定された出力形式(bool、detail)で判定結果を出力します。

use std::error::Error;
use std::io::{BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use ja_hypernym::{DEFAULT_DICTIONARY_PATH, HypernymLookup};

use clap::Parser;

/// 出力モード
#[derive(Clone, Debug)]
enum OutputMode {
    Bool,
    Detail,
}

impl FromStr for OutputMode {
    type Err = &'static str;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "bool" => Ok(Self::Bool),
            "detail" => Ok(Self::Detail),
            _ => Err("Could not parse a mode"),
        }
    }
}

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "lookup", about = "Tests hypernym relations between word pairs")]
struct Args {
    /// Hypernym dictionary (binary, zstd-compressed binary or TSV).
    #[clap(short = 'i', long, default_value = DEFAULT_DICTIONARY_PATH)]
    dic: PathBuf,

    /// Output mode. Choices are bool and detail.
    #[clap(short = 'O', long, default_value = "bool")]
    output_mode: OutputMode,
}

/// 入力行を2語に分割する
fn parse_query(line: &str) -> Option<(&str, &str)> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let (w1, w2) = line.split_once('\t')?;
    if w2.contains('\t') {
        return None;
    }
    Some((w1, w2))
}

/// 1行分の判定結果を書き出す
fn write_answer<W: Write>(
    out: &mut W,
    lookup: &HypernymLookup,
    mode: &OutputMode,
    w1: &str,
    w2: &str,
) -> std::io::Result<()> {
    match mode {
        OutputMode::Bool => writeln!(out, "{}\t{}\t{}", w1, w2, lookup.lookup(w1, w2)),
        OutputMode::Detail => match lookup.find_match(w1, w2) {
            Some(variant) => writeln!(
                out,
                "{}\t{}\ttrue\tkey={}\tvariant={:?}",
                w1,
                w2,
                variant.key(w1, w2).replace('\t', "\\t"),
                variant,
            ),
            None => writeln!(out, "{}\t{}\tfalse", w1, w2),
        },
    }
}

/// メイン関数
///
/// 辞書をロードし、標準入力の各行について判定結果を標準出力に出力します。
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    eprintln!("Loading the dictionary...");
    let lookup = HypernymLookup::from_path(&args.dic)?;
    eprintln!("Ready ({} pairs)", lookup.dictionary().len());

    let is_tty = atty::is(atty::Stream::Stdout);

    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());
    for (i, line) in std::io::stdin().lock().lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let Some((w1, w2)) = parse_query(&line) else {
            return Err(format!("line {}: expected `word1<TAB>word2`, found {:?}", i + 1, line).into());
        };
        write_answer(&mut out, &lookup, &args.output_mode, w1, w2)?;
        if is_tty {
            out.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use ja_hypernym::{Dictionary, DictionaryBuilder};

    fn scenario() -> HypernymLookup {
        let dict = DictionaryBuilder::from_reader("学校\t教育機関\n勉強する\t学習\n".as_bytes()).unwrap();
        HypernymLookup::new(Dictionary::from_inner(dict))
    }

    #[test]
    fn test_parse_query() {
        assert_eq!(parse_query("勉強\t学習"), Some(("勉強", "学習")));
        assert_eq!(parse_query("勉強\t学習\r"), Some(("勉強", "学習")));
        assert_eq!(parse_query("勉強"), None);
        assert_eq!(parse_query("a\tb\tc"), None);
    }

    #[test]
    fn test_write_answer_bool() {
        let lookup = scenario();
        let mut out = vec![];
        write_answer(&mut out, &lookup, &OutputMode::Bool, "勉強", "学習").unwrap();
        write_answer(&mut out, &lookup, &OutputMode::Bool, "犬", "猫").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "勉強\t学習\ttrue\n犬\t猫\tfalse\n");
    }

    #[test]
    fn test_write_answer_detail() {
        let lookup = scenario();
        let mut out = vec![];
        write_answer(&mut out, &lookup, &OutputMode::Detail, "勉強", "学習").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "勉強\t学習\ttrue\tkey=勉強する\\t学習\tvariant=FirstVerbalized\n"
        );
    }
}
