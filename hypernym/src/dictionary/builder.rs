//! TSV形式のペアデータから辞書を構築するビルダー

use std::io::{self, BufRead, BufReader, Read};

use hashbrown::HashSet;

use crate::dictionary::{DictionaryInner, PAIR_SEPARATOR, pair_key};
use crate::errors::{HypernymError, Result};

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// 上位語ペア辞書のビルダー。
///
/// 入力は1行1ペアのTSV(`単語1\t単語2`)です。空行は無視され、行末の`\r`と
/// 先頭のUTF-8 BOMは取り除かれます。重複したペアは1つにまとめられます。
pub struct DictionaryBuilder {}

impl DictionaryBuilder {
    /// リーダーからTSVを読み込み、辞書を構築します。
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use ja_hypernym::DictionaryBuilder;
    ///
    /// let dict = DictionaryBuilder::from_reader("学校\t教育機関\n勉強する\t学習\n".as_bytes())?;
    /// assert_eq!(dict.len(), 2);
    /// assert!(dict.contains("勉強する\t学習"));
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # エラー
    ///
    /// - 読み込みに失敗した場合。
    /// - UTF-8でない行、または2つの空でない列を持たない行がある場合。
    pub fn from_reader<R>(rdr: R) -> Result<DictionaryInner>
    where
        R: Read,
    {
        let rdr = BufReader::new(rdr);

        let mut keys = HashSet::new();
        let mut num_records = 0;

        for (i, line) in rdr.lines().enumerate() {
            let lineno = i + 1;
            let line = line.map_err(|e| match e.kind() {
                io::ErrorKind::InvalidData => HypernymError::invalid_format(
                    "pairs",
                    format!("line {lineno}: the line is not valid UTF-8"),
                ),
                _ => HypernymError::IoError(e),
            })?;
            let line = line.strip_suffix('\r').unwrap_or(&line);
            let line = if lineno == 1 {
                line.strip_prefix(BYTE_ORDER_MARK).unwrap_or(line)
            } else {
                line
            };
            if line.is_empty() {
                continue;
            }

            let Some((w1, w2)) = parse_line(line) else {
                return Err(HypernymError::invalid_format(
                    "pairs",
                    format!("line {lineno}: expected `word1<TAB>word2`, found {line:?}"),
                ));
            };

            keys.insert(pair_key(w1, w2));
            num_records += 1;
        }

        Ok(Self::finish(keys, num_records))
    }

    /// 単語ペアのイテレータから辞書を構築します。
    ///
    /// # エラー
    ///
    /// 空の単語、またはタブ・改行を含む単語がある場合。
    pub fn from_pairs<I, S1, S2>(pairs: I) -> Result<DictionaryInner>
    where
        I: IntoIterator<Item = (S1, S2)>,
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        let mut keys = HashSet::new();
        let mut num_records = 0;

        for (w1, w2) in pairs {
            let (w1, w2) = (w1.as_ref(), w2.as_ref());
            check_word("w1", w1)?;
            check_word("w2", w2)?;
            keys.insert(pair_key(w1, w2));
            num_records += 1;
        }

        Ok(Self::finish(keys, num_records))
    }

    fn finish(keys: HashSet<String>, num_records: usize) -> DictionaryInner {
        let mut pairs: Vec<String> = keys.into_iter().collect();
        pairs.sort_unstable();

        if num_records > pairs.len() {
            log::debug!(
                "[ja-hypernym] Merged {} duplicate pairs ({} unique)",
                num_records - pairs.len(),
                pairs.len(),
            );
        }

        DictionaryInner::from_sorted_keys(pairs)
    }
}

fn is_valid_word(word: &str) -> bool {
    !word.is_empty() && !word.contains([PAIR_SEPARATOR, '\n', '\r'])
}

fn check_word(arg: &'static str, word: &str) -> Result<()> {
    if is_valid_word(word) {
        Ok(())
    } else {
        Err(HypernymError::invalid_argument(
            arg,
            format!("{word:?} must be non-empty and must not contain tabs or line breaks."),
        ))
    }
}

fn parse_line(line: &str) -> Option<(&str, &str)> {
    let mut fields = line.split(PAIR_SEPARATOR);
    let w1 = fields.next()?;
    let w2 = fields.next()?;
    if fields.next().is_some() || !is_valid_word(w1) || !is_valid_word(w2) {
        return None;
    }
    Some((w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("学校\t教育機関"), Some(("学校", "教育機関")));
        assert_eq!(parse_line("学校"), None);
        assert_eq!(parse_line("学校\t"), None);
        assert_eq!(parse_line("\t教育機関"), None);
        assert_eq!(parse_line("学校\t教育機関\t施設"), None);
    }

    #[test]
    fn test_check_word() {
        assert!(check_word("w1", "勉強").is_ok());
        assert!(check_word("w1", "").is_err());
        assert!(check_word("w1", "勉\t強").is_err());
        assert!(check_word("w1", "勉強\r").is_err());
    }
}
