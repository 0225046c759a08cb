//! 上位語関係の検索

use std::path::Path;

use crate::dictionary::{Dictionary, PAIR_SEPARATOR};
use crate::errors::Result;

/// 名詞を動詞化する接尾辞。
pub const VERBALIZING_SUFFIX: &str = "する";

/// 検索時に試すペアキーの種類。
///
/// 検索は[`SuffixVariant::ALL`]の順に行われ、最初に見つかったものが一致とみなされます。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SuffixVariant {
    /// `w1\tw2`
    Bare,
    /// `w1する\tw2`
    FirstVerbalized,
    /// `w1\tw2する`
    SecondVerbalized,
    /// `w1する\tw2する`
    BothVerbalized,
}

impl SuffixVariant {
    /// 検索順に並んだすべての種類。
    pub const ALL: [Self; 4] = [
        Self::Bare,
        Self::FirstVerbalized,
        Self::SecondVerbalized,
        Self::BothVerbalized,
    ];

    /// 1語目と2語目にそれぞれ接尾辞を付けるかを返します。
    #[inline(always)]
    pub const fn suffixed(self) -> (bool, bool) {
        match self {
            Self::Bare => (false, false),
            Self::FirstVerbalized => (true, false),
            Self::SecondVerbalized => (false, true),
            Self::BothVerbalized => (true, true),
        }
    }

    /// この種類のペアキーを作成します。
    ///
    /// ```
    /// use ja_hypernym::SuffixVariant;
    ///
    /// assert_eq!(SuffixVariant::FirstVerbalized.key("勉強", "学習"), "勉強する\t学習");
    /// ```
    pub fn key(self, w1: &str, w2: &str) -> String {
        let mut key = String::new();
        self.write_key(&mut key, w1, w2);
        key
    }

    fn write_key(self, key: &mut String, w1: &str, w2: &str) {
        let (first, second) = self.suffixed();
        key.reserve(w1.len() + w2.len() + 2 * VERBALIZING_SUFFIX.len() + 1);
        key.push_str(w1);
        if first {
            key.push_str(VERBALIZING_SUFFIX);
        }
        key.push(PAIR_SEPARATOR);
        key.push_str(w2);
        if second {
            key.push_str(VERBALIZING_SUFFIX);
        }
    }
}

/// 上位語関係の検索器。
///
/// 読み込み済みの辞書を所有します。値が存在する時点で辞書の読み込みは完了しているため、
/// 検索が失敗することはありません。
pub struct HypernymLookup {
    dict: Dictionary,
}

impl HypernymLookup {
    /// 読み込み済みの辞書から検索器を作成します。
    pub fn new(dict: Dictionary) -> Self {
        Self { dict }
    }

    /// ファイルパスから辞書を読み込み、検索器を作成します。
    ///
    /// # エラー
    ///
    /// [`Dictionary::from_path`]のエラーをそのまま返します。
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(Dictionary::from_path(path)?))
    }

    /// 辞書への参照を返します。
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// `w1`と`w2`が上位語関係にあるかを返します。
    ///
    /// `w1\tw2`、`w1する\tw2`、`w1\tw2する`、`w1する\tw2する`のいずれかが辞書に
    /// 含まれていれば`true`です。関係には向きがあります。
    pub fn lookup(&self, w1: &str, w2: &str) -> bool {
        self.find_match(w1, w2).is_some()
    }

    /// 最初に一致したペアキーの種類を返します。
    pub fn find_match(&self, w1: &str, w2: &str) -> Option<SuffixVariant> {
        let mut key = String::new();
        SuffixVariant::ALL.into_iter().find(|variant| {
            key.clear();
            variant.write_key(&mut key, w1, w2);
            self.dict.contains(&key)
        })
    }

    /// 検索で試すペアキーを検索順に返します。
    pub fn candidate_keys(w1: &str, w2: &str) -> [String; 4] {
        SuffixVariant::ALL.map(|variant| variant.key(w1, w2))
    }
}
