//! 上位語ペア辞書モジュール。
//!
//! このモジュールは、上位語関係にある単語ペアの集合(辞書)の読み込み、構築、
//! シリアライズを行います。辞書の各要素は`単語1\t単語2`形式のペアキーです。
//!
//! # 辞書ファイルの形式
//!
//! [`Dictionary::from_path`]はファイル先頭のバイト列から形式を判定します:
//!
//! | 形式 | 先頭バイト | 読み込み方法 |
//! |------|-----------|-------------|
//! | rkyvバイナリ | [`MODEL_MAGIC`] | メモリマップ + 検証 |
//! | Zstandard圧縮バイナリ | [`ZSTD_MAGIC`] | ヒープに展開 + 検証 |
//! | Javaオブジェクト直列化 | [`JAVA_SERIALIZATION_MAGIC`] | エラー(TSVへの再出力が必要) |
//! | TSVテキスト | 上記以外 | [`DictionaryBuilder::from_reader`] |
//!
//! rkyvバイナリは、マジックバイト、16バイト境界までの`0xFF`パディング、
//! 辞書本体のrkyvアーカイブの順に並びます。ペアキーはバイト順で厳密に昇順に
//! 格納されるため、検索はデシリアライズなしの二分探索で行えます。
pub mod builder;

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use memmap2::Mmap;
use rkyv::rancor::Error;
use rkyv::util::AlignedVec;
use rkyv::{
    Archive, Deserialize, Serialize, access, api::serialize_using, ser::Serializer,
    ser::allocator::Arena, ser::sharing::Share, ser::writer::IoWriter, util::with_arena,
};

use crate::errors::{HypernymError, Result};

pub use crate::dictionary::builder::DictionaryBuilder;

/// ja-hypernym辞書を識別するマジックバイト。
///
/// "0.1"はバイナリフォーマットのバージョンであり、クレートのバージョンとは独立しています。
pub const MODEL_MAGIC: &[u8] = b"JaHypernymRkyv 0.1\n";

/// バージョンを問わずja-hypernym辞書に共通するマジックバイトのプレフィックス。
pub const MODEL_MAGIC_PREFIX: &[u8] = b"JaHypernymRkyv ";

/// Zstandardフレームのマジックバイト。
pub const ZSTD_MAGIC: &[u8] = &[0x28, 0xB5, 0x2F, 0xFD];

/// Javaオブジェクト直列化ストリームのマジックバイト。
pub const JAVA_SERIALIZATION_MAGIC: &[u8] = &[0xAC, 0xED, 0x00, 0x05];

/// ペアキーの2語を区切る文字。
pub const PAIR_SEPARATOR: char = '\t';

const MODEL_MAGIC_LEN: usize = MODEL_MAGIC.len();
const RKYV_ALIGNMENT: usize = 16;
const PADDING_LEN: usize = (RKYV_ALIGNMENT - (MODEL_MAGIC_LEN % RKYV_ALIGNMENT)) % RKYV_ALIGNMENT;
const DATA_START: usize = MODEL_MAGIC_LEN + PADDING_LEN;

/// 2語からペアキーを作成します。
///
/// ```
/// assert_eq!(ja_hypernym::dictionary::pair_key("学校", "教育機関"), "学校\t教育機関");
/// ```
pub fn pair_key(w1: &str, w2: &str) -> String {
    let mut key = String::with_capacity(w1.len() + w2.len() + 1);
    key.push_str(w1);
    key.push(PAIR_SEPARATOR);
    key.push_str(w2);
    key
}

/// ペアキーを2語に分割します。区切り文字が1つでない場合は`None`を返します。
pub fn split_pair_key(key: &str) -> Option<(&str, &str)> {
    let (w1, w2) = key.split_once(PAIR_SEPARATOR)?;
    if w2.contains(PAIR_SEPARATOR) {
        return None;
    }
    Some((w1, w2))
}

/// 辞書ファイルの形式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryFormat {
    /// rkyvバイナリ。
    Rkyv,
    /// Zstandard圧縮されたrkyvバイナリ。
    Zstd,
    /// 1行1ペアのTSVテキスト。
    Text,
}

impl DictionaryFormat {
    /// ファイル先頭のバイト列から形式を判定します。
    ///
    /// # エラー
    ///
    /// - Javaオブジェクト直列化ストリームの場合。
    /// - 異なるバージョンのja-hypernymバイナリの場合。
    pub fn detect(head: &[u8]) -> Result<Self> {
        if head.starts_with(MODEL_MAGIC) {
            Ok(Self::Rkyv)
        } else if head.starts_with(MODEL_MAGIC_PREFIX) {
            Err(HypernymError::invalid_format(
                "path",
                "The dictionary was written by an incompatible version of ja-hypernym.",
            ))
        } else if head.starts_with(ZSTD_MAGIC) {
            Ok(Self::Zstd)
        } else if head.starts_with(JAVA_SERIALIZATION_MAGIC) {
            Err(HypernymError::invalid_format(
                "path",
                "This appears to be a Java object serialization stream. \
                Re-export the pairs as TSV (one `word1<TAB>word2` per line).",
            ))
        } else {
            Ok(Self::Text)
        }
    }
}

/// [`Dictionary`]の内部データ。
///
/// 厳密に昇順に並んだペアキーのリストを保持します。
#[derive(Archive, Serialize, Deserialize)]
pub struct DictionaryInner {
    pairs: Vec<String>,
}

impl DictionaryInner {
    /// 昇順かつ重複のないペアキーから作成します。
    pub(crate) fn from_sorted_keys(pairs: Vec<String>) -> Self {
        debug_assert!(pairs.windows(2).all(|w| w[0] < w[1]));
        Self { pairs }
    }

    /// ペアキーが含まれるかを返します。
    #[inline(always)]
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.binary_search_by(|k| k.as_str().cmp(key)).is_ok()
    }

    /// ペアキーの数を返します。
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// 辞書が空かを返します。
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// ペアキーを昇順に返すイテレータ。
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(String::as_str)
    }

    /// 辞書データを`rkyv`フォーマットでライターにシリアライズします。
    ///
    /// 出力は[`Dictionary::from_path`]および[`Dictionary::read`]が期待する形式です。
    ///
    /// ```no_run
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use std::fs::File;
    /// use ja_hypernym::DictionaryBuilder;
    ///
    /// let dict = DictionaryBuilder::from_reader("学校\t教育機関\n".as_bytes())?;
    /// dict.write(File::create("dic.obj")?)?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # エラー
    ///
    /// - `wtr`への書き込みに失敗した場合。
    /// - `rkyv`シリアライゼーションでエラーが発生した場合。
    pub fn write<W>(&self, mut wtr: W) -> Result<()>
    where
        W: Write,
    {
        wtr.write_all(MODEL_MAGIC)?;

        let padding_bytes = vec![0xFF; PADDING_LEN];
        wtr.write_all(&padding_bytes)?;

        with_arena(|arena: &mut Arena| {
            let writer = IoWriter::new(&mut wtr);
            let mut serializer = Serializer::new(writer, arena.acquire(), Share::new());
            serialize_using::<_, rkyv::rancor::Error>(self, &mut serializer)
        })
        .map_err(|e| {
            HypernymError::invalid_state("rkyv serialization failed".to_string(), e.to_string())
        })?;

        Ok(())
    }
}

impl ArchivedDictionaryInner {
    /// ペアキーが含まれるかを返します(アーカイブ版)。
    #[inline(always)]
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.binary_search_by(|k| k.as_str().cmp(key)).is_ok()
    }

    /// ペアキーの数を返します(アーカイブ版)。
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// 辞書が空かを返します(アーカイブ版)。
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// ペアキーを昇順に返すイテレータ(アーカイブ版)。
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|k| k.as_str())
    }

    fn is_strictly_sorted(&self) -> bool {
        self.pairs.windows(2).all(|w| w[0].as_str() < w[1].as_str())
    }
}

/// メモリバッファ(mmapまたはヒープ)を所有するラッパー。
#[allow(dead_code)]
enum DictBuffer {
    Mmap(Mmap),
    Aligned(AlignedVec<16>),
}

/// アーカイブ形式の辞書。
///
/// メモリバッファと、その中のアーカイブされた辞書データへの参照を保持します。
pub struct ArchivedDictionary {
    _buffer: DictBuffer,
    data: &'static ArchivedDictionaryInner,
}

/// 読み取り専用の上位語ペア辞書。
///
/// - `Archived`: メモリマップまたはアライメント済みバッファから直接アクセスされる辞書
/// - `Owned`: ヒープ上に所有される辞書データ(TSVから構築した場合など)
pub enum Dictionary {
    Archived(ArchivedDictionary),
    Owned(DictionaryInner),
}

impl Dictionary {
    /// `DictionaryInner`から辞書を作成します。
    pub fn from_inner(dict: DictionaryInner) -> Self {
        Self::Owned(dict)
    }

    /// ファイルパスから辞書を読み込みます。
    ///
    /// 形式はファイル先頭のバイト列から判定されます([`DictionaryFormat::detect`])。
    /// rkyvバイナリはメモリマップされ、読み込み時に完全に検証されます。
    ///
    /// # エラー
    ///
    /// - ファイルが存在しない場合は[`HypernymError::ResourceNotFound`]。
    /// - パスがディレクトリの場合は[`HypernymError::PathIsDirectory`]。
    /// - 内容が破損している、またはサポートされない形式の場合。Zstandardストリームの
    ///   破損や展開後のマジックナンバーの不一致も[`HypernymError::InvalidFormat`]になります。
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            return Err(HypernymError::PathIsDirectory(path.to_path_buf()));
        }

        let mut file = File::open(path)
            .map_err(|e| HypernymError::from_open_error(path.to_path_buf(), e))?;

        let mut head = [0u8; MODEL_MAGIC_LEN];
        let head_len = read_head(&mut file, &mut head)?;
        let format = DictionaryFormat::detect(&head[..head_len])?;

        let dict = match format {
            DictionaryFormat::Rkyv => {
                let mmap = unsafe { Mmap::map(&file)? };
                Self::from_mmap(mmap)?
            }
            DictionaryFormat::Zstd => {
                file.seek(SeekFrom::Start(0))?;
                let decoder = zstd::Decoder::new(file).map_err(corrupted_zstd)?;
                Self::read(decoder).map_err(|e| match e {
                    HypernymError::IoError(e) => corrupted_zstd(e),
                    HypernymError::InvalidArgument(e) => {
                        HypernymError::invalid_format("path", e.msg)
                    }
                    e => e,
                })?
            }
            DictionaryFormat::Text => {
                file.seek(SeekFrom::Start(0))?;
                Self::from_inner(DictionaryBuilder::from_reader(file)?)
            }
        };

        log::debug!(
            "[ja-hypernym] Loaded {} pair keys from {:?} ({:?})",
            dict.len(),
            path,
            format,
        );

        Ok(dict)
    }

    /// リーダーからrkyvバイナリ形式の辞書を読み込みます。
    ///
    /// すべての内容をアライメント済みのヒープバッファに読み込んでから検証します。
    ///
    /// # エラー
    ///
    /// - データを読み込めない場合。
    /// - マジックナンバーが一致しない、またはアーカイブが無効な場合。
    pub fn read<R: Read>(mut rdr: R) -> Result<Self> {
        let mut magic = [0; MODEL_MAGIC_LEN];
        rdr.read_exact(&mut magic).map_err(truncated_as_invalid)?;

        if !magic.starts_with(MODEL_MAGIC) {
            return Err(HypernymError::invalid_argument(
                "rdr",
                "The magic number of the input dictionary mismatches.",
            ));
        }

        let mut padding_buf = vec![0; PADDING_LEN];
        rdr.read_exact(&mut padding_buf).map_err(truncated_as_invalid)?;

        let mut buffer = Vec::new();
        rdr.read_to_end(&mut buffer)?;

        let mut aligned_bytes: AlignedVec = AlignedVec::with_capacity(buffer.len());
        aligned_bytes.extend_from_slice(&buffer);

        let archived = validate(&aligned_bytes)?;

        // SAFETY: AlignedVec ensures correct alignment, and its heap buffer does not
        // move when the vector itself is moved into `DictBuffer`.
        let data: &'static ArchivedDictionaryInner = unsafe { &*(archived as *const _) };

        Ok(Self::Archived(ArchivedDictionary {
            _buffer: DictBuffer::Aligned(aligned_bytes),
            data,
        }))
    }

    fn from_mmap(mmap: Mmap) -> Result<Self> {
        let Some(data_bytes) = mmap.get(DATA_START..) else {
            return Err(HypernymError::invalid_format(
                "path",
                "Dictionary file too small or corrupted.",
            ));
        };

        let archived = validate(data_bytes)?;

        // SAFETY: the mapping is owned by the returned dictionary and outlives `data`.
        let data: &'static ArchivedDictionaryInner = unsafe { &*(archived as *const _) };

        Ok(Self::Archived(ArchivedDictionary {
            _buffer: DictBuffer::Mmap(mmap),
            data,
        }))
    }

    /// 辞書データを`rkyv`フォーマットでライターにシリアライズします。
    ///
    /// アーカイブ版の辞書は一度デシリアライズしてから書き出します。
    pub fn write<W>(&self, wtr: W) -> Result<()>
    where
        W: Write,
    {
        match self {
            Self::Owned(dict) => dict.write(wtr),
            Self::Archived(archived) => {
                let dict = rkyv::deserialize::<DictionaryInner, Error>(archived.data)?;
                dict.write(wtr)
            }
        }
    }

    /// ペアキーが含まれるかを返します。
    #[inline(always)]
    pub fn contains(&self, key: &str) -> bool {
        match self {
            Self::Archived(archived) => archived.data.contains(key),
            Self::Owned(dict) => dict.contains(key),
        }
    }

    /// `w1\tw2`が含まれるかを返します。接尾辞の補完は行いません。
    pub fn contains_pair(&self, w1: &str, w2: &str) -> bool {
        self.contains(&pair_key(w1, w2))
    }

    /// ペアキーの数を返します。
    pub fn len(&self) -> usize {
        match self {
            Self::Archived(archived) => archived.data.len(),
            Self::Owned(dict) => dict.len(),
        }
    }

    /// 辞書が空かを返します。
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// ペアキーを昇順に返すイテレータ。
    pub fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Self::Archived(archived) => Box::new(archived.data.keys()),
            Self::Owned(dict) => Box::new(dict.keys()),
        }
    }

    /// `(単語1, 単語2)`のペアを昇順に返すイテレータ。
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys().filter_map(split_pair_key)
    }
}

/// アーカイブを検証し、ペアキーが昇順であることを確認します。
fn validate(bytes: &[u8]) -> Result<&ArchivedDictionaryInner> {
    let archived = access::<ArchivedDictionaryInner, Error>(bytes).map_err(|e| {
        HypernymError::invalid_state(
            "rkyv validation failed. The dictionary file may be corrupted or incompatible."
                .to_string(),
            e.to_string(),
        )
    })?;

    if !archived.is_strictly_sorted() {
        return Err(HypernymError::invalid_format(
            "path",
            "Pair keys are not in strictly ascending order.",
        ));
    }

    Ok(archived)
}

/// 最大`buf.len()`バイトを読み込み、読み込んだバイト数を返します。
fn read_head<R: Read>(rdr: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match rdr.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

fn corrupted_zstd(e: io::Error) -> HypernymError {
    HypernymError::invalid_format("path", format!("The Zstandard stream is corrupted: {e}"))
}

fn truncated_as_invalid(e: io::Error) -> HypernymError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        HypernymError::invalid_format("rdr", "Dictionary data too small or corrupted.")
    } else {
        e.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_start_is_aligned() {
        assert_eq!(DATA_START % RKYV_ALIGNMENT, 0);
        assert!(DATA_START >= MODEL_MAGIC_LEN);
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(DictionaryFormat::detect(MODEL_MAGIC).unwrap(), DictionaryFormat::Rkyv);
        assert_eq!(
            DictionaryFormat::detect(&[0x28, 0xB5, 0x2F, 0xFD, 0x00]).unwrap(),
            DictionaryFormat::Zstd
        );
        assert_eq!(
            DictionaryFormat::detect("学校\t教育機関\n".as_bytes()).unwrap(),
            DictionaryFormat::Text
        );
        assert_eq!(DictionaryFormat::detect(b"").unwrap(), DictionaryFormat::Text);
    }

    #[test]
    fn test_detect_format_rejects_java_stream() {
        let result = DictionaryFormat::detect(&[0xAC, 0xED, 0x00, 0x05, 0x73, 0x72]);
        assert!(matches!(result, Err(HypernymError::InvalidFormat(_))));
    }

    #[test]
    fn test_detect_format_rejects_other_version() {
        let result = DictionaryFormat::detect(b"JaHypernymRkyv 9.9\n");
        assert!(matches!(result, Err(HypernymError::InvalidFormat(_))));
    }

    #[test]
    fn test_read_rejects_unsorted_keys() {
        let dict = DictionaryInner {
            pairs: vec!["猫\t動物".to_string(), "犬\t動物".to_string()],
        };
        let mut buf = vec![];
        dict.write(&mut buf).unwrap();

        let result = Dictionary::read(buf.as_slice());
        assert!(matches!(result, Err(HypernymError::InvalidFormat(_))));
    }

    #[test]
    fn test_split_pair_key() {
        assert_eq!(split_pair_key("学校\t教育機関"), Some(("学校", "教育機関")));
        assert_eq!(split_pair_key("学校"), None);
        assert_eq!(split_pair_key("a\tb\tc"), None);
    }
}
