//! プロセス全体で共有される遅延初期化の検索器
//!
//! 辞書は最初のアクセス時に一度だけ読み込まれます。複数のスレッドが同時に
//! 最初のアクセスを行っても、読み込みは1回だけ実行されます。読み込みに失敗した
//! 場合は診断メッセージを1回だけログに出力し、以降の検索はすべて
//! [`HypernymError::NotInitialized`]を返します。

use std::borrow::Cow;
use std::sync::OnceLock;

use crate::errors::{HypernymError, Result};
use crate::lookup::HypernymLookup;

/// 共有検索器が読み込む辞書のパス(カレントディレクトリからの相対パス)。
pub const DEFAULT_DICTIONARY_PATH: &str = "data/ja/JaHypernym/dic.obj";

/// [`DEFAULT_DICTIONARY_PATH`]から読み込む共有検索器。
pub static SHARED: LazyHypernymLookup = LazyHypernymLookup::new(DEFAULT_DICTIONARY_PATH);

/// 遅延初期化される検索器。
pub struct LazyHypernymLookup {
    path: Cow<'static, str>,
    state: OnceLock<std::result::Result<HypernymLookup, String>>,
}

impl LazyHypernymLookup {
    /// 静的なパスから作成します。辞書はまだ読み込まれません。
    pub const fn new(path: &'static str) -> Self {
        Self {
            path: Cow::Borrowed(path),
            state: OnceLock::new(),
        }
    }

    /// 任意のパスから作成します。辞書はまだ読み込まれません。
    pub fn with_path<S: Into<String>>(path: S) -> Self {
        Self {
            path: Cow::Owned(path.into()),
            state: OnceLock::new(),
        }
    }

    /// 辞書のパスを返します。
    pub fn path(&self) -> &str {
        &self.path
    }

    fn state(&self) -> &std::result::Result<HypernymLookup, String> {
        self.state.get_or_init(|| match HypernymLookup::from_path(&*self.path) {
            Ok(lookup) => Ok(lookup),
            Err(e) => {
                log::error!(
                    "[ja-hypernym] Cannot read the hypernym dictionary '{}': {}",
                    self.path,
                    e,
                );
                Err(e.to_string())
            }
        })
    }

    /// 辞書を読み込み、成功したかを返します。
    ///
    /// 読み込みは最初の呼び出しでのみ行われ、以降は最初の結果を返します。
    pub fn initialize(&self) -> bool {
        self.state().is_ok()
    }

    /// 読み込みが完了して成功しているかを返します。読み込みは行いません。
    pub fn is_initialized(&self) -> bool {
        matches!(self.state.get(), Some(Ok(_)))
    }

    /// 検索器への参照を返します。必要であれば辞書を読み込みます。
    ///
    /// # エラー
    ///
    /// 読み込みに失敗していた場合は[`HypernymError::NotInitialized`]。
    pub fn get(&self) -> Result<&HypernymLookup> {
        self.state()
            .as_ref()
            .map_err(|cause| HypernymError::NotInitialized {
                path: self.path.to_string(),
                cause: cause.clone(),
            })
    }

    /// [`HypernymLookup::lookup`]を共有辞書に対して実行します。
    ///
    /// # エラー
    ///
    /// 読み込みに失敗していた場合は[`HypernymError::NotInitialized`]。
    pub fn lookup(&self, w1: &str, w2: &str) -> Result<bool> {
        Ok(self.get()?.lookup(w1, w2))
    }
}

/// [`SHARED`]の辞書を読み込み、成功したかを返します。
pub fn initialize() -> bool {
    SHARED.initialize()
}

/// [`SHARED`]の辞書で`w1`と`w2`が上位語関係にあるかを返します。
///
/// # エラー
///
/// [`DEFAULT_DICTIONARY_PATH`]の読み込みに失敗していた場合は
/// [`HypernymError::NotInitialized`]。
pub fn lookup(w1: &str, w2: &str) -> Result<bool> {
    SHARED.lookup(w1, w2)
}
