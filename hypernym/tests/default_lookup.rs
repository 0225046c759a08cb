//! 既定パスの共有辞書に対するモジュール関数のテスト
//!
//! ロガーはプロセス全体で1つしか設定できないため、このファイルはテストを1つだけ持ちます。

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{Level, LevelFilter, Log, Metadata, Record};

use ja_hypernym::DEFAULT_DICTIONARY_PATH;
use ja_hypernym::errors::HypernymError;

static LOAD_ERRORS: AtomicUsize = AtomicUsize::new(0);

/// 辞書の読み込み失敗を報告するエラーログを数えるロガー
struct CountingLogger;

impl Log for CountingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Error
    }

    fn log(&self, record: &Record) {
        if record.level() == Level::Error
            && record.target().starts_with("ja_hypernym")
            && record.args().to_string().contains(DEFAULT_DICTIONARY_PATH)
        {
            LOAD_ERRORS.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn flush(&self) {}
}

static LOGGER: CountingLogger = CountingLogger;

/// 既定パスに辞書がない場合、初期化は失敗し、検索は毎回NotInitializedを返し、
/// エラーログは1回だけ出力されることを確認
#[test]
fn test_default_dictionary_missing() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Error);

    assert!(!Path::new(DEFAULT_DICTIONARY_PATH).exists());

    assert!(!ja_hypernym::initialize());

    for _ in 0..3 {
        match ja_hypernym::lookup("学校", "教育機関") {
            Err(HypernymError::NotInitialized { path, cause }) => {
                assert_eq!(path, DEFAULT_DICTIONARY_PATH);
                assert!(!cause.is_empty());
            }
            other => panic!("expected NotInitialized, got {other:?}"),
        }
    }

    assert!(!ja_hypernym::initialize());
    assert!(!ja_hypernym::shared::SHARED.is_initialized());
    assert_eq!(LOAD_ERRORS.load(Ordering::SeqCst), 1);
}
