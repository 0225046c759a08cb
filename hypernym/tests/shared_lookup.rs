//! 遅延初期化される共有検索器のテスト

use std::fs;
use std::sync::Arc;
use std::thread;

use tempfile::tempdir;

use ja_hypernym::errors::HypernymError;
use ja_hypernym::{DEFAULT_DICTIONARY_PATH, HypernymLookup, LazyHypernymLookup};

#[test]
fn test_default_path() {
    assert_eq!(DEFAULT_DICTIONARY_PATH, "data/ja/JaHypernym/dic.obj");
    assert_eq!(ja_hypernym::shared::SHARED.path(), DEFAULT_DICTIONARY_PATH);
}

/// 読み込み前は未初期化であり、最初のアクセスで読み込まれることを確認
#[test]
fn test_lazy_initialization() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("dic.obj");
    fs::write(&path, "学校\t教育機関\n勉強する\t学習\n").unwrap();

    let shared = LazyHypernymLookup::with_path(path.to_str().unwrap());
    assert!(!shared.is_initialized());

    assert!(shared.lookup("勉強", "学習").unwrap());
    assert!(shared.is_initialized());
    assert!(shared.initialize());
    assert!(!shared.lookup("教育機関", "学校").unwrap());
}

/// 読み込み失敗後の検索が常にNotInitializedを返すことを確認
#[test]
fn test_failed_initialization() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("missing").join("dic.obj");

    let shared = LazyHypernymLookup::with_path(path.to_str().unwrap());
    assert!(!shared.initialize());
    assert!(!shared.is_initialized());

    for _ in 0..2 {
        match shared.lookup("学校", "教育機関") {
            Err(HypernymError::NotInitialized { path: p, cause }) => {
                assert_eq!(p, path.to_str().unwrap());
                assert!(cause.contains("not found"));
            }
            other => panic!("expected NotInitialized, got {other:?}"),
        }
    }
}

/// 失敗した読み込みは後からファイルが作成されても再試行されないことを確認
#[test]
fn test_initialization_is_attempted_once() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("dic.obj");

    let shared = LazyHypernymLookup::with_path(path.to_str().unwrap());
    assert!(!shared.initialize());

    fs::write(&path, "学校\t教育機関\n").unwrap();
    assert!(!shared.initialize());
    assert!(matches!(
        shared.lookup("学校", "教育機関"),
        Err(HypernymError::NotInitialized { .. })
    ));
}

/// 複数スレッドからの同時アクセスで同じ検索器が共有されることを確認
#[test]
fn test_concurrent_first_access() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("dic.obj");
    fs::write(&path, "学校\t教育機関\n勉強する\t学習\n").unwrap();

    let shared = Arc::new(LazyHypernymLookup::with_path(path.to_str().unwrap()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                let lookup = shared.get().unwrap();
                (
                    lookup as *const HypernymLookup as usize,
                    lookup.lookup("勉強", "学習"),
                    lookup.lookup("犬", "猫"),
                )
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let first = results[0].0;
    for (addr, found, not_found) in results {
        assert_eq!(addr, first);
        assert!(found);
        assert!(!not_found);
    }
}
