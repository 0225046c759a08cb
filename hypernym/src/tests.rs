//! ja-hypernymのテストモジュール群
//!
//! 辞書の構築・読み込みと検索の動作を検証するテストを含みます。
