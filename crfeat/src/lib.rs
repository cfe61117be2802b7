//! # crfeat
//!
//! crfeatは、系列ラベリング用のトークン素性を抽出し、CRF++ のテンプレートを生成するライブラリです。
//!
//! ## 概要
//!
//! 素性リストファイルに書かれたエントリから、1行1トークンの入力に対する素性行列と、
//! その行列を参照する `crf_learn` 用のテンプレートを作ります。
//!
//! ## 主な機能
//!
//! - **組み込み素性**: 字種・表記に基づく30種類のトークン素性
//! - **ドット記法による合成**: `token.upcase.prefix3` のような素性を必要に応じて構築
//! - **単語リスト・フレーズリスト**: ファイルから読み込んだ語彙への所属、最長一致のフレーズ照合
//! - **位置指定子**: `+-2`、`-1..1`、`-bow` などによるウィンドウの指定
//! - **逐次処理**: 文ごとに素性行列を書き出し、メモリには現在の文だけを保持
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use crfeat::feature::Value;
//! use crfeat::{ExtractorConfig, FeatureList, FeatureRegistry, Featurizer, write_templates};
//!
//! let mut registry = FeatureRegistry::with_builtins();
//! registry.define_token("is-title", |tok: &str| {
//!     Value::from(tok.starts_with(char::is_uppercase))
//! })?;
//!
//! let featlist = "U\ncvd +-1\nis-title\n";
//! let list = FeatureList::from_reader(featlist.as_bytes(), &mut registry, ExtractorConfig::new())?;
//!
//! let mut matrix = vec![];
//! Featurizer::new(&list)
//!     .labeled(true)
//!     .write_matrix("Tokyo\tB-LOC\n\n".as_bytes(), &mut matrix)?;
//! assert_eq!(String::from_utf8(matrix)?, "Tokyo\tCvccv\ttrue\tB-LOC\n\n");
//!
//! let mut templates = vec![];
//! write_templates(&list, &mut templates)?;
//! assert_eq!(
//!     String::from_utf8(templates)?,
//!     "U\nU00-1:%x[-1,1]\nU00:%x[0,1]\nU00+1:%x[1,1]\nU01:%x[0,2]\n",
//! );
//! # Ok(())
//! # }
//! ```

/// 抽出器の設定
pub mod config;

/// エラー型の定義
pub mod errors;

/// 素性定義と素性レジストリ
pub mod feature;

/// 素性リストの解析
pub mod feature_list;

/// 素性行列の出力
pub mod featurizer;

/// CRF++ 形式のテンプレート生成
pub mod template;

/// 入出力に関するユーティリティ関数
pub mod utils;

/// 単語リストとフレーズリスト
pub mod wordlist;

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod tests;

// Re-exports
pub use config::ExtractorConfig;
pub use feature::FeatureRegistry;
pub use feature_list::FeatureList;
pub use featurizer::Featurizer;
pub use template::write_templates;

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
