//! テスト用ユーティリティ
//!
//! テストコードで使用する便利な関数を提供します。

use std::io::Write;

use tempfile::NamedTempFile;

/// 内容を書き込んだ一時ファイルを作成します。
pub(crate) fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// 文字列のスライスからトークン列を作成します。
pub(crate) fn tokens(words: &[&str]) -> Vec<String> {
    words.iter().map(ToString::to_string).collect()
}
