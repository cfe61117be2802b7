//! 素性抽出の設定
//!
//! 起動時に一度だけ初期化され、入力の読み込みが始まった後は変更されません。

use crate::errors::{CrfeatError, Result};

/// `options:` ディレクティブの接頭辞
pub(crate) const OPTIONS_DIRECTIVE: &str = "options:";

/// 素性抽出の設定
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractorConfig {
    monocase: bool,
}

impl ExtractorConfig {
    /// 既定の設定を作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// 素性抽出の前に入力トークンを小文字化するかを設定します。
    pub fn monocase(mut self, yes: bool) -> Self {
        self.monocase = yes;
        self
    }

    /// 入力トークンを小文字化するかどうかを返します。
    pub fn is_monocase(&self) -> bool {
        self.monocase
    }

    /// `options:` ディレクティブの行を設定に反映します。
    ///
    /// 現在認識されるオプションは `monocase` のみです。大文字小文字は区別しません。
    ///
    /// # エラー
    ///
    /// 未知のオプションが含まれる場合、[`CrfeatError`] が返されます。
    pub(crate) fn apply_directive(&mut self, line: &str) -> Result<()> {
        let line = line.to_lowercase();
        let options = line.strip_prefix(OPTIONS_DIRECTIVE).unwrap_or(&line);
        for option in options.split_whitespace() {
            match option {
                "monocase" => {
                    log::info!("monocase enabled by feature list");
                    self.monocase = true;
                }
                _ => {
                    return Err(CrfeatError::invalid_format(
                        "options",
                        format!("Unknown token in options: directive: {option}"),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_directive() {
        let mut config = ExtractorConfig::new();
        assert!(!config.is_monocase());
        config.apply_directive("Options: MonoCase").unwrap();
        assert!(config.is_monocase());
    }

    #[test]
    fn test_apply_directive_unknown() {
        let mut config = ExtractorConfig::new();
        assert!(config.apply_directive("options: monocase shout").is_err());
    }

    #[test]
    fn test_empty_directive() {
        let mut config = ExtractorConfig::new().monocase(false);
        config.apply_directive("options:").unwrap();
        assert!(!config.is_monocase());
    }
}
