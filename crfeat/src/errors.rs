//! エラー型の定義
//!
//! このモジュールは、crfeatライブラリで使用されるすべてのエラー型を定義します。

use std::error::Error;
use std::fmt;

/// crfeat専用のResult型
///
/// エラー型としてデフォルトで[`CrfeatError`]を使用します。
pub type Result<T, E = CrfeatError> = std::result::Result<T, E>;

/// crfeatのエラー型
///
/// このライブラリで発生する可能性のあるすべてのエラーを表現します。
/// いずれのエラーも致命的で、部分的な結果からの回復は行いません。
#[derive(Debug, thiserror::Error)]
pub enum CrfeatError {
    /// 無効な引数エラー
    ///
    /// [`InvalidArgumentError`]のエラーバリアント。
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// 無効なフォーマットエラー
    ///
    /// [`InvalidFormatError`]のエラーバリアント。
    #[error(transparent)]
    InvalidFormat(InvalidFormatError),

    /// 無効な状態エラー
    ///
    /// [`InvalidStateError`]のエラーバリアント。
    #[error(transparent)]
    InvalidState(InvalidStateError),

    /// 未定義の素性名が参照された
    #[error("Undefined feature: '{0}'")]
    UndefinedFeature(String),

    /// 合成名の要素を解決できない
    ///
    /// `name` はドット区切りの素性名全体、`token` は解決できなかった要素です。
    #[error("Can't handle this token: '{token}' in composed feature '{name}'")]
    UnresolvableComposition {
        /// 合成された素性名
        name: String,
        /// 解決できなかった要素
        token: String,
    },

    /// 整数パースエラー
    ///
    /// [`ParseIntError`](std::num::ParseIntError)のエラーバリアント。
    #[error(transparent)]
    ParseInt(#[from] std::num::ParseIntError),

    /// I/Oエラー
    ///
    /// [`std::io::Error`]のエラーバリアント。
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl CrfeatError {
    /// 無効な引数エラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - 引数の名前
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効なフォーマットエラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - フォーマット名
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効な状態エラーを生成します
    ///
    /// # 引数
    ///
    /// * `msg` - エラーメッセージ
    /// * `cause` - エラーの原因
    pub(crate) fn invalid_state<S, M>(msg: S, cause: M) -> Self
    where
        S: Into<String>,
        M: Into<String>,
    {
        Self::InvalidState(InvalidStateError {
            msg: msg.into(),
            cause: cause.into(),
        })
    }
}

/// 引数が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// 引数の名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// 入力フォーマットが無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidFormatError {
    /// フォーマットの名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidFormatError {}

/// 状態が無効な場合に使用されるエラー
///
/// ユーザー入力ではなく実装上の不変条件が破れたことを示します。
#[derive(Debug)]
pub struct InvalidStateError {
    /// エラーメッセージ
    pub(crate) msg: String,

    /// エラーの根本原因
    pub(crate) cause: String,
}

impl fmt::Display for InvalidStateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidStateError: {}: {}", self.msg, self.cause)
    }
}

impl Error for InvalidStateError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = CrfeatError::invalid_format("quantifier", "Can't parse 'x' in x");
        assert_eq!(
            e.to_string(),
            "InvalidFormatError: quantifier: Can't parse 'x' in x"
        );

        let e = CrfeatError::UndefinedFeature("foo".to_string());
        assert_eq!(e.to_string(), "Undefined feature: 'foo'");
    }
}
