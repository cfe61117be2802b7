//! 素性値の正規化
//!
//! 素性関数の生の出力を、素性行列に書き込む文字列へ変換します。

/// 値が存在しないことを表す予約文字列
pub const EMPTY: &str = "_NULL_";

/// 素性関数の生の出力
///
/// 素性関数は文字列・真偽値・欠損のいずれかを返します。
/// 出力はすべて [`Value::normalize`] を経由して文字列に揃えられます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// 欠損値
    Missing,

    /// 真偽値
    Bool(bool),

    /// 文字列
    Text(String),
}

impl Value {
    /// 値を正規化した文字列を返します。
    ///
    /// 欠損と空文字列は [`EMPTY`] に、真偽値は `"true"`/`"false"` になり、
    /// それ以外の文字列はそのまま返されます。
    pub fn normalize(self) -> String {
        match self {
            Self::Missing => EMPTY.to_string(),
            Self::Bool(true) => "true".to_string(),
            Self::Bool(false) => "false".to_string(),
            Self::Text(s) if s.is_empty() => EMPTY.to_string(),
            Self::Text(s) => s,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Missing, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(EMPTY, Value::Missing.normalize());
        assert_eq!(EMPTY, Value::from("").normalize());
        assert_eq!("true", Value::from(true).normalize());
        assert_eq!("false", Value::from(false).normalize());
        assert_eq!("abc", Value::from("abc").normalize());
        assert_eq!(EMPTY, Value::from(None::<String>).normalize());
    }
}
