//! 文字列変換と合成ステップ
//!
//! ドット記法による素性合成（例: `cvd.upcase.prefix3`）で、基底素性の値に
//! 左から順に適用される変換を定義します。

use std::fmt;

use hashbrown::HashMap;

use crate::feature::builtins;
use crate::feature::value::{EMPTY, Value};

/// 名前付きの単項文字列変換
pub type TransformFn = fn(&str) -> Value;

/// 先頭 `n` 文字を返します。文字数が `n` 未満の場合は [`EMPTY`] を返します。
pub fn prefix(s: &str, n: usize) -> Value {
    if s.chars().count() >= n {
        Value::Text(s.chars().take(n).collect())
    } else {
        Value::from(EMPTY)
    }
}

/// 末尾 `n` 文字を返します。文字数が `n` 未満の場合は [`EMPTY`] を返します。
pub fn suffix(s: &str, n: usize) -> Value {
    let len = s.chars().count();
    if len >= n {
        Value::Text(s.chars().skip(len - n).collect())
    } else {
        Value::from(EMPTY)
    }
}

/// 重複を除いた文字を初出順に並べた文字列を返します。
pub fn unique_chars(s: &str) -> Value {
    let mut seen = hashbrown::HashSet::new();
    Value::Text(s.chars().filter(|&c| seen.insert(c)).collect())
}

/// 文字をコードポイントの昇順に並べ替えた文字列を返します。
pub fn sort_chars(s: &str) -> Value {
    let mut chars: Vec<char> = s.chars().collect();
    chars.sort_unstable();
    Value::Text(chars.into_iter().collect())
}

/// 合成の1ステップ
#[derive(Clone)]
pub enum Step {
    /// 先頭 N 文字 (`prefixN`)
    Prefix(usize),

    /// 末尾 N 文字 (`suffixN`)
    Suffix(usize),

    /// 重複文字の除去 (`unique`)
    Unique,

    /// 文字の並べ替え (`sort`)
    Sort,

    /// 名前付き変換
    Named(&'static str, TransformFn),
}

impl Step {
    /// 正規化済みの値にステップを適用し、結果を正規化して返します。
    pub fn apply(&self, value: &str) -> String {
        let raw = match self {
            Self::Prefix(n) => prefix(value, *n),
            Self::Suffix(n) => suffix(value, *n),
            Self::Unique => unique_chars(value),
            Self::Sort => sort_chars(value),
            Self::Named(_, f) => f(value),
        };
        raw.normalize()
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Prefix(n) => write!(f, "prefix{n}"),
            Self::Suffix(n) => write!(f, "suffix{n}"),
            Self::Unique => write!(f, "unique"),
            Self::Sort => write!(f, "sort"),
            Self::Named(name, _) => write!(f, "{name}"),
        }
    }
}

/// 関数名で参照できる変換
///
/// 既存の素性リストが `token.sortChars.uniqueChars` のように関数名で
/// 合成ステップを書くため、上の素性名とは別に登録します。
/// 述語は真偽値を返し、ステップの正規化で `"true"`/`"false"` になります。
const FUNCTION_NAMES: &[(&str, TransformFn)] = &[
    ("uniqueChars", unique_chars),
    ("sortChars", sort_chars),
    ("stripVowels", builtins::strip_vowels),
    ("compressedCVD", builtins::compressed_cvd),
    ("nonAlphaChars", builtins::non_alpha_chars),
    ("hasNonInitialPeriod", builtins::non_initial_period),
    ("hasNoVowels", builtins::has_no_vowels),
    ("isAllCapitalized", builtins::all_capitalized),
    ("hasCapLettersOnly", builtins::has_cap_letters_only),
    ("hasMixedChars", builtins::mixed_chars),
    ("hasInternalPunctuation", builtins::internal_punctuation),
    ("hasInternalHyphen", builtins::internal_hyphen),
    ("isAllNonLetters", builtins::all_non_letters),
    ("isMixedCase", builtins::mixed_case),
    ("isWordWithDigit", builtins::word_with_digit),
    ("hasXorZ", builtins::has_x_or_z),
    ("containsSlash", builtins::contains_slash),
];

/// 合成ステップとして使える名前付き変換の表
pub struct TransformTable {
    transforms: HashMap<&'static str, TransformFn>,
}

impl Default for TransformTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformTable {
    /// 組み込み変換を登録した表を作成します。
    pub fn new() -> Self {
        let mut transforms: HashMap<&'static str, TransformFn> = HashMap::new();
        transforms.insert("upcase", builtins::upcase);
        transforms.insert("downcase", builtins::downcase);
        transforms.insert("cvd", builtins::cvd);
        transforms.insert("shape", builtins::shape);
        transforms.insert("compressed-cvd", builtins::compressed_cvd);
        transforms.insert("strip-vowels", builtins::strip_vowels);
        transforms.insert("non-alpha-chars", builtins::non_alpha_chars);
        transforms.insert("unique-chars", unique_chars);
        transforms.insert("sort-chars", sort_chars);
        for &(name, f) in FUNCTION_NAMES {
            transforms.insert(name, f);
        }
        Self { transforms }
    }

    /// ドット区切りの1要素をステップとして解釈します。
    ///
    /// `prefixN`・`suffixN`・`unique`・`sort` を優先し、それ以外は表を引きます。
    /// どれにも当てはまらない場合は `None` を返します。
    pub fn step(&self, token: &str) -> Option<Step> {
        if let Some(n) = token.strip_prefix("prefix").and_then(parse_count) {
            return Some(Step::Prefix(n));
        }
        if let Some(n) = token.strip_prefix("suffix").and_then(parse_count) {
            return Some(Step::Suffix(n));
        }
        match token {
            "unique" => Some(Step::Unique),
            "sort" => Some(Step::Sort),
            _ => self
                .transforms
                .get_key_value(token)
                .map(|(&name, &f)| Step::Named(name, f)),
        }
    }
}

/// `[0-9]+` のみからなる文字列を数値として読みます。
fn parse_count(s: &str) -> Option<usize> {
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_suffix() {
        assert_eq!("ab", prefix("abc", 2).normalize());
        assert_eq!("bc", suffix("abc", 2).normalize());
        assert_eq!("abc", prefix("abc", 3).normalize());
        assert_eq!(EMPTY, prefix("abc", 4).normalize());
        assert_eq!(EMPTY, suffix("abc", 4).normalize());
        assert_eq!(EMPTY, suffix("", 1).normalize());
        // 長さ 0 は空文字列となり、正規化で EMPTY になる
        assert_eq!(EMPTY, prefix("abc", 0).normalize());
    }

    #[test]
    fn test_prefix_counts_chars() {
        assert_eq!("東京", prefix("東京都", 2).normalize());
        assert_eq!("京都", suffix("東京都", 2).normalize());
    }

    #[test]
    fn test_unique_sort() {
        assert_eq!("abdnn", sort_chars("bandn").normalize());
        assert_eq!("band", unique_chars("bandn").normalize());

        let sorted = sort_chars("banana").normalize();
        let once = unique_chars(&sorted).normalize();
        assert_eq!("abn", once);
        let twice = unique_chars(&sort_chars(&once).normalize()).normalize();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_step() {
        let table = TransformTable::new();
        assert!(matches!(table.step("prefix3"), Some(Step::Prefix(3))));
        assert!(matches!(table.step("suffix10"), Some(Step::Suffix(10))));
        assert!(matches!(table.step("unique"), Some(Step::Unique)));
        assert!(matches!(table.step("sort"), Some(Step::Sort)));
        assert!(matches!(table.step("upcase"), Some(Step::Named("upcase", _))));
        assert!(table.step("prefix").is_none());
        assert!(table.step("prefix-1").is_none());
        assert!(table.step("no-such-transform").is_none());
    }

    #[test]
    fn test_step_apply() {
        let table = TransformTable::new();
        let step = table.step("upcase").unwrap();
        assert_eq!("ABC", step.apply("abc"));
        let step = table.step("strip-vowels").unwrap();
        assert_eq!(EMPTY, step.apply("aeiou"));
    }

    #[test]
    fn test_step_function_names() {
        let table = TransformTable::new();
        assert_eq!("abn", table.step("uniqueChars").unwrap().apply("abnn"));
        assert_eq!("abn", table.step("sortChars").unwrap().apply("nba"));
        assert_eq!("Tky", table.step("stripVowels").unwrap().apply("Tokyo"));
        assert_eq!("CVCV", table.step("compressedCVD").unwrap().apply("Tokyo"));
        assert_eq!("true", table.step("hasNoVowels").unwrap().apply("Tky"));
        assert_eq!("false", table.step("hasXorZ").unwrap().apply("abc"));
        assert!(table.step("defineBuiltInFeatures").is_none());
    }
}
