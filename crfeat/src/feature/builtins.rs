//! 組み込み素性関数
//!
//! 表記・字種に基づくトークン単位の素性を定義します。
//! いずれも Zhang and Johnson (2003) や Ratinov and Roth (2009) で用いられた
//! 素性にならっています。

use std::sync::LazyLock;

use regex::Regex;

use crate::feature::transform::{self, TransformFn};
use crate::feature::value::Value;

static NON_INITIAL_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+\.)+([A-Za-z]+)?$").unwrap());
static INTERNAL_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+['&][A-Za-z]+$").unwrap());
static INTERNAL_HYPHEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+(-[A-Za-z]+)+$").unwrap());
static WORD_WITH_DIGIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]*([A-Za-z][0-9]|[0-9][A-Za-z])[A-Za-z0-9]*$").unwrap()
});

/// `FeatureRegistry::with_builtins` が登録する素性の一覧
pub(crate) const BUILTIN_FEATURES: &[(&str, TransformFn)] = &[
    ("token", token),
    ("shape", shape),
    ("has-cap-letters-only", has_cap_letters_only),
    ("mixed-chars", mixed_chars),
    ("word-with-digit", word_with_digit),
    ("upper-token", upcase),
    ("mixed-case", mixed_case),
    ("non-initial-period", non_initial_period),
    ("internal-hyphen", internal_hyphen),
    ("all-digits", all_digits),
    ("has-no-vowels", has_no_vowels),
    ("all-capitalized", all_capitalized),
    ("all-non-letters", all_non_letters),
    ("initial-capitalized", initial_capitalized),
    ("internal-punctuation", internal_punctuation),
    ("non-alpha-chars", non_alpha_chars),
    ("prefix3", prefix3),
    ("prefix4", prefix4),
    ("suffix4", suffix4),
    ("suffix2", suffix2),
    ("suffix3", suffix3),
    ("suffix1", suffix1),
    ("cvd", cvd),
    ("compressed-cvd", compressed_cvd),
    ("ends-with-digit", ends_with_digit),
    ("has-X-or-Z", has_x_or_z),
    ("contains-slash", contains_slash),
    ("constant", constant),
    ("unique-chars", transform::unique_chars),
    ("strip-vowels", strip_vowels),
];

#[inline(always)]
fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'A' | 'E' | 'I' | 'O' | 'U')
}

/// トークンそのもの
pub fn token(tok: &str) -> Value {
    Value::from(tok)
}

fn prefix3(tok: &str) -> Value {
    transform::prefix(tok, 3)
}

fn prefix4(tok: &str) -> Value {
    transform::prefix(tok, 4)
}

fn suffix1(tok: &str) -> Value {
    transform::suffix(tok, 1)
}

fn suffix2(tok: &str) -> Value {
    transform::suffix(tok, 2)
}

fn suffix3(tok: &str) -> Value {
    transform::suffix(tok, 3)
}

fn suffix4(tok: &str) -> Value {
    transform::suffix(tok, 4)
}

fn constant(_tok: &str) -> Value {
    Value::from("CONST")
}

/// 大文字化
pub fn upcase(tok: &str) -> Value {
    Value::Text(tok.to_uppercase())
}

/// 小文字化
pub fn downcase(tok: &str) -> Value {
    Value::Text(tok.to_lowercase())
}

/// 母音を `v`/`V`、子音を `c`/`C`、数字を `D` に置き換えます。
///
/// ASCII 以外の文字はそのまま残ります。
pub fn cvd(tok: &str) -> Value {
    Value::Text(tok.chars().map(cvd_char).collect())
}

fn cvd_char(c: char) -> char {
    match c {
        'a' | 'e' | 'i' | 'o' | 'u' => 'v',
        'A' | 'E' | 'I' | 'O' | 'U' => 'V',
        'a'..='z' => 'c',
        'A'..='Z' => 'C',
        '0'..='9' => 'D',
        _ => c,
    }
}

/// 小文字を `x`、大文字を `X`、数字を `d` に置き換えます。
pub fn shape(tok: &str) -> Value {
    Value::Text(
        tok.chars()
            .map(|c| match c {
                'a'..='z' => 'x',
                'A'..='Z' => 'X',
                '0'..='9' => 'd',
                _ => c,
            })
            .collect(),
    )
}

/// 大文字化した CVD 表記から連続する同じ記号をまとめます。
pub fn compressed_cvd(tok: &str) -> Value {
    let mut compressed = String::new();
    let mut prev = None;
    for c in tok.chars().map(cvd_char).flat_map(char::to_uppercase) {
        if prev != Some(c) {
            compressed.push(c);
        }
        prev = Some(c);
    }
    Value::Text(compressed)
}

/// 大文字を1文字以上含み、小文字を含まない（数字・記号は可）
pub fn has_cap_letters_only(tok: &str) -> Value {
    let mut has_cap = false;
    for c in tok.chars().filter(|c| c.is_alphabetic()) {
        if c.is_lowercase() {
            return Value::Bool(false);
        }
        has_cap = true;
    }
    Value::Bool(has_cap)
}

/// 文字・数字・その他のうち2種類以上を含む
pub fn mixed_chars(tok: &str) -> Value {
    let (mut letters, mut digits, mut other) = (false, false, false);
    for c in tok.chars() {
        if c.is_alphabetic() {
            letters = true;
        } else if c.is_numeric() {
            digits = true;
        } else {
            other = true;
        }
    }
    Value::Bool([letters, digits, other].iter().filter(|&&b| b).count() > 1)
}

/// 英字と数字が隣接する語（例: W3C, 3M）
pub fn word_with_digit(tok: &str) -> Value {
    Value::Bool(WORD_WITH_DIGIT.is_match(tok))
}

/// 大文字と、それ以外の文字の両方を含む（例: ProSys, eBay）
pub fn mixed_case(tok: &str) -> Value {
    let has_upper = tok.chars().any(char::is_uppercase);
    let has_other = tok.chars().any(|c| !c.is_uppercase());
    Value::Bool(has_upper && has_other)
}

/// ピリオドを含む略語（例: St., I.B.M.）
pub fn non_initial_period(tok: &str) -> Value {
    Value::Bool(NON_INITIAL_PERIOD.is_match(tok))
}

/// 内部にハイフンを含む英単語
pub fn internal_hyphen(tok: &str) -> Value {
    Value::Bool(INTERNAL_HYPHEN.is_match(tok))
}

/// 内部にアポストロフィまたはアンパサンドを含む英単語（例: O'Connor）
pub fn internal_punctuation(tok: &str) -> Value {
    Value::Bool(INTERNAL_PUNCTUATION.is_match(tok))
}

pub fn all_digits(tok: &str) -> Value {
    Value::Bool(!tok.is_empty() && tok.chars().all(char::is_numeric))
}

pub fn has_no_vowels(tok: &str) -> Value {
    Value::Bool(!tok.chars().any(is_vowel))
}

/// 大文字の英字のみからなる
pub fn all_capitalized(tok: &str) -> Value {
    Value::Bool(tok.chars().all(|c| c.is_alphabetic() && !c.is_lowercase()))
}

pub fn all_non_letters(tok: &str) -> Value {
    Value::Bool(!tok.chars().any(char::is_alphabetic))
}

pub fn initial_capitalized(tok: &str) -> Value {
    Value::Bool(tok.chars().next().is_some_and(char::is_uppercase))
}

/// 英字を除き、数字を `D` に置き換えた文字列
///
/// 結果が空文字列になった場合は正規化で欠損値となります。
pub fn non_alpha_chars(tok: &str) -> Value {
    Value::Text(
        tok.chars()
            .filter_map(|c| {
                if c.is_numeric() {
                    Some('D')
                } else if c.is_alphabetic() {
                    None
                } else {
                    Some(c)
                }
            })
            .collect(),
    )
}

/// 数字以外で始まり、数字で終わる
pub fn ends_with_digit(tok: &str) -> Value {
    let first = tok.chars().next();
    let last = tok.chars().next_back();
    Value::Bool(
        first.is_some_and(|c| !c.is_numeric()) && last.is_some_and(char::is_numeric),
    )
}

pub fn has_x_or_z(tok: &str) -> Value {
    Value::Bool(tok.contains('X') || tok.contains('Z'))
}

pub fn contains_slash(tok: &str) -> Value {
    Value::Bool(tok.contains('/'))
}

/// 母音を取り除いた文字列
pub fn strip_vowels(tok: &str) -> Value {
    Value::Text(tok.chars().filter(|&c| !is_vowel(c)).collect())
}
