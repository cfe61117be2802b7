//! 位置指定子の解析
//!
//! 素性リストの各行で、参照部の後ろに続く位置の指定を解析します。
//! 以下の形式を左から順に読み、結果の位置をすべて和集合にまとめます。
//!
//! - `+-N`: `-N` から `N` までのすべての位置
//! - `A...B` または `A..B`: `A` から `B` までのすべての位置
//! - `-bow`: bag-of-words として扱う（位置は追加しない）
//! - `-1,1,+2`: 列挙された位置
//!
//! 位置が1つも指定されなければ位置 0 のみとなります。
//! 位置の絶対値は [`MAX_POSITION`] 以下でなければなりません。

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{CrfeatError, Result};

static PLUS_MINUS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+-\s*([0-9]+)").unwrap());
static ELLIPSIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?[0-9]+)\s?\.\.\.?\s?([+-]?[0-9]+)").unwrap()
});
static BOW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-bow").unwrap());
static COMMAS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-]?[0-9]+)((?:,[+-]?[0-9]+)*)").unwrap());

/// 位置指定子で指定できる位置の絶対値の上限
pub const MAX_POSITION: i32 = 1000;

/// 位置が上限を超えていないことを確認します。
fn bounded(pos: i32, quant: &str) -> Result<i32> {
    if !(-MAX_POSITION..=MAX_POSITION).contains(&pos) {
        return Err(CrfeatError::invalid_format(
            "quantifier",
            format!("Position {pos} is out of range (max {MAX_POSITION}) in this quantifier: {quant}"),
        ));
    }
    Ok(pos)
}

/// 解析された位置指定子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantifier {
    /// 昇順に並んだ重複のない位置
    pub positions: Vec<i32>,

    /// bag-of-words かどうか
    pub bow: bool,
}

impl Default for Quantifier {
    fn default() -> Self {
        Self {
            positions: vec![0],
            bow: false,
        }
    }
}

impl Quantifier {
    /// 位置指定子の文字列を解析します。
    ///
    /// # 引数
    ///
    /// * `quant` - 位置指定子の文字列（空白区切りの要素を空白1つで連結したもの）
    ///
    /// # 戻り値
    ///
    /// 解析された位置指定子
    ///
    /// # エラー
    ///
    /// どの形式にも当てはまらない部分がある場合、または範囲の終端が始端より
    /// 前にある場合、[`CrfeatError`] が返されます。
    pub fn parse(quant: &str) -> Result<Self> {
        let mut positions = BTreeSet::new();
        let mut bow = false;
        let mut unparsed = quant.trim();

        while !unparsed.is_empty() {
            let end = if let Some(cap) = PLUS_MINUS.captures(unparsed) {
                let window = bounded(cap[1].parse()?, quant)?;
                positions.extend(-window..=window);
                cap[0].len()
            } else if let Some(cap) = ELLIPSIS.captures(unparsed) {
                let first = bounded(cap[1].parse()?, quant)?;
                let last = bounded(cap[2].parse()?, quant)?;
                if first > last {
                    return Err(CrfeatError::invalid_format(
                        "quantifier",
                        format!("Last {last} is before first {first} in this quantifier: {quant}"),
                    ));
                }
                positions.extend(first..=last);
                cap[0].len()
            } else if let Some(m) = BOW.find(unparsed) {
                bow = true;
                m.end()
            } else if let Some(cap) = COMMAS.captures(unparsed) {
                positions.insert(bounded(cap[1].parse()?, quant)?);
                for other in cap[2].split(',').filter(|s| !s.is_empty()) {
                    positions.insert(bounded(other.parse()?, quant)?);
                }
                cap[0].len()
            } else {
                return Err(CrfeatError::invalid_format(
                    "quantifier",
                    format!("Can't parse '{unparsed}' in {quant}"),
                ));
            };
            unparsed = unparsed[end..].trim();
        }

        if positions.is_empty() {
            positions.insert(0);
        }
        Ok(Self {
            positions: positions.into_iter().collect(),
            bow,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(quant: &str) -> Vec<i32> {
        Quantifier::parse(quant).unwrap().positions
    }

    #[test]
    fn test_empty() {
        assert_eq!(Quantifier::default(), Quantifier::parse("").unwrap());
        assert_eq!(vec![0], positions("   "));
    }

    #[test]
    fn test_equivalent_forms() {
        let expected = vec![-2, -1, 0, 1, 2];
        assert_eq!(expected, positions("+-2"));
        assert_eq!(expected, positions("+- 2"));
        assert_eq!(expected, positions("-2...2"));
        assert_eq!(expected, positions("-2..2"));
        assert_eq!(expected, positions("-2 ... 2"));
        assert_eq!(expected, positions("-2,-1,0,1,2"));
        assert_eq!(expected, positions("2,1,0,-1,-2"));
        assert_eq!(expected, positions("+-1 -2,+2 0"));
    }

    #[test]
    fn test_union() {
        assert_eq!(vec![-3, 0, 1, 2, 5], positions("-3 1..2 0,5 1"));
    }

    #[test]
    fn test_bow() {
        let q = Quantifier::parse("-bow +-1").unwrap();
        assert!(q.bow);
        assert_eq!(vec![-1, 0, 1], q.positions);

        let q = Quantifier::parse("-bow").unwrap();
        assert!(q.bow);
        assert_eq!(vec![0], q.positions);

        let q = Quantifier::parse("1..3 -bow").unwrap();
        assert!(q.bow);
        assert_eq!(vec![1, 2, 3], q.positions);
    }

    #[test]
    fn test_inverted_range() {
        assert!(Quantifier::parse("2...-2").is_err());
    }

    #[test]
    fn test_malformed() {
        let err = Quantifier::parse("+-1 foo").unwrap_err();
        assert_eq!(
            "InvalidFormatError: quantifier: Can't parse 'foo' in +-1 foo",
            err.to_string()
        );
        assert!(Quantifier::parse("-bag").is_err());
        assert!(Quantifier::parse("1,").is_err());
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(2001, positions("+-1000").len());
        assert_eq!(vec![-1000, 1000], positions("-1000,1000"));
        assert!(Quantifier::parse("+-1000000000").is_err());
        assert!(Quantifier::parse("0..1001").is_err());
        assert!(Quantifier::parse("-1001...0").is_err());
        assert!(Quantifier::parse("1,-5000").is_err());
        assert!(Quantifier::parse("-2147483648").is_err());
        // i32 に収まらない値は数値の解析で失敗する
        assert!(Quantifier::parse("99999999999").is_err());
    }
}
