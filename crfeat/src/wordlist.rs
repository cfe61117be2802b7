//! 単語リストとフレーズリスト
//!
//! `defwordlist` と `defphraselist` で定義される素性が参照する照合用データを提供します。
//! どちらも大文字小文字を区別せず、読み込み時に小文字化されます。

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use hashbrown::{HashMap, HashSet};

use crate::errors::Result;

/// 空行と `#` で始まる行を除いた、前後の空白を取り除いた小文字の行を返します。
fn content_lines<R>(rdr: R) -> impl Iterator<Item = std::io::Result<String>>
where
    R: Read,
{
    BufReader::new(rdr).lines().filter_map(|line| match line {
        Ok(line) => {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                None
            } else {
                Some(Ok(line.to_lowercase()))
            }
        }
        Err(e) => Some(Err(e)),
    })
}

/// 小文字化された単語の集合
#[derive(Debug, Default, Clone)]
pub struct WordSet {
    words: HashSet<String>,
}

impl WordSet {
    /// 空の集合を作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// リーダーから空白区切りの単語を読み込み、集合に追加します。
    ///
    /// # エラー
    ///
    /// 読み込みに失敗した場合、[`CrfeatError`](crate::errors::CrfeatError) が返されます。
    pub fn extend_from_reader<R>(&mut self, rdr: R) -> Result<()>
    where
        R: Read,
    {
        for line in content_lines(rdr) {
            let line = line?;
            self.words
                .extend(line.split_whitespace().map(ToString::to_string));
        }
        Ok(())
    }

    /// 複数のファイルから集合を構築します。
    ///
    /// # 引数
    ///
    /// * `paths` - 単語リストファイルのパス
    ///
    /// # エラー
    ///
    /// ファイルが開けない場合、[`CrfeatError`](crate::errors::CrfeatError) が返されます。
    pub fn from_files<P>(paths: &[P]) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let mut set = Self::new();
        for path in paths {
            set.extend_from_reader(File::open(path)?)?;
        }
        Ok(set)
    }

    /// 単語が集合に含まれるかを大文字小文字を区別せずに判定します。
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word.to_lowercase().as_str())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// 先頭の単語からフレーズを引く索引
///
/// 同じ先頭単語を持つフレーズは長さの降順に並び、同じ長さのものは追加順を保ちます。
/// そのため先頭から探索すると最長一致が得られます。
#[derive(Debug, Default, Clone)]
pub struct PhraseIndex {
    phrases: HashMap<String, Vec<Vec<String>>>,
}

impl PhraseIndex {
    /// 空の索引を作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// フレーズを1つ追加します。空白で単語に分割され、小文字化されます。
    pub fn insert(&mut self, phrase: &str) {
        let words: Vec<String> = phrase
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        let Some(first) = words.first() else {
            return;
        };
        let bucket = self.phrases.entry(first.clone()).or_default();
        // 安定ソートの挿入位置: 同じ長さの既存フレーズの後ろ
        let pos = bucket.partition_point(|p| p.len() >= words.len());
        bucket.insert(pos, words);
    }

    /// リーダーから1行1フレーズで読み込み、索引に追加します。
    ///
    /// # エラー
    ///
    /// 読み込みに失敗した場合、[`CrfeatError`](crate::errors::CrfeatError) が返されます。
    pub fn extend_from_reader<R>(&mut self, rdr: R) -> Result<()>
    where
        R: Read,
    {
        for line in content_lines(rdr) {
            self.insert(&line?);
        }
        Ok(())
    }

    /// 複数のファイルから索引を構築します。
    ///
    /// # エラー
    ///
    /// ファイルが開けない場合、[`CrfeatError`](crate::errors::CrfeatError) が返されます。
    pub fn from_files<P>(paths: &[P]) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let mut index = Self::new();
        for path in paths {
            index.extend_from_reader(File::open(path)?)?;
        }
        Ok(index)
    }

    /// 位置 `idx` から始まる最長のフレーズを返します。
    pub fn longest_match<S>(&self, tokens: &[S], idx: usize) -> Option<&[String]>
    where
        S: AsRef<str>,
    {
        let phrases = self.phrases.get(tokens[idx].as_ref().to_lowercase().as_str())?;
        let remaining = tokens.len() - idx;
        phrases
            .iter()
            .find(|phrase| {
                phrase.len() <= remaining
                    && phrase
                        .iter()
                        .zip(&tokens[idx..])
                        .all(|(word, token)| token.as_ref().to_lowercase() == *word)
            })
            .map(Vec::as_slice)
    }

    /// 文中のフレーズに含まれる位置を `"true"`、それ以外を `"false"` とした列を返します。
    ///
    /// 異なる位置から始まる一致は独立に扱われ、重なっていても構いません。
    pub fn mark<S>(&self, tokens: &[S]) -> Vec<String>
    where
        S: AsRef<str>,
    {
        let mut marked = vec![false; tokens.len()];
        for i in 0..tokens.len() {
            if let Some(phrase) = self.longest_match(tokens, i) {
                marked[i..i + phrase.len()].fill(true);
            }
        }
        marked.into_iter().map(|b| b.to_string()).collect()
    }

    /// 登録されたフレーズの総数を返します。
    pub fn len(&self) -> usize {
        self.phrases.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_set() {
        let data = "\
# cities
Tokyo  Kyoto
  osaka

";
        let mut set = WordSet::new();
        set.extend_from_reader(data.as_bytes()).unwrap();
        assert_eq!(3, set.len());
        assert!(set.contains("TOKYO"));
        assert!(set.contains("kyoto"));
        assert!(set.contains("Osaka"));
        assert!(!set.contains("cities"));
    }

    #[test]
    fn test_longest_match_first() {
        let mut index = PhraseIndex::new();
        index.insert("new york");
        index.insert("New York City");
        let tokens = ["new", "york", "city", "hall"];
        assert_eq!(
            Some(["new", "york", "city"].map(String::from).as_slice()),
            index.longest_match(&tokens, 0)
        );
        assert_eq!(vec!["true", "true", "true", "false"], index.mark(&tokens));
    }

    #[test]
    fn test_match_fits_sentence() {
        let mut index = PhraseIndex::new();
        index.insert("new york city");
        index.insert("new york");
        let tokens = ["I", "love", "New", "York"];
        assert_eq!(vec!["false", "false", "true", "true"], index.mark(&tokens));
    }

    #[test]
    fn test_equal_length_keeps_insertion_order() {
        let mut index = PhraseIndex::new();
        index.insert("a b");
        index.insert("a b c");
        index.insert("a c");
        let bucket = &index.phrases["a"];
        assert_eq!(vec!["a", "b", "c"], bucket[0]);
        assert_eq!(vec!["a", "b"], bucket[1]);
        assert_eq!(vec!["a", "c"], bucket[2]);
        assert_eq!(3, index.len());
    }

    #[test]
    fn test_overlapping_matches() {
        let mut index = PhraseIndex::new();
        index.insert("a b");
        index.insert("b c");
        let tokens = ["a", "b", "c", "d"];
        assert_eq!(vec!["true", "true", "true", "false"], index.mark(&tokens));
    }

    #[test]
    fn test_phrase_reader() {
        let data = "# comment\nNew York\n\nlos angeles\n";
        let mut index = PhraseIndex::new();
        index.extend_from_reader(data.as_bytes()).unwrap();
        assert_eq!(2, index.len());
        assert_eq!(vec!["true", "true"], index.mark(&["LOS", "Angeles"]));
    }
}
