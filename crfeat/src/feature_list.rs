//! 素性リストの解析
//!
//! 素性リストファイルは1行に1つのエントリまたはディレクティブを持ちます。
//! 空行と `#` で始まる行は無視されます。
//!
//! ```text
//! # 単語リスト・フレーズリストの定義
//! defwordlist  city   cities.txt,towns.txt
//! defphraselist org   orgs.txt
//! options: monocase
//!
//! # タグのユニグラムとバイグラム
//! U
//! B
//!
//! cvd +-2
//! token.prefix3 -1,1
//! U:token-1/token 0..1
//! city -bow -3...3
//! ```

pub mod quantifier;

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::sync::{Arc, LazyLock};

use hashbrown::HashSet;
use regex::Regex;

use crate::config::{ExtractorConfig, OPTIONS_DIRECTIVE};
use crate::errors::{CrfeatError, Result};
use crate::feature::{FeatureDefinition, FeatureRegistry};
use crate::feature_list::quantifier::Quantifier;
use crate::wordlist::{PhraseIndex, WordSet};

static RELATIVE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)([+-][0-9]+)$").unwrap());

const DEF_WORD_LIST: &str = "defwordlist";
const DEF_PHRASE_LIST: &str = "defphraselist";

/// エントリの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// ユニグラム (`U`)
    Unigram,

    /// バイグラム (`B`)
    Bigram,
}

impl EntryKind {
    /// テンプレートで使われる1文字の記号を返します。
    pub fn letter(self) -> char {
        match self {
            Self::Unigram => 'U',
            Self::Bigram => 'B',
        }
    }
}

/// 素性への参照
///
/// エントリが適用される位置からの相対位置 `position` にある素性 `name` を指します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureReference {
    pub name: String,
    pub position: i32,
}

impl FeatureReference {
    /// 参照文字列（例: `cvd`、`cvd-1`、`token.prefix3+2`）を解析します。
    ///
    /// # エラー
    ///
    /// 参照先の素性が未定義で合成もできない場合、[`CrfeatError`] が返されます。
    pub fn parse(s: &str, registry: &mut FeatureRegistry) -> Result<Self> {
        if registry.contains(s) {
            return Ok(Self {
                name: s.to_string(),
                position: 0,
            });
        }
        if let Some(cap) = RELATIVE_REF.captures(s) {
            let name = &cap[1];
            let position = cap[2].parse()?;
            registry.resolve(name)?;
            return Ok(Self {
                name: name.to_string(),
                position,
            });
        }
        registry.resolve(s)?;
        Ok(Self {
            name: s.to_string(),
            position: 0,
        })
    }
}

/// 素性リストの1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureEntry {
    pub kind: EntryKind,

    /// 参照の列。2つ以上あれば複合エントリ、空ならタグのみのエントリです。
    pub references: Vec<FeatureReference>,

    /// 昇順に並んだ位置。空になることはありません。
    pub positions: Vec<i32>,

    pub bow: bool,
}

impl FeatureEntry {
    /// エントリの行を解析します。
    ///
    /// 最初の空白までが参照部で、残りは位置指定子として扱われます。
    ///
    /// # 引数
    ///
    /// * `line` - エントリの行
    /// * `registry` - 参照を解決するレジストリ。合成された素性はここに登録されます。
    ///
    /// # エラー
    ///
    /// 参照や位置指定子が不正な場合、[`CrfeatError`] が返されます。
    pub fn parse(line: &str, registry: &mut FeatureRegistry) -> Result<Self> {
        let mut spl = line.split_whitespace().peekable();
        let Some(mut ref_str) = spl.next() else {
            return Err(CrfeatError::invalid_format("feature list", "empty entry"));
        };
        let head = ref_str;

        let mut kind = EntryKind::Unigram;
        if let Some(rest) = ref_str.strip_prefix("U:") {
            ref_str = rest;
        } else if let Some(rest) = ref_str.strip_prefix("B:") {
            kind = EntryKind::Bigram;
            ref_str = rest;
        } else if ref_str == "U" {
            ref_str = "";
        } else if ref_str == "B" {
            kind = EntryKind::Bigram;
            ref_str = "";
        }
        // `U: cvd` のように区切りの後に空白がある場合。`U: +-1` は素性を持たない。
        if matches!(head, "U:" | "B:")
            && let Some(next) = spl.next_if(|tok| !is_quantifier_start(tok))
        {
            ref_str = next;
        }
        let quant = spl.collect::<Vec<_>>().join(" ");

        let references = ref_str
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| FeatureReference::parse(s, registry))
            .collect::<Result<Vec<_>>>()?;
        let Quantifier { positions, bow } = Quantifier::parse(&quant)?;

        Ok(Self {
            kind,
            references,
            positions,
            bow,
        })
    }

    /// 素性を参照しない、タグのみのエントリかどうかを返します。
    pub fn is_bare(&self) -> bool {
        self.references.is_empty()
    }

    /// 参照が1つだけのエントリであれば、その素性名を返します。
    pub fn single_feature(&self) -> Option<&str> {
        match self.references.as_slice() {
            [r] => Some(&r.name),
            _ => None,
        }
    }
}

/// 解析済みの素性リスト
///
/// エントリの列と、素性行列の列を構成する素性定義の列を保持します。
#[derive(Debug)]
pub struct FeatureList {
    entries: Vec<FeatureEntry>,
    columns: Vec<Arc<FeatureDefinition>>,
    config: ExtractorConfig,
}

impl FeatureList {
    /// リーダーから素性リストを読み込みます。
    ///
    /// `defwordlist`・`defphraselist` ディレクティブはその場で素性を定義し、
    /// `options:` ディレクティブは `config` に反映されます。
    ///
    /// # 引数
    ///
    /// * `rdr` - 素性リストのリーダー
    /// * `registry` - 素性レジストリ
    /// * `config` - 初期設定
    ///
    /// # エラー
    ///
    /// 行の形式が不正な場合、未定義の素性が参照された場合、
    /// またはリストファイルが読めない場合、[`CrfeatError`] が返されます。
    pub fn from_reader<R>(
        rdr: R,
        registry: &mut FeatureRegistry,
        mut config: ExtractorConfig,
    ) -> Result<Self>
    where
        R: Read,
    {
        let reader = BufReader::new(rdr);

        let mut entries = vec![];
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let lower = line.to_lowercase();
            if lower.starts_with(DEF_WORD_LIST) {
                let (name, paths) = parse_def_directive(line)?;
                log::info!("reading word list {name} from {}", paths.join(","));
                let words = WordSet::from_files(&paths)?;
                registry.define_word_list(name, words)?;
            } else if lower.starts_with(DEF_PHRASE_LIST) {
                let (name, paths) = parse_def_directive(line)?;
                log::info!("reading phrase list {name} from {}", paths.join(","));
                let index = PhraseIndex::from_files(&paths)?;
                registry.define_phrase_list(name, index)?;
            } else if lower.starts_with(OPTIONS_DIRECTIVE) {
                config.apply_directive(line)?;
            } else {
                entries.push(FeatureEntry::parse(line, registry)?);
            }
        }

        Self::from_entries(entries, registry, config)
    }

    /// ファイルから素性リストを読み込みます。
    ///
    /// # エラー
    ///
    /// [`from_reader`](Self::from_reader) と同じ条件でエラーを返します。
    pub fn from_path<P>(
        path: P,
        registry: &mut FeatureRegistry,
        config: ExtractorConfig,
    ) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        Self::from_reader(File::open(path)?, registry, config)
    }

    /// 解析済みのエントリから素性リストを構築します。
    ///
    /// 複合エントリが参照する素性のうち、単独のエントリを持たないものは
    /// 位置指定子なしの単独エントリとして初出順に末尾へ追加されます。
    /// 素性行列の列は、この追加後の単独エントリの順に並びます。
    ///
    /// # エラー
    ///
    /// 参照が解決できない場合、[`CrfeatError`] が返されます。
    pub fn from_entries(
        mut entries: Vec<FeatureEntry>,
        registry: &mut FeatureRegistry,
        config: ExtractorConfig,
    ) -> Result<Self> {
        let singles: HashSet<String> = entries
            .iter()
            .filter_map(|e| e.single_feature().map(ToString::to_string))
            .collect();
        let mut to_add: Vec<String> = vec![];
        for entry in &entries {
            for reference in &entry.references {
                if !singles.contains(&reference.name) && !to_add.contains(&reference.name) {
                    to_add.push(reference.name.clone());
                }
            }
        }
        for name in &to_add {
            entries.push(FeatureEntry::parse(name, registry)?);
        }

        let mut columns = vec![];
        for name in entries.iter().filter_map(FeatureEntry::single_feature) {
            columns.push(registry.resolve(name)?);
        }

        Ok(Self {
            entries,
            columns,
            config,
        })
    }

    /// すべてのエントリを返します。
    pub fn entries(&self) -> &[FeatureEntry] {
        &self.entries
    }

    /// 素性行列の列を構成する素性定義を返します。
    pub fn columns(&self) -> &[Arc<FeatureDefinition>] {
        &self.columns
    }

    /// 素性行列の列名を返します。
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|def| def.name())
    }

    /// 素性名に対応する最初の列の番号（0始まり、トークン列を含まない）を返します。
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|def| def.name() == name)
    }

    /// 設定を返します。
    pub fn config(&self) -> ExtractorConfig {
        self.config
    }

    /// 素性行列の列の一覧を人が読める形式で返します。
    ///
    /// 番号はテンプレートのマクロで使われる列番号（1始まり）です。
    pub fn describe_columns(&self) -> String {
        let mut out = String::from("Columns of feature matrix:\n\n");
        for (i, name) in self.column_names().enumerate() {
            let _ = writeln!(out, "{:<2}  {}", i + 1, name);
        }
        out
    }
}

/// 位置指定子の先頭になり得るトークンかどうかを返します。
fn is_quantifier_start(tok: &str) -> bool {
    tok.starts_with(|c: char| c == '+' || c == '-' || c.is_ascii_digit())
}

/// `defwordlist <name> <file1,file2,...>` 形式の行を解析します。
fn parse_def_directive(line: &str) -> Result<(&str, Vec<&str>)> {
    let mut spl = line.split_whitespace();
    let _directive = spl.next();
    let name = spl.next();
    let files = spl.next();
    let rest = spl.next();
    if let (Some(name), Some(files), None) = (name, files, rest) {
        let paths: Vec<&str> = files.split(',').filter(|s| !s.is_empty()).collect();
        if !paths.is_empty() {
            return Ok((name, paths));
        }
    }
    Err(CrfeatError::invalid_format(
        "feature list",
        format!("Expected '<directive> <name> <file1,file2,...>': {line}"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_list(data: &str) -> FeatureList {
        let mut registry = FeatureRegistry::with_builtins();
        FeatureList::from_reader(data.as_bytes(), &mut registry, ExtractorConfig::new()).unwrap()
    }

    #[test]
    fn test_parse_entry() {
        let mut registry = FeatureRegistry::with_builtins();
        let entry = FeatureEntry::parse("B:cvd-1/shape+1  -1,1 -bow", &mut registry).unwrap();
        assert_eq!(EntryKind::Bigram, entry.kind);
        assert_eq!(
            vec![
                FeatureReference {
                    name: "cvd".to_string(),
                    position: -1
                },
                FeatureReference {
                    name: "shape".to_string(),
                    position: 1
                },
            ],
            entry.references
        );
        assert_eq!(vec![-1, 1], entry.positions);
        assert!(entry.bow);
    }

    #[test]
    fn test_parse_bare_entry() {
        let mut registry = FeatureRegistry::with_builtins();
        let u = FeatureEntry::parse("U", &mut registry).unwrap();
        assert_eq!(EntryKind::Unigram, u.kind);
        assert!(u.is_bare());
        assert_eq!(vec![0], u.positions);
        let b = FeatureEntry::parse("B", &mut registry).unwrap();
        assert_eq!(EntryKind::Bigram, b.kind);
        assert!(b.is_bare());
    }

    #[test]
    fn test_parse_kind_prefix_with_space() {
        let mut registry = FeatureRegistry::with_builtins();
        let entry = FeatureEntry::parse("U: cvd +-1", &mut registry).unwrap();
        assert_eq!(Some("cvd"), entry.single_feature());
        assert_eq!(vec![-1, 0, 1], entry.positions);

        let entry = FeatureEntry::parse("U: +-1", &mut registry).unwrap();
        assert_eq!(EntryKind::Unigram, entry.kind);
        assert!(entry.is_bare());
        assert_eq!(vec![-1, 0, 1], entry.positions);

        let entry = FeatureEntry::parse("B: -bow", &mut registry).unwrap();
        assert_eq!(EntryKind::Bigram, entry.kind);
        assert!(entry.is_bare());
        assert!(entry.bow);
    }

    #[test]
    fn test_parse_builtin_with_digits() {
        let mut registry = FeatureRegistry::with_builtins();
        let entry = FeatureEntry::parse("suffix2", &mut registry).unwrap();
        assert_eq!(Some("suffix2"), entry.single_feature());
        assert_eq!(0, entry.references[0].position);

        let entry = FeatureEntry::parse("prefix3-2", &mut registry).unwrap();
        assert_eq!(Some("prefix3"), entry.single_feature());
        assert_eq!(-2, entry.references[0].position);
    }

    #[test]
    fn test_parse_composed_reference() {
        let mut registry = FeatureRegistry::with_builtins();
        let entry = FeatureEntry::parse("token.upcase.suffix2+1", &mut registry).unwrap();
        assert_eq!(Some("token.upcase.suffix2"), entry.single_feature());
        assert_eq!(1, entry.references[0].position);
        assert!(registry.contains("token.upcase.suffix2"));
    }

    #[test]
    fn test_parse_undefined() {
        let mut registry = FeatureRegistry::with_builtins();
        assert!(matches!(
            FeatureEntry::parse("U:cvd/nope", &mut registry),
            Err(CrfeatError::UndefinedFeature(name)) if name == "nope"
        ));
        assert!(FeatureEntry::parse("nope-1", &mut registry).is_err());
    }

    #[test]
    fn test_auto_added_columns() {
        let list = parse_list(
            "
            # compound only
            U:cvd/shape-1 +-1
            token
            U:shape/token/has-no-vowels
            ",
        );
        assert_eq!(
            vec!["token", "cvd", "shape", "has-no-vowels"],
            list.column_names().collect::<Vec<_>>()
        );
        assert_eq!(6, list.entries().len());
        assert_eq!(vec![0], list.entries()[3].positions);
    }

    #[test]
    fn test_directives() {
        let list = parse_list(
            "
            OPTIONS: monocase
            U
            cvd
            ",
        );
        assert!(list.config().is_monocase());
        assert_eq!(Some(0), list.column_index("cvd"));
    }

    #[test]
    fn test_bad_directive() {
        let mut registry = FeatureRegistry::with_builtins();
        assert!(FeatureList::from_reader(
            "defwordlist cities".as_bytes(),
            &mut registry,
            ExtractorConfig::new()
        )
        .is_err());
        assert!(FeatureList::from_reader(
            "options: loud".as_bytes(),
            &mut registry,
            ExtractorConfig::new()
        )
        .is_err());
    }

    #[test]
    fn test_describe_columns() {
        let list = parse_list("token\ncvd\n");
        assert_eq!(
            "Columns of feature matrix:\n\n1   token\n2   cvd\n",
            list.describe_columns()
        );
    }
}
