//! 素性レジストリ
//!
//! 素性名から素性定義への対応表です。起動時に一度だけ構築され、
//! 素性リストの解析と素性抽出の両方に参照で渡されます。

use std::sync::Arc;

use hashbrown::HashMap;

use crate::errors::{CrfeatError, Result};
use crate::feature::builtins::BUILTIN_FEATURES;
use crate::feature::transform::TransformTable;
use crate::feature::{
    CustomSequenceFn, CustomTokenFn, FeatureDefinition, FeatureFunction, SequenceFunction,
    TokenFunction,
};
use crate::wordlist::{PhraseIndex, WordSet};

/// ドット記法で合成を表す区切り文字
pub const COMPOSITION_SEPARATOR: char = '.';

/// 素性名から素性定義への対応表
pub struct FeatureRegistry {
    definitions: HashMap<String, Arc<FeatureDefinition>>,
    transforms: TransformTable,
    redefined: Vec<String>,
}

impl Default for FeatureRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl FeatureRegistry {
    /// 素性を1つも持たないレジストリを作成します。
    pub fn new() -> Self {
        Self {
            definitions: HashMap::new(),
            transforms: TransformTable::new(),
            redefined: vec![],
        }
    }

    /// 組み込み素性を登録したレジストリを作成します。
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for &(name, f) in BUILTIN_FEATURES {
            registry.insert(name.to_string(), FeatureFunction::Token(TokenFunction::Builtin(f)));
        }
        registry
    }

    /// 素性を定義します。
    ///
    /// 同じ名前の素性が既に存在する場合は警告を出し、新しい定義で上書きします。
    /// 上書きされた名前は [`redefined`](Self::redefined) で確認できます。
    ///
    /// # 引数
    ///
    /// * `name` - 素性名（空白を含まない）
    /// * `function` - 素性関数
    ///
    /// # 戻り値
    ///
    /// 登録された素性定義
    ///
    /// # エラー
    ///
    /// 名前が空、または空白を含む場合、[`CrfeatError`] が返されます。
    pub fn define<S>(&mut self, name: S, function: FeatureFunction) -> Result<Arc<FeatureDefinition>>
    where
        S: Into<String>,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(CrfeatError::invalid_argument(
                "name",
                "feature name must not be empty",
            ));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(CrfeatError::invalid_argument(
                "name",
                format!("Can't have whitespace in feature name: '{name}'"),
            ));
        }
        if self.definitions.contains_key(&name) {
            log::warn!("REDEFINING FEATURE: {name}");
            self.redefined.push(name.clone());
        }
        Ok(self.insert(name, function))
    }

    /// トークン関数を素性として定義します。
    ///
    /// # エラー
    ///
    /// [`define`](Self::define) と同じ条件でエラーを返します。
    pub fn define_token<S, F>(&mut self, name: S, f: F) -> Result<Arc<FeatureDefinition>>
    where
        S: Into<String>,
        F: Fn(&str) -> crate::feature::Value + Send + Sync + 'static,
    {
        let f: CustomTokenFn = Arc::new(f);
        self.define(name, FeatureFunction::Token(TokenFunction::Custom(f)))
    }

    /// 系列関数を素性として定義します。
    ///
    /// # エラー
    ///
    /// [`define`](Self::define) と同じ条件でエラーを返します。
    pub fn define_sequence<S, F>(&mut self, name: S, f: F) -> Result<Arc<FeatureDefinition>>
    where
        S: Into<String>,
        F: Fn(&[String]) -> Vec<crate::feature::Value> + Send + Sync + 'static,
    {
        let f: CustomSequenceFn = Arc::new(f);
        self.define(name, FeatureFunction::Sequence(SequenceFunction::Custom(f)))
    }

    /// 単語リストへの所属を真偽値で返す素性を定義します。
    ///
    /// # エラー
    ///
    /// [`define`](Self::define) と同じ条件でエラーを返します。
    pub fn define_word_list<S>(&mut self, name: S, words: WordSet) -> Result<Arc<FeatureDefinition>>
    where
        S: Into<String>,
    {
        self.define(
            name,
            FeatureFunction::Token(TokenFunction::Member(Arc::new(words))),
        )
    }

    /// フレーズリストとの最長一致を真偽値で返す系列素性を定義します。
    ///
    /// # エラー
    ///
    /// [`define`](Self::define) と同じ条件でエラーを返します。
    pub fn define_phrase_list<S>(
        &mut self,
        name: S,
        index: PhraseIndex,
    ) -> Result<Arc<FeatureDefinition>>
    where
        S: Into<String>,
    {
        self.define(
            name,
            FeatureFunction::Sequence(SequenceFunction::Phrases(Arc::new(index))),
        )
    }

    fn insert(&mut self, name: String, function: FeatureFunction) -> Arc<FeatureDefinition> {
        let def = Arc::new(FeatureDefinition::new(name.clone(), function));
        self.definitions.insert(name, Arc::clone(&def));
        def
    }

    /// 登録済みの素性を返します。合成は行いません。
    pub fn get(&self, name: &str) -> Option<&Arc<FeatureDefinition>> {
        self.definitions.get(name)
    }

    /// 素性が登録済みかどうかを返します。合成は行いません。
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// 登録済みの素性の数を返します。
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// 再定義によって上書きされた素性名を、上書きされた順に返します。
    pub fn redefined(&self) -> &[String] {
        &self.redefined
    }

    /// ドット区切りの名前から合成関数を構築します。レジストリは変更しません。
    ///
    /// 先頭の要素は登録済みの素性でなければならず、残りの要素は左から順に
    /// `prefixN`・`suffixN`・`unique`・`sort`・名前付き変換として解釈されます。
    /// 途中までの名前が既に登録されていれば、その定義が再利用されます。
    ///
    /// # エラー
    ///
    /// 基底の素性が未定義の場合、または解釈できない要素がある場合、
    /// [`CrfeatError`] が返されます。
    pub fn compose(&self, name: &str) -> Result<FeatureFunction> {
        self.compose_prefix(name, name)
    }

    fn compose_prefix(&self, full: &str, name: &str) -> Result<FeatureFunction> {
        if let Some(def) = self.definitions.get(name) {
            return Ok(def.function().clone());
        }
        let Some((base, token)) = name.rsplit_once(COMPOSITION_SEPARATOR) else {
            return Err(CrfeatError::UndefinedFeature(name.to_string()));
        };
        let base = self.compose_prefix(full, base)?;
        let step = self.transforms.step(token).ok_or_else(|| {
            CrfeatError::UnresolvableComposition {
                name: full.to_string(),
                token: token.to_string(),
            }
        })?;
        Ok(base.then(step))
    }

    /// 素性定義を返します。
    ///
    /// 未登録でもドットを含む名前であれば合成によって定義を構築し、
    /// 完全な名前で登録してから返します。
    ///
    /// # エラー
    ///
    /// 素性が未定義で合成もできない場合、[`CrfeatError`] が返されます。
    pub fn resolve(&mut self, name: &str) -> Result<Arc<FeatureDefinition>> {
        if let Some(def) = self.definitions.get(name) {
            return Ok(Arc::clone(def));
        }
        if !name.contains(COMPOSITION_SEPARATOR) {
            return Err(CrfeatError::UndefinedFeature(name.to_string()));
        }
        let function = self.compose(name)?;
        log::debug!("composed feature: {name}");
        self.define(name, function)
    }
}
