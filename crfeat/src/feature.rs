//! 素性定義
//!
//! 名前付きの素性定義と、その値を計算する関数の表現を提供します。
//! 関数はクロージャではなくタグ付きのバリアントとして保持され、
//! ドット記法による合成は既存の関数を包む小さな連鎖として構築されます。

pub mod builtins;
pub mod registry;
pub mod transform;
pub mod value;

use std::fmt;
use std::sync::Arc;

use crate::feature::transform::{Step, TransformFn};
use crate::wordlist::{PhraseIndex, WordSet};

pub use crate::feature::registry::FeatureRegistry;
pub use crate::feature::value::{EMPTY, Value};

/// 利用者が定義するトークン関数
pub type CustomTokenFn = Arc<dyn Fn(&str) -> Value + Send + Sync>;

/// 利用者が定義する系列関数
///
/// 入力と同じ長さの値の列を返さなければなりません。
pub type CustomSequenceFn = Arc<dyn Fn(&[String]) -> Vec<Value> + Send + Sync>;

/// トークン1つから値を1つ計算する関数
#[derive(Clone)]
pub enum TokenFunction {
    /// 組み込み関数
    Builtin(TransformFn),

    /// 単語リストへの所属判定
    Member(Arc<WordSet>),

    /// 利用者定義の関数
    Custom(CustomTokenFn),

    /// 既存の関数の出力にステップを適用する合成
    Then(Arc<TokenFunction>, Step),
}

impl TokenFunction {
    /// トークンに関数を適用し、正規化された値を返します。
    pub fn apply(&self, token: &str) -> String {
        match self {
            Self::Builtin(f) => f(token).normalize(),
            Self::Member(words) => Value::Bool(words.contains(token)).normalize(),
            Self::Custom(f) => f(token).normalize(),
            Self::Then(inner, step) => step.apply(&inner.apply(token)),
        }
    }
}

/// トークン列全体から同じ長さの値の列を計算する関数
///
/// ある位置の値が前後のトークンに依存する素性（フレーズ照合など）に使われます。
#[derive(Clone)]
pub enum SequenceFunction {
    /// フレーズリストによる最長一致
    Phrases(Arc<PhraseIndex>),

    /// 利用者定義の関数
    Custom(CustomSequenceFn),

    /// 既存の関数の各出力にステップを適用する合成
    Then(Arc<SequenceFunction>, Step),
}

impl SequenceFunction {
    /// トークン列に関数を適用し、正規化された値の列を返します。
    pub fn apply(&self, tokens: &[String]) -> Vec<String> {
        match self {
            Self::Phrases(index) => index.mark(tokens),
            Self::Custom(f) => f(tokens).into_iter().map(Value::normalize).collect(),
            Self::Then(inner, step) => inner
                .apply(tokens)
                .iter()
                .map(|value| step.apply(value))
                .collect(),
        }
    }
}

/// 素性関数
#[derive(Clone)]
pub enum FeatureFunction {
    /// トークン関数
    Token(TokenFunction),

    /// 系列関数
    Sequence(SequenceFunction),
}

impl FeatureFunction {
    /// 関数にステップを追加した合成関数を返します。
    pub(crate) fn then(self, step: Step) -> Self {
        match self {
            Self::Token(f) => Self::Token(TokenFunction::Then(Arc::new(f), step)),
            Self::Sequence(f) => Self::Sequence(SequenceFunction::Then(Arc::new(f), step)),
        }
    }
}

/// 名前付きの素性定義
#[derive(Clone)]
pub struct FeatureDefinition {
    name: String,
    function: FeatureFunction,
}

impl FeatureDefinition {
    pub(crate) fn new(name: String, function: FeatureFunction) -> Self {
        Self { name, function }
    }

    /// 素性名を返します。
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 素性関数を返します。
    pub fn function(&self) -> &FeatureFunction {
        &self.function
    }

    /// 系列関数のみを持つ定義かどうかを返します。
    pub fn is_sequence(&self) -> bool {
        matches!(self.function, FeatureFunction::Sequence(_))
    }

    /// トークン関数を持つ場合はそれを返します。
    pub fn token_function(&self) -> Option<&TokenFunction> {
        match &self.function {
            FeatureFunction::Token(f) => Some(f),
            FeatureFunction::Sequence(_) => None,
        }
    }

    /// 文全体に素性を適用し、トークンごとの値を返します。
    ///
    /// トークン関数のみを持つ定義は各トークンに一様に適用されます。
    pub fn apply_sequence(&self, tokens: &[String]) -> Vec<String> {
        match &self.function {
            FeatureFunction::Token(f) => tokens.iter().map(|t| f.apply(t)).collect(),
            FeatureFunction::Sequence(f) => f.apply(tokens),
        }
    }
}

impl fmt::Debug for FeatureDefinition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FeatureDefinition")
            .field("name", &self.name)
            .field("is_sequence", &self.is_sequence())
            .finish()
    }
}
