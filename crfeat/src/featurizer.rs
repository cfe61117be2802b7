//! 文単位の素性抽出
//!
//! 1行1トークンの入力を読み、空行で区切られた文ごとに素性行列を出力します。
//! 保持するのは現在の文のトークンだけで、文の区切りを読むたびに
//! その文の行列を書き出してフラッシュします。

use std::io::{BufRead, BufReader, BufWriter, Read, Write};

use crate::errors::{CrfeatError, Result};
use crate::feature_list::FeatureList;

/// 素性抽出器
///
/// 素性リストの列の順に各素性の系列関数を文全体へ一度ずつ適用し、
/// トークンごとの行に転置します。
pub struct Featurizer<'a> {
    list: &'a FeatureList,
    labeled: bool,
}

impl<'a> Featurizer<'a> {
    /// 新しい素性抽出器を作成します。
    ///
    /// # 引数
    ///
    /// * `list` - 解析済みの素性リスト
    pub fn new(list: &'a FeatureList) -> Self {
        Self {
            list,
            labeled: false,
        }
    }

    /// 入力の各行にラベルを必須とするかを設定します。
    pub fn labeled(mut self, yes: bool) -> Self {
        self.labeled = yes;
        self
    }

    /// 1文分のトークンから素性行列を計算します。
    ///
    /// # 引数
    ///
    /// * `tokens` - 文のトークン列（必要に応じて小文字化済み）
    ///
    /// # 戻り値
    ///
    /// トークンごとの行。各行は素性リストの列の順に値を持ちます。
    ///
    /// # エラー
    ///
    /// 系列関数が入力と異なる長さの列を返した場合、[`CrfeatError`] が返されます。
    pub fn featurize_sentence(&self, tokens: &[String]) -> Result<Vec<Vec<String>>> {
        let mut rows = vec![Vec::with_capacity(self.list.columns().len()); tokens.len()];
        for def in self.list.columns() {
            let column = def.apply_sequence(tokens);
            if column.len() != tokens.len() {
                return Err(CrfeatError::invalid_state(
                    format!("feature '{}' returned a column of wrong length", def.name()),
                    format!("expected {}, got {}", tokens.len(), column.len()),
                ));
            }
            for (row, value) in rows.iter_mut().zip(column) {
                row.push(value);
            }
        }
        Ok(rows)
    }

    /// 入力を読み、素性行列を出力します。
    ///
    /// 入力の各行は「トークン\tラベル...」の形式で、文は空行で区切られます。
    /// 最初の行のフィールド数がすべての行で一致しなければなりません。
    /// 出力の各行は「トークン\t素性値...\tラベル...」の形式です。
    ///
    /// # 引数
    ///
    /// * `rdr` - 入力のリーダー
    /// * `wtr` - 出力先
    ///
    /// # エラー
    ///
    /// フィールド数が一致しない場合、ラベルが必須なのに存在しない場合、
    /// または入力が空行で終わっていない場合、[`CrfeatError`] が返されます。
    /// 最後の文が空行で閉じられていない場合、その文は出力されません。
    pub fn write_matrix<R, W>(&self, rdr: R, wtr: W) -> Result<()>
    where
        R: Read,
        W: Write,
    {
        let reader = BufReader::new(rdr);
        let mut wtr = BufWriter::new(wtr);
        let monocase = self.list.config().is_monocase();

        let mut num_fields = None;
        let mut tokens = vec![];
        let mut labels: Vec<Vec<String>> = vec![];
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            let line_num = i + 1;

            if line.is_empty() {
                if !tokens.is_empty() {
                    self.write_sentence(&mut wtr, &tokens, &labels)?;
                    tokens.clear();
                    labels.clear();
                }
                continue;
            }

            let mut fields = line.split('\t');
            let n = fields.clone().count();
            match num_fields {
                None => {
                    if self.labeled && n < 2 {
                        return Err(CrfeatError::invalid_format(
                            "input",
                            format!("Label is required but missing in line {line_num}"),
                        ));
                    }
                    num_fields = Some(n);
                }
                Some(expected) if expected != n => {
                    return Err(CrfeatError::invalid_format(
                        "input",
                        format!(
                            "Inconsistent number of fields in line {line_num}: \
                             current line is {n} vs. previous lines {expected}"
                        ),
                    ));
                }
                Some(_) => {}
            }

            let token = fields.next().unwrap_or_default();
            tokens.push(if monocase {
                token.to_lowercase()
            } else {
                token.to_string()
            });
            labels.push(fields.map(ToString::to_string).collect());
        }

        if !tokens.is_empty() {
            return Err(CrfeatError::invalid_format(
                "input",
                "Input did not end with an empty line as required",
            ));
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_sentence<W>(&self, wtr: &mut W, tokens: &[String], labels: &[Vec<String>]) -> Result<()>
    where
        W: Write,
    {
        let rows = self.featurize_sentence(tokens)?;
        for ((token, row), labels) in tokens.iter().zip(&rows).zip(labels) {
            wtr.write_all(token.as_bytes())?;
            for field in row.iter().chain(labels) {
                wtr.write_all(b"\t")?;
                wtr.write_all(field.as_bytes())?;
            }
            wtr.write_all(b"\n")?;
        }
        wtr.write_all(b"\n")?;
        wtr.flush()?;
        Ok(())
    }
}
