//! CRF++ 形式のテンプレート生成
//!
//! 素性リストのエントリを、`crf_learn` が読むマクロ形式のテンプレートに変換します。
//! ユニグラムとバイグラムのエントリは別々に番号付けされ、
//! 両方が存在する場合は空行で区切られます。
//!
//! 例えば `cvd +-1` は次の3行になります。
//!
//! ```text
//! U00-1:%x[-1,1]
//! U00:%x[0,1]
//! U00+1:%x[1,1]
//! ```

use std::io::{BufWriter, Write};

use crate::errors::{CrfeatError, Result};
use crate::feature_list::{EntryKind, FeatureEntry, FeatureList};

/// 素性リストのテンプレートを書き出します。
///
/// # 引数
///
/// * `list` - 解析済みの素性リスト
/// * `wtr` - 出力先
///
/// # エラー
///
/// 書き込みに失敗した場合、または参照された素性が素性行列の列に
/// 存在しない場合、[`CrfeatError`] が返されます。
pub fn write_templates<W>(list: &FeatureList, wtr: W) -> Result<()>
where
    W: Write,
{
    let mut wtr = BufWriter::new(wtr);

    let (unigrams, bigrams): (Vec<_>, Vec<_>) = list
        .entries()
        .iter()
        .partition(|e| e.kind == EntryKind::Unigram);

    write_group(list, &unigrams, &mut wtr)?;
    if !unigrams.is_empty() && !bigrams.is_empty() {
        writeln!(&mut wtr)?;
    }
    write_group(list, &bigrams, &mut wtr)?;

    wtr.flush()?;
    Ok(())
}

/// 同じ種類のエントリ群を書き出します。番号は 0 から振り直されます。
fn write_group<W>(list: &FeatureList, entries: &[&FeatureEntry], wtr: &mut W) -> Result<()>
where
    W: Write,
{
    let mut idx = 0;
    for entry in entries {
        if entry.is_bare() {
            writeln!(wtr, "{}", entry.kind.letter())?;
            continue;
        }

        let mut macros = Vec::with_capacity(entry.references.len());
        for reference in &entry.references {
            let col = list.column_index(&reference.name).ok_or_else(|| {
                CrfeatError::invalid_state(
                    "feature is not a column of the feature matrix",
                    reference.name.clone(),
                )
            })? + 1;
            macros.push((reference.position, col));
        }

        let id = format!("{}{idx:02}", entry.kind.letter());
        for &pos in &entry.positions {
            write!(wtr, "{id}")?;
            if !entry.bow && pos != 0 {
                write!(wtr, "{pos:+}")?;
            }
            write!(wtr, ":")?;
            for (i, &(ref_pos, col)) in macros.iter().enumerate() {
                if i != 0 {
                    write!(wtr, "/")?;
                }
                let row = ref_pos.checked_add(pos).ok_or_else(|| {
                    CrfeatError::invalid_format(
                        "feature list",
                        format!("Position {ref_pos}{pos:+} is out of range"),
                    )
                })?;
                write!(wtr, "%x[{row},{col}]")?;
            }
            writeln!(wtr)?;
        }
        idx += 1;
    }
    Ok(())
}
