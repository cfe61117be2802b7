//! 素性行列と CRF++ テンプレートを生成するユーティリティ
//!
//! このバイナリは、素性リストに従って1行1トークンの入力から素性行列を出力し、
//! 必要であれば `crf_learn` 用のテンプレートファイルを書き出します。

use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crfeat::errors::CrfeatError;
use crfeat::utils::{LazyFileWriter, check_non_overlapping};
use crfeat::{ExtractorConfig, FeatureList, FeatureRegistry, Featurizer, write_templates};

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(
    name = "featurize",
    about = "Extracts token features and writes CRF++ templates"
)]
struct Args {
    /// Input file with one token per line and a blank line after each sentence.
    /// Reads from stdin if omitted.
    #[clap(short = 'i', long)]
    input: Option<PathBuf>,

    /// Output file for the feature matrix. Writes to stdout if omitted.
    #[clap(short = 'o', long)]
    output: Option<PathBuf>,

    /// Feature list file.
    #[clap(short = 'f', long)]
    featlist: PathBuf,

    /// Output file for the CRF++ templates.
    #[clap(short = 't', long)]
    templates: Option<PathBuf>,

    /// Requires at least one label field after the token.
    #[clap(short = 'l', long)]
    labeled: bool,

    /// Lower-cases every token before extracting features.
    #[clap(short = 'm', long)]
    monocase: bool,

    /// Prints progress and the columns of the feature matrix to stderr.
    #[clap(short = 'v', long)]
    verbose: bool,
}

/// 実行中に発生する可能性のあるエラー
#[derive(Debug, Error)]
enum FeaturizeError {
    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 素性抽出エラー
    #[error("{0}")]
    Crfeat(#[from] CrfeatError),
}

/// ログ出力を初期化します。
///
/// `RUST_LOG` が設定されていればそれに従い、そうでなければ `verbose` に応じて
/// `info` または `warn` 以上を標準エラー出力に書き出します。
fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

/// メイン関数
///
/// 素性リストを読み込み、入力から素性行列を出力します。
/// `--templates` が指定された場合はテンプレートも書き出します。
///
/// # エラー
///
/// 出力先が入力ファイルと重なる場合、素性リストや入力の形式が不正な場合、
/// またはファイルの読み書きに失敗した場合、`FeaturizeError` を返します。
fn main() -> Result<(), FeaturizeError> {
    let args = Args::parse();
    init_logging(args.verbose);

    check_non_overlapping(
        &[Some(args.featlist.as_path()), args.input.as_deref()],
        &[args.output.as_deref(), args.templates.as_deref()],
    )?;

    log::info!("reading feature list from {}", args.featlist.display());
    let mut registry = FeatureRegistry::with_builtins();
    let config = ExtractorConfig::new().monocase(args.monocase);
    let list = FeatureList::from_path(&args.featlist, &mut registry, config)?;

    if args.verbose {
        eprint!("{}", list.describe_columns());
    }

    let rdr: Box<dyn Read> = match &args.input {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin().lock()),
    };
    let featurizer = Featurizer::new(&list).labeled(args.labeled);
    match &args.output {
        // 入力が不正な場合に既存の出力を空にしないよう、最初の文を書くまで開かない
        Some(path) => {
            let mut wtr = LazyFileWriter::new(path);
            featurizer.write_matrix(rdr, &mut wtr)?;
            wtr.finish()?;
        }
        None => featurizer.write_matrix(rdr, io::stdout().lock())?,
    }

    if let Some(path) = &args.templates {
        log::info!("writing templates to {}", path.display());
        write_templates(&list, File::create(path)?)?;
    }

    Ok(())
}
