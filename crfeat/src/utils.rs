//! 入出力に関するユーティリティ関数

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::errors::{CrfeatError, Result};

/// 出力先のパスが入力のパスと重ならないことを確認します。
///
/// 入力ファイルを誤って上書きしないよう、ファイルを開く前に呼び出します。
/// 指定されていないパス (`None`) は比較されません。
///
/// # 引数
///
/// * `inputs` - 読み込むファイルのパス
/// * `outputs` - 書き込むファイルのパス
///
/// # エラー
///
/// 重なるパスがある場合、[`CrfeatError`] が返されます。
///
/// # 例
///
/// ```
/// # use std::path::Path;
/// # use crfeat::utils::check_non_overlapping;
/// let featlist = Path::new("features.txt");
/// let output = Path::new("train.feat");
/// assert!(check_non_overlapping(&[Some(featlist)], &[Some(output), None]).is_ok());
/// assert!(check_non_overlapping(&[Some(featlist)], &[Some(featlist)]).is_err());
/// ```
pub fn check_non_overlapping(inputs: &[Option<&Path>], outputs: &[Option<&Path>]) -> Result<()> {
    for input in inputs.iter().flatten() {
        for output in outputs.iter().flatten() {
            if input == output {
                return Err(CrfeatError::invalid_argument(
                    "output",
                    format!("Can't overwrite {}", input.display()),
                ));
            }
        }
    }
    Ok(())
}

/// 最初の書き込みまでファイルを作成しないライター
///
/// 入力の検証が終わる前に既存の出力ファイルを空にしないために使います。
/// 何も書き込まれなかった場合は [`finish`](Self::finish) で空のファイルを作成します。
pub struct LazyFileWriter {
    path: PathBuf,
    file: Option<File>,
}

impl LazyFileWriter {
    /// 新しいライターを作成します。この時点ではファイルを開きません。
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            path: path.into(),
            file: None,
        }
    }

    /// ファイルが作成済みかどうかを返します。
    pub fn is_opened(&self) -> bool {
        self.file.is_some()
    }

    fn file(&mut self) -> io::Result<&mut File> {
        let file = match self.file.take() {
            Some(file) => file,
            None => File::create(&self.path)?,
        };
        Ok(self.file.insert(file))
    }

    /// ファイルを作成していなければ作成し、フラッシュします。
    ///
    /// # エラー
    ///
    /// ファイルの作成または書き込みに失敗した場合、[`io::Error`] が返されます。
    pub fn finish(mut self) -> io::Result<()> {
        self.file()?.flush()
    }
}

impl Write for LazyFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.file()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.file {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::ExtractorConfig;
    use crate::feature::FeatureRegistry;
    use crate::feature_list::FeatureList;
    use crate::featurizer::Featurizer;
    use crate::test_utils::temp_file;

    fn cvd_list() -> FeatureList {
        let mut registry = FeatureRegistry::with_builtins();
        FeatureList::from_reader("cvd\n".as_bytes(), &mut registry, ExtractorConfig::new())
            .unwrap()
    }

    #[test]
    fn test_lazy_writer_keeps_existing_file_on_rejected_input() {
        let existing = temp_file("previous matrix\n");
        let list = cvd_list();
        let mut wtr = LazyFileWriter::new(existing.path());
        assert!(
            Featurizer::new(&list)
                .write_matrix("Tokyo\n".as_bytes(), &mut wtr)
                .is_err()
        );
        assert!(!wtr.is_opened());
        assert_eq!(
            "previous matrix\n",
            std::fs::read_to_string(existing.path()).unwrap()
        );
    }

    #[test]
    fn test_lazy_writer_writes_matrix() {
        let existing = temp_file("previous matrix\n");
        let list = cvd_list();
        let mut wtr = LazyFileWriter::new(existing.path());
        Featurizer::new(&list)
            .write_matrix("Tokyo\n\n".as_bytes(), &mut wtr)
            .unwrap();
        assert!(wtr.is_opened());
        wtr.finish().unwrap();
        assert_eq!(
            "Tokyo\tCvccv\n\n",
            std::fs::read_to_string(existing.path()).unwrap()
        );
    }

    #[test]
    fn test_lazy_writer_finish_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let list = cvd_list();
        let mut wtr = LazyFileWriter::new(&path);
        Featurizer::new(&list)
            .write_matrix("\n".as_bytes(), &mut wtr)
            .unwrap();
        assert!(!path.exists());
        wtr.finish().unwrap();
        assert_eq!("", std::fs::read_to_string(&path).unwrap());
    }

    #[test]
    fn test_check_non_overlapping() {
        let a = Path::new("a.txt");
        let b = Path::new("b.txt");
        assert!(check_non_overlapping(&[Some(a), None], &[Some(b), None]).is_ok());
        assert!(check_non_overlapping(&[None], &[None]).is_ok());
        assert!(check_non_overlapping(&[None, Some(a)], &[Some(b), Some(a)]).is_err());
    }
}
