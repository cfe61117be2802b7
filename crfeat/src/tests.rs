//! crfeatのテストモジュール群
//!
//! 素性リストの読み込みから素性行列とテンプレートの出力までを通して検証します。
