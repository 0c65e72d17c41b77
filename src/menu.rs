//! メニューのデータモデル（カテゴリ・オプション・選択カーソル）。

use std::collections::HashMap;

/// カテゴリの種別。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryKind {
    /// オプション一覧から選ぶカテゴリ。
    List,
    /// 自由入力（コールサイン）を開くカテゴリ。
    Input,
}

/// カテゴリ内の選択肢1件。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionEntry {
    /// 表示名。
    pub name: String,
    /// ホストが選択肢を識別するためのインデックス。
    pub index: i64,
}

/// トップレベルのメニュー項目。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryEntry {
    /// 一覧に表示する名前。
    pub display_name: String,
    /// 一覧型か入力型か。
    pub kind: CategoryKind,
    /// ホストへそのまま返す設定種別。
    pub mod_type: String,
    /// 表示順の選択肢。
    pub options: Vec<OptionEntry>,
    /// 現在適用中の選択肢インデックス（無ければNone）。
    pub current_index: Option<i64>,
}

impl CategoryEntry {
    /// currentIndexに一致する選択肢の表示位置を返す。
    pub fn current_position(&self) -> Option<usize> {
        let current = self.current_index?;
        self.options.iter().position(|o| o.index == current)
    }
}

/// カテゴリキーからカテゴリへの対応表。
pub type CategoriesData = HashMap<String, CategoryEntry>;

/// 表示中の画面。常にどれか1つだけが有効。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    /// カテゴリ一覧。
    #[default]
    Categories,
    /// 選択中カテゴリのオプション一覧。
    Options,
    /// コールサイン入力。
    Callsign,
}

/// 画面ごとの選択行。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionCursor {
    /// カテゴリ一覧の選択行。
    pub categories: usize,
    /// オプション一覧の選択行。
    pub options: usize,
}

impl SelectionCursor {
    /// 指定画面のカーソル位置（入力画面ではNone）。
    #[cfg(test)]
    pub fn get(&self, view: View) -> Option<usize> {
        match view {
            View::Categories => Some(self.categories),
            View::Options => Some(self.options),
            View::Callsign => None,
        }
    }

    /// 指定画面のカーソルへの可変参照。
    pub fn get_mut(&mut self, view: View) -> Option<&mut usize> {
        match view {
            View::Categories => Some(&mut self.categories),
            View::Options => Some(&mut self.options),
            View::Callsign => None,
        }
    }
}

/// 循環移動後の位置を計算する。空リストならNone。
pub fn wrap_step(cursor: usize, direction: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    // 範囲外のカーソルも先に丸めてから移動する。
    let len = len as isize;
    let cur = (cursor as isize).rem_euclid(len);
    Some((cur + direction).rem_euclid(len) as usize)
}
