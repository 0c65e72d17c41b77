//! オーバーレイメニューのビューコントローラ。
//!
//! 表示状態・選択カーソル・カテゴリデータを1つのオブジェクトが所有し、
//! ホストからのメッセージとローカル入力を画面遷移と通知に変換する。

use crate::{
    input::TextField,
    menu::{CategoriesData, CategoryEntry, CategoryKind, SelectionCursor, View, wrap_step},
    message::HostMessage,
    notify::{Notification, Notifier},
};

/// 描画用に射影したリスト。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListProjection<'a> {
    /// リストの見出し。
    pub title: &'a str,
    /// 各行の表示名。
    pub rows: Vec<&'a str>,
    /// 選択行（行が空ならNone）。
    pub selected: Option<usize>,
}

/// 現在の画面の射影。3画面のうち常に1つだけ。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Projection<'a> {
    /// カテゴリ一覧またはオプション一覧。
    List(ListProjection<'a>),
    /// コールサイン入力欄。
    Callsign(&'a TextField),
}

/// メニューの状態と操作。
pub struct MenuController<N: Notifier> {
    /// 通知の送信先。
    notifier: N,
    /// オーバーレイが表示中か。
    visible: bool,
    /// 現在の画面。
    view: View,
    /// ホストから受け取ったカテゴリ。
    categories: CategoriesData,
    /// 表示順に並べたカテゴリキー（存在しないキーは除外済み）。
    category_rows: Vec<String>,
    /// オプション一覧を開いているカテゴリ。
    active_category: Option<String>,
    /// 画面ごとの選択行。
    cursor: SelectionCursor,
    /// コールサイン入力欄。
    callsign: TextField,
}

impl<N: Notifier> MenuController<N> {
    /// 非表示・空データの状態で作成する。
    pub fn new(notifier: N) -> Self {
        Self {
            notifier,
            visible: false,
            view: View::Categories,
            categories: CategoriesData::new(),
            category_rows: vec![],
            active_category: None,
            cursor: SelectionCursor::default(),
            callsign: TextField::default(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn cursor(&self) -> SelectionCursor {
        self.cursor
    }

    #[cfg(test)]
    pub fn category(&self, key: &str) -> Option<&CategoryEntry> {
        self.categories.get(key)
    }

    /// 入力欄（キー処理から編集する）。
    pub fn callsign_field_mut(&mut self) -> &mut TextField {
        &mut self.callsign
    }

    /// 入力欄にフォーカスがあるか。
    pub fn field_focused(&self) -> bool {
        self.view == View::Callsign && self.callsign.focused
    }

    /// ホストからのメッセージを処理する。
    pub fn handle_message(&mut self, msg: HostMessage) {
        match msg {
            HostMessage::Display {
                categories,
                category_order,
            } => self.on_display(categories, category_order),
            HostMessage::Hide => self.on_hide(),
        }
    }

    /// データを丸ごと置き換え、カテゴリ一覧を表示する。
    pub fn on_display(&mut self, categories: CategoriesData, category_order: Vec<String>) {
        // 順序リストのうち実在するキーだけを行にする。
        let category_rows: Vec<String> = category_order
            .into_iter()
            .filter(|key| {
                let present = categories.contains_key(key);
                if !present {
                    tracing::debug!("categoryOrder references missing key {key}");
                }
                present
            })
            .collect();
        tracing::info!(
            "display: {} categories, {} rows",
            categories.len(),
            category_rows.len()
        );

        self.categories = categories;
        self.category_rows = category_rows;
        self.active_category = None;
        self.cursor = SelectionCursor::default();
        self.callsign.reset();
        self.view = View::Categories;
        self.visible = true;
    }

    /// 非表示にする。データは保持する。
    pub fn on_hide(&mut self) {
        if self.visible {
            tracing::info!("hide");
        }
        self.visible = false;
    }

    /// カテゴリのオプション一覧へ遷移する。キーが無ければfalse。
    pub fn enter_options(&mut self, category_key: &str) -> bool {
        let Some(category) = self.categories.get(category_key) else {
            tracing::warn!("enter_options: unknown category {category_key}");
            return false;
        };
        // 現在値に一致する行を初期選択にする（無ければ先頭）。
        self.cursor.options = category.current_position().unwrap_or(0);
        self.active_category = Some(category_key.to_string());
        self.view = View::Options;
        true
    }

    /// 指定行のオプションを選択し、ホストへ通知する。
    pub fn select_option(&mut self, position: usize) {
        let Some(key) = self.active_category.as_deref() else {
            return;
        };
        let Some(category) = self.categories.get_mut(key) else {
            return;
        };
        let Some(option) = category.options.get(position) else {
            return;
        };
        let index = option.index;

        self.notifier.notify(Notification::Select {
            mod_type: category.mod_type.clone(),
            index,
        });
        // ホストの確認を待たずに現在値を更新する。
        category.current_index = Some(index);
        self.cursor.options = position;
    }

    /// コールサイン入力画面へ遷移し、入力欄を空にしてフォーカスする。
    pub fn enter_callsign_input(&mut self) {
        self.view = View::Callsign;
        self.callsign.focus_empty();
    }

    /// 入力欄の値をそのまま送信し、カテゴリ一覧へ戻る。
    pub fn submit_callsign(&mut self) {
        let callsign = self.callsign.value.clone();
        self.notifier.notify(Notification::SetCallsign { callsign });
        self.show_categories();
    }

    /// 選択行を循環移動する（一覧画面のみ）。
    pub fn navigate(&mut self, direction: isize) {
        let len = self.active_len();
        let view = self.view;
        let Some(cursor) = self.cursor.get_mut(view) else {
            return;
        };
        if let Some(next) = wrap_step(*cursor, direction, len) {
            *cursor = next;
        }
    }

    /// 選択行（入力画面では送信ボタン）を実行する。
    pub fn confirm_selection(&mut self) {
        match self.view {
            View::Categories => self.activate_category(self.cursor.categories),
            View::Options => self.select_option(self.cursor.options),
            View::Callsign => self.submit_callsign(),
        }
    }

    /// 一覧画面からはカテゴリへ、カテゴリ一覧からはcloseを通知する。
    pub fn go_back(&mut self) {
        match self.view {
            View::Options | View::Callsign => self.show_categories(),
            // 実際に閉じるかはホストが決める。
            View::Categories => self.notifier.notify(Notification::Close),
        }
    }

    /// クリックされた行へカーソルを移して確定する。
    pub fn click_row(&mut self, position: usize) {
        if position >= self.active_len() {
            return;
        }
        if let Some(cursor) = self.cursor.get_mut(self.view) {
            *cursor = position;
        }
        self.confirm_selection();
    }

    /// 現在の画面を描画用に射影する。
    pub fn projection(&self) -> Projection<'_> {
        match self.view {
            View::Categories => {
                let rows: Vec<&str> = self
                    .category_rows
                    .iter()
                    .filter_map(|key| self.categories.get(key))
                    .map(|c| c.display_name.as_str())
                    .collect();
                let selected = selected_row(self.cursor.categories, rows.len());
                Projection::List(ListProjection {
                    title: "Menu",
                    rows,
                    selected,
                })
            }
            View::Options => {
                let category = self.active_category();
                let rows: Vec<&str> = category
                    .map(|c| c.options.iter().map(|o| o.name.as_str()).collect())
                    .unwrap_or_default();
                let selected = selected_row(self.cursor.options, rows.len());
                Projection::List(ListProjection {
                    title: category.map(|c| c.display_name.as_str()).unwrap_or(""),
                    rows,
                    selected,
                })
            }
            View::Callsign => Projection::Callsign(&self.callsign),
        }
    }

    /// カテゴリ行を開く（種別で遷移先が変わる）。
    fn activate_category(&mut self, position: usize) {
        let Some(key) = self.category_rows.get(position).cloned() else {
            return;
        };
        match self.categories.get(&key).map(|c| c.kind) {
            Some(CategoryKind::Input) => self.enter_callsign_input(),
            Some(CategoryKind::List) => {
                self.enter_options(&key);
            }
            None => {}
        }
    }

    /// カテゴリ一覧を表示し、入力欄をクリアする。
    fn show_categories(&mut self) {
        self.view = View::Categories;
        self.callsign.reset();
    }

    fn active_category(&self) -> Option<&CategoryEntry> {
        self.active_category
            .as_deref()
            .and_then(|k| self.categories.get(k))
    }

    /// 現在の画面のリスト長（入力画面は0）。
    fn active_len(&self) -> usize {
        match self.view {
            View::Categories => self.category_rows.len(),
            View::Options => self.active_category().map_or(0, |c| c.options.len()),
            View::Callsign => 0,
        }
    }
}

/// 空でなければ範囲内の選択行を返す。
fn selected_row(cursor: usize, len: usize) -> Option<usize> {
    (len > 0).then(|| cursor.min(len - 1))
}
