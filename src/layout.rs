//! レイアウト計算のヘルパー関数（描画とクリック判定で共有）

use ratatui::prelude::*;

/// オーバーレイ全体の領域
pub struct OverlayLayout {
    /// メニューパネル（枠込み）
    pub panel: Rect,
    /// STATUSバーの領域
    pub status_bar: Rect,
}

/// メニューパネル内部の領域
pub struct PanelLayout {
    /// リストまたは入力欄の領域
    pub body: Rect,
    /// [ Back ] ボタンの領域
    pub back_button: Rect,
    /// [ Submit ] ボタンの領域（入力画面のみ使用）
    pub submit_button: Rect,
}

/// ボタンの表示文字列
pub const BACK_LABEL: &str = "[ Back ]";
pub const SUBMIT_LABEL: &str = "[ Submit ]";

/// 画面を中央のメニューパネルと下部のSTATUSバーに分割
pub fn create_overlay_layout(area: Rect) -> OverlayLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // メニュー
            Constraint::Length(3), // STATUSバー
        ])
        .split(area);

    // メニューは横方向に中央寄せする。
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
        ])
        .split(rows[0]);

    OverlayLayout {
        panel: cols[1],
        status_bar: rows[1],
    }
}

/// パネル内部を本文とボタン行に分割（枠の1セル分を除く）
pub fn create_panel_layout(panel: Rect) -> PanelLayout {
    let inner = panel.inner(Margin::new(1, 1));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // 本文
            Constraint::Length(1), // ボタン行
        ])
        .split(inner);
    let buttons = chunks[1];

    let back_width = (BACK_LABEL.len() as u16).min(buttons.width);
    let submit_width = (SUBMIT_LABEL.len() as u16).min(buttons.width.saturating_sub(back_width));
    PanelLayout {
        body: chunks[0],
        back_button: Rect::new(buttons.x, buttons.y, back_width, buttons.height),
        submit_button: Rect::new(
            buttons.x + buttons.width - submit_width,
            buttons.y,
            submit_width,
            buttons.height,
        ),
    }
}

/// 選択行が常に見えるようにする先頭行のオフセット
pub fn list_offset(selected: Option<usize>, visible_rows: u16) -> usize {
    let visible = (visible_rows as usize).max(1);
    selected.map_or(0, |s| s.saturating_sub(visible - 1))
}

/// 本文領域内のクリック位置をリストの行番号へ変換
pub fn row_at(body: Rect, offset: usize, column: u16, row: u16) -> Option<usize> {
    if !contains(body, column, row) {
        return None;
    }
    Some(offset + (row - body.y) as usize)
}

/// 座標が領域内にあるか
pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}
