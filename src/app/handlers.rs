//! キー入力・マウス入力のハンドラー関数。

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::{
    controller::Projection,
    layout,
    menu::View,
    notify::Notifier,
    shortcuts::matches_shortcut,
};

use super::App;

/// Ctrl+Cかどうかを判定する。
pub fn is_ctrl_c(k: &KeyEvent) -> bool {
    k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c')
}

/// キー入力を1件処理する。非表示中は何もしない。
pub fn handle_key<N: Notifier>(app: &mut App<N>, k: KeyEvent) {
    // 押下以外（リピート解除など）は無視する。
    if k.kind != KeyEventKind::Press || !app.controller.is_visible() {
        return;
    }

    let sc = &app.shortcuts;
    let ctl = &mut app.controller;

    if matches_shortcut(&k, &sc.menu.down) {
        ctl.navigate(1);
    } else if matches_shortcut(&k, &sc.menu.up) {
        ctl.navigate(-1);
    } else if matches_shortcut(&k, &sc.menu.confirm) {
        ctl.confirm_selection();
    } else if matches_shortcut(&k, &sc.menu.back) {
        ctl.go_back();
    } else if matches_shortcut(&k, &sc.menu.back_unfocused) {
        // 入力欄にフォーカスがあれば文字削除、無ければ戻る。
        if ctl.field_focused() {
            ctl.callsign_field_mut().backspace();
        } else {
            ctl.go_back();
        }
    } else if ctl.field_focused() {
        // 入力欄の編集操作。
        let field = ctl.callsign_field_mut();
        if matches_shortcut(&k, &sc.field.delete) {
            field.delete();
        } else if matches_shortcut(&k, &sc.field.left) {
            field.move_left();
        } else if matches_shortcut(&k, &sc.field.home) {
            field.move_home();
        } else if matches_shortcut(&k, &sc.field.end) {
            field.move_end();
        } else if matches_shortcut(&k, &sc.field.clear_line) {
            field.clear_line();
        } else if let KeyCode::Char(c) = k.code {
            // コントロールキーでない場合のみ挿入する。
            if !k.modifiers.contains(KeyModifiers::CONTROL) {
                field.insert_char(c);
            }
        }
    }
}

/// 左クリックを行・ボタンの操作へ変換する。非表示中は何もしない。
pub fn handle_mouse<N: Notifier>(app: &mut App<N>, m: MouseEvent) {
    if m.kind != MouseEventKind::Down(MouseButton::Left) || !app.controller.is_visible() {
        return;
    }

    // 描画と同じ計算でパネル内の領域を求める。
    let overlay = layout::create_overlay_layout(app.area);
    let panel = layout::create_panel_layout(overlay.panel);
    let ctl = &mut app.controller;

    if layout::contains(panel.back_button, m.column, m.row) {
        ctl.go_back();
        return;
    }
    if ctl.view() == View::Callsign {
        if layout::contains(panel.submit_button, m.column, m.row) {
            ctl.submit_callsign();
        }
        return;
    }

    // 表示中のスクロール位置を考慮して行番号を求める。
    let offset = match ctl.projection() {
        Projection::List(list) => layout::list_offset(list.selected, panel.body.height),
        Projection::Callsign(_) => return,
    };
    if let Some(row) = layout::row_at(panel.body, offset, m.column, m.row) {
        ctl.click_row(row);
    }
}
