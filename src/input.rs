//! コールサイン入力欄の状態と描画。

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

/// 入力欄の状態
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextField {
    /// 現在の入力値
    pub value: String,
    /// カーソル位置（文字単位）
    pub cursor: usize,
    /// フォーカス中か（フォーカス中はBackspaceが文字削除になる）
    pub focused: bool,
}

impl TextField {
    /// 入力値を空にしてフォーカスする
    pub fn focus_empty(&mut self) {
        self.clear_line();
        self.focused = true;
    }

    /// 入力値を空にしてフォーカスを外す
    pub fn reset(&mut self) {
        self.clear_line();
        self.focused = false;
    }

    /// 文字を挿入
    pub fn insert_char(&mut self, c: char) {
        // カーソル位置のバイトオフセットを求めて挿入する。
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Backspace（カーソル前の文字を削除）
    pub fn backspace(&mut self) {
        // カーソルが先頭なら何もしない。
        if self.cursor > 0 {
            let at = self.byte_offset(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete（カーソル位置の文字を削除）
    pub fn delete(&mut self) {
        // カーソルが末尾なら何もしない。
        if self.cursor < self.value.chars().count() {
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    /// カーソルを左に移動
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// カーソルを先頭に移動
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// カーソルを末尾に移動
    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// 行全体をクリア
    pub fn clear_line(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// 文字位置をバイト位置へ変換する。
    fn byte_offset(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }
}

/// 入力欄を描画（横スクロール対応、カーソルは|で表示）
pub fn render_field(f: &mut Frame, area: Rect, state: &TextField) {
    let block = Block::default().borders(Borders::ALL).title("Callsign");
    // 枠の内側の幅からスクロール量を算出する。
    let display_width = block.inner(area).width as usize;
    let scroll_offset = state
        .cursor
        .saturating_sub(display_width.saturating_sub(2));

    // 可視範囲の文字列にカーソルを差し込む。
    let chars: Vec<char> = state.value.chars().skip(scroll_offset).collect();
    let split = state.cursor.saturating_sub(scroll_offset).min(chars.len());
    let before: String = chars[..split].iter().collect();
    let after: String = chars[split..].iter().collect();
    let text = if state.focused {
        format!("{before}|{after}")
    } else {
        format!("{before}{after}")
    };

    let widget = Paragraph::new(text)
        .block(block)
        .style(Style::default().fg(Color::Green));
    f.render_widget(widget, area);
}
