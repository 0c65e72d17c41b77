//! TUI描画関連の関数。

use ratatui::{
    Frame,
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::{
    controller::{ListProjection, Projection},
    input,
    layout::{self, BACK_LABEL, PanelLayout, SUBMIT_LABEL},
    menu::View,
    notify::Notifier,
};

use super::App;

/// 画面全体を描画する。
pub fn draw<N: Notifier>(f: &mut Frame, app: &App<N>) {
    let overlay = layout::create_overlay_layout(f.area());

    // 表示中のみメニューパネルを描画する。
    if app.controller.is_visible() {
        draw_panel(f, app, overlay.panel);
    }

    // STATUSバーは常に描画する。
    f.render_widget(build_status_bar(app), overlay.status_bar);
}

/// メニューパネル（本文＋ボタン行）を描画する。
fn draw_panel<N: Notifier>(f: &mut Frame, app: &App<N>, area: Rect) {
    let panel = layout::create_panel_layout(area);
    let projection = app.controller.projection();

    // 画面に応じて見出しを決める。
    let title = match &projection {
        Projection::List(list) => list.title.to_string(),
        Projection::Callsign(_) => "Set Callsign".to_string(),
    };
    f.render_widget(Block::default().borders(Borders::ALL).title(title), area);

    match projection {
        Projection::List(list) => draw_list(f, &list, panel.body),
        Projection::Callsign(field) => {
            // プロンプトと入力欄を縦に並べる。
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Length(3), Constraint::Min(0)])
                .split(panel.body);
            let prompt = Paragraph::new("Enter your callsign:").style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
            f.render_widget(prompt, rows[0]);
            input::render_field(f, rows[1], field);
        }
    }

    draw_buttons(f, app.controller.view(), &panel);
}

/// 一覧を描画する。選択行は常に1行だけ強調する。
fn draw_list(f: &mut Frame, list: &ListProjection<'_>, area: Rect) {
    let items: Vec<ListItem> = list.rows.iter().map(|r| ListItem::new(*r)).collect();
    let widget = List::new(items).highlight_style(
        Style::default()
            .bg(Color::Rgb(255, 140, 0)) // オレンジ色の背景
            .fg(Color::Black) // 黒文字
            .add_modifier(Modifier::BOLD),
    );

    // クリック判定と同じオフセットで描画する。
    let mut state = ListState::default()
        .with_offset(layout::list_offset(list.selected, area.height))
        .with_selected(list.selected);
    f.render_stateful_widget(widget, area, &mut state);
}

/// Back（全画面）とSubmit（入力画面のみ）を描画する。
fn draw_buttons(f: &mut Frame, view: View, panel: &PanelLayout) {
    let button = Style::default().fg(Color::Yellow);
    f.render_widget(Paragraph::new(BACK_LABEL).style(button), panel.back_button);
    if view == View::Callsign {
        f.render_widget(
            Paragraph::new(SUBMIT_LABEL).style(button),
            panel.submit_button,
        );
    }
}

/// ステータスバーを構築する。
fn build_status_bar<N: Notifier>(app: &App<N>) -> Paragraph<'static> {
    let screen_name = if !app.controller.is_visible() {
        "Hidden"
    } else {
        match app.controller.view() {
            View::Categories => "Categories",
            View::Options => "Options",
            View::Callsign => "Callsign",
        }
    };

    let text = format!(
        "[{}] {} | in: {} | out: {} | {}",
        screen_name,
        app.ui.status,
        app.listen_addr,
        app.endpoint,
        app.ui.last_log().unwrap_or("-"),
    );
    Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("STATUS"))
        .wrap(Wrap { trim: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        menu::{CategoriesData, CategoryEntry, CategoryKind, OptionEntry},
        message::HostMessage,
        notify::testing::RecordingNotifier,
        shortcuts::Shortcuts,
    };
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    /// バッファを行ごとの文字列に変換する。
    fn buffer_lines(buffer: &Buffer) -> Vec<String> {
        let area = buffer.area();
        (area.y..area.y + area.height)
            .map(|y| {
                (area.x..area.x + area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    fn render(app: &App<RecordingNotifier>) -> (Vec<String>, Buffer) {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        (buffer_lines(&buffer), buffer)
    }

    fn app() -> App<RecordingNotifier> {
        let mut app = App::new(
            RecordingNotifier::default(),
            &Config::default(),
            Shortcuts::default(),
        );
        let mut categories = CategoriesData::new();
        categories.insert(
            "a".into(),
            CategoryEntry {
                display_name: "Alpha".into(),
                kind: CategoryKind::List,
                mod_type: "48".into(),
                options: vec![
                    OptionEntry {
                        name: "Xray".into(),
                        index: 0,
                    },
                    OptionEntry {
                        name: "Yankee".into(),
                        index: 1,
                    },
                ],
                current_index: Some(1),
            },
        );
        app.apply_host_message(HostMessage::Display {
            categories,
            category_order: vec!["a".into()],
        });
        app
    }

    #[test]
    fn test_hidden_draws_only_status() {
        let mut app = app();
        app.apply_host_message(HostMessage::Hide);
        let (lines, _) = render(&app);
        let all = lines.join("\n");
        assert!(!all.contains("Alpha"));
        assert!(all.contains("[Hidden]"));
    }

    #[test]
    fn test_categories_view() {
        let app = app();
        let (lines, _) = render(&app);
        let all = lines.join("\n");
        assert!(all.contains("Menu"));
        assert!(all.contains("Alpha"));
        assert!(all.contains(BACK_LABEL));
        assert!(!all.contains(SUBMIT_LABEL));
        assert!(all.contains("[Categories]"));
    }

    #[test]
    fn test_options_view_highlights_current() {
        let mut app = app();
        app.controller.enter_options("a");
        let (lines, buffer) = render(&app);

        let overlay = layout::create_overlay_layout(Rect::new(0, 0, 80, 24));
        let panel = layout::create_panel_layout(overlay.panel);
        let first = panel.body.y as usize;
        assert!(lines[first].contains("Xray"));
        assert!(lines[first + 1].contains("Yankee"));

        // 選択行（Yankee）だけが強調表示される。
        let bg = |row: u16| buffer[(panel.body.x, row)].bg;
        assert_eq!(bg(panel.body.y + 1), Color::Rgb(255, 140, 0));
        assert_ne!(bg(panel.body.y), Color::Rgb(255, 140, 0));
    }

    #[test]
    fn test_callsign_view_shows_field_and_submit() {
        let mut app = app();
        app.controller.enter_callsign_input();
        app.controller.callsign_field_mut().insert_char('N');
        app.controller.callsign_field_mut().insert_char('7');
        let (lines, _) = render(&app);
        let all = lines.join("\n");
        assert!(all.contains("Set Callsign"));
        assert!(all.contains("N7|"));
        assert!(all.contains(SUBMIT_LABEL));
        assert!(!all.contains("Alpha"));
    }
}
