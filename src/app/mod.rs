//! TUIのイベントループ、入力処理、状態管理。

mod handlers;
mod render;

use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::layout::Rect;
use std::{path::PathBuf, time::Duration};
use tokio::sync::mpsc;

use crate::{
    bridge,
    config::Config,
    controller::MenuController,
    events::UiState,
    message::HostMessage,
    notify::{self, ChannelNotifier, Notifier},
    shortcuts::Shortcuts,
    ui::Tui,
};

use handlers::{handle_key, handle_mouse, is_ctrl_c};
use render::draw;

/// 入力処理と描画で共有するアプリ状態。
pub struct App<N: Notifier> {
    /// メニュー本体（表示状態・カーソル・カテゴリ）。
    pub controller: MenuController<N>,
    /// ステータス行などUI固有の状態。
    pub ui: UiState,
    /// ショートカットキー設定。
    pub shortcuts: Shortcuts,
    /// 通知先（ステータス表示用）。
    pub endpoint: String,
    /// ブリッジの待受アドレス（ステータス表示用）。
    pub listen_addr: String,
    /// 直近に描画した画面全体の領域（クリック判定用）。
    pub area: Rect,
}

impl<N: Notifier> App<N> {
    /// 指定の通知先でアプリ状態を作る。
    pub fn new(notifier: N, cfg: &Config, shortcuts: Shortcuts) -> Self {
        Self {
            controller: MenuController::new(notifier),
            ui: UiState::new("Waiting for host"),
            shortcuts,
            endpoint: cfg.host.endpoint.clone(),
            listen_addr: cfg.bridge.listen_addr.clone(),
            area: Rect::default(),
        }
    }

    /// ホストからのメッセージをメニューへ反映する。
    pub fn apply_host_message(&mut self, msg: HostMessage) {
        // ログ用に内容を要約する。
        let line = match &msg {
            HostMessage::Display {
                categories,
                category_order,
            } => format!(
                "display: {} categories, order {}",
                categories.len(),
                category_order.len()
            ),
            HostMessage::Hide => "hide".to_string(),
        };
        self.controller.handle_message(msg);
        self.ui.status = if self.controller.is_visible() {
            "Visible".into()
        } else {
            "Hidden".into()
        };
        self.ui.push_log(line);
    }
}

/// ユーザーが終了するまでメインTUIループを回す。
pub async fn run_app(terminal: &mut Tui, cfg: Config) -> Result<()> {
    // ショートカット設定を読み込む（無ければデフォルト）。
    let shortcuts_path = PathBuf::from("shortcut.toml");
    let shortcuts = Shortcuts::load_or_default(&shortcuts_path)?;

    // ブリッジの待受を先に確保する（失敗は起動エラー）。
    let listener = bridge::bind(&cfg.bridge.listen_addr).await?;

    // 通知用と受信用のチャネルを作る。
    let (tx_note, rx_note) = mpsc::channel(cfg.host.queue_size.max(1));
    let (tx_host, mut rx_host) = mpsc::channel::<HostMessage>(64);

    // 通知Workerとブリッジを起動する。
    tokio::spawn(notify::run(
        rx_note,
        cfg.host.endpoint.clone(),
        Duration::from_millis(cfg.host.request_timeout_ms.max(1)),
    ));
    tokio::spawn(bridge::run(listener, tx_host));

    // アプリ状態を初期化する。
    let mut app = App::new(ChannelNotifier::new(tx_note), &cfg, shortcuts);
    tracing::info!("overlay ready");

    loop {
        // 現在の状態を描画し、クリック判定用に領域を覚える。
        let frame = terminal.draw(|f| draw(f, &app))?;
        app.area = frame.area;

        // 入力処理の前にホストからのメッセージを消化する。
        while let Ok(msg) = rx_host.try_recv() {
            app.apply_host_message(msg);
        }

        // UIの応答性確保のため短いタイムアウトで入力をポーリングする。
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(k) => {
                    // 表示状態に関係なくCtrl+Cで終了できるようにする。
                    if is_ctrl_c(&k) {
                        break;
                    }
                    handle_key(&mut app, k);
                }
                Event::Mouse(m) => handle_mouse(&mut app, m),
                _ => {}
            }
        }
    }
    tracing::info!("overlay loop finished");
    Ok(())
}
