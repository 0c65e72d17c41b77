//! オーバーレイの起動：設定読込→ロギング→端末→メインループ。

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

mod app;
mod bridge;
mod config;
mod controller;
mod events;
mod input;
mod layout;
mod menu;
mod message;
mod notify;
mod shortcuts;
mod ui;

use config::{Config, LogCfg};

/// 設定に従ってファイルロギングを初期化する。ガードは終了まで保持する。
fn init_logging(log: &LogCfg) -> Result<WorkerGuard> {
    // 画面はTUIが占有するため、ログはファイルにだけ書く。
    let (non_blocking, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(".", &log.file));
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(log.max_level())
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to init logging: {e}"))?;
    tracing::info!("logging to {} at {}", log.file, log.max_level());
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // 設定エラーは端末を切り替える前に通常の標準エラーへ出す。
    let cfg = Config::load_or_default(Path::new("config.toml")).context("loading config.toml")?;
    let _log_guard = init_logging(&cfg.log)?;
    tracing::info!(
        "overlay starting: bridge {} -> host {}",
        cfg.bridge.listen_addr,
        cfg.host.endpoint
    );

    // パニック時も端末を戻してからメッセージを出す。
    ui::install_panic_hook();
    let mut terminal = ui::init_terminal()?;
    let res = app::run_app(&mut terminal, cfg).await;
    ui::restore_terminal()?;

    match &res {
        Ok(()) => tracing::info!("overlay exiting"),
        Err(e) => tracing::error!("overlay stopped with error: {e:#}"),
    }
    res
}
