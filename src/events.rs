//! 描画側と共有するUI状態（ステータス行と操作ログ）。

/// 操作ログとして保持する最大行数。
const LOG_CAPACITY: usize = 64;

/// 描画側と共有するUI状態。
#[derive(Clone, Debug)]
pub struct UiState {
    /// 画面下部のステータス文言。
    pub status: String,
    /// 直近の操作ログ（古い順）。
    pub log: Vec<String>,
}

impl UiState {
    /// 初期ステータスで作成する。
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            log: vec![],
        }
    }

    /// 時刻付きでログを追加し、上限を超えた古い行を捨てる。
    pub fn push_log(&mut self, line: impl AsRef<str>) {
        let now = chrono::Local::now().format("%H:%M:%S");
        self.log.push(format!("[{now}] {}", line.as_ref()));
        if self.log.len() > LOG_CAPACITY {
            let excess = self.log.len() - LOG_CAPACITY;
            self.log.drain(..excess);
        }
    }

    /// 最新のログ行。
    pub fn last_log(&self) -> Option<&str> {
        self.log.last().map(String::as_str)
    }
}
