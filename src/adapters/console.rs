use crate::domain::ports::Reporter;
use console::Style;
use std::io::{IsTerminal, Write};
use std::sync::Mutex;

/// 寫到 stdout 的指令輸出
#[derive(Debug, Clone)]
pub struct ConsoleReporter {
    color: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        let color = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self { color }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    fn paint(&self, style: Style, text: &str) -> String {
        style.force_styling(self.color).apply_to(text).to_string()
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn line(&self, text: &str) {
        println!("{}", text);
    }

    fn comment(&self, text: &str) {
        println!("{}", self.paint(Style::new().yellow(), &format!("// {}", text)));
    }

    fn title(&self, text: &str) {
        println!();
        println!("{}", self.paint(Style::new().green(), text));
        println!("{}", self.paint(Style::new().green(), &"=".repeat(text.chars().count())));
        println!();
    }

    fn error(&self, text: &str) {
        println!("{}", self.paint(Style::new().white().on_red(), &format!(" [ERROR] {} ", text)));
    }

    fn raw(&self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Line,
    Comment,
    Title,
    Error,
    Raw,
}

/// 收集輸出而不印出，供內嵌使用 (例如網頁安裝精靈)
#[derive(Debug, Default)]
pub struct BufferedReporter {
    entries: Mutex<Vec<(OutputKind, String)>>,
}

impl BufferedReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, kind: OutputKind, text: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((kind, text.to_string()));
        }
    }

    pub fn entries(&self) -> Vec<(OutputKind, String)> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn texts(&self, kind: OutputKind) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, text)| text)
            .collect()
    }

    /// 所有輸出串成一段文字，raw 區塊原樣接上
    pub fn output(&self) -> String {
        let mut out = String::new();
        for (kind, text) in self.entries() {
            out.push_str(&text);
            if kind != OutputKind::Raw {
                out.push('\n');
            }
        }
        out
    }
}

impl Reporter for BufferedReporter {
    fn line(&self, text: &str) {
        self.push(OutputKind::Line, text);
    }

    fn comment(&self, text: &str) {
        self.push(OutputKind::Comment, text);
    }

    fn title(&self, text: &str) {
        self.push(OutputKind::Title, text);
    }

    fn error(&self, text: &str) {
        self.push(OutputKind::Error, text);
    }

    fn raw(&self, text: &str) {
        self.push(OutputKind::Raw, text);
    }
}
