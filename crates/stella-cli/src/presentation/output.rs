//! Styled terminal output.

use std::io::Write;
use std::time::Duration;

use console::{Term, style};

/// Per-character delay for Stella's speech.
const SPEECH_DELAY: Duration = Duration::from_millis(5);

/// Width used when the terminal size is unknown.
const FALLBACK_WIDTH: usize = 60;

/// A horizontal rule of `width` box-drawing characters.
pub fn divider_line(width: usize) -> String {
    "─".repeat(width)
}

fn terminal_width() -> usize {
    Term::stdout()
        .size_checked()
        .map_or(FALLBACK_WIDTH, |(_, cols)| usize::from(cols))
}

pub fn print_divider() {
    println!("{}", style(divider_line(terminal_width())).blue());
}

/// Print `text` one character at a time.
pub async fn print_slowly(text: &str) {
    let mut stdout = std::io::stdout();
    for ch in text.chars() {
        print!("{ch}");
        let _ = stdout.flush();
        tokio::time::sleep(SPEECH_DELAY).await;
    }
    println!();
}

pub async fn print_response(face: &str, text: &str) {
    print_divider();
    println!("{}", style(face).cyan());
    print_slowly(&format!("Stella: {text}")).await;
    print_divider();
}

pub fn print_error(message: &str) {
    println!("{}", style(format!("Error: {message}")).red());
    println!("{}", style("Let's try again...").yellow());
}

pub async fn print_goodbye(message: &str) {
    print_divider();
    print_slowly(&format!("\nStella: {message}\n")).await;
}

pub fn print_system_info(lines: &[String]) {
    println!("\n{}", style("📊 System Information:").green().bold());
    for line in lines {
        println!("{}", style(format!("  • {line}")).green());
    }
    println!();
}

pub fn print_speed_tips() {
    println!("{}", style("💡 Speed Tips for CPU-only mode:").yellow().bold());
    for tip in [
        "Try: ollama pull llama3.2:3b (best balance of speed + quality)",
        "Try: ollama pull qwen2.5:7b (excellent quality, fast)",
        "Try: ollama pull phi3.5:3.8b (very fast, good quality)",
        "Consider getting a GPU for much faster responses",
    ] {
        println!("{}", style(format!("  • {tip}")).yellow());
    }
}

pub fn print_info(message: &str) {
    println!("{}", style(message).green());
}

pub fn print_warning(message: &str) {
    println!("{}", style(message).yellow());
}

/// A heading followed by bulleted items.
pub fn print_list(heading: &str, items: &[String]) {
    print_info(heading);
    for item in items {
        print_info(&format!("  • {item}"));
    }
}

/// "Stella is thinking..." indicator, cleared when the reply arrives.
pub struct Thinking {
    term: Term,
}

impl Thinking {
    pub fn start() -> Self {
        let term = Term::stdout();
        let _ = term.write_str(&style("Stella is thinking...").magenta().bold().to_string());
        let _ = term.flush();
        Self { term }
    }

    pub fn finish(self) {
        let _ = self.term.clear_line();
    }
}
