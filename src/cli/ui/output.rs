//! Styled terminal output and line input

use console::{Term, style};

use crate::types::Result;

pub struct Output {
    term: Term,
}

impl Output {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Aligned `label: value` line
    pub fn field(&self, label: &str, value: &str) {
        println!("  {:<14} {}", style(format!("{}:", label)).dim(), value);
    }

    /// Numbered question from the model
    pub fn question(&self, index: usize, bound: usize, text: &str) {
        println!(
            "\n{} {}",
            style(format!("[{}/{}]", index, bound)).cyan().bold(),
            text.trim()
        );
    }

    /// Print `prompt` and read one line from the terminal
    pub fn prompt(&self, prompt: &str) -> Result<String> {
        self.term.write_str(&format!("{} ", style(prompt).bold()))?;
        Ok(self.term.read_line()?)
    }

    /// Ask a yes/no question; anything but `y`/`yes` is no
    pub fn confirm(&self, prompt: &str) -> Result<bool> {
        let reply = self.prompt(&format!("{} [y/N]", prompt))?;
        Ok(matches!(reply.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
