pub mod admin;
pub mod chat;
pub mod quote;

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

pub type Input = Lines<BufReader<Stdin>>;

pub fn stdin_lines() -> Input {
    BufReader::new(tokio::io::stdin()).lines()
}

/// Print `question` and read one trimmed line. `None` on end of input.
pub async fn ask(lines: &mut Input, question: &str) -> Result<Option<String>> {
    print!("{} ", question);
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?.map(|line| line.trim().to_string()))
}
