//! Interactive placeholder prompt

use crate::error::Result;
use crate::placeholder::ValueSource;
use std::io::{self, BufRead, BufReader, Stderr, Stdin, Write};

/// Asks for each placeholder on a writer and reads the answer from a reader
///
/// The question reads `Destination value? ` for `$destination`.
pub struct StdinPrompt<R, W> {
    reader: R,
    writer: W,
}

impl StdinPrompt<BufReader<Stdin>, Stderr> {
    /// Prompt on stderr, read from stdin; stdout stays free for the output
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stderr())
    }
}

impl<R: BufRead, W: Write> StdinPrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

/// Capitalize the first letter, as the prompt shows names
fn prompt_label(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl<R: BufRead, W: Write> ValueSource for StdinPrompt<R, W> {
    fn get_value(&mut self, name: &str) -> Result<String> {
        write!(self.writer, "{} value? ", prompt_label(name))?;
        self.writer.flush()?;

        let mut answer = String::new();
        let read = self.reader.read_line(&mut answer)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("input closed before a value for '{}' was given", name),
            )
            .into());
        }
        Ok(answer.trim_end_matches(['\r', '\n']).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Cursor;

    #[test]
    fn test_prompt_reads_one_line_per_value() {
        let mut prompt = StdinPrompt::new(Cursor::new("Paris\n2018-09-01\r\n"), Vec::new());
        assert_eq!(prompt.get_value("destination").unwrap(), "Paris");
        assert_eq!(prompt.get_value("start").unwrap(), "2018-09-01");

        let shown = String::from_utf8(prompt.into_writer()).unwrap();
        assert_eq!(shown, "Destination value? Start value? ");
    }

    #[test]
    fn test_prompt_keeps_inner_spaces() {
        let mut prompt = StdinPrompt::new(Cursor::new("  New York \n"), Vec::new());
        assert_eq!(prompt.get_value("city").unwrap(), "  New York ");
    }

    #[test]
    fn test_prompt_fails_on_closed_input() {
        let mut prompt = StdinPrompt::new(Cursor::new(""), Vec::new());
        assert!(matches!(prompt.get_value("x"), Err(Error::Prompt(_))));
    }

    #[test]
    fn test_prompt_label() {
        assert_eq!(prompt_label("due"), "Due");
        assert_eq!(prompt_label("élan"), "Élan");
        assert_eq!(prompt_label(""), "");
    }
}
