use std::io::{self, Write};

use crate::application::FetchResult;

pub const PROMPT: &str = "Please enter one or more image URLs (separated by commas): ";

/// Terminal front end: banner, prompt and one status block per URL.
pub struct ConsoleView<W> {
    out: W,
}

impl<W: Write> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn welcome(&mut self) -> io::Result<()> {
        writeln!(self.out, "Welcome to the Ubuntu Image Fetcher")?;
        writeln!(self.out, "A tool for mindfully collecting images from the web")?;
        writeln!(self.out)
    }

    /// The prompt has no trailing newline, so flush before reading stdin.
    pub fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "{}", PROMPT)?;
        self.out.flush()
    }

    pub fn report(&mut self, result: &FetchResult) -> io::Result<()> {
        match result {
            Ok(saved) => {
                writeln!(self.out, "✓ Successfully fetched: {}", saved.filename)?;
                writeln!(self.out, "✓ Image saved to {}", saved.path.display())?;
            }
            Err(e) => writeln!(self.out, "✗ {}", e)?,
        }
        self.out.flush()
    }

    pub fn farewell(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Connection strengthened. Community enriched.")?;
        self.out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}
