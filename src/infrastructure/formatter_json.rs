use std::io::Write;

use crate::{Repository, RepositoryFormatter, StdResult};

/// Renders each non-fork repository as one JSON object per line.
pub struct JsonLinesFormatter<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> JsonLinesFormatter<W> {
    /// Creates a new `JsonLinesFormatter` writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the formatter and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> RepositoryFormatter for JsonLinesFormatter<W> {
    fn format(&mut self, repositories: &[Repository]) -> StdResult<()> {
        for repository in repositories.iter().filter(|r| !r.is_fork()) {
            serde_json::to_writer(&mut self.writer, repository)?;
            writeln!(self.writer)?;
        }
        self.writer.flush()?;

        Ok(())
    }
}
