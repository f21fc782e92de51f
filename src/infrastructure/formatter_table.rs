use std::io::Write;

use comfy_table::{Cell, CellAlignment, Color, Table, presets::ASCII_FULL_CONDENSED};

use crate::{Counter, Repository, RepositoryFormatter, StdResult};

const HEADER: [&str; 4] = ["Repository", "Forks", "Stars", "Watchers"];

/// Renders each batch as a table, skipping forks and highlighting positive counters.
pub struct TableFormatter<W: Write + Send> {
    writer: W,
    styling: bool,
}

impl<W: Write + Send> TableFormatter<W> {
    /// Creates a new `TableFormatter` writing to `writer`, with colors when `styling` is set.
    pub fn new(writer: W, styling: bool) -> Self {
        Self { writer, styling }
    }

    /// Consumes the formatter and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn counter_cell(&self, counter: Counter) -> Cell {
        let cell = Cell::new(counter).set_alignment(CellAlignment::Right);
        if counter.is_positive() {
            cell.fg(Color::Green)
        } else {
            cell
        }
    }

    /// Renders the non-fork repositories of the batch.
    pub fn render(&self, repositories: &[Repository]) -> String {
        let mut table = Table::new();
        table.load_preset(ASCII_FULL_CONDENSED).set_header(HEADER);
        if self.styling {
            table.enforce_styling();
        } else {
            table.force_no_tty();
        }

        for repository in repositories.iter().filter(|r| !r.is_fork()) {
            table.add_row(vec![
                Cell::new(repository.name()),
                self.counter_cell(repository.forks_count()),
                self.counter_cell(repository.stargazers_count()),
                self.counter_cell(repository.watchers_count()),
            ]);
        }
        for index in 1..HEADER.len() {
            if let Some(column) = table.column_mut(index) {
                column.set_cell_alignment(CellAlignment::Right);
            }
        }

        table.to_string()
    }
}

impl<W: Write + Send> RepositoryFormatter for TableFormatter<W> {
    fn format(&mut self, repositories: &[Repository]) -> StdResult<()> {
        let rendered = self.render(repositories);
        writeln!(self.writer, "{rendered}")?;
        self.writer.flush()?;

        Ok(())
    }
}
