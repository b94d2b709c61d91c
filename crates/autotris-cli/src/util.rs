use std::io::{self, Write};

use anyhow::Context as _;
use serde::Serialize;

/// Writes one compact JSON document per line, flushing after each.
#[derive(Debug)]
pub struct JsonLines<W> {
    writer: W,
}

impl JsonLines<io::StdoutLock<'static>> {
    pub fn stdout() -> Self {
        Self::new(io::stdout().lock())
    }
}

impl<W> JsonLines<W>
where
    W: Write,
{
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_writer(&mut self.writer, value).context("Failed to serialize JSON line")?;
        writeln!(self.writer).context("Failed to write JSON line")?;
        self.writer.flush().context("Failed to flush JSON lines")?;
        Ok(())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer
    }
}
