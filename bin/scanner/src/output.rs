//! Writers for the extracted commitments.

use crate::args::OutputArgs;

use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

use commit_scanner_primitives::ExtractedCommitment;

/// The format of the written commitments.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One commitment string per line.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Writes the commitments, one per line, in the configured format.
#[derive(Debug)]
pub struct CommitmentWriter<W> {
    format: OutputFormat,
    out: W,
}

impl<W: Write> CommitmentWriter<W> {
    /// Returns a new writer.
    pub const fn new(format: OutputFormat, out: W) -> Self {
        Self { format, out }
    }

    /// Writes the commitment.
    pub fn write(&mut self, commitment: &ExtractedCommitment) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", commitment.commitment),
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, commitment)?;
                writeln!(self.out)
            }
        }
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl OutputArgs {
    /// Returns the writer to the configured file, or stdout.
    pub fn writer(&self) -> io::Result<CommitmentWriter<Box<dyn Write + Send>>> {
        let out: Box<dyn Write + Send> = match &self.path {
            Some(path) => Box::new(BufWriter::new(File::create(path)?)),
            None => Box::new(io::stdout()),
        };
        Ok(CommitmentWriter::new(self.format, out))
    }
}
