//! Buffered file output for rendered pages.

use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use crate::error::VisError;
use crate::render::OutputStream;

/// An [`OutputStream`] writing to a file.
pub struct OutputFile {
    file: BufWriter<File>,
}

impl OutputFile {
    /// Creates the file at `path`, truncating it if it exists.
    pub fn create(path: &Path) -> Result<OutputFile, VisError> {
        let file = File::create(path)?;
        Ok(Self {
            file: BufWriter::new(file),
        })
    }

    /// Flushes the buffered output to the file.
    pub fn finish(mut self) -> Result<(), VisError> {
        self.file.flush()?;
        Ok(())
    }
}

impl OutputStream for OutputFile {
    fn write(&mut self, data: &str) -> Result<(), VisError> {
        self.file.write_all(data.as_bytes())?;
        Ok(())
    }
}
