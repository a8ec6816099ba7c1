//! Rendering of pages and page fragments into output streams.

pub mod output;
pub mod page;
pub mod panel;
pub mod table;

use crate::error::VisError;

/// A sink for rendered markup.
pub trait OutputStream {
    /// Appends `data` to the output.
    fn write(&mut self, data: &str) -> Result<(), VisError>;
}

/// A value that renders itself as markup.
pub trait Render {
    /// Writes the markup of the value to `output`.
    fn render<O>(&self, output: &mut O) -> Result<(), VisError>
    where
        O: OutputStream;
}

impl OutputStream for String {
    fn write(&mut self, data: &str) -> Result<(), VisError> {
        self.push_str(data);
        Ok(())
    }
}

/// Renders `value` into a new string.
pub fn render_to_string<R: Render>(value: &R) -> Result<String, VisError> {
    let mut output = String::new();
    value.render(&mut output)?;
    Ok(output)
}

/// Writes `text` to `output` with the HTML special characters escaped.
pub(crate) fn write_escaped<O: OutputStream>(output: &mut O, text: &str) -> Result<(), VisError> {
    let mut escaped = String::with_capacity(text.len());
    tinytemplate::escape(text, &mut escaped);
    output.write(&escaped)
}
