//! Line encoding.

use std::fmt::{self, Write};

use super::Message;

impl Message {
    /// Encode to a wire line, without the `\r\n` terminator.
    ///
    /// The last parameter gets a `:` marker only when it contains a
    /// space. A last parameter that merely starts with `:` is written bare
    /// and will lose that colon when decoded again.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tags) = self.tags.as_deref().filter(|t| !t.is_empty()) {
            f.write_char('@')?;
            f.write_str(tags)?;
            f.write_char(' ')?;
        }
        if let Some(source) = self.source.as_deref().filter(|s| !s.is_empty()) {
            f.write_char(':')?;
            f.write_str(source)?;
            f.write_char(' ')?;
        }
        f.write_str(&self.command)?;

        let last = self.parameters.len().saturating_sub(1);
        for (i, param) in self.parameters.iter().enumerate() {
            if i == last && param.contains(' ') {
                f.write_str(" :")?;
            } else {
                f.write_char(' ')?;
            }
            f.write_str(param)?;
        }
        Ok(())
    }
}
