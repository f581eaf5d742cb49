// src/convert/pandoc.rs
//! Conversion through an external `pandoc` process.

use super::Converter;
use crate::error::ConversionError;
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

/// Runs `pandoc -f html -t gfm`, feeding the document on stdin.
#[derive(Debug, Clone)]
pub struct PandocConverter {
    program: String,
}

impl PandocConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Converter for PandocConverter {
    fn convert(&self, markup: &str) -> Result<String, ConversionError> {
        log::debug!("Converting {} bytes with {}", markup.len(), self.program);

        let mut child = Command::new(&self.program)
            .args(["-f", "html", "-t", "gfm", "--wrap=none"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ConversionError::Unavailable {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        // Written from a separate thread so a full stdout pipe cannot
        // block the write.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = markup.as_bytes().to_vec();
            thread::spawn(move || stdin.write_all(&input))
        });

        let output = child.wait_with_output()?;
        let written = writer.map(|writer| writer.join());

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ConversionError::Failed {
                status: output.status.to_string(),
                stderr,
            });
        }

        match written {
            Some(Ok(result)) => result?,
            Some(Err(_)) => {
                return Err(ConversionError::Failed {
                    status: "stdin writer panicked".to_string(),
                    stderr: String::new(),
                })
            }
            None => {}
        }

        String::from_utf8(output.stdout).map_err(|_| ConversionError::InvalidOutput)
    }

    fn name(&self) -> &str {
        &self.program
    }
}
