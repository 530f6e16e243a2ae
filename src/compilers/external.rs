//! Compiler delegating to an external program.

use std::io::{self, ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::compilers::{CompileError, Compiler};

/// Runs a command with the source on stdin and takes stdout as the output.
///
/// The resource path is exported to the child as `PAYLOAD_SOURCE_PATH`.
#[derive(Debug, Clone)]
pub struct ExternalCompiler {
    program: String,
    args: Vec<String>,
}

impl ExternalCompiler {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from an argv list; `None` when the list is empty.
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }
}

impl Compiler for ExternalCompiler {
    fn compile(&self, path: &Path, source: &str) -> Result<String, CompileError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("PAYLOAD_SOURCE_PATH", path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CompileError::new(path, format!("unable to run {}: {}", self.program, e)))?;

        // stdin is written concurrently with reading stdout.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| CompileError::new(path, "compiler stdin unavailable"))?;
        let input = source.to_string();
        let writer = std::thread::spawn(move || write_source(&mut stdin, input.as_bytes()));

        let output = child
            .wait_with_output()
            .map_err(|e| CompileError::new(path, e.to_string()))?;
        let written = writer.join();

        let status = output.status;
        if status.success() {
            match written {
                Ok(Ok(())) => {}
                // The program may exit without consuming all of its input.
                Ok(Err(e)) if e.kind() == ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => {
                    return Err(CompileError::new(
                        path,
                        format!("unable to write source to {}: {}", self.program, e),
                    ))
                }
                Err(_) => {
                    return Err(CompileError::new(
                        path,
                        format!("writing source to {} panicked", self.program),
                    ))
                }
            }
            String::from_utf8(output.stdout)
                .map_err(|e| CompileError::new(path, format!("invalid compiler output: {}", e)))
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(CompileError::new(
                path,
                format!("{} exited with {}: {}", self.program, status, stderr.trim()),
            ))
        }
    }
}

fn write_source(sink: &mut impl Write, source: &[u8]) -> io::Result<()> {
    sink.write_all(source)?;
    sink.flush()
}
