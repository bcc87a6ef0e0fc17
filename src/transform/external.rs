// Tue Jan 13 2026 - Alex

use crate::store::{self, AddressSetWriter};
use crate::transform::error::TransformError;
use crate::transform::TransformStats;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

/// Blocklist filtering delegated to a `grepcidr`-compatible executable:
/// `<program> -v -f <patterns> <input>`, stdout becomes the output set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalFilter {
    program: PathBuf,
    success_codes: Vec<i32>,
}

impl ExternalFilter {
    /// grepcidr exits 1 when no line was selected, which is a valid empty result.
    pub fn grepcidr(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            success_codes: vec![0, 1],
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command_line(&self, input: &Path, patterns: &Path) -> String {
        format!(
            "{} -v -f {} {}",
            self.program.display(),
            patterns.display(),
            input.display()
        )
    }

    pub fn run(
        &self,
        input: &Path,
        patterns: &Path,
        output: &Path,
    ) -> Result<TransformStats, TransformError> {
        let command = self.command_line(input, patterns);
        log::debug!("Executing {}", command);

        let mut child = Command::new(&self.program)
            .arg("-v")
            .arg("-f")
            .arg(patterns)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| TransformError::Spawn {
                command: command.clone(),
                source,
            })?;

        let mut stderr = child.stderr.take();
        let stderr_reader = thread::spawn(move || {
            let mut buf = String::new();
            if let Some(ref mut pipe) = stderr {
                let _ = pipe.read_to_string(&mut buf);
            }
            buf
        });

        let mut writer = AddressSetWriter::create(output)?;
        if let Some(mut stdout) = child.stdout.take() {
            let mut chunk = [0u8; 64 * 1024];
            loop {
                let n = stdout
                    .read(&mut chunk)
                    .map_err(|e| store::StoreError::io(output, e))?;
                if n == 0 {
                    break;
                }
                writer.write_raw(&chunk[..n])?;
            }
        }

        let status = child
            .wait()
            .map_err(|source| TransformError::Spawn {
                command: command.clone(),
                source,
            })?;
        let stderr = stderr_reader.join().unwrap_or_default();

        match status.code() {
            Some(code) if self.success_codes.contains(&code) => {}
            code => {
                return Err(TransformError::ExternalTool {
                    command,
                    code,
                    stderr: stderr.trim().to_string(),
                })
            }
        }

        writer.commit()?;

        let mut stats = TransformStats::default();
        stats.written = store::count_records(output)?;
        Ok(stats)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_failing_tool_reports_command_and_code() {
        let dir = TempDir::new().unwrap();
        let tool = script(dir.path(), "broken", "echo 'bad pattern' >&2\nexit 2");
        let input = dir.path().join("in.txt");
        let patterns = dir.path().join("pat.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "2001:db8::1\n").unwrap();
        fs::write(&patterns, "2001:db8::/32\n").unwrap();

        let err = ExternalFilter::grepcidr(&tool)
            .run(&input, &patterns, &output)
            .unwrap_err();

        match err {
            TransformError::ExternalTool { command, code, stderr } => {
                assert!(command.ends_with(&format!("-v -f {} {}", patterns.display(), input.display())));
                assert_eq!(code, Some(2));
                assert_eq!(stderr, "bad pattern");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(!store::exists(&output));
    }

    #[test]
    fn test_tool_output_is_committed() {
        let dir = TempDir::new().unwrap();
        // Stand-in that ignores the patterns and echoes the input file.
        let tool = script(dir.path(), "passthrough", "cat \"$4\"");
        let input = dir.path().join("in.txt");
        let patterns = dir.path().join("pat.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "2001:db8::1\n2001:db8::2\n").unwrap();
        fs::write(&patterns, "").unwrap();

        let stats = ExternalFilter::grepcidr(&tool)
            .run(&input, &patterns, &output)
            .unwrap();

        assert_eq!(stats.written, 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "2001:db8::1\n2001:db8::2\n");
    }
}
