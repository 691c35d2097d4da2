use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Runs the `reprise` binary in `cwd`, feeding `stdin` and closing it.
///
/// # Errors
///
/// Returns an error when the binary cannot be spawned or awaited.
pub fn run_reprise<I, S>(cwd: &Path, args: I, stdin: &[u8]) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = reprise_bin()?;
    let mut child = Command::new(bin)
        .args(args)
        .current_dir(cwd)
        .env("REPRISE_LOG", "error")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| format!("run reprise failed: {}", err))?;
    if let Some(mut input) = child.stdin.take() {
        input
            .write_all(stdin)
            .map_err(|err| format!("write stdin failed: {}", err))?;
    }
    child
        .wait_with_output()
        .map_err(|err| format!("wait for reprise failed: {}", err))
}

/// Formats captured output for assertion messages.
#[must_use]
pub fn describe(output: &Output) -> String {
    format!(
        "status: {}\nstdout: {}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

fn reprise_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_reprise").map_or_else(
        || Err("CARGO_BIN_EXE_reprise missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
