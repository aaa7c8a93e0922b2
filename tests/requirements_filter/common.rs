use std::fs;
use std::process::{Command, Output};

use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};

/// The binary under test
pub(crate) const BIN: &str = env!("CARGO_BIN_EXE_requirements-filter");

#[derive(Default)]
pub(crate) struct FilterOptions<'a, 'b, 'c> {
    pub input: Option<&'a Utf8Path>,
    pub exclude: Option<&'b [&'b str]>,
    pub config: Option<&'c Utf8Path>,
    pub verbose: bool,
}

/// Run the filter binary
pub(crate) fn filter(options: FilterOptions) -> Result<Output> {
    let mut cmd = Command::new(BIN);
    if let Some(input) = options.input {
        cmd.arg(format!("--input={input}"));
    }
    if let Some(exclude) = options.exclude {
        cmd.arg("--exclude").args(exclude);
    }
    if let Some(config) = options.config {
        cmd.arg(format!("--config={config}"));
    }
    if options.verbose {
        cmd.arg("-vv");
    }
    println!("{:?}", cmd.get_args());
    Ok(cmd.output()?)
}

/// A scratch directory, with its path as UTF-8.
pub(crate) fn tempdir() -> Result<(tempfile::TempDir, Utf8PathBuf)> {
    let td = tempfile::tempdir()?;
    let path = Utf8PathBuf::try_from(td.path().to_path_buf())?;
    Ok((td, path))
}

/// Write `contents` to `name` inside `dir`; raw bytes so tests can feed
/// manifests that are not valid UTF-8.
pub(crate) fn write_file(
    dir: &Utf8Path,
    name: &str,
    contents: impl AsRef<[u8]>,
) -> Result<Utf8PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

/// Write `lines` as a manifest and filter it, returning the printed lines.
pub(crate) fn filter_lines(lines: &[&str], exclude: &[&str]) -> Vec<String> {
    let (_td, dir) = tempdir().unwrap();
    let mut contents = lines.join("\n");
    contents.push('\n');
    let input = write_file(&dir, "requirements.txt", contents).unwrap();
    let output = filter(FilterOptions {
        input: Some(&input),
        exclude: Some(exclude),
        ..Default::default()
    })
    .unwrap();
    assert!(output.status.success(), "{output:?}");
    stdout_lines(&output)
}

pub(crate) fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8(output.stdout.clone())
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}
