//! Host list input

use crate::error::{AppError, ErrorContext, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Where the host list comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSource {
    Stdin,
    File(PathBuf),
}

impl HostSource {
    /// `-` or an empty string selects standard input
    pub fn from_arg(arg: &str) -> Self {
        let arg = arg.trim();
        if arg.is_empty() || arg == crate::defaults::STDIN_MARKER {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(arg))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Stdin => "<stdin>".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Split text into host names on any whitespace, keeping order
pub fn parse_hosts(text: &str) -> Result<Vec<String>> {
    let hosts: Vec<String> = text.split_whitespace().map(str::to_string).collect();
    if hosts.is_empty() {
        return Err(AppError::input("no hosts found"));
    }
    Ok(hosts)
}

/// Read the whole source and return its host names
pub fn read_hosts(source: &HostSource) -> Result<Vec<String>> {
    let text = match source {
        HostSource::Stdin => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .with_context(|| format!("read {:?}", source.describe()))?;
            buf
        }
        HostSource::File(path) => read_file(path)?,
    };

    parse_hosts(&text)
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {:?}", path.display().to_string()))
}
