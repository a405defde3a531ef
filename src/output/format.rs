//! Renderers for the `<filter>_files` output

use std::str::FromStr;

use crate::error::Error;

/// How matched files are listed in outputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListFormat {
    /// No file list output
    #[default]
    None,
    /// JSON array of strings
    Json,
    /// Comma separated, entries with `,` `"` or newlines quoted
    Csv,
    /// POSIX shell words, quoted where needed
    Shell,
    /// Space separated, spaces inside paths backslash-escaped
    Escape,
}

impl FromStr for ListFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(ListFormat::None),
            "json" => Ok(ListFormat::Json),
            "csv" => Ok(ListFormat::Csv),
            "shell" => Ok(ListFormat::Shell),
            "escape" => Ok(ListFormat::Escape),
            other => Err(Error::configuration(format!(
                "unknown list-files format '{other}', expected one of: none, json, csv, shell, escape"
            ))),
        }
    }
}

impl ListFormat {
    /// Render a file list. `None` means this format produces no output.
    pub fn render(self, files: &[String]) -> Result<Option<String>, Error> {
        let rendered = match self {
            ListFormat::None => return Ok(None),
            ListFormat::Json => serde_json::to_string(files).map_err(std::io::Error::from)?,
            ListFormat::Csv => files.iter().map(|f| csv_field(f)).collect::<Vec<_>>().join(","),
            ListFormat::Shell => shlex::try_join(files.iter().map(String::as_str))
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?,
            ListFormat::Escape => files
                .iter()
                .map(|f| f.replace(' ', "\\ "))
                .collect::<Vec<_>>()
                .join(" "),
        };
        Ok(Some(rendered))
    }
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
