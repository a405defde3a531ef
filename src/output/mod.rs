//! Step outputs
//!
//! Results are accumulated in an [`Outputs`] value during the run and written
//! once at the end through an [`OutputSink`]. Nothing is emitted before every
//! filter has been evaluated, so a fatal error never leaves partial outputs.

pub mod format;

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use uuid::Uuid;

use crate::error::Error;
use crate::filter::Evaluation;

pub use format::ListFormat;

/// Name of the aggregate output listing matched filters
pub const CHANGES_OUTPUT: &str = "changes";

/// Where outputs are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    /// Append to a `GITHUB_OUTPUT` style file
    File(PathBuf),
    /// Print `::set-output` workflow commands
    Stdout,
}

impl OutputSink {
    pub fn new(output_file: Option<PathBuf>) -> Self {
        match output_file {
            Some(path) if !path.as_os_str().is_empty() => OutputSink::File(path),
            _ => OutputSink::Stdout,
        }
    }
}

/// Ordered name/value pairs produced by one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outputs {
    entries: Vec<(String, String)>,
}

impl Outputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl ToString) {
        self.entries.push((name.into(), value.to_string()));
    }

    /// Latest value recorded for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the outputs for an evaluation.
    ///
    /// Per filter: `<name>`, `<name>_count` and, when a list format is selected
    /// and files matched, `<name>_files`. Then `changes` with the matched filter
    /// names as a JSON array.
    pub fn from_evaluation(evaluation: &Evaluation, list_format: ListFormat) -> Result<Self, Error> {
        let mut outputs = Outputs::new();

        for (name, result) in evaluation.iter() {
            outputs.set(name, result.matched());
            outputs.set(format!("{name}_count"), result.count());

            if result.matched() {
                if let Some(files) = list_format.render(result.files())? {
                    outputs.set(format!("{name}_files"), files);
                }
            }
        }

        let changes = serde_json::to_string(&evaluation.matched_names()).map_err(std::io::Error::from)?;
        outputs.set(CHANGES_OUTPUT, changes);

        Ok(outputs)
    }

    /// Write every output to the sink
    pub fn flush(&self, sink: &OutputSink) -> Result<(), Error> {
        match sink {
            OutputSink::File(path) => {
                tracing::debug!("Writing {} output(s) to {}", self.len(), path.display());
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                self.write_file_commands(&mut file, || format!("ghadelimiter_{}", Uuid::new_v4()))?;
                file.flush()?;
            }
            OutputSink::Stdout => {
                let stdout = std::io::stdout();
                let mut lock = stdout.lock();
                self.write_set_output(&mut lock)?;
                lock.flush()?;
            }
        }
        Ok(())
    }

    /// `name=value` lines, switching to the heredoc form for multi-line values
    fn write_file_commands(&self, w: &mut impl Write, delimiter: impl Fn() -> String) -> std::io::Result<()> {
        for (name, value) in self.iter() {
            if value.contains(['\n', '\r']) {
                let mut delim = delimiter();
                while value.contains(&delim) {
                    delim = delimiter();
                }
                writeln!(w, "{name}<<{delim}")?;
                writeln!(w, "{value}")?;
                writeln!(w, "{delim}")?;
            } else {
                writeln!(w, "{name}={value}")?;
            }
        }
        Ok(())
    }

    fn write_set_output(&self, w: &mut impl Write) -> std::io::Result<()> {
        for (name, value) in self.iter() {
            writeln!(
                w,
                "::set-output name={}::{}",
                escape_property(name),
                escape_data(value)
            )?;
        }
        Ok(())
    }
}

/// Escape a workflow command message
pub fn escape_data(value: &str) -> String {
    value.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

/// Escape a workflow command property value
fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
