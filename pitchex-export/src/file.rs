use pitchex_core::{ResultSink, SessionResult, SinkError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes each result as a pretty-printed JSON file in `dir`.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `pitch-discrimination-<participant>-<end time>.json`
    pub fn file_path(&self, result: &SessionResult) -> PathBuf {
        let participant = result
            .participant_field("name")
            .map(|name| name.split_whitespace().collect::<Vec<_>>().join("-"))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "anonymous".to_string());
        let participant: String = participant
            .chars()
            .filter(|c| !matches!(c, '/' | '\\' | ':' | '\0'))
            .collect();
        let stamp = result.ended_at.format("%Y-%m-%dT%H-%M-%S-%3fZ");
        self.dir
            .join(format!("pitch-discrimination-{participant}-{stamp}.json"))
    }
}

impl ResultSink for JsonFileSink {
    fn name(&self) -> &str {
        "json-file"
    }

    fn deliver(&self, result: &SessionResult) -> Result<(), SinkError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.file_path(result);
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, result)?;
        writer.flush()?;
        info!(path = %path.display(), "results saved");
        Ok(())
    }
}
