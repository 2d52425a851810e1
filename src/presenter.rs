use pitchex_core::{PresentationError, Presenter, StimulusCategory, TRIPLET_LEN};
use pitchex_timing::Timer;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Recorded tones found under `<media>/<category>/<value>.wav`
#[derive(Debug, Clone, Default)]
pub struct ToneLibrary {
    tones: HashMap<(StimulusCategory, u32), PathBuf>,
}

impl ToneLibrary {
    /// Looks up every candidate tone once, warning about the missing ones.
    pub fn scan(media_dir: &Path, candidates: &[u32]) -> Self {
        let mut tones = HashMap::new();
        for category in StimulusCategory::ALL {
            for &value in candidates {
                let path = media_dir
                    .join(category.media_dir())
                    .join(format!("{value}.wav"));
                if path.is_file() {
                    tones.insert((category, value), path);
                } else {
                    warn!(path = %path.display(), "tone file missing");
                }
            }
        }
        info!(loaded = tones.len(), "tone library scanned");
        Self { tones }
    }

    pub fn path(&self, category: StimulusCategory, value: u32) -> Option<&Path> {
        self.tones.get(&(category, value)).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.tones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }
}

/// Plays triplets through an external player command, or paces them silently
/// on the terminal when no player is configured.
pub struct ConsolePresenter<T: Timer> {
    library: ToneLibrary,
    player: Option<String>,
    timer: T,
    gap: Duration,
    silent_tone: Duration,
}

impl<T: Timer> ConsolePresenter<T> {
    pub fn new(library: ToneLibrary, player: Option<String>, timer: T, gap: Duration) -> Self {
        Self {
            library,
            player,
            timer,
            gap,
            silent_tone: Duration::from_millis(800),
        }
    }

    fn play(&self, path: &Path) -> Result<(), PresentationError> {
        let Some(player) = &self.player else {
            self.timer.sleep(self.silent_tone);
            return Ok(());
        };
        let status = Command::new(player).arg(path).status()?;
        if !status.success() {
            return Err(PresentationError::Playback(format!(
                "{player} exited with {status} for {}",
                path.display()
            )));
        }
        Ok(())
    }
}

impl<T: Timer> Presenter for ConsolePresenter<T> {
    fn present(
        &mut self,
        category: StimulusCategory,
        values: [u32; TRIPLET_LEN],
    ) -> Result<(), PresentationError> {
        // Resolve every file first so a missing tone fails before anything plays
        let mut paths = Vec::with_capacity(TRIPLET_LEN);
        for value in values {
            let path = self
                .library
                .path(category, value)
                .ok_or(PresentationError::MissingTone { category, value })?;
            paths.push(path.to_path_buf());
        }

        debug!(category = %category, ?values, "starting sequence");
        for (i, path) in paths.iter().enumerate() {
            println!("  ♪ Sound {} of {}", i + 1, TRIPLET_LEN);
            self.play(path)?;
            if i + 1 < TRIPLET_LEN {
                self.timer.sleep(self.gap);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchex_timing::HighPrecisionTimer;

    fn media_with(values: &[u32]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for category in StimulusCategory::ALL {
            let sub = dir.path().join(category.media_dir());
            std::fs::create_dir_all(&sub).unwrap();
            for v in values {
                std::fs::write(sub.join(format!("{v}.wav")), b"RIFF").unwrap();
            }
        }
        dir
    }

    fn presenter(library: ToneLibrary, player: Option<String>) -> ConsolePresenter<HighPrecisionTimer> {
        let mut p = ConsolePresenter::new(library, player, HighPrecisionTimer::new(), Duration::ZERO);
        p.silent_tone = Duration::ZERO;
        p
    }

    #[test]
    fn scan_finds_present_files_only() {
        let media = media_with(&[128, 129]);
        let library = ToneLibrary::scan(media.path(), &[128, 129, 130]);
        assert_eq!(library.len(), 4);
        assert!(library.path(StimulusCategory::Voice, 129).is_some());
        assert!(library.path(StimulusCategory::Piano, 130).is_none());
    }

    #[test]
    fn missing_tone_fails_presentation() {
        let media = media_with(&[128, 129]);
        let mut p = presenter(ToneLibrary::scan(media.path(), &[128, 129, 130]), None);
        let err = p
            .present(StimulusCategory::Piano, [128, 130, 128])
            .unwrap_err();
        assert!(matches!(
            err,
            PresentationError::MissingTone {
                category: StimulusCategory::Piano,
                value: 130
            }
        ));
    }

    #[test]
    fn silent_presentation_succeeds_when_tones_exist() {
        let media = media_with(&[128, 129]);
        let mut p = presenter(ToneLibrary::scan(media.path(), &[128, 129]), None);
        assert!(p.present(StimulusCategory::Voice, [129, 128, 128]).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn failing_player_is_reported() {
        let media = media_with(&[128, 129]);
        let mut p = presenter(
            ToneLibrary::scan(media.path(), &[128, 129]),
            Some("false".to_string()),
        );
        let err = p.present(StimulusCategory::Voice, [128, 128, 129]).unwrap_err();
        assert!(matches!(err, PresentationError::Playback(_)));
    }
}
