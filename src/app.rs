use crate::console::Console;
use crate::participant;
use crate::presenter::{ConsolePresenter, ToneLibrary};
use crate::settings::Settings;
use anyhow::{Context, Result};
use pitchex_core::{PresentationError, ResultSink, SessionResult, StimulusCategory};
use pitchex_experiment::{
    DeliveryReport, ExperimentError, Session, SessionSummary, deliver_all, retry_failed,
};
use pitchex_export::{JsonFileSink, TableStoreSink};
use pitchex_timing::{HighPrecisionTimer, Timer};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

/// Runtime options gathered from the command line
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub media_dir: PathBuf,
    pub output_dir: PathBuf,
    pub player: Option<String>,
    pub seed: Option<u64>,
    pub upload: bool,
}

/// Outcome of the operator prompt after a failed presentation
enum Recovery {
    Retry,
    Regenerate,
    Quit,
}

pub struct App<B: BufRead> {
    settings: Settings,
    options: RunOptions,
    console: Console<B, HighPrecisionTimer>,
}

impl<B: BufRead> App<B> {
    pub fn new(settings: Settings, options: RunOptions, input: B) -> Result<Self> {
        settings
            .experiment
            .validate()
            .context("Experiment configuration rejected")?;
        Ok(Self {
            settings,
            options,
            console: Console::new(input, HighPrecisionTimer::new()),
        })
    }

    pub fn run(mut self) -> Result<()> {
        println!("=== PITCH DISCRIMINATION TEST ===");

        let Some(info) = participant::collect(&mut self.console) else {
            println!("No consent given. Nothing was recorded.");
            return Ok(());
        };
        let participant = serde_json::to_value(&info)?;

        let rng = match self.options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let config = self.settings.experiment.clone();
        let mut session = Session::new(config.clone(), participant, rng)?;

        let candidates = config.stimuli.candidates();
        let library = ToneLibrary::scan(&self.options.media_dir, &candidates);
        if library.is_empty() {
            warn!(media = %self.options.media_dir.display(), "no tone files found");
        }
        let mut presenter = ConsolePresenter::new(
            library,
            self.options.player.clone(),
            self.console.timer().clone(),
            Duration::from_millis(config.inter_tone_gap_ms),
        );

        println!("\nListen carefully and identify which sound (1st, 2nd, or 3rd) is different.");
        while !session.is_complete() {
            self.show_progress(&session);
            if self
                .console
                .prompt_line("Press Enter to play the sounds...")
                .is_none()
            {
                println!("Session abandoned. Nothing was saved.");
                return Ok(());
            }

            match session.run_trial(&mut presenter, &mut self.console) {
                Ok(_) => {
                    println!("Thank you for your response.");
                    self.console
                        .timer()
                        .sleep(Duration::from_millis(config.feedback_duration_ms));
                }
                Err(ExperimentError::Presentation(e)) => {
                    println!("Audio playback error: {e}");
                    if let PresentationError::MissingTone { value, .. } = &e {
                        if !candidates.contains(value) {
                            println!(
                                "The difficulty step is too large for the available tones; \
                                 retrying or new sounds will not help at this step."
                            );
                        }
                    }
                    match self.ask_recovery() {
                        Recovery::Retry => {}
                        Recovery::Regenerate => {
                            session.regenerate_trial()?;
                        }
                        Recovery::Quit => {
                            println!("Session abandoned. Nothing was saved.");
                            return Ok(());
                        }
                    }
                }
                Err(ExperimentError::Abandoned) => {
                    println!("Session abandoned. Nothing was saved.");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            }
        }

        let result = session.finish()?;
        self.show_summary(&result);
        self.deliver(&result)
    }

    fn show_progress(&self, session: &Session<StdRng>) {
        let (done, total) = session.progress();
        let Some(category) = session.sequence().get(done) else {
            return;
        };
        let progress: Vec<String> = StimulusCategory::ALL
            .iter()
            .map(|c| {
                let (d, t) = session.category_progress(*c);
                format!("{}: {d}/{t}", c.label())
            })
            .collect();
        println!();
        println!("Trial: {} of {}", done + 1, total);
        println!("Current sound: {}", category.describe());
        println!("Completed: {}", progress.join(", "));
    }

    fn ask_recovery(&mut self) -> Recovery {
        loop {
            let Some(answer) = self
                .console
                .prompt_line("[r]etry the same sounds, [n]ew sounds, or [q]uit: ")
            else {
                return Recovery::Quit;
            };
            match answer.to_ascii_lowercase().as_str() {
                "" | "r" | "retry" => return Recovery::Retry,
                "n" | "new" => return Recovery::Regenerate,
                "q" | "quit" => return Recovery::Quit,
                _ => continue,
            }
        }
    }

    fn show_summary(&self, result: &SessionResult) {
        let summary = SessionSummary::from_result(result);
        println!("\n=== RESULTS ===");
        for c in &summary.categories {
            println!(
                "{}: threshold step {}, accuracy {:.1}% ({}/{})",
                c.category.label(),
                c.final_step.map_or_else(|| "-".to_string(), |s| s.to_string()),
                c.accuracy,
                c.correct,
                c.trials,
            );
        }
        println!(
            "Trials: {}, mean response time {:.0} ms, duration {} s",
            summary.total_trials, summary.mean_latency_ms, summary.duration_secs
        );
        println!("Lower thresholds indicate better pitch discrimination ability.");
        println!("{}", summary.band.message());
    }

    fn sinks(&self) -> Vec<Box<dyn ResultSink>> {
        let mut sinks: Vec<Box<dyn ResultSink>> =
            vec![Box::new(JsonFileSink::new(&self.options.output_dir))];
        if !self.options.upload {
            return sinks;
        }
        if let Some(table) = &self.settings.table_store {
            match TableStoreSink::from_env(table.clone()) {
                Ok(sink) => sinks.push(Box::new(sink)),
                Err(e) => warn!(error = %e, "table store upload disabled"),
            }
        }
        sinks
    }

    /// Delivers to every sink, offering retries for the ones that failed.
    fn deliver(&mut self, result: &SessionResult) -> Result<()> {
        let sinks = self.sinks();
        let mut report: DeliveryReport = deliver_all(result, &sinks);
        loop {
            for name in &report.delivered {
                println!("Results saved ({name}).");
            }
            if report.is_success() {
                return Ok(());
            }
            for failure in &report.failures {
                error!(sink = %failure.sink, error = %failure.error, "result not saved");
                println!("Could not save results ({failure}).");
            }
            let again = self
                .console
                .prompt_line("Retry the failed destinations? [y/N]: ")
                .is_some_and(|a| matches!(a.to_ascii_lowercase().as_str(), "y" | "yes"));
            if !again {
                info!("operator declined delivery retry");
                return report.into_result().map(|_| ()).map_err(Into::into);
            }
            report = retry_failed(result, &sinks, &report);
        }
    }
}
