use crate::console::Console;
use pitchex_timing::Timer;
use serde::{Deserialize, Serialize};
use std::io::BufRead;

/// Background questionnaire answers, stored opaquely in the session result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipantInfo {
    pub has_consented: bool,
    pub name: String,
    pub age: Option<u32>,
    pub gender: String,
    pub native_language: String,
    pub is_tonal_language: Option<String>,
    pub has_hearing_issues: Option<String>,
    pub hearing_issues_description: String,
    pub years_musical_experience: Option<u32>,
    pub instrument: String,
    pub years_vocal_training: Option<u32>,
    pub has_perfect_pitch: Option<String>,
}

fn parse_number(answer: &str) -> Option<u32> {
    answer.trim().parse().ok()
}

/// Accepts a 1-based menu index or the option text itself.
fn pick<'a>(answer: &str, options: &[&'a str]) -> Option<&'a str> {
    let answer = answer.trim();
    if let Ok(n) = answer.parse::<usize>() {
        return options.get(n.checked_sub(1)?).copied();
    }
    options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(answer))
        .copied()
}

const YES_NO_UNSURE: [&str; 3] = ["Yes", "No", "I don't know"];
const GENDERS: [&str; 4] = ["Male", "Female", "Non-binary", "Prefer not to say"];

fn menu(question: &str, options: &[&str]) -> String {
    let listed: Vec<String> = options
        .iter()
        .enumerate()
        .map(|(i, o)| format!("{}) {o}", i + 1))
        .collect();
    format!("{question} [{}]: ", listed.join(", "))
}

/// Walks the participant through the questionnaire.
///
/// Returns `None` when consent is refused or input ends early.
pub fn collect<B: BufRead, T: Timer>(console: &mut Console<B, T>) -> Option<ParticipantInfo> {
    println!("Pitch Discrimination Study");
    println!("Your answers are stored with your results. Participation is voluntary.");
    let consent = console.prompt_line("Do you consent to take part? [y/N]: ")?;
    if !matches!(consent.to_ascii_lowercase().as_str(), "y" | "yes") {
        return None;
    }

    let mut info = ParticipantInfo {
        has_consented: true,
        ..Default::default()
    };
    info.name = console.prompt_line("Name: ")?;
    info.age = parse_number(&console.prompt_line("Age: ")?);
    info.gender = pick(&console.prompt_line(&menu("Gender", &GENDERS))?, &GENDERS)
        .unwrap_or_default()
        .to_string();
    info.native_language = console.prompt_line("Native language: ")?;
    info.is_tonal_language = pick(
        &console.prompt_line(&menu("Is it a tonal language?", &YES_NO_UNSURE))?,
        &YES_NO_UNSURE,
    )
    .map(str::to_string);
    info.has_hearing_issues = pick(
        &console.prompt_line(&menu("Any known hearing issues?", &YES_NO_UNSURE))?,
        &YES_NO_UNSURE,
    )
    .map(str::to_string);
    if info.has_hearing_issues.as_deref() == Some("Yes") {
        info.hearing_issues_description = console.prompt_line("Please describe: ")?;
    }
    info.years_musical_experience =
        parse_number(&console.prompt_line("Years of musical experience: ")?);
    info.instrument = console.prompt_line("Primary instrument: ")?;
    info.years_vocal_training = parse_number(&console.prompt_line("Years of vocal training: ")?);
    info.has_perfect_pitch = pick(
        &console.prompt_line(&menu("Do you have perfect pitch?", &YES_NO_UNSURE))?,
        &YES_NO_UNSURE,
    )
    .map(str::to_string);
    Some(info)
}
