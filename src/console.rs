use pitchex_core::{Responder, Response, TRIPLET_LEN};
use pitchex_timing::Timer;
use std::io::{self, BufRead, Write};

/// What the participant typed at the choice prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Position(usize),
    Quit,
    Unrecognized,
}

/// Maps "1".."3" to positions 0..2; "q" quits.
pub fn parse_choice(line: &str) -> Choice {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Choice::Quit;
    }
    match line.parse::<usize>() {
        Ok(n) if (1..=TRIPLET_LEN).contains(&n) => Choice::Position(n - 1),
        _ => Choice::Unrecognized,
    }
}

/// Line-oriented terminal input shared by the form, the operator prompts and
/// the trial responder.
pub struct Console<B: BufRead, T: Timer> {
    input: B,
    timer: T,
}

impl<B: BufRead, T: Timer> Console<B, T> {
    pub fn new(input: B, timer: T) -> Self {
        Self { input, timer }
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Prints `prompt` and reads one trimmed line; `None` on end of input.
    pub fn prompt_line(&mut self, prompt: &str) -> Option<String> {
        print!("{prompt}");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl<B: BufRead, T: Timer> Responder for Console<B, T> {
    fn await_choice(&mut self) -> Option<Response> {
        let opened = self.timer.now();
        loop {
            let line = self.prompt_line("Which sound was different? [1/2/3, q to quit]: ")?;
            match parse_choice(&line) {
                Choice::Position(position) => {
                    return Some(Response {
                        position,
                        elapsed_ms: self.timer.elapsed_ms(opened),
                    });
                }
                Choice::Quit => return None,
                Choice::Unrecognized => println!("Please answer 1, 2 or 3."),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchex_timing::HighPrecisionTimer;
    use std::io::Cursor;

    #[test]
    fn parses_positions_and_quit() {
        assert_eq!(parse_choice("1"), Choice::Position(0));
        assert_eq!(parse_choice(" 3 \n"), Choice::Position(2));
        assert_eq!(parse_choice("Q"), Choice::Quit);
        assert_eq!(parse_choice("4"), Choice::Unrecognized);
        assert_eq!(parse_choice("0"), Choice::Unrecognized);
        assert_eq!(parse_choice("two"), Choice::Unrecognized);
    }

    #[test]
    fn responder_skips_garbage_until_a_position() {
        let mut console = Console::new(Cursor::new("x\n9\n2\n"), HighPrecisionTimer::new());
        let response = console.await_choice().unwrap();
        assert_eq!(response.position, 1);
    }

    #[test]
    fn responder_returns_none_on_quit_or_eof() {
        let mut console = Console::new(Cursor::new("q\n"), HighPrecisionTimer::new());
        assert!(console.await_choice().is_none());
        let mut console = Console::new(Cursor::new(""), HighPrecisionTimer::new());
        assert!(console.await_choice().is_none());
    }
}
