//! Line input for the shell: a rustyline terminal or a scripted feed.

use std::collections::VecDeque;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// Ctrl-C: abandon the current step.
    Interrupted,
    /// Ctrl-D or closed stdin.
    Eof,
}

pub trait Prompter {
    /// Read one line, pre-filled with `initial`.
    fn read_line(&mut self, prompt: &str, initial: &str) -> Input;

    fn add_history(&mut self, _line: &str) {}
}

pub struct Terminal {
    editor: DefaultEditor,
}

impl Terminal {
    pub fn new() -> Result<Self, ReadlineError> {
        Ok(Self { editor: DefaultEditor::new()? })
    }
}

impl Prompter for Terminal {
    fn read_line(&mut self, prompt: &str, initial: &str) -> Input {
        let read = if initial.is_empty() {
            self.editor.readline(prompt)
        } else {
            self.editor.readline_with_initial(prompt, (initial, ""))
        };
        match read {
            Ok(line) => Input::Line(line),
            Err(ReadlineError::Interrupted) => Input::Interrupted,
            Err(ReadlineError::Eof) => Input::Eof,
            Err(e) => {
                tracing::warn!(error = %e, "readline failed");
                Input::Eof
            }
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            tracing::debug!(error = %e, "history entry not recorded");
        }
    }
}

/// Replays fixed answers, then reports end of input. Records every prompt
/// and pre-filled value it was shown.
#[derive(Debug, Default)]
pub struct Scripted {
    lines: VecDeque<Input>,
    pub seen: Vec<(String, String)>,
}

impl Scripted {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(|l| Input::Line(l.into())).collect(),
            seen: Vec::new(),
        }
    }

    pub fn push(&mut self, input: Input) {
        self.lines.push_back(input);
    }
}

impl Prompter for Scripted {
    fn read_line(&mut self, prompt: &str, initial: &str) -> Input {
        self.seen.push((prompt.to_string(), initial.to_string()));
        self.lines.pop_front().unwrap_or(Input::Eof)
    }
}
