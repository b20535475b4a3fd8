//! Interactive dispatcher: reads commands, runs exactly one store or backup
//! operation per command, and turns every failure into a report.

pub mod command;
pub mod prompt;
pub mod render;

pub use command::{Command, Group};
pub use prompt::{Input, Prompter, Scripted, Terminal};

use std::io::{self, Write};

use tracing::{debug, warn};

use crate::backup::{BackupManager, BackupOutcome, RecreateOutcome, RestoreOutcome, StartupOutcome};
use crate::confirm::{Confirm, Question};
use crate::db::{Integrity, Memo, MemoDB, MemoInput, SearchField, SearchResult, DEFAULT_LAST_N, TAG_MARKER};
use crate::error::MemoError;

const PROMPT: &str = "memopad >>> ";
const CONFIRM_PROMPT: &str = "(yes/no) ";
const ID_PROMPT: &str = "(ID) ";
const TITLE_PROMPT: &str = "## ";
const TAG_PROMPT: &str = "#";
const BODY_PROMPT: &str = "... ";
const DATE_PROMPT: &str = "(YYYY-MM-DD) ";
const SEARCH_PROMPT: &str = "(search) ";

/// A line holding only this ends multi-line body input.
pub const BODY_END: &str = ".";

const HOWTO: &str = "
Commands are typed at the `memopad >>>` prompt, by long name or short alias
(`view-all` or `-va`). `help` lists them all; a group name such as `search`
lists only that group.

Writing a memo: `add` asks for a title, the text and a tag. The text may span
several lines; finish it with a line holding only `.`. Leave the title or tag
empty to get a placeholder.

Editing: `edit-title`, `edit-text` and `edit-tag` ask for the memo ID, show
the memo and put the old value on the line for you to change. Nothing is
saved until you answer `yes`.

Searching: titles, texts and tags match by any part, ignoring letter case.
Dates are given as YYYY-MM-DD and match the day a memo was written or last
edited.

Safety: `backup-db` copies the store next to itself, `restore-db` copies it
back, `check-db` looks for damage and `recreate-db` starts over with an empty
store. On `quit` a backup is offered.
";

const HOTKEYS: &str = "
Line editing (Emacs-style keys):
  Ctrl-A / Home      start of line
  Ctrl-E / End       end of line
  Ctrl-B, Ctrl-F     one character left / right
  Alt-B, Alt-F       one word left / right
  Ctrl-W             delete the word before the cursor
  Ctrl-K             delete to end of line
  Ctrl-U             delete to start of line
  Ctrl-Y             paste what was last deleted
  Up / Down          previous / next command from history
  Ctrl-R             search the command history
  Ctrl-L             clear the screen
  Ctrl-C             cancel the current input
  Ctrl-D             on an empty line: quit
";

const UNAVAILABLE: &str = "Could not access the memo store.";
const REMEDY: &str = "Try restoring it from the backup (`restore-db`) or recreating it (`recreate-db`).";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy)]
enum EditTarget {
    Title,
    Body,
    Tag,
}

pub struct Shell<P: Prompter, W: Write> {
    db: MemoDB,
    backups: BackupManager,
    prompter: P,
    out: W,
    exit_backup: bool,
}

impl<P: Prompter, W: Write> Shell<P, W> {
    pub fn new(db: MemoDB, prompter: P, out: W) -> Self {
        let backups = BackupManager::new(db.path());
        Self { db, backups, prompter, out, exit_backup: true }
    }

    /// Whether quitting offers a final backup (default: yes).
    pub fn exit_backup(mut self, on: bool) -> Self {
        self.exit_backup = on;
        self
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn startup(&mut self) -> io::Result<()> {
        let mut asker = Asker { prompter: &mut self.prompter, out: &mut self.out };
        let outcome = self.backups.startup(&mut asker);
        let store = self.backups.store_path().display().to_string();
        let backup = self.backups.backup_path().display().to_string();
        match outcome {
            Ok(StartupOutcome::Existing) => writeln!(self.out, "Using memo store `{store}`."),
            Ok(StartupOutcome::Created { backup_kept: false }) => {
                writeln!(self.out, "Created a new memo store `{store}`.")
            }
            Ok(StartupOutcome::Created { backup_kept: true }) => writeln!(
                self.out,
                "Created a new empty memo store `{store}`; backup `{backup}` left untouched."
            ),
            Ok(StartupOutcome::Restored) => {
                writeln!(self.out, "Memo store `{store}` restored from backup `{backup}`.")
            }
            Err(e) => self.report(&e),
        }
    }

    /// Read and dispatch commands until `quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            let line = match self.prompter.read_line(PROMPT, "") {
                Input::Line(l) => l,
                Input::Interrupted => continue,
                Input::Eof => break,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            self.prompter.add_history(line);
            match line.parse::<Command>() {
                Ok(cmd) => {
                    if self.execute(cmd)? == Flow::Quit {
                        break;
                    }
                }
                Err(_) => writeln!(self.out, "No such command, see `help`.")?,
            }
        }
        self.finish()
    }

    /// Final backup offer before exit.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.exit_backup {
            self.execute(Command::Backup)?;
        }
        writeln!(self.out, "Bye.")
    }

    /// One command, then the same exit as the interactive loop.
    pub fn run_once(&mut self, cmd: Command) -> io::Result<()> {
        self.execute(cmd)?;
        self.finish()
    }

    /// Run one command. Store failures are reported here and never returned;
    /// the `io::Error` is only for the output sink.
    pub fn execute(&mut self, cmd: Command) -> io::Result<Flow> {
        let done = match cmd {
            Command::Help => self.help(None),
            Command::Howto => self.page(HOWTO),
            Command::HowtoKeys => self.page(HOTKEYS),
            Command::Menu(g) => self.help(Some(g)),
            Command::ViewRecent => self.view_recent(),
            Command::ViewLast => self.view_last(),
            Command::ViewAll => self.view_all(),
            Command::Count => self.count(),
            Command::Add => self.add(),
            Command::EditTitle => self.edit(EditTarget::Title),
            Command::EditBody => self.edit(EditTarget::Body),
            Command::EditTag => self.edit(EditTarget::Tag),
            Command::DeleteOne => self.delete_one(),
            Command::DeleteAll => self.delete_all(),
            Command::SearchId => self.pick_memo().map(|_| ()),
            Command::SearchDate => self.search_date(),
            Command::SearchTitle => self.search_text(SearchField::Title),
            Command::SearchBody => self.search_text(SearchField::Body),
            Command::SearchTag => self.search_text(SearchField::Tag),
            Command::Backup => self.backup(),
            Command::Restore => self.restore(),
            Command::CheckDb => self.check_db(),
            Command::RecreateDb => self.recreate(),
            Command::Export => self.export(),
            Command::Quit => return Ok(Flow::Quit),
        };
        if let Err(e) = done {
            if e.is_unavailable() {
                warn!(command = %cmd, error = %e, "command failed");
            } else {
                debug!(command = %cmd, kind = ?e.kind(), error = %e, "command rejected");
            }
            self.report(&e)?;
        }
        Ok(Flow::Continue)
    }

    fn report(&mut self, e: &MemoError) -> io::Result<()> {
        match e {
            MemoError::NotFound(id) => writeln!(self.out, "Memo with ID {id} not found."),
            MemoError::InvalidId(_) => writeln!(self.out, "Invalid ID."),
            _ if e.is_unavailable() => {
                writeln!(self.out, "{UNAVAILABLE} ({e})")?;
                writeln!(self.out, "{REMEDY}")
            }
            _ => writeln!(self.out, "Invalid input: {e}."),
        }
    }

    fn page(&mut self, text: &str) -> Result<(), MemoError> {
        writeln!(self.out, "{}", text.trim_end())?;
        Ok(())
    }

    fn help(&mut self, group: Option<Group>) -> Result<(), MemoError> {
        for cmd in Command::ALL {
            let show = match group {
                None => true,
                Some(g) => cmd.group() == Some(g),
            };
            if show {
                let (long, short) = cmd.names();
                writeln!(self.out, "  {long:<14} {short:<5} {}", cmd.summary())?;
            }
        }
        Ok(())
    }

    fn view_recent(&mut self) -> Result<(), MemoError> {
        match self.db.recent()? {
            Some(m) => {
                writeln!(self.out, "Newest memo:")?;
                render::memo(&mut self.out, &m)?;
            }
            None => writeln!(self.out, "No memos in the store.")?,
        }
        Ok(())
    }

    fn view_last(&mut self) -> Result<(), MemoError> {
        let memos = self.db.last_n(DEFAULT_LAST_N)?;
        if memos.is_empty() {
            writeln!(self.out, "No memos in the store.")?;
        } else {
            writeln!(self.out, "Latest memos:")?;
            render::memos(&mut self.out, &memos)?;
        }
        Ok(())
    }

    fn view_all(&mut self) -> Result<(), MemoError> {
        let memos = self.db.list_all()?;
        if memos.is_empty() {
            writeln!(self.out, "No memos in the store.")?;
        } else {
            writeln!(self.out, "All memos (in creation order):")?;
            render::memos(&mut self.out, &memos)?;
        }
        Ok(())
    }

    fn count(&mut self) -> Result<(), MemoError> {
        let n = self.db.try_count()?;
        writeln!(self.out, "Memos in the store: {n}")?;
        Ok(())
    }

    fn add(&mut self) -> Result<(), MemoError> {
        writeln!(self.out, "Title (ENTER for none):")?;
        let Some(title) = self.line(TITLE_PROMPT, "") else { return Ok(()) };
        writeln!(self.out, "Text, finish with a line containing only `{BODY_END}`:")?;
        let Some(body) = self.multiline("") else { return Ok(()) };
        writeln!(self.out, "Tag (ENTER for none):")?;
        let Some(tag) = self.line(TAG_PROMPT, "") else { return Ok(()) };

        let id = self.db.insert(&MemoInput::new(title, body, tag))?;
        if let Some(m) = self.db.get(id)? {
            render::memo(&mut self.out, &m)?;
        }
        writeln!(self.out, "Memo added.")?;
        Ok(())
    }

    fn edit(&mut self, target: EditTarget) -> Result<(), MemoError> {
        let Some(memo) = self.pick_memo()? else { return Ok(()) };
        writeln!(self.out, "Edit the text below, then press ENTER:")?;
        let value = match target {
            EditTarget::Title => self.line(TITLE_PROMPT, &memo.title),
            EditTarget::Body => self.multiline(&memo.body),
            EditTarget::Tag => self.line(TAG_PROMPT, memo.tag.trim_start_matches(TAG_MARKER)),
        };
        let Some(value) = value else { return Ok(()) };

        let question = match target {
            EditTarget::Title => Question::SaveTitle(memo.id),
            EditTarget::Body => Question::SaveBody(memo.id),
            EditTarget::Tag => Question::SaveTag(memo.id),
        };
        if !self.ask(&question) {
            writeln!(self.out, "Memo left unchanged.")?;
            return Ok(());
        }
        let updated = match target {
            EditTarget::Title => self.db.update_title(memo.id, &value)?,
            EditTarget::Body => self.db.update_body(memo.id, &value)?,
            EditTarget::Tag => self.db.update_tag(memo.id, &value)?,
        };
        if !updated {
            return Err(MemoError::NotFound(memo.id));
        }
        writeln!(self.out, "Memo updated.")?;
        Ok(())
    }

    fn delete_one(&mut self) -> Result<(), MemoError> {
        let Some(memo) = self.pick_memo()? else { return Ok(()) };
        if !self.ask(&Question::DeleteMemo(memo.id)) {
            return Ok(());
        }
        if !self.db.delete(memo.id)? {
            return Err(MemoError::NotFound(memo.id));
        }
        writeln!(self.out, "Memo deleted.")?;
        Ok(())
    }

    fn delete_all(&mut self) -> Result<(), MemoError> {
        if !self.ask(&Question::DeleteAll) {
            return Ok(());
        }
        let n = self.db.delete_all()?;
        writeln!(self.out, "All memos deleted ({n}).")?;
        Ok(())
    }

    /// Prompt for an id and show that memo. `None` when input was abandoned.
    fn pick_memo(&mut self) -> Result<Option<Memo>, MemoError> {
        writeln!(self.out, "Memo ID:")?;
        let Some(raw) = self.line(ID_PROMPT, "") else { return Ok(None) };
        let raw = raw.trim();
        let id = match raw.parse::<i64>() {
            Ok(id) if id > 0 => id,
            _ => return Err(MemoError::InvalidId(raw.to_string())),
        };
        let memo = self.db.get(id)?.ok_or(MemoError::NotFound(id))?;
        render::memo(&mut self.out, &memo)?;
        Ok(Some(memo))
    }

    fn search_date(&mut self) -> Result<(), MemoError> {
        writeln!(self.out, "Date the memo was written or last edited:")?;
        loop {
            let Some(pattern) = self.line(DATE_PROMPT, "") else { return Ok(()) };
            match self.db.search(SearchField::Date, &pattern) {
                Ok(found) => return self.show_found(SearchField::Date, pattern.trim(), found),
                Err(e @ MemoError::BadDate(_)) => writeln!(self.out, "{e}, try again:")?,
                Err(e) => return Err(e),
            }
        }
    }

    fn search_text(&mut self, field: SearchField) -> Result<(), MemoError> {
        let what = field_name(field);
        writeln!(self.out, "Part of the {what} to look for:")?;
        let Some(pattern) = self.line(SEARCH_PROMPT, "") else { return Ok(()) };
        let found = self.db.search(field, &pattern)?;
        self.show_found(field, pattern.trim(), found)
    }

    fn show_found(&mut self, field: SearchField, pattern: &str, found: SearchResult) -> Result<(), MemoError> {
        let what = field_name(field);
        match found {
            SearchResult::Blank => writeln!(self.out, "No {what} given, nothing searched.")?,
            SearchResult::Found(memos) if memos.is_empty() => match field {
                SearchField::Date => writeln!(self.out, "No memo from {pattern}.")?,
                _ => writeln!(self.out, "No memo with `{pattern}` in the {what}.")?,
            },
            SearchResult::Found(memos) => render::memos(&mut self.out, &memos)?,
        }
        Ok(())
    }

    fn backup(&mut self) -> Result<(), MemoError> {
        let mut asker = Asker { prompter: &mut self.prompter, out: &mut self.out };
        match self.backups.backup(&mut asker)? {
            BackupOutcome::Created(p) => writeln!(self.out, "Backup written: `{}`.", p.display())?,
            BackupOutcome::Declined => writeln!(self.out, "No backup made.")?,
            BackupOutcome::NoStore => writeln!(self.out, "There is no memo store to back up.")?,
        }
        Ok(())
    }

    fn restore(&mut self) -> Result<(), MemoError> {
        let mut asker = Asker { prompter: &mut self.prompter, out: &mut self.out };
        match self.backups.restore(&mut asker)? {
            RestoreOutcome::Restored(p) => {
                writeln!(self.out, "Memo store `{}` restored from backup.", p.display())?
            }
            RestoreOutcome::Overwritten(p) => {
                writeln!(self.out, "Memo store `{}` overwritten from backup.", p.display())?
            }
            RestoreOutcome::Declined => writeln!(self.out, "Memo store left as it was.")?,
            RestoreOutcome::BackupMissing => writeln!(self.out, "Backup not found!")?,
        }
        Ok(())
    }

    fn check_db(&mut self) -> Result<(), MemoError> {
        let store = self.backups.store_path().display().to_string();
        match self.backups.check_integrity()? {
            Integrity::Ok => {
                writeln!(self.out, "Memo store `{store}` is healthy.")?;
                writeln!(self.out, "If it still cannot be accessed: {REMEDY}")?;
            }
            Integrity::Corrupt(problems) => {
                writeln!(self.out, "Memo store `{store}` is damaged:")?;
                for p in &problems {
                    writeln!(self.out, "  {p}")?;
                }
                writeln!(self.out, "{REMEDY}")?;
            }
        }
        Ok(())
    }

    fn recreate(&mut self) -> Result<(), MemoError> {
        let mut asker = Asker { prompter: &mut self.prompter, out: &mut self.out };
        match self.backups.recreate(&mut asker)? {
            RecreateOutcome::Recreated => writeln!(
                self.out,
                "New empty memo store created: `{}`.",
                self.backups.store_path().display()
            )?,
            RecreateOutcome::Declined => writeln!(self.out, "Memo store left as it was.")?,
        }
        Ok(())
    }

    fn export(&mut self) -> Result<(), MemoError> {
        let memos = self.db.list_all()?;
        serde_json::to_writer_pretty(&mut self.out, &memos).map_err(io::Error::from)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn ask(&mut self, question: &Question) -> bool {
        Asker { prompter: &mut self.prompter, out: &mut self.out }.confirm(question)
    }

    fn line(&mut self, prompt: &str, initial: &str) -> Option<String> {
        match self.prompter.read_line(prompt, initial) {
            Input::Line(l) => Some(l),
            Input::Interrupted | Input::Eof => None,
        }
    }

    /// Lines until [`BODY_END`]. Line `n` is pre-filled with line `n` of `initial`.
    fn multiline(&mut self, initial: &str) -> Option<String> {
        let mut old = initial.lines();
        let mut lines = Vec::new();
        loop {
            let prefill = old.next().unwrap_or("");
            let line = self.line(BODY_PROMPT, prefill)?;
            if line.trim() == BODY_END {
                return Some(lines.join("\n"));
            }
            lines.push(line);
        }
    }
}

fn field_name(field: SearchField) -> &'static str {
    match field {
        SearchField::Date => "date",
        SearchField::Title => "title",
        SearchField::Body => "text",
        SearchField::Tag => "tag",
    }
}

/// Asks [`Question`]s on the shell's prompter and output.
struct Asker<'a, P, W> {
    prompter: &'a mut P,
    out: &'a mut W,
}

impl<P: Prompter, W: Write> Confirm for Asker<'_, P, W> {
    /// Re-asks until `yes`/`-y` or `no`/`-n`. Interrupt or end of input is a no.
    fn confirm(&mut self, question: &Question) -> bool {
        if writeln!(self.out, "{}", question_text(question)).is_err() {
            return false;
        }
        loop {
            match self.prompter.read_line(CONFIRM_PROMPT, "") {
                Input::Line(l) => match l.trim().to_lowercase().as_str() {
                    "yes" | "-y" => return true,
                    "no" | "-n" => return false,
                    _ => {
                        if writeln!(self.out, "Please answer `yes` or `no`.").is_err() {
                            return false;
                        }
                    }
                },
                Input::Interrupted | Input::Eof => return false,
            }
        }
    }
}

fn question_text(q: &Question) -> String {
    match q {
        Question::Backup { backup } => format!("Write a backup of the memo store to `{}`?", backup.display()),
        Question::OverwriteStore { store } => {
            format!("Overwrite the memo store `{}` with the backup?", store.display())
        }
        Question::RestoreMissingStore { backup } => {
            format!("Memo store not found. Restore it from backup `{}`?", backup.display())
        }
        Question::Recreate { store } => {
            format!("Delete the memo store `{}` and start with an empty one?", store.display())
        }
        Question::DeleteMemo(id) => format!("Delete memo with ID {id}?"),
        Question::DeleteAll => "Delete ALL memos from the store?".to_string(),
        Question::SaveTitle(_) => "Save the memo with the edited title?".to_string(),
        Question::SaveBody(_) => "Save the memo with the edited text?".to_string(),
        Question::SaveTag(_) => "Save the memo with the edited tag?".to_string(),
    }
}
