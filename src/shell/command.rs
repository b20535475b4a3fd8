//! The closed set of shell commands.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    View,
    Edit,
    Delete,
    Search,
    Backup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Howto,
    HowtoKeys,
    /// Lists a group's sub-commands.
    Menu(Group),
    ViewRecent,
    ViewLast,
    ViewAll,
    Count,
    Add,
    EditTitle,
    EditBody,
    EditTag,
    DeleteOne,
    DeleteAll,
    SearchId,
    SearchDate,
    SearchTitle,
    SearchBody,
    SearchTag,
    Backup,
    Restore,
    CheckDb,
    RecreateDb,
    Export,
    Quit,
}

impl Command {
    /// Every command in help order.
    pub const ALL: [Command; 29] = [
        Command::Help,
        Command::Howto,
        Command::HowtoKeys,
        Command::Menu(Group::View),
        Command::ViewRecent,
        Command::ViewLast,
        Command::ViewAll,
        Command::Count,
        Command::Add,
        Command::Menu(Group::Edit),
        Command::EditTitle,
        Command::EditBody,
        Command::EditTag,
        Command::Menu(Group::Delete),
        Command::DeleteOne,
        Command::DeleteAll,
        Command::Menu(Group::Search),
        Command::SearchId,
        Command::SearchDate,
        Command::SearchTitle,
        Command::SearchBody,
        Command::SearchTag,
        Command::Menu(Group::Backup),
        Command::Backup,
        Command::Restore,
        Command::CheckDb,
        Command::RecreateDb,
        Command::Export,
        Command::Quit,
    ];

    /// (long name, short alias)
    pub fn names(self) -> (&'static str, &'static str) {
        match self {
            Command::Help => ("help", "-h"),
            Command::Howto => ("howto", "-w"),
            Command::HowtoKeys => ("howto-hotkeys", "-wk"),
            Command::Menu(Group::View) => ("view", "-v"),
            Command::Menu(Group::Edit) => ("edit", "-e"),
            Command::Menu(Group::Delete) => ("del", "-d"),
            Command::Menu(Group::Search) => ("search", "-s"),
            Command::Menu(Group::Backup) => ("backup", "-b"),
            Command::ViewRecent => ("view-recent", "-vr"),
            Command::ViewLast => ("view-last", "-vl"),
            Command::ViewAll => ("view-all", "-va"),
            Command::Count => ("count", "-c"),
            Command::Add => ("add", "-a"),
            Command::EditTitle => ("edit-title", "-et"),
            Command::EditBody => ("edit-text", "-ex"),
            Command::EditTag => ("edit-tag", "-eg"),
            Command::DeleteOne => ("del-memo", "-dm"),
            Command::DeleteAll => ("del-all", "-da"),
            Command::SearchId => ("search-id", "-si"),
            Command::SearchDate => ("search-date", "-sd"),
            Command::SearchTitle => ("search-title", "-st"),
            Command::SearchBody => ("search-text", "-sx"),
            Command::SearchTag => ("search-tag", "-sg"),
            Command::Backup => ("backup-db", "-bd"),
            Command::Restore => ("restore-db", "-od"),
            Command::CheckDb => ("check-db", "-kd"),
            Command::RecreateDb => ("recreate-db", "-ed"),
            Command::Export => ("export", "-x"),
            Command::Quit => ("quit", "-q"),
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Command::Help => "list all commands",
            Command::Howto => "how to use memopad",
            Command::HowtoKeys => "line editing keys",
            Command::Menu(_) => "list commands of this group",
            Command::ViewRecent => "show the newest memo",
            Command::ViewLast => "show the last five memos",
            Command::ViewAll => "show all memos in creation order",
            Command::Count => "number of memos",
            Command::Add => "write a new memo",
            Command::EditTitle => "edit a memo's title",
            Command::EditBody => "edit a memo's text",
            Command::EditTag => "edit a memo's tag",
            Command::DeleteOne => "delete one memo by ID",
            Command::DeleteAll => "delete every memo",
            Command::SearchId => "find a memo by ID",
            Command::SearchDate => "find memos by date (YYYY-MM-DD)",
            Command::SearchTitle => "find memos by part of the title",
            Command::SearchBody => "find memos by part of the text",
            Command::SearchTag => "find memos by part of the tag",
            Command::Backup => "copy the store to the backup file",
            Command::Restore => "restore the store from the backup file",
            Command::CheckDb => "check the store for damage",
            Command::RecreateDb => "delete the store and start empty",
            Command::Export => "print all memos as JSON",
            Command::Quit => "back up (optionally) and exit",
        }
    }

    pub fn group(self) -> Option<Group> {
        match self {
            Command::ViewRecent | Command::ViewLast | Command::ViewAll | Command::Count => {
                Some(Group::View)
            }
            Command::EditTitle | Command::EditBody | Command::EditTag => Some(Group::Edit),
            Command::DeleteOne | Command::DeleteAll => Some(Group::Delete),
            Command::SearchId
            | Command::SearchDate
            | Command::SearchTitle
            | Command::SearchBody
            | Command::SearchTag => Some(Group::Search),
            Command::Backup
            | Command::Restore
            | Command::CheckDb
            | Command::RecreateDb
            | Command::Export => Some(Group::Backup),
            Command::Help
            | Command::Howto
            | Command::HowtoKeys
            | Command::Menu(_)
            | Command::Add
            | Command::Quit => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command '{}'", self.0)
    }
}

impl std::error::Error for UnknownCommand {}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Command::ALL
            .into_iter()
            .find(|c| {
                let (long, short) = c.names();
                s == long || s == short
            })
            .ok_or(UnknownCommand(s))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.names().0)
    }
}
