//! memopad: console memo pad stored in a single SQLite file.

pub mod backup;
pub mod confirm;
pub mod db;
pub mod error;
pub mod paths;
pub mod shell;
