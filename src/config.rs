// ABOUTME: Constants for the interpreter binary

pub const VERSION: &str = "1.0.0";
pub const PROMPT: &str = "user> ";

/// History file name, created under `$HOME`.
pub const HISTORY_FILE: &str = ".mal_history";
pub const HISTORY_MAX: usize = 1000;
