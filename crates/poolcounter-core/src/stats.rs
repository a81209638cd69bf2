//! `STATS FULL` wire format.
//!
//! The request is a single fixed line. The response is a block of
//! `<key>: <value>` lines; the first line without the separator ends the block.

/// Query sent once per pull.
pub const STATS_QUERY: &str = "STATS FULL\n";

/// Separator between key and value in a response line.
pub const KEY_VALUE_SEPARATOR: &str = ": ";

/// One raw response line split into key and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatLine {
    pub key: String,
    pub value: String,
}

impl StatLine {
    /// Split on the first `": "`. `None` marks the end of the stats block.
    pub fn split(line: &str) -> Option<Self> {
        let (key, value) = line.split_once(KEY_VALUE_SEPARATOR)?;
        Some(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}
