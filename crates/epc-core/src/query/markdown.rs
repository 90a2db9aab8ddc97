//! Telegram MarkdownV2 escaping.

use regex::Regex;
use std::sync::LazyLock;

// Every character MarkdownV2 reserves, backslash included.
static RESERVED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\\_*\[\]()~`>#+\-=|{}.!]").unwrap());

/// Escape catalogue text for embedding in a MarkdownV2 message.
pub fn escape_markdown(text: &str) -> String {
    RESERVED_RE.replace_all(text, "\\$0").into_owned()
}

/// Escape text placed inside a `` `code` `` span, where only the backtick
/// and the backslash are special.
pub fn escape_code(text: &str) -> String {
    text.replace('\\', "\\\\").replace('`', "\\`")
}
