//! Chat line formatting and word wrap.
//!
//! Wrapping counts characters, not display columns, and only breaks at
//! spaces. It is applied when a line is added to the log; stored message
//! content is never changed.

use tchat_proto::Message;

use crate::{LineKind, LogLine};

/// Prefix of the local echo of our own messages.
pub const OWN_PREFIX: &str = "You: ";

/// Cells taken by the chat log border on each axis.
pub const BORDER_WIDTH: u16 = 2;

/// Greedily wrap `line` at spaces so each segment holds at most `width`
/// characters of words.
///
/// Returns the input unchanged when `width` is 0 or the line already fits.
/// The running count covers word characters only; the separating space is
/// not counted. A break replaces the space before the word that would
/// overflow and the count restarts at that word's length. A word longer than
/// `width` stays whole on its own segment. The first word follows the same
/// rule against an empty count, so an overlong first word starts with a
/// break.
pub fn wrap(line: &str, width: usize) -> String {
    if width == 0 || line.chars().count() <= width {
        return line.to_owned();
    }

    let mut out = String::with_capacity(line.len() + line.len() / width + 1);
    let mut run = 0usize;
    for (i, word) in line.split(' ').enumerate() {
        let len = word.chars().count();
        if run + len <= width {
            if i > 0 {
                out.push(' ');
            }
            run += len;
        } else {
            out.push('\n');
            run = len;
        }
        out.push_str(word);
    }
    out
}

/// Format an inbound frame for the log.
///
/// Frames from the relay itself get the server style.
pub fn incoming(message: &Message, timestamps: bool, width: usize) -> LogLine {
    let kind = if message.is_from_server() { LineKind::Server } else { LineKind::Incoming };
    let body = format!("{}: {}", message.sender, message.content);
    let stamp = timestamps.then_some(message.timestamp.as_str());
    LogLine::new(kind, wrap(&with_timestamp(body, stamp), width))
}

/// Format the local echo of a message we are sending.
pub fn own(content: &str, timestamp: Option<&str>, width: usize) -> LogLine {
    let body = format!("{OWN_PREFIX}{content}");
    LogLine::new(LineKind::Own, wrap(&with_timestamp(body, timestamp), width))
}

/// Format an error line. Errors are short and never wrapped.
pub fn error(text: impl Into<String>) -> LogLine {
    LogLine::new(LineKind::Error, text)
}

fn with_timestamp(mut body: String, timestamp: Option<&str>) -> String {
    if let Some(ts) = timestamp.filter(|ts| !ts.is_empty()) {
        body.push('\n');
        body.push_str(ts);
    }
    body
}
