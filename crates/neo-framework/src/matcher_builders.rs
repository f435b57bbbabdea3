//! Matcher builder functions for common predicates.
//!
//! # Example
//!
//! ```rust,ignore
//! use neo_framework::{any, body_regex, on_message};
//!
//! bot.register(on_message().and(body_regex("(?i)you")?), reply_handler);
//! bot.register(any(), log_handler);
//! ```

use regex::Regex;

use crate::matcher::Matcher;
use neo_core::Event;

/// Creates a matcher that accepts every event.
pub fn any() -> Matcher {
    Matcher::new(|_| true).name("any")
}

/// Creates a matcher that only accepts `m.room.message` events.
pub fn on_message() -> Matcher {
    Matcher::new(Event::is_message).name("message")
}

/// Creates a matcher for messages of the given `msgtype` (e.g. `m.text`).
pub fn on_msgtype(msgtype: impl Into<String>) -> Matcher {
    let msgtype = msgtype.into();
    let name = format!("msgtype:{msgtype}");
    Matcher::new(move |e| e.msgtype() == Some(msgtype.as_str())).name(name)
}

/// Creates a matcher for events sent by `user_id`.
pub fn from_sender(user_id: impl Into<String>) -> Matcher {
    let user_id = user_id.into();
    let name = format!("sender:{user_id}");
    Matcher::new(move |e| e.is_from(&user_id)).name(name)
}

/// Creates a matcher for message bodies containing `needle`.
pub fn body_contains(needle: impl Into<String>) -> Matcher {
    let needle = needle.into();
    let name = format!("contains:{needle}");
    Matcher::new(move |e| e.body().contains(needle.as_str())).name(name)
}

/// Creates a matcher for message bodies starting with `prefix`.
///
/// Handy for command-style bots (`!ping`, `/help`).
pub fn body_starts_with(prefix: impl Into<String>) -> Matcher {
    let prefix = prefix.into();
    let name = format!("prefix:{prefix}");
    Matcher::new(move |e| e.body().starts_with(prefix.as_str())).name(name)
}

/// Creates a matcher for message bodies matching a compiled regex.
pub fn body_matches(regex: Regex) -> Matcher {
    let name = format!("regex:{}", regex.as_str());
    Matcher::new(move |e| regex.is_match(e.body())).name(name)
}

/// Compiles `pattern` and creates a matcher for message bodies matching it.
pub fn body_regex(pattern: &str) -> Result<Matcher, regex::Error> {
    Regex::new(pattern).map(body_matches)
}
