//! Matcher system for the neo framework.
//!
//! A [`Matcher`] is the predicate half of a registry entry: it decides whether
//! the entry's handler fires for an event. Any `Fn(&Event) -> bool` closure is
//! accepted wherever a matcher is expected, and matchers compose:
//!
//! ```rust,ignore
//! use neo_framework::{body_contains, from_sender, on_message};
//!
//! let matcher = on_message()
//!     .and(body_contains("you"))
//!     .and(from_sender("@bot:example.org").not());
//!
//! registry.register(matcher, handler);
//! registry.register(|e: &Event| e.body().starts_with("!ping"), ping);
//! ```

use std::fmt;
use std::sync::Arc;

use neo_core::Event;

/// A type-erased match predicate.
pub type CheckFn = Arc<dyn Fn(&Event) -> bool + Send + Sync>;

/// A cheaply clonable event predicate.
#[derive(Clone)]
pub struct Matcher {
    check: CheckFn,
    name: Option<Arc<str>>,
}

impl Matcher {
    /// Creates a matcher from a predicate.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Event) -> bool + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(check),
            name: None,
        }
    }

    /// Sets a name for this matcher (useful for debugging).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(Arc::from(name.into()));
        self
    }

    /// Returns the name of this matcher, if set.
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns `true` if the event satisfies this matcher.
    pub fn matches(&self, event: &Event) -> bool {
        (self.check)(event)
    }

    /// Matches events accepted by both `self` and `other`.
    pub fn and(self, other: impl IntoMatcher) -> Self {
        let other = other.into_matcher();
        Self::new(move |e| self.matches(e) && other.matches(e))
    }

    /// Matches events accepted by `self` or `other`.
    pub fn or(self, other: impl IntoMatcher) -> Self {
        let other = other.into_matcher();
        Self::new(move |e| self.matches(e) || other.matches(e))
    }

    /// Matches events rejected by `self`.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::new(move |e| !self.matches(e))
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("name", &self.get_name().unwrap_or("unnamed"))
            .finish()
    }
}

/// Conversion into a [`Matcher`].
///
/// Implemented for [`Matcher`] itself and for every `Fn(&Event) -> bool`.
pub trait IntoMatcher {
    /// Performs the conversion.
    fn into_matcher(self) -> Matcher;
}

impl IntoMatcher for Matcher {
    fn into_matcher(self) -> Matcher {
        self
    }
}

impl<F> IntoMatcher for F
where
    F: Fn(&Event) -> bool + Send + Sync + 'static,
{
    fn into_matcher(self) -> Matcher {
        Matcher::new(self)
    }
}
