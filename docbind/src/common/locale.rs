use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor, DEFAULT_LOCALE};

/// The current-locale context for localized field access.
///
/// Localized fields store their value as a locale→value mapping. Every
/// localized read or write on a model goes through a `LocaleContext` passed
/// explicitly by the caller; there is no implicit global locale.
///
/// Cloned handles share the same underlying locale, so a context can be
/// handed to several collaborators and switched in one place.
///
/// # Examples
///
/// ```rust,ignore
/// use docbind::common::LocaleContext;
///
/// let ctx = LocaleContext::new();
/// assert_eq!(ctx.current(), "en");
///
/// ctx.set("pt_BR");
/// assert_eq!(ctx.current(), "pt_BR");
///
/// let value = ctx.with_locale("fr", || model.get_localized("desc", &ctx));
/// ```
#[derive(Clone)]
pub struct LocaleContext {
    current: Atomic<String>,
}

impl LocaleContext {
    /// Creates a context with the default locale (`en`).
    pub fn new() -> Self {
        LocaleContext {
            current: atomic(DEFAULT_LOCALE.to_string()),
        }
    }

    /// Creates a context with the given locale.
    pub fn of(locale: &str) -> Self {
        LocaleContext {
            current: atomic(locale.to_string()),
        }
    }

    /// Returns the current locale code.
    pub fn current(&self) -> String {
        self.current.read_with(|locale| locale.clone())
    }

    /// Switches the current locale. All handles cloned from this context
    /// observe the change.
    pub fn set(&self, locale: &str) {
        self.current.write_with(|current| *current = locale.to_string());
    }

    /// Runs `f` with the locale temporarily switched, restoring the previous
    /// locale afterwards.
    pub fn with_locale<R>(&self, locale: &str, f: impl FnOnce() -> R) -> R {
        let previous = self.current();
        self.set(locale);
        let result = f();
        self.set(&previous);
        result
    }
}

impl Default for LocaleContext {
    fn default() -> Self {
        LocaleContext::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locale() {
        let ctx = LocaleContext::new();
        assert_eq!(ctx.current(), "en");
    }

    #[test]
    fn test_of_locale() {
        let ctx = LocaleContext::of("pt_BR");
        assert_eq!(ctx.current(), "pt_BR");
    }

    #[test]
    fn test_set_locale() {
        let ctx = LocaleContext::new();
        ctx.set("fr");
        assert_eq!(ctx.current(), "fr");
    }

    #[test]
    fn test_cloned_handles_share_locale() {
        let ctx = LocaleContext::new();
        let other = ctx.clone();
        ctx.set("de");
        assert_eq!(other.current(), "de");
    }

    #[test]
    fn test_with_locale_restores() {
        let ctx = LocaleContext::of("en");
        let seen = ctx.with_locale("pt_BR", || ctx.current());
        assert_eq!(seen, "pt_BR");
        assert_eq!(ctx.current(), "en");
    }
}
