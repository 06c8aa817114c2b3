use crate::error::{Error, Result};

const DEFAULT_PREFIX: &str = "tv-";

/// Scan configuration.
///
/// ```
/// use trellis_core::template::Config;
///
/// let config = Config::new().prefix("sv-");
/// assert!(config.validate().is_ok());
/// assert!(Config::new().prefix("").validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prefix every directive attribute starts with.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into().to_ascii_lowercase();
        self
    }

    pub fn get_prefix(&self) -> &str {
        &self.prefix
    }

    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(Error::Configuration("directive prefix is empty".into()));
        }

        if !self.prefix.chars().all(is_name_char) {
            return Err(Error::Configuration(format!(
                "directive prefix `{}` may only contain `a-z`, `0-9`, `_` and `-`",
                self.prefix
            )));
        }

        Ok(())
    }

    /// Match an attribute name against the directive vocabulary.
    /// Returns `None` for an ordinary attribute.
    pub fn directive(&self, attribute: &str) -> Option<Directive> {
        let attribute = attribute.to_ascii_lowercase();
        let name = attribute.strip_prefix(&self.prefix)?;

        let target = |prefix: &str| {
            name.strip_prefix(prefix)
                .filter(|target| !target.is_empty() && target.chars().all(is_name_char))
                .map(str::to_string)
        };

        let directive = match name {
            "foreach" => Directive::Repeat,
            "true" => Directive::Visible,
            "not-true" => Directive::Hidden,
            _ => match (target("value-"), target("set-")) {
                (Some(target), _) => Directive::Value(target),
                (None, Some(target)) => Directive::Toggle(target),
                (None, None) => Directive::Reserved,
            },
        };

        Some(directive)
    }
}

fn is_name_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '-')
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Repeat the children of the element once per list item.
    Repeat,
    /// Show the element when the variable is truthy.
    Visible,
    /// Show the element when the variable is falsy.
    Hidden,
    /// Render an expression into the named attribute.
    Value(String),
    /// Add the named attribute when the variable is truthy, remove it otherwise.
    Toggle(String),
    /// Carries the prefix but means nothing (yet).
    Reserved,
}
