//! Ordered regex rewrite rules applied to candidate repository names.

use std::borrow::Cow;

use regex::Regex;

use crate::error::ConfigError;

/// One compiled `{regex, replacement}` rule.
///
/// The replacement supports `$1` / `${name}` group references.
#[derive(Debug, Clone)]
pub struct NameTransformation {
    regex: Regex,
    replacement: String,
}

impl NameTransformation {
    /// Compile a rule. `index` is its position in the chain and only used to
    /// report errors.
    pub fn compile(
        index: usize,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern).map_err(|source| ConfigError::InvalidRegex {
            index,
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            regex,
            replacement: replacement.into(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replace every non-overlapping match in `name`.
    pub fn apply<'a>(&self, name: &'a str) -> Cow<'a, str> {
        self.regex.replace_all(name, self.replacement.as_str())
    }
}

/// Rules run in order, each one on the previous rule's output.
#[derive(Debug, Clone, Default)]
pub struct RewriteChain {
    rules: Vec<NameTransformation>,
}

impl RewriteChain {
    /// Compile `(regex, replacement)` pairs, failing on the first bad regex.
    pub fn compile<I, P, R>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (P, R)>,
        P: AsRef<str>,
        R: Into<String>,
    {
        let rules = pairs
            .into_iter()
            .enumerate()
            .map(|(i, (pattern, replacement))| {
                NameTransformation::compile(i, pattern.as_ref(), replacement)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[NameTransformation] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn apply(&self, candidate: String) -> String {
        self.rules.iter().fold(candidate, |current, rule| {
            let rewritten = match rule.apply(&current) {
                Cow::Borrowed(_) => None,
                Cow::Owned(s) => Some(s),
            };
            match rewritten {
                Some(rewritten) => {
                    tracing::trace!(
                        rule = rule.pattern(),
                        from = %current,
                        to = %rewritten,
                        "name rewritten"
                    );
                    rewritten
                }
                None => current,
            }
        })
    }
}
