//! Call-site forms recognized as localized strings
//!
//! Each form is one [`ExtractionRule`]: a regex plus the capture groups that
//! hold the literal text and, where the form has one, the translator comment.
//! Rules run in order, so the order of [`builtin_rules`] is part of the
//! output's discovery order.

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule '{name}' has an invalid pattern: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
    #[error("rule '{name}' refers to capture group {group} but the pattern only has {available}")]
    MissingGroup {
        name: String,
        group: usize,
        available: usize,
    },
}

#[derive(Debug, Clone)]
pub struct ExtractionRule {
    name: String,
    regex: Regex,
    text_group: usize,
    comment_group: Option<usize>,
}

/// One match of a rule: the literal text and its comment, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub text: String,
    pub comment: Option<String>,
}

impl ExtractionRule {
    pub fn new(
        name: &str,
        pattern: &str,
        text_group: usize,
        comment_group: Option<usize>,
    ) -> Result<Self, RuleError> {
        let regex = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
            name: name.to_string(),
            source,
        })?;

        // captures_len counts the implicit whole-match group 0
        let available = regex.captures_len() - 1;
        for group in std::iter::once(text_group).chain(comment_group) {
            if group == 0 || group > available {
                return Err(RuleError::MissingGroup {
                    name: name.to_string(),
                    group,
                    available,
                });
            }
        }

        Ok(Self {
            name: name.to_string(),
            regex,
            text_group,
            comment_group,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All matches in `content`, in order of appearance. An empty comment
    /// capture counts as no comment.
    pub fn captures<'a>(&'a self, content: &'a str) -> impl Iterator<Item = Capture> + 'a {
        self.regex.captures_iter(content).filter_map(move |caps| {
            let text = caps.get(self.text_group)?.as_str().to_string();
            let comment = self
                .comment_group
                .and_then(|g| caps.get(g))
                .map(|m| m.as_str())
                .filter(|c| !c.is_empty())
                .map(str::to_string);
            Some(Capture { text, comment })
        })
    }
}

/// The call-site forms used across the Swift sources, in matching order.
pub fn builtin_rules() -> Result<Vec<ExtractionRule>, RuleError> {
    [
        (
            "comment",
            r#"NSLocalizedString\("([^"]*)",\s*"([^"]*)"\s*\)"#,
            Some(2),
        ),
        ("nil-comment", r#"NSLocalizedString\("([^"]*)",\s*nil\s*\)"#, None),
        ("localized-call", r#"Localized\("([^"]*)"[^\n\r]*\)"#, None),
        ("localized-property", r#""([^"]*)"\.localized"#, None),
        ("localized-method", r#""([^"]*)"\.localized\(\)"#, None),
        (
            "localized-format",
            r#""([^"]*)"\.localizedFormat\([^\n\r]*\)"#,
            None,
        ),
    ]
    .into_iter()
    .map(|(name, pattern, comment_group)| ExtractionRule::new(name, pattern, 1, comment_group))
    .collect()
}
