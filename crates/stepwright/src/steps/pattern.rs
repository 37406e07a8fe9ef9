// Step patterns - Cucumber-expression subset compiled to anchored regexes
//
// Supported placeholders:
// - {string}  "double" or 'single' quoted text, captured without the quotes
// - {int}     optionally signed integer
// - {float}   optionally signed decimal number
// - {word}    run of non-whitespace characters
// - {}        anything
//
// `\{`, `\}` and `\\` escape literal characters. Everything else matches
// literally. Captures are returned as strings, left to right; converting them
// is up to the handler.

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    String,
    Int,
    Float,
    Word,
    Any,
}

impl Placeholder {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Placeholder::String),
            "int" => Some(Placeholder::Int),
            "float" => Some(Placeholder::Float),
            "word" => Some(Placeholder::Word),
            "" => Some(Placeholder::Any),
            _ => None,
        }
    }

    fn regex(&self) -> &'static str {
        match self {
            Placeholder::String => r#"(?:"([^"]*)"|'([^']*)')"#,
            Placeholder::Int => r"(-?\d+)",
            Placeholder::Float => r"(-?\d*\.?\d+)",
            Placeholder::Word => r"(\S+)",
            Placeholder::Any => r"(.*)",
        }
    }

    /// Number of capture groups the regex fragment opens
    fn groups(&self) -> usize {
        match self {
            Placeholder::String => 2,
            _ => 1,
        }
    }
}

/// A compiled step pattern.
///
/// # Example
///
/// ```ignore
/// use stepwright::StepPattern;
///
/// let pattern = StepPattern::parse("user enters {string} into {string}")?;
/// assert_eq!(
///     pattern.captures(r#"user enters "x" into "Email""#),
///     Some(vec!["x".to_string(), "Email".to_string()])
/// );
/// ```
#[derive(Debug, Clone)]
pub struct StepPattern {
    source: String,
    regex: Regex,
    placeholders: Vec<Placeholder>,
}

impl StepPattern {
    /// Compiles a pattern, rejecting unknown placeholders and stray braces
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidStepPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let mut expression = String::from("^");
        let mut literal = String::new();
        let mut placeholders = Vec::new();
        let mut chars = pattern.chars();

        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(escaped) => literal.push(escaped),
                    None => return Err(invalid("trailing backslash".to_string())),
                },
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') => return Err(invalid("nested '{'".to_string())),
                            Some(ch) => name.push(ch),
                            None => return Err(invalid("unclosed '{'".to_string())),
                        }
                    }
                    let placeholder = Placeholder::parse(name.trim()).ok_or_else(|| {
                        invalid(format!("unknown placeholder '{{{name}}}'"))
                    })?;
                    expression.push_str(&regex::escape(&literal));
                    literal.clear();
                    expression.push_str(placeholder.regex());
                    placeholders.push(placeholder);
                }
                '}' => return Err(invalid("unmatched '}'".to_string())),
                other => literal.push(other),
            }
        }
        expression.push_str(&regex::escape(&literal));
        expression.push('$');

        let regex = Regex::new(&expression).map_err(|e| invalid(e.to_string()))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
            placeholders,
        })
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of arguments a match yields
    pub fn arity(&self) -> usize {
        self.placeholders.len()
    }

    /// Matches the whole phrase and returns the captured arguments in order
    pub fn captures(&self, phrase: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(phrase)?;
        let mut args = Vec::with_capacity(self.placeholders.len());
        let mut group = 1;
        for placeholder in &self.placeholders {
            let value = (group..group + placeholder.groups())
                .find_map(|i| caps.get(i))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            args.push(value);
            group += placeholder.groups();
        }
        Some(args)
    }
}

impl fmt::Display for StepPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_captures_in_order() {
        let pattern = StepPattern::parse("user enters {string} into {string}").unwrap();
        assert_eq!(pattern.arity(), 2);
        assert_eq!(
            pattern.captures(r#"user enters "x" into "Email""#),
            Some(vec!["x".to_string(), "Email".to_string()])
        );
        assert_eq!(
            pattern.captures("user enters 'a b' into 'Your Email'"),
            Some(vec!["a b".to_string(), "Your Email".to_string()])
        );
        // Empty strings are valid arguments
        assert_eq!(
            pattern.captures(r#"user enters "" into "Email""#),
            Some(vec![String::new(), "Email".to_string()])
        );
    }

    #[test]
    fn test_requires_full_match() {
        let pattern = StepPattern::parse("user clicks the {string}").unwrap();
        assert!(pattern.captures(r#"user clicks the "Submit" twice"#).is_none());
        assert!(pattern.captures(r#"the user clicks the "Submit""#).is_none());
        assert!(pattern.captures("user clicks the Submit").is_none());
    }

    #[test]
    fn test_numeric_and_word_placeholders() {
        let pattern = StepPattern::parse("user waits {int} seconds for {word} at {float}").unwrap();
        assert_eq!(
            pattern.captures("user waits -3 seconds for login at 0.5"),
            Some(vec!["-3".to_string(), "login".to_string(), "0.5".to_string()])
        );
        assert!(pattern.captures("user waits three seconds for login at 0.5").is_none());
    }

    #[test]
    fn test_literal_text_is_escaped() {
        let pattern = StepPattern::parse("price is ${int}.00 (incl. tax)").unwrap();
        assert_eq!(
            pattern.captures("price is $12.00 (incl. tax)"),
            Some(vec!["12".to_string()])
        );

        let escaped = StepPattern::parse(r"the map \{key\} has {}").unwrap();
        assert_eq!(
            escaped.captures("the map {key} has anything at all"),
            Some(vec!["anything at all".to_string()])
        );
    }

    #[test]
    fn test_invalid_patterns() {
        for bad in ["user sees {colour}", "unclosed {string", "stray } brace", "nested {{int}}"] {
            let err = StepPattern::parse(bad).unwrap_err();
            assert!(
                matches!(err, Error::InvalidStepPattern { .. }),
                "{bad} should be rejected, got {err:?}"
            );
        }
    }
}
