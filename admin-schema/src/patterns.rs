//! Translation of format-validation patterns into a portable `{source, flags}` pair.
//!
//! Model layers declare patterns in the `regex` crate's syntax. Browsers evaluate
//! them with JavaScript's `RegExp`, so leading inline flags move into the flag
//! string and the constructs JavaScript spells differently are rewritten.
//! Constructs JavaScript cannot express at all are rejected rather than emitted
//! with a different meaning.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::PatternError;

static LEADING_FLAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(\?([imsxu]+)\)").expect("static pattern"));

const POSIX_CLASSES: &[(&str, &str)] = &[
    ("[:alnum:]", "a-zA-Z0-9"),
    ("[:alpha:]", "a-zA-Z"),
    ("[:digit:]", "0-9"),
    ("[:lower:]", "a-z"),
    ("[:upper:]", "A-Z"),
    ("[:space:]", r"\s"),
    ("[:word:]", r"\w"),
    ("[:xdigit:]", "0-9A-Fa-f"),
    ("[:punct:]", r"!-/:-@\[-`{-~"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortablePattern {
    pub source: String,
    pub flags: String,
}

#[derive(Default)]
struct Flags {
    ignore_case: bool,
    multi_line: bool,
    dot_all: bool,
    unicode: bool,
    verbose: bool,
}

impl Flags {
    fn render(&self) -> String {
        let mut rendered = String::new();
        if self.ignore_case {
            rendered.push('i');
        }
        if self.multi_line {
            rendered.push('m');
        }
        if self.dot_all {
            rendered.push('s');
        }
        if self.unicode {
            rendered.push('u');
        }
        rendered
    }
}

/// Validates `pattern` and rewrites it for JavaScript.
pub fn to_portable(pattern: &str) -> Result<PortablePattern, PatternError> {
    Regex::new(pattern)?;

    let mut flags = Flags::default();
    let mut rest = pattern;
    while let Some(captures) = LEADING_FLAGS.captures(rest) {
        for flag in captures[1].chars() {
            match flag {
                'i' => flags.ignore_case = true,
                'm' => flags.multi_line = true,
                's' => flags.dot_all = true,
                'x' => flags.verbose = true,
                _ => {}
            }
        }
        rest = &rest[captures[0].len()..];
    }

    let source = rewrite(rest, &mut flags)?;
    Ok(PortablePattern {
        source,
        flags: flags.render(),
    })
}

fn unsupported(construct: &'static str) -> PatternError {
    PatternError::Unsupported { construct }
}

fn rewrite(pattern: &str, flags: &mut Flags) -> Result<String, PatternError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    // Nested classes (`[a[bc]]`) are unions; JavaScript has no nesting, so inner brackets are flattened.
    let mut class_depth = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let in_class = class_depth > 0;
        match ch {
            '\\' => {
                let Some(&next) = chars.get(i + 1) else {
                    out.push(ch);
                    break;
                };
                match next {
                    'A' if !in_class => out.push('^'),
                    'z' if !in_class => out.push('$'),
                    'p' | 'P' => {
                        flags.unicode = true;
                        match chars.get(i + 2) {
                            Some(&class) if class != '{' => {
                                out.push_str(&format!("\\{next}{{{class}}}"));
                                i += 1;
                            }
                            _ => {
                                out.push('\\');
                                out.push(next);
                            }
                        }
                    }
                    _ => {
                        out.push('\\');
                        out.push(next);
                    }
                }
                i += 2;
                continue;
            }
            '[' if in_class => {
                let remaining: String = chars[i..].iter().collect();
                if let Some((posix, replacement)) = POSIX_CLASSES.iter().find(|(posix, _)| remaining.starts_with(posix)) {
                    out.push_str(replacement);
                    i += posix.chars().count();
                    continue;
                }
                match chars.get(i + 1).copied() {
                    Some(':') => return Err(unsupported("a negated or unknown POSIX class")),
                    Some('^') => return Err(unsupported("a negated nested class")),
                    _ => {}
                }
                class_depth += 1;
            }
            '&' | '-' | '~' if in_class && chars.get(i + 1) == Some(&ch) => {
                return Err(unsupported("a class set operation"));
            }
            '[' => {
                class_depth = 1;
                out.push('[');
                // A leading `]` (after an optional `^`) is a literal member of the class.
                if chars.get(i + 1) == Some(&'^') {
                    out.push('^');
                    i += 1;
                }
                if chars.get(i + 1) == Some(&']') {
                    out.push_str("\\]");
                    i += 1;
                }
            }
            ']' if in_class => {
                class_depth -= 1;
                if class_depth == 0 {
                    out.push(']');
                }
            }
            '(' if !in_class && chars.get(i + 1) == Some(&'?') => match chars.get(i + 2).copied() {
                Some('P') => {
                    out.push_str("(?");
                    i += 3;
                    continue;
                }
                Some(':' | '<') => out.push('('),
                _ => return Err(unsupported("an inline flag group")),
            },
            '#' if flags.verbose && !in_class => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            c if flags.verbose && !in_class && c.is_whitespace() => {}
            c => out.push(c),
        }
        i += 1;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portable(pattern: &str) -> (String, String) {
        let translated = to_portable(pattern).unwrap();
        (translated.source, translated.flags)
    }

    #[test]
    fn leading_flags_become_js_flags() {
        assert_eq!(portable("(?i)^[a-z]+$"), ("^[a-z]+$".into(), "i".into()));
        assert_eq!(portable("(?im)^a$"), ("^a$".into(), "im".into()));
        assert_eq!(portable("(?s)(?i)a.b"), ("a.b".into(), "is".into()));
    }

    #[test]
    fn absolute_anchors_are_rewritten() {
        assert_eq!(portable(r"\A\d{5}\z"), (r"^\d{5}$".into(), String::new()));
    }

    #[test]
    fn named_groups_and_unicode_classes() {
        assert_eq!(portable(r"(?P<year>\d{4})"), (r"(?<year>\d{4})".into(), String::new()));
        assert_eq!(portable(r"\pL+"), (r"\p{L}+".into(), "u".into()));
        assert_eq!(portable(r"\p{Greek}"), (r"\p{Greek}".into(), "u".into()));
    }

    #[test]
    fn posix_classes_expand_inside_brackets() {
        assert_eq!(portable("[[:alpha:]_]+"), ("[a-zA-Z_]+".into(), String::new()));
        assert_eq!(portable("[^[:digit:]]"), ("[^0-9]".into(), String::new()));
    }

    #[test]
    fn nested_classes_are_flattened() {
        assert_eq!(portable("[a[0-9]]"), ("[a0-9]".into(), String::new()));
    }

    #[test]
    fn verbose_mode_strips_whitespace_and_comments() {
        let pattern = "(?x)\n  ^\\d{3}  # area\n  -\\d{4}$\n";
        assert_eq!(portable(pattern), (r"^\d{3}-\d{4}$".into(), String::new()));
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        assert!(matches!(to_portable("(unclosed"), Err(PatternError::Invalid(_))));
    }

    #[test]
    fn groups_without_flags_are_kept() {
        assert_eq!(portable("(?:ab)+c"), ("(?:ab)+c".into(), String::new()));
        assert_eq!(portable(r"(?<day>\d{2})"), (r"(?<day>\d{2})".into(), String::new()));
        assert_eq!(portable(r"\(?i\)"), (r"\(?i\)".into(), String::new()));
    }

    #[test]
    fn untranslatable_constructs_are_rejected() {
        for pattern in [
            "abc(?i)def",
            "(?i:ab)c",
            "x(?-i:ab)",
            "(?U)a+",
            "[a-z&&[^aeiou]]",
            "[a-z--[aeiou]]",
            "[a-c~~b-d]",
            "[a[^0-9]]",
            "[[:^alpha:]]",
        ] {
            assert!(
                matches!(to_portable(pattern), Err(PatternError::Unsupported { .. })),
                "{pattern} should be rejected"
            );
        }
    }
}
