//! Text transforms used to turn class, relation and column names into schema labels.

const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("mouse", "mice"),
];

const UNCOUNTABLE: &[&str] = &["equipment", "information", "money", "news", "series", "species", "data", "metadata"];

/// Strips the namespace from a class name: `Blog::Post` -> `Post`.
pub fn demodulize(class_name: &str) -> &str {
    class_name.rsplit("::").next().unwrap_or(class_name)
}

/// Converts a PascalCase (optionally namespaced) name to snake_case.
///
/// Namespace separators become `/`, and acronym runs stay together:
/// `Admin::HTTPRequest` -> `admin/http_request`.
pub fn underscore(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    let chars: Vec<char> = name.replace("::", "/").chars().collect();
    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else if ch == '-' || ch == ' ' {
            result.push('_');
        } else {
            result.push(ch);
        }
    }
    result
}

/// Pluralizes the last word of a snake_case or spaced phrase.
pub fn pluralize(word: &str) -> String {
    let split_at = word.rfind(['_', ' ', '/']).map(|idx| idx + 1).unwrap_or(0);
    let (head, last) = word.split_at(split_at);
    format!("{head}{}", pluralize_word(last))
}

fn pluralize_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if word.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR_PLURALS.iter().find(|(singular, _)| *singular == lower) {
        return match_case(word, plural);
    }
    if word.ends_with('s') || word.ends_with('x') || word.ends_with('z') || word.ends_with("ch") || word.ends_with("sh") {
        format!("{word}es")
    } else if word.ends_with('y') && !word.ends_with("ay") && !word.ends_with("ey") && !word.ends_with("oy") && !word.ends_with("uy") {
        format!("{}ies", &word[..word.len() - 1])
    } else {
        format!("{word}s")
    }
}

fn match_case(original: &str, replacement: &str) -> String {
    if original.chars().next().is_some_and(char::is_uppercase) {
        capitalize(replacement)
    } else {
        replacement.to_string()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Turns an attribute name into a sentence-cased label.
///
/// A trailing `_id` is dropped and underscores become spaces: `author_id` -> `Author`,
/// `created_at` -> `Created at`.
pub fn humanize(name: &str) -> String {
    let trimmed = name.strip_suffix("_id").filter(|rest| !rest.is_empty()).unwrap_or(name);
    let spaced = trimmed.trim_start_matches('_').replace('_', " ");
    capitalize(&spaced.to_lowercase())
}

/// Capitalizes every word of a humanized phrase.
pub fn titleize(name: &str) -> String {
    humanize(&underscore(name))
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Plural, title-cased label for a model class: `Blog::BlogPost` -> `Blog Posts`.
pub fn model_display_name(class_name: &str) -> String {
    titleize(&pluralize(&underscore(demodulize(class_name))))
}

/// URL-safe identifier for a model class: `Blog::BlogPost` -> `blog__blog_posts`.
pub fn slugify(class_name: &str) -> String {
    pluralize(&underscore(class_name)).replace('/', "__")
}
