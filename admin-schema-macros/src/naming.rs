const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("mouse", "mice"),
];

const UNCOUNTABLE: &[&str] = &["equipment", "information", "money", "news", "series", "species", "data", "metadata"];

/// `BlogPost` -> `blog_post`; acronym runs stay together: `HTTPRequest` -> `http_request`.
pub(crate) fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);
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
        } else {
            result.push(ch);
        }
    }
    result
}

/// Pluralizes the last word of a snake_case name.
pub(crate) fn pluralize(word: &str) -> String {
    let split_at = word.rfind('_').map(|idx| idx + 1).unwrap_or(0);
    let (head, last) = word.split_at(split_at);
    if last.is_empty() || UNCOUNTABLE.contains(&last) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR_PLURALS.iter().find(|(singular, _)| *singular == last) {
        return format!("{head}{plural}");
    }
    if last.ends_with('s') || last.ends_with('x') || last.ends_with('z') || last.ends_with("ch") || last.ends_with("sh") {
        format!("{word}es")
    } else if last.ends_with('y')
        && !last.ends_with("ay")
        && !last.ends_with("ey")
        && !last.ends_with("oy")
        && !last.ends_with("uy")
    {
        format!("{}ies", &word[..word.len() - 1])
    } else {
        format!("{word}s")
    }
}

/// Conventional table name of a struct: `BlogPost` -> `blog_posts`.
pub(crate) fn table_name(type_name: &str) -> String {
    pluralize(&to_snake_case(type_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acronym_runs_stay_together() {
        assert_eq!(to_snake_case("BlogPost"), "blog_post");
        assert_eq!(to_snake_case("HTTPRequest"), "http_request");
        assert_eq!(to_snake_case("Oauth2Token"), "oauth2_token");
        assert_eq!(to_snake_case("NaiveDateTime"), "naive_date_time");
    }

    #[test]
    fn table_names_follow_library_pluralization() {
        assert_eq!(table_name("BlogPost"), "blog_posts");
        assert_eq!(table_name("HTTPRequest"), "http_requests");
        assert_eq!(table_name("Buzz"), "buzzes");
        assert_eq!(table_name("Category"), "categories");
        assert_eq!(table_name("SalesPerson"), "sales_people");
        assert_eq!(table_name("News"), "news");
    }
}
