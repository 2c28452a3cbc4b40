mod field;
mod model;
mod relation;
mod sql_type;
mod validation;

pub(crate) use model::ParsedModel;

use proc_macro2::Span;
use syn::{Error, LitStr, Result, meta::ParseNestedMeta, punctuated::Punctuated};

/// Parses `name("a", "b", ...)`.
fn parse_string_list(meta: &ParseNestedMeta) -> Result<Vec<String>> {
    let content;
    syn::parenthesized!(content in meta.input);
    let values: Punctuated<LitStr, syn::Token![,]> = content.parse_terminated(<LitStr as syn::parse::Parse>::parse, syn::Token![,])?;
    Ok(values.into_iter().map(|lit| lit.value()).collect())
}

fn parse_string_value(meta: &ParseNestedMeta) -> Result<String> {
    let value: LitStr = meta.value()?.parse()?;
    Ok(value.value())
}

fn ensure_valid_regex(pattern: &str, span: Span) -> Result<()> {
    regex::Regex::new(pattern)
        .map(|_| ())
        .map_err(|err| Error::new(span, format!("invalid regex pattern: {}", err)))
}
