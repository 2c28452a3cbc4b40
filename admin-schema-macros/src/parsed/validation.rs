use proc_macro2::{Literal, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::{Lit, LitInt, LitStr, Result, meta::ParseNestedMeta};

use super::{ensure_valid_regex, parse_string_list};

pub(crate) enum ParsedValidation {
    Presence,
    Length {
        min: Option<u64>,
        max: Option<u64>,
        is: Option<u64>,
    },
    Format {
        pattern: String,
    },
    Inclusion {
        values: Vec<String>,
    },
    Numericality {
        bounds: Vec<(String, NumericLiteral)>,
        flags: Vec<String>,
    },
    /// Accepted for documentation; the admin UI cannot check it client-side.
    Uniqueness,
}

pub(crate) enum NumericLiteral {
    Int(i64),
    Float(f64),
}

const NUMERIC_BOUNDS: &[&str] = &[
    "greater_than",
    "greater_than_or_equal_to",
    "equal_to",
    "less_than",
    "less_than_or_equal_to",
    "other_than",
];

const NUMERIC_FLAGS: &[&str] = &["only_integer", "odd", "even"];

/// Parses one rule inside `validate(...)`.
pub(crate) fn parse_rule(rule: ParseNestedMeta) -> Result<ParsedValidation> {
    if rule.path.is_ident("presence") {
        Ok(ParsedValidation::Presence)
    } else if rule.path.is_ident("uniqueness") {
        Ok(ParsedValidation::Uniqueness)
    } else if rule.path.is_ident("format") {
        let value: LitStr = rule.value()?.parse()?;
        ensure_valid_regex(&value.value(), value.span())?;
        Ok(ParsedValidation::Format { pattern: value.value() })
    } else if rule.path.is_ident("inclusion") {
        let values = parse_string_list(&rule)?;
        if values.is_empty() {
            return Err(rule.error("inclusion requires at least one value"));
        }
        Ok(ParsedValidation::Inclusion { values })
    } else if rule.path.is_ident("length") {
        let (mut min, mut max, mut is) = (None, None, None);
        rule.parse_nested_meta(|bound| {
            let value: LitInt = bound.value()?.parse()?;
            let value = value.base10_parse::<u64>()?;
            if bound.path.is_ident("min") {
                min = Some(value);
            } else if bound.path.is_ident("max") {
                max = Some(value);
            } else if bound.path.is_ident("is") {
                is = Some(value);
            } else {
                return Err(bound.error("unknown length bound, expected min, max, or is"));
            }
            Ok(())
        })?;
        if let (Some(min), Some(max)) = (min, max)
            && min > max
        {
            return Err(rule.error("length min must not exceed max"));
        }
        Ok(ParsedValidation::Length { min, max, is })
    } else if rule.path.is_ident("numericality") {
        let mut bounds = Vec::new();
        let mut flags = Vec::new();
        if rule.input.peek(syn::token::Paren) {
            rule.parse_nested_meta(|option| {
                let Some(ident) = option.path.get_ident().map(ToString::to_string) else {
                    return Err(option.error("expected a numericality option"));
                };
                if NUMERIC_FLAGS.contains(&ident.as_str()) {
                    flags.push(ident);
                } else if NUMERIC_BOUNDS.contains(&ident.as_str()) {
                    let input = option.value()?;
                    let sign = if input.peek(syn::Token![-]) {
                        input.parse::<syn::Token![-]>()?;
                        -1
                    } else {
                        1
                    };
                    let literal = match input.parse::<Lit>()? {
                        Lit::Int(int) => NumericLiteral::Int(sign * int.base10_parse::<i64>()?),
                        Lit::Float(float) => NumericLiteral::Float(sign as f64 * float.base10_parse::<f64>()?),
                        other => return Err(syn::Error::new(other.span(), "expected a numeric literal")),
                    };
                    bounds.push((ident, literal));
                } else {
                    return Err(option.error(format!("unknown numericality option `{ident}`")));
                }
                Ok(())
            })?;
        }
        Ok(ParsedValidation::Numericality { bounds, flags })
    } else {
        Err(rule.error("unknown validation rule, expected presence, length, format, inclusion, numericality, or uniqueness"))
    }
}

impl ParsedValidation {
    pub(crate) fn to_tokens(&self, attribute: &str) -> TokenStream2 {
        let rule = match self {
            ParsedValidation::Presence => quote!(::admin_schema::types::ValidationRule::Presence),
            ParsedValidation::Uniqueness => quote!(::admin_schema::types::ValidationRule::Other),
            ParsedValidation::Format { pattern } => quote! {
                ::admin_schema::types::ValidationRule::Format { pattern: #pattern.to_string() }
            },
            ParsedValidation::Inclusion { values } => quote! {
                ::admin_schema::types::ValidationRule::Inclusion {
                    values: vec![#(::admin_schema::serde_json::Value::from(#values)),*],
                }
            },
            ParsedValidation::Length { min, max, is } => {
                let minimum = optional_u64(*min);
                let maximum = optional_u64(*max);
                let is = optional_u64(*is);
                quote! {
                    ::admin_schema::types::ValidationRule::Length { minimum: #minimum, maximum: #maximum, is: #is }
                }
            }
            ParsedValidation::Numericality { bounds, flags } => {
                let bound_inits = bounds.iter().map(|(name, literal)| {
                    let field = format_ident!("{}", name);
                    let number = match literal {
                        NumericLiteral::Int(value) => {
                            let value = Literal::i64_suffixed(*value);
                            quote!(::core::option::Option::Some(::admin_schema::serde_json::Number::from(#value)))
                        }
                        NumericLiteral::Float(value) => {
                            let value = Literal::f64_suffixed(*value);
                            quote!(::admin_schema::serde_json::Number::from_f64(#value))
                        }
                    };
                    quote!(#field: #number,)
                });
                let flag_inits = flags.iter().map(|flag| {
                    let field = format_ident!("{}", flag);
                    quote!(#field: true,)
                });
                quote! {
                    ::admin_schema::types::ValidationRule::Numericality(::admin_schema::types::NumericConstraints {
                        #(#bound_inits)*
                        #(#flag_inits)*
                        ..::core::default::Default::default()
                    })
                }
            }
        };

        quote! {
            ::admin_schema::types::ValidationDescriptor {
                attributes: vec![#attribute.to_string()],
                rule: #rule,
            }
        }
    }
}

fn optional_u64(value: Option<u64>) -> TokenStream2 {
    match value {
        Some(value) => {
            let value = Literal::u64_suffixed(value);
            quote!(::core::option::Option::Some(#value))
        }
        None => quote!(::core::option::Option::None),
    }
}
