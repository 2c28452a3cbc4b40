use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Error, Field, Lit, Result, spanned::Spanned};

use super::relation::{ParsedRelation, RelationKind};
use super::validation::{ParsedValidation, parse_rule};
use super::{parse_string_list, parse_string_value, sql_type};

pub(crate) struct ParsedField {
    pub column: String,
    pub sql_type: String,
    pub array: bool,
    pub nullable: bool,
    pub default: Option<Lit>,
    pub is_primary_key: bool,
    pub skip: bool,
    pub belongs_to: Option<ParsedRelation>,
    pub enum_values: Option<Vec<String>>,
    pub validations: Vec<ParsedValidation>,
}

impl ParsedField {
    pub(crate) fn from_field(field: &Field) -> Result<Self> {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "AdminModel requires named fields"))?;
        let inferred = sql_type::infer(&field.ty);

        let mut parsed = ParsedField {
            column: ident.to_string().trim_start_matches("r#").to_string(),
            sql_type: inferred.sql_type,
            array: inferred.array,
            nullable: inferred.nullable,
            default: None,
            is_primary_key: false,
            skip: false,
            belongs_to: None,
            enum_values: None,
            validations: Vec::new(),
        };

        for attr in &field.attrs {
            if attr.path().is_ident("admin") {
                parsed.parse_field_attr(attr)?;
            }
        }

        Ok(parsed)
    }

    fn parse_field_attr(&mut self, attr: &Attribute) -> Result<()> {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("primary_key") {
                self.is_primary_key = true;
            } else if meta.path.is_ident("skip") {
                self.skip = true;
            } else if meta.path.is_ident("column") {
                self.column = parse_string_value(&meta)?;
            } else if meta.path.is_ident("sql_type") {
                self.sql_type = parse_string_value(&meta)?;
            } else if meta.path.is_ident("default") {
                let value: Lit = meta.value()?.parse()?;
                if !matches!(value, Lit::Str(_) | Lit::Int(_) | Lit::Float(_) | Lit::Bool(_)) {
                    return Err(Error::new(value.span(), "default must be a string, integer, float, or bool literal"));
                }
                self.default = Some(value);
            } else if meta.path.is_ident("enum_values") {
                let values = parse_string_list(&meta)?;
                if values.is_empty() {
                    return Err(meta.error("enum_values requires at least one value"));
                }
                self.enum_values = Some(values);
            } else if meta.path.is_ident("validate") {
                meta.parse_nested_meta(|rule| {
                    self.validations.push(parse_rule(rule)?);
                    Ok(())
                })?;
            } else if let Some(kind) = RelationKind::from_ident(&meta) {
                if self.belongs_to.is_some() {
                    return Err(meta.error("field already declares a relation"));
                }
                let column = self.column.clone();
                self.belongs_to = Some(ParsedRelation::parse(&meta, kind, Some(&column))?);
            } else {
                return Err(meta.error(
                    "unknown field attribute, expected primary_key, skip, column, sql_type, default, enum_values, \
                     validate, or belongs_to",
                ));
            }
            Ok(())
        })
    }

    pub(crate) fn column_tokens(&self) -> TokenStream2 {
        let name = &self.column;
        let sql_type = &self.sql_type;
        let array = self.array;
        let null = self.nullable;
        let default = match &self.default {
            Some(lit) => quote!(::core::option::Option::Some(::admin_schema::serde_json::Value::from(#lit))),
            None => quote!(::core::option::Option::None),
        };

        quote! {
            ::admin_schema::types::ColumnDescriptor {
                name: #name.to_string(),
                sql_type: #sql_type.to_string(),
                array: #array,
                null: #null,
                default: #default,
            }
        }
    }

    pub(crate) fn enum_tokens(&self) -> Option<TokenStream2> {
        let values = self.enum_values.as_ref()?;
        let attribute = &self.column;
        Some(quote! {
            ::admin_schema::types::EnumDescriptor {
                attribute: #attribute.to_string(),
                values: vec![#(#values.to_string()),*],
            }
        })
    }

    pub(crate) fn validation_tokens(&self) -> impl Iterator<Item = TokenStream2> + '_ {
        self.validations.iter().map(|validation| validation.to_tokens(&self.column))
    }
}
