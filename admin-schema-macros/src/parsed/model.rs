use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Error, Fields, Ident, LitStr, Result};

use super::field::ParsedField;
use super::relation::{ParsedRelation, RelationKind};
use super::{parse_string_list, parse_string_value};
use crate::naming;

pub(crate) struct ParsedModel {
    name: Ident,
    class_name: String,
    table_name: String,
    primary_key: Option<String>,
    is_abstract: bool,
    admin_layer: bool,
    defaults: bool,
    relations: Vec<ParsedRelation>,
    scopes: Vec<String>,
    fields: Vec<ParsedField>,
}

#[derive(Default)]
struct ContainerAttrs {
    class_name: Option<String>,
    table_name: Option<String>,
    primary_key: Option<String>,
    is_abstract: bool,
    admin_layer: bool,
    defaults: bool,
    relations: Vec<ParsedRelation>,
    scopes: Vec<String>,
}

impl ParsedModel {
    pub(crate) fn from_input(input: &DeriveInput) -> Result<Self> {
        if !input.generics.params.is_empty() {
            return Err(Error::new_spanned(&input.generics, "AdminModel cannot be derived for generic structs"));
        }

        let mut container = ContainerAttrs::default();
        for attr in &input.attrs {
            if attr.path().is_ident("admin") {
                Self::parse_container_attr(attr, &mut container)?;
            }
        }

        let fields = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => {
                    let mut parsed = Vec::new();
                    for field in &named.named {
                        parsed.push(ParsedField::from_field(field)?);
                    }
                    parsed
                }
                _ => return Err(Error::new(input.ident.span(), "AdminModel requires named fields")),
            },
            _ => return Err(Error::new(input.ident.span(), "AdminModel can only be derived for structs")),
        };

        let fields: Vec<ParsedField> = fields.into_iter().filter(|field| !field.skip).collect();
        let primary_key = Self::resolve_primary_key(&input.ident, &fields, container.primary_key)?;

        let type_name = input.ident.to_string();
        Ok(Self {
            name: input.ident.clone(),
            class_name: container.class_name.unwrap_or_else(|| type_name.clone()),
            table_name: container.table_name.unwrap_or_else(|| naming::table_name(&type_name)),
            primary_key,
            is_abstract: container.is_abstract,
            admin_layer: container.admin_layer,
            defaults: container.defaults,
            relations: container.relations,
            scopes: container.scopes,
            fields,
        })
    }

    fn parse_container_attr(attr: &Attribute, container: &mut ContainerAttrs) -> Result<()> {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("class_name") {
                container.class_name = Some(parse_string_value(&meta)?);
            } else if meta.path.is_ident("table") {
                container.table_name = Some(parse_string_value(&meta)?);
            } else if meta.path.is_ident("primary_key") {
                container.primary_key = Some(parse_string_value(&meta)?);
            } else if meta.path.is_ident("abstract_model") {
                container.is_abstract = true;
            } else if meta.path.is_ident("defaults") {
                container.defaults = true;
            } else if meta.path.is_ident("layer") {
                let value: LitStr = meta.value()?.parse()?;
                container.admin_layer = match value.value().as_str() {
                    "admin" => true,
                    "application" => false,
                    other => {
                        return Err(Error::new(
                            value.span(),
                            format!("unknown layer `{other}`, expected admin or application"),
                        ));
                    }
                };
            } else if meta.path.is_ident("scopes") {
                container.scopes.extend(parse_string_list(&meta)?);
            } else if let Some(kind) = RelationKind::from_ident(&meta) {
                container.relations.push(ParsedRelation::parse(&meta, kind, None)?);
            } else {
                return Err(meta.error(
                    "unknown model attribute, expected class_name, table, primary_key, abstract_model, layer, \
                     defaults, scopes, belongs_to, has_one, has_many, or many_to_many",
                ));
            }
            Ok(())
        })
    }

    /// `#[admin(primary_key)]` on a field, else the container's `primary_key = "..."`,
    /// else a field named `id`.
    fn resolve_primary_key(name: &Ident, fields: &[ParsedField], declared: Option<String>) -> Result<Option<String>> {
        let mut marked = fields.iter().filter(|field| field.is_primary_key);
        let from_field = marked.next().map(|field| field.column.clone());
        if marked.next().is_some() {
            return Err(Error::new(name.span(), "AdminModel allows exactly one #[admin(primary_key)] field"));
        }
        match (from_field, declared) {
            (Some(_), Some(_)) => Err(Error::new(
                name.span(),
                "primary key declared both on the struct and on a field",
            )),
            (Some(column), None) | (None, Some(column)) => Ok(Some(column)),
            (None, None) => Ok(fields.iter().any(|field| field.column == "id").then(|| "id".to_string())),
        }
    }

    pub(crate) fn emit(&self) -> TokenStream2 {
        let name = &self.name;
        let type_name = LitStr::new(&name.to_string(), Span::call_site());
        let class_name = &self.class_name;
        let table_name = &self.table_name;
        let primary_key = super::relation::optional_string(&self.primary_key);
        let is_abstract = self.is_abstract;
        let layer = if self.admin_layer {
            quote!(::admin_schema::types::ModelLayer::Admin)
        } else {
            quote!(::admin_schema::types::ModelLayer::Application)
        };

        let columns = self.fields.iter().map(ParsedField::column_tokens);
        let relations = self
            .fields
            .iter()
            .filter_map(|field| field.belongs_to.as_ref())
            .chain(&self.relations)
            .map(ParsedRelation::to_tokens);
        let enums = self.fields.iter().filter_map(ParsedField::enum_tokens);
        let validations = self.fields.iter().flat_map(|field| field.validation_tokens());
        let scopes = &self.scopes;
        let blank_instance = if self.defaults {
            quote!(::core::option::Option::Some(::admin_schema::types::blank_instance_of::<#name>))
        } else {
            quote!(::core::option::Option::None)
        };

        quote! {
            impl ::admin_schema::types::ModelMetadata for #name {
                fn model_definition() -> ::admin_schema::types::ModelDefinition {
                    ::admin_schema::types::ModelDefinition {
                        class_name: #class_name.to_string(),
                        table_name: #table_name.to_string(),
                        primary_key: #primary_key,
                        is_abstract: #is_abstract,
                        layer: #layer,
                        columns: vec![#(#columns),*],
                        relations: vec![#(#relations),*],
                        enums: vec![#(#enums),*],
                        scopes: vec![#(#scopes.to_string()),*],
                        validations: vec![#(#validations),*],
                        blank_instance: #blank_instance,
                    }
                }
            }

            ::admin_schema::inventory::submit! {
                ::admin_schema::ModelRegistration::new(
                    #type_name,
                    #class_name,
                    <#name as ::admin_schema::types::ModelMetadata>::model_definition,
                )
            }
        }
    }
}
