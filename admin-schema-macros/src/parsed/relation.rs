use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Result, meta::ParseNestedMeta};

use super::parse_string_value;

#[derive(Clone, Copy, PartialEq)]
pub(crate) enum RelationKind {
    BelongsTo,
    HasOne,
    HasMany,
    HasManyThrough,
    ManyToMany,
}

impl RelationKind {
    pub(crate) fn from_ident(meta: &ParseNestedMeta) -> Option<Self> {
        let path = &meta.path;
        if path.is_ident("belongs_to") {
            Some(Self::BelongsTo)
        } else if path.is_ident("has_one") {
            Some(Self::HasOne)
        } else if path.is_ident("has_many") {
            Some(Self::HasMany)
        } else if path.is_ident("many_to_many") {
            Some(Self::ManyToMany)
        } else {
            None
        }
    }
}

pub(crate) struct ParsedRelation {
    name: Option<String>,
    kind: RelationKind,
    target: Option<String>,
    foreign_key: Option<String>,
    polymorphic: bool,
    optional: bool,
    as_name: Option<String>,
    through: Option<String>,
}

impl ParsedRelation {
    /// Parses `kind(name = "...", target = "...", ...)`.
    ///
    /// On a field, `field_name` is the foreign-key column; the relation name then
    /// defaults to the column without its `_id` suffix.
    pub(crate) fn parse(meta: &ParseNestedMeta, kind: RelationKind, field_name: Option<&str>) -> Result<Self> {
        let mut relation = ParsedRelation {
            name: None,
            kind,
            target: None,
            foreign_key: None,
            polymorphic: false,
            optional: false,
            as_name: None,
            through: None,
        };

        meta.parse_nested_meta(|nested| {
            if nested.path.is_ident("name") {
                relation.name = Some(parse_string_value(&nested)?);
            } else if nested.path.is_ident("target") {
                relation.target = Some(parse_string_value(&nested)?);
            } else if nested.path.is_ident("foreign_key") {
                relation.foreign_key = Some(parse_string_value(&nested)?);
            } else if nested.path.is_ident("through") {
                relation.through = Some(parse_string_value(&nested)?);
                relation.kind = RelationKind::HasManyThrough;
            } else if nested.path.is_ident("as") {
                relation.as_name = Some(parse_string_value(&nested)?);
            } else if nested.path.is_ident("polymorphic") {
                relation.polymorphic = true;
            } else if nested.path.is_ident("optional") {
                relation.optional = true;
            } else {
                return Err(nested.error(
                    "unknown relation option, expected name, target, foreign_key, through, as, polymorphic, or optional",
                ));
            }
            Ok(())
        })?;

        if let Some(field_name) = field_name {
            if kind != RelationKind::BelongsTo {
                return Err(meta.error("only belongs_to can be declared on a field; declare other relations on the struct"));
            }
            relation.foreign_key.get_or_insert_with(|| field_name.to_string());
            if relation.name.is_none() {
                relation.name = Some(field_name.strip_suffix("_id").unwrap_or(field_name).to_string());
            }
        }

        if relation.name.is_none() {
            return Err(meta.error("relation requires `name = \"...\"`"));
        }
        if relation.through.is_some() && kind != RelationKind::HasMany {
            return Err(meta.error("`through` is only supported on has_many"));
        }
        if relation.polymorphic && kind == RelationKind::BelongsTo {
            if relation.target.is_some() {
                return Err(meta.error("a polymorphic belongs_to cannot name a target"));
            }
        } else if relation.target.is_none() {
            return Err(meta.error("relation requires `target = \"...\"`"));
        }

        Ok(relation)
    }

    pub(crate) fn to_tokens(&self) -> TokenStream2 {
        let name = self.name.as_deref().unwrap_or_default();
        let kind = match self.kind {
            RelationKind::BelongsTo => quote!(BelongsTo),
            RelationKind::HasOne => quote!(HasOne),
            RelationKind::HasMany => quote!(HasMany),
            RelationKind::HasManyThrough => quote!(HasManyThrough),
            RelationKind::ManyToMany => quote!(ManyToMany),
        };
        let target = optional_string(&self.target);
        let foreign_key = optional_string(&self.foreign_key);
        let as_name = optional_string(&self.as_name);
        let through = optional_string(&self.through);
        let polymorphic = self.polymorphic;
        let optional = self.optional;

        quote! {
            ::admin_schema::types::RelationDescriptor {
                name: #name.to_string(),
                kind: ::admin_schema::types::RelationKind::#kind,
                target: #target,
                foreign_key: #foreign_key,
                polymorphic: #polymorphic,
                optional: #optional,
                as_name: #as_name,
                through: #through,
            }
        }
    }
}

pub(crate) fn optional_string(value: &Option<String>) -> TokenStream2 {
    match value {
        Some(value) => quote!(::core::option::Option::Some(#value.to_string())),
        None => quote!(::core::option::Option::None),
    }
}
