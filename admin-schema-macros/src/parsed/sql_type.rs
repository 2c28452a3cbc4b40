use syn::{GenericArgument, PathArguments, Type, TypePath};

use crate::naming::to_snake_case;

/// Storage shape inferred from a field's Rust type.
pub(super) struct InferredColumn {
    pub sql_type: String,
    pub nullable: bool,
    pub array: bool,
}

pub(super) fn infer(ty: &Type) -> InferredColumn {
    if let Some(inner) = generic_argument(ty, "Option") {
        let mut column = infer(inner);
        column.nullable = true;
        return column;
    }

    if let Some(inner) = generic_argument(ty, "Vec") {
        if last_ident(inner).as_deref() == Some("u8") {
            return InferredColumn {
                sql_type: "bytea".to_string(),
                nullable: false,
                array: false,
            };
        }
        let element = infer(inner);
        return InferredColumn {
            sql_type: element.sql_type,
            nullable: false,
            array: true,
        };
    }

    InferredColumn {
        sql_type: scalar_sql_type(ty),
        nullable: false,
        array: false,
    }
}

fn scalar_sql_type(ty: &Type) -> String {
    let Some(ident) = last_ident(ty) else {
        return "string".to_string();
    };
    let sql_type = match ident.as_str() {
        "i8" | "i16" | "u8" => "smallint",
        "i32" | "u16" => "integer",
        "i64" | "u32" | "u64" | "i128" | "u128" | "isize" | "usize" => "bigint",
        "f32" => "real",
        "f64" => "double precision",
        "bool" => "boolean",
        "String" | "str" => "character varying",
        "char" => "character",
        "NaiveDate" => "date",
        "NaiveTime" => "time",
        "DateTime" | "NaiveDateTime" | "SystemTime" | "OffsetDateTime" | "PrimitiveDateTime" => "timestamp",
        "Uuid" => "uuid",
        "Decimal" => "numeric",
        "Value" | "Map" | "HashMap" | "BTreeMap" => "jsonb",
        other => return to_snake_case(other),
    };
    sql_type.to_string()
}

fn type_path(ty: &Type) -> Option<&TypePath> {
    match ty {
        Type::Path(path) => Some(path),
        Type::Reference(reference) => type_path(&reference.elem),
        Type::Group(group) => type_path(&group.elem),
        Type::Paren(paren) => type_path(&paren.elem),
        _ => None,
    }
}

fn last_ident(ty: &Type) -> Option<String> {
    type_path(ty)
        .and_then(|path| path.path.segments.last())
        .map(|segment| segment.ident.to_string())
}

/// `T` when `ty` is `wrapper<T>` (matched on the last path segment).
fn generic_argument<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let segment = type_path(ty)?.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        return None;
    };
    arguments.args.iter().find_map(|argument| match argument {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    })
}
