use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod naming;
mod parsed;

use parsed::ParsedModel;

/// Registers a struct as a persistence model visible to `admin-schema`.
///
/// Emits an `admin_schema::types::ModelMetadata` impl and submits an
/// `admin_schema::ModelRegistration` to `inventory`, so the model is served by
/// `InventoryProvider` without further wiring.
///
/// ```text
/// #[derive(AdminModel, Default, Serialize)]
/// #[admin(table = "posts", defaults, has_many(name = "comments", target = "Comment"), scopes("published"))]
/// struct Post {
///     #[admin(primary_key)]
///     id: i64,
///     #[admin(validate(presence, length(min = 3, max = 120)))]
///     title: String,
///     #[admin(enum_values("draft", "published"), default = "draft")]
///     status: String,
///     #[admin(belongs_to(target = "User"))]
///     author_id: i64,
/// }
/// ```
#[proc_macro_derive(AdminModel, attributes(admin))]
pub fn derive_admin_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ParsedModel::from_input(&input) {
        Ok(parsed) => parsed.emit().into(),
        Err(err) => err.to_compile_error().into(),
    }
}
