//! Models declared with `#[derive(AdminModel)]` and served through inventory.

#![allow(dead_code)]

use admin_schema::types::{ModelLayer, ModelMetadata, RelationKind, ValidationRule};
use admin_schema::{
    AccessType, AdminModel, InventoryProvider, MetadataProvider, SchemaCatalog, ValidatorSpec, registered_models,
};
use serde::Serialize;
use serde_json::json;

#[derive(AdminModel)]
struct Author {
    id: i64,
    #[admin(validate(presence, length(max = 80)))]
    name: String,
    email: Option<String>,
    #[admin(sql_type = "jsonb")]
    preferences: String,
}

#[derive(AdminModel, Serialize)]
#[admin(
    class_name = "Blog::Post",
    defaults,
    has_many(name = "notes", target = "Blog::Note", as = "notable"),
    has_one(name = "cover_attachment", target = "Storage::Attachment"),
    scopes("published", "with_attached_cover")
)]
struct BlogPost {
    #[admin(primary_key)]
    id: i64,
    #[admin(validate(presence, format = "(?i)^[a-z ]+$"))]
    title: String,
    #[admin(enum_values("draft", "published"), default = "draft")]
    status: String,
    tags: Vec<String>,
    #[admin(belongs_to(target = "Author"))]
    author_id: i64,
    #[admin(belongs_to(name = "editor", target = "Author", optional))]
    editor_id: Option<i64>,
    #[admin(validate(numericality(greater_than_or_equal_to = 0, only_integer)))]
    word_count: i32,
    #[admin(skip)]
    cached_html: String,
}

impl Default for BlogPost {
    fn default() -> Self {
        Self {
            id: 0,
            title: String::new(),
            status: "draft".to_string(),
            tags: Vec::new(),
            author_id: 0,
            editor_id: None,
            word_count: 0,
            cached_html: String::new(),
        }
    }
}

#[derive(AdminModel)]
#[admin(class_name = "Blog::Note", belongs_to(name = "notable", polymorphic))]
struct Note {
    id: i64,
    body: String,
    notable_id: i64,
    notable_type: String,
}

#[derive(AdminModel)]
#[admin(class_name = "Admin::Setting", layer = "admin")]
struct Setting {
    id: i64,
    key: String,
}

#[derive(AdminModel)]
#[admin(abstract_model)]
struct Record {
    id: i64,
}

#[test]
fn derive_emits_model_definition() {
    let definition = BlogPost::model_definition();
    assert_eq!(definition.class_name, "Blog::Post");
    assert_eq!(definition.table_name, "blog_posts");
    assert_eq!(definition.primary_key.as_deref(), Some("id"));
    assert_eq!(definition.scopes, ["published", "with_attached_cover"]);

    let columns: Vec<_> = definition.columns.iter().map(|column| column.name.as_str()).collect();
    assert_eq!(
        columns,
        ["id", "title", "status", "tags", "author_id", "editor_id", "word_count"]
    );
    let tags = &definition.columns[3];
    assert!(tags.array);
    assert_eq!(tags.sql_type, "character varying");
    assert!(definition.columns[5].null);
    assert!(!definition.columns[4].null);

    let relations: Vec<_> = definition
        .relations
        .iter()
        .map(|relation| (relation.name.as_str(), relation.kind))
        .collect();
    assert_eq!(
        relations,
        [
            ("author", RelationKind::BelongsTo),
            ("editor", RelationKind::BelongsTo),
            ("notes", RelationKind::HasMany),
            ("cover_attachment", RelationKind::HasOne),
        ]
    );
    assert_eq!(definition.relations[0].foreign_key.as_deref(), Some("author_id"));
    assert!(definition.relations[1].optional);
    assert_eq!(definition.relations[2].as_name.as_deref(), Some("notable"));

    assert!(definition.validations_on("title").any(|rule| *rule == ValidationRule::Presence));
    assert!(definition.blank_instance.is_some());
}

#[test]
fn container_defaults_and_layers() {
    let author = Author::model_definition();
    assert_eq!(author.class_name, "Author");
    assert_eq!(author.table_name, "authors");
    assert_eq!(author.primary_key.as_deref(), Some("id"));
    assert_eq!(author.columns[3].sql_type, "jsonb");
    assert!(author.blank_instance.is_none());

    assert_eq!(Setting::model_definition().layer, ModelLayer::Admin);
    assert!(Record::model_definition().is_abstract);

    let note = Note::model_definition();
    assert!(note.relations[0].polymorphic);
    assert_eq!(note.relations[0].target, None);
}

#[test]
fn registrations_are_collected() {
    let mut names: Vec<_> = registered_models().map(|registration| registration.class_name).collect();
    names.sort_unstable();
    assert_eq!(names, ["Admin::Setting", "Author", "Blog::Note", "Blog::Post", "Record"]);

    let registration = registered_models()
        .find(|registration| registration.type_name == "BlogPost")
        .unwrap();
    assert_eq!((registration.definition_fn)().class_name, "Blog::Post");

    let loaded: Vec<_> = InventoryProvider
        .load_models()
        .unwrap()
        .into_iter()
        .map(|model| model.class_name)
        .collect();
    assert_eq!(loaded, ["Admin::Setting", "Author", "Blog::Note", "Blog::Post", "Record"]);
}

#[test]
fn derived_models_produce_schema() {
    let catalog = SchemaCatalog::new(InventoryProvider);
    let schemas = catalog.derive().unwrap();
    let names: Vec<_> = schemas.iter().map(|schema| schema.class_name.as_str()).collect();
    assert_eq!(names, ["Author", "Blog::Note", "Blog::Post"]);

    let post = catalog.derive_model("Blog::Post").unwrap().unwrap();
    assert_eq!(post.name, "blog/post");
    assert_eq!(post.slug, "blog__posts");
    let columns: Vec<_> = post.columns.iter().map(|column| column.name.as_str()).collect();
    assert_eq!(
        columns,
        ["author_id", "editor_id", "cover_attachment", "id", "title", "status", "tags", "word_count"]
    );

    assert_eq!(post.column("author_id").unwrap().validators, vec![ValidatorSpec::Required]);
    assert!(post.column("editor_id").unwrap().validators.is_empty());
    assert_eq!(post.column("cover_attachment").unwrap().column_type, "file");
    assert_eq!(post.column("status").unwrap().default_value, json!("draft"));
    assert_eq!(post.column("title").unwrap().default_value, json!(""));
    assert_eq!(post.column("tags").unwrap().default_value, json!([]));
    assert_eq!(post.column("id").unwrap().access_type, AccessType::ReadWrite);

    let title = &post.column("title").unwrap().validators;
    assert_eq!(
        title,
        &vec![
            ValidatorSpec::Required,
            ValidatorSpec::Format {
                source: "^[a-z ]+$".to_string(),
                flags: "i".to_string(),
            },
        ]
    );
    assert!(matches!(
        post.column("word_count").unwrap().validators.as_slice(),
        [ValidatorSpec::Numeric(constraints)] if constraints.only_integer
    ));

    let notes = post.association("notes").unwrap();
    assert_eq!(notes.model_name, "blog/note");
    assert_eq!(notes.foreign_key, "notable_id");
    assert!(notes.polymorphic);

    let scopes: Vec<_> = post.scopes.iter().map(|scope| scope.name.as_str()).collect();
    assert_eq!(scopes, ["published"]);

    let note = catalog.derive_model("Blog::Note").unwrap().unwrap();
    let notable = note.column("notable_id").unwrap().reference.as_ref().unwrap();
    assert!(notable.polymorphic);
    assert_eq!(notable.model_name, None);
}
