//! Loading model descriptor files from a directory.

use std::fs;
use std::path::Path;

use admin_schema::provider::read_definition;
use admin_schema::types::{RelationKind, ValidationRule};
use admin_schema::{DirectoryProvider, LoadError, MetadataProvider, SchemaCatalog, SchemaError, ValidatorSpec};
use tempfile::TempDir;

const USER_TOML: &str = r#"
class_name = "User"
table_name = "users"

[[columns]]
name = "id"
sql_type = "bigint"
null = false

[[columns]]
name = "name"
sql_type = "character varying(255)"

[[columns]]
name = "roles"
sql_type = "varchar[]"
default = []

[[relations]]
name = "posts"
kind = "has_many"
target = "Post"
foreign_key = "author_id"

[[validations]]
attributes = ["name"]
kind = "length"
maximum = 80

[[validations]]
attributes = ["name"]
kind = "uniqueness"
"#;

const POST_JSON: &str = r#"{
  "class_name": "Post",
  "table_name": "posts",
  "columns": [
    {"name": "id", "sql_type": "integer", "null": false},
    {"name": "title", "sql_type": "text"},
    {"name": "slug", "sql_type": "text"}
  ],
  "relations": [
    {"name": "author", "kind": "belongs_to", "target": "User"}
  ],
  "validations": [
    {"attributes": ["slug"], "kind": "format", "pattern": "(?i)\\A[a-z0-9-]+\\z"}
  ],
  "scopes": ["recent", "with_attached_cover"]
}"#;

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

fn models_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "user.toml", USER_TOML);
    fs::create_dir(dir.path().join("blog")).unwrap();
    write(&dir.path().join("blog"), "post.json", POST_JSON);
    write(dir.path(), "README.md", "not a model");
    dir
}

#[test]
fn reads_toml_and_json_descriptors() {
    let dir = models_dir();
    let models = DirectoryProvider::new(dir.path()).load_models().unwrap();

    let names: Vec<_> = models.iter().map(|model| model.class_name.as_str()).collect();
    assert_eq!(names, ["Post", "User"]);

    let user = &models[1];
    assert_eq!(user.primary_key.as_deref(), Some("id"));
    assert!(!user.columns[0].null);
    assert!(user.columns[1].null);
    assert_eq!(user.relations[0].kind, RelationKind::HasMany);
    assert_eq!(user.validations[1].rule, ValidationRule::Other);
}

#[test]
fn derives_schema_from_directory() {
    let dir = models_dir();
    let catalog = SchemaCatalog::new(DirectoryProvider::new(dir.path()));
    let schemas = catalog.derive().unwrap();
    assert_eq!(schemas.len(), 2);

    let user = catalog.derive_model("User").unwrap().unwrap();
    assert_eq!(user.display_column.as_deref(), Some("name"));
    let roles = user.column("roles").unwrap();
    assert!(roles.is_array);
    assert_eq!(roles.column_type, "string");
    assert_eq!(roles.default_value, serde_json::json!([]));
    assert_eq!(user.column("name").unwrap().validators.len(), 1);

    let post = catalog.derive_model("Post").unwrap().unwrap();
    assert_eq!(post.columns[0].name, "author_id");
    assert_eq!(
        post.column("slug").unwrap().validators,
        vec![ValidatorSpec::Format {
            source: "^[a-z0-9-]+$".to_string(),
            flags: "i".to_string(),
        }]
    );
    let scopes: Vec<_> = post.scopes.iter().map(|scope| scope.name.as_str()).collect();
    assert_eq!(scopes, ["recent"]);
}

#[test]
fn malformed_descriptor_fails_the_load() {
    let dir = models_dir();
    write(dir.path(), "broken.toml", "class_name = ");

    let err = DirectoryProvider::new(dir.path()).load_models().unwrap_err();
    assert!(matches!(err, SchemaError::Load { source: LoadError::Toml { .. }, .. }));

    let catalog = SchemaCatalog::new(DirectoryProvider::new(dir.path()));
    assert!(catalog.derive().is_err());
    assert!(!catalog.is_loaded());
}

#[test]
fn missing_directory_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let provider = DirectoryProvider::new(dir.path().join("absent"));
    assert!(matches!(provider.load_models(), Err(SchemaError::Load { .. })));
}

#[test]
fn duplicate_class_names_fail_the_load() {
    let dir = models_dir();
    write(dir.path(), "user_copy.toml", USER_TOML);

    let err = SchemaCatalog::new(DirectoryProvider::new(dir.path())).derive().unwrap_err();
    assert!(matches!(
        err,
        SchemaError::Load { source: LoadError::DuplicateModel { ref class_name }, .. } if class_name == "User"
    ));
}

#[test]
fn single_file_reader_picks_format_by_extension() {
    let dir = models_dir();
    let post = read_definition(&dir.path().join("blog/post.json")).unwrap();
    assert_eq!(post.class_name, "Post");
    assert_eq!(post.scopes.len(), 2);

    write(dir.path(), "post.toml", POST_JSON);
    assert!(matches!(read_definition(&dir.path().join("post.toml")), Err(LoadError::Toml { .. })));
}
