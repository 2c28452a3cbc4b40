#![allow(dead_code)]

use admin_schema::types::{ColumnDescriptor, ModelDefinition, ModelLayer, RelationDescriptor};
use admin_schema::{ModelSchema, SchemaConfig};

/// A small blog: users write posts, posts collect comments.
pub fn blog_models() -> Vec<ModelDefinition> {
    vec![
        ModelDefinition::new("User", "users")
            .with_column(ColumnDescriptor::new("id", "bigint").not_null())
            .with_column(ColumnDescriptor::new("email", "character varying"))
            .with_column(ColumnDescriptor::new("encrypted_password", "character varying"))
            .with_column(ColumnDescriptor::new("created_at", "timestamp"))
            .with_relation(RelationDescriptor::has_many("posts", "Post").with_foreign_key("author_id"))
            .with_relation(RelationDescriptor::has_one("avatar_attachment", "Storage::Attachment")),
        post(),
        ModelDefinition::new("Comment", "comments")
            .with_column(ColumnDescriptor::new("id", "bigint").not_null())
            .with_column(ColumnDescriptor::new("post_id", "bigint"))
            .with_column(ColumnDescriptor::new("body", "text"))
            .with_relation(RelationDescriptor::belongs_to("post", "Post")),
        ModelDefinition::new("Storage::Attachment", "storage_attachments"),
        ModelDefinition::new("Storage::Blob", "storage_blobs"),
        ModelDefinition::new("Admin::Audit", "admin_audits"),
        ModelDefinition::new("Admin::Setting", "admin_settings").with_layer(ModelLayer::Admin),
        ModelDefinition::new("ApplicationRecord", "").abstract_model(),
    ]
}

pub fn post() -> ModelDefinition {
    ModelDefinition::new("Post", "posts")
        .with_column(ColumnDescriptor::new("id", "integer").not_null())
        .with_column(ColumnDescriptor::new("title", "character varying"))
        .with_column(ColumnDescriptor::new("author_id", "integer"))
        .with_column(ColumnDescriptor::new("status", "integer").with_default(0))
        .with_relation(RelationDescriptor::belongs_to("author", "User"))
        .with_relation(RelationDescriptor::has_many("comments", "Comment"))
        .with_enum("status", ["draft", "published"])
        .with_scope("published")
        .with_scope("with_attached_avatar")
}

pub fn sequential() -> SchemaConfig {
    let mut config = SchemaConfig::default();
    config.derive.parallel = false;
    config
}

pub fn model_names(schemas: &[ModelSchema]) -> Vec<&str> {
    schemas.iter().map(|schema| schema.name.as_str()).collect()
}

pub fn column_names(schema: &ModelSchema) -> Vec<&str> {
    schema.columns.iter().map(|column| column.name.as_str()).collect()
}
