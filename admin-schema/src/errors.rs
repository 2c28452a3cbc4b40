use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type of the derivation pipeline.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A relationship names a target model that is not loaded.
    #[error("relation `{relation}` on `{model}` targets unknown model `{target}`")]
    TargetUnresolvable {
        model: String,
        relation: String,
        target: String,
    },

    /// Building one model's schema failed. The pipeline drops that model and carries on.
    #[error("failed to introspect model `{model}`")]
    ModelIntrospectionFailed {
        model: String,
        #[source]
        source: IntrospectionError,
    },

    /// Model definitions could not be loaded. Nothing can be derived without them.
    #[error("failed to load model definitions from {provider}")]
    Load {
        provider: String,
        #[source]
        source: LoadError,
    },
}

impl SchemaError {
    pub fn load(provider: impl Into<String>, source: impl Into<LoadError>) -> Self {
        Self::Load {
            provider: provider.into(),
            source: source.into(),
        }
    }

    pub fn introspection(model: impl Into<String>, source: IntrospectionError) -> Self {
        Self::ModelIntrospectionFailed {
            model: model.into(),
            source,
        }
    }
}

/// Failure while reading one model's metadata.
#[derive(Debug, Error)]
pub enum IntrospectionError {
    /// The blank-instance constructor refused to build a default record.
    #[error("could not build a blank instance: {message}")]
    BlankInstance { message: String },

    /// A format validation carries a pattern that cannot be compiled or translated.
    #[error("invalid format pattern on `{column}`")]
    InvalidPattern {
        column: String,
        #[source]
        source: PatternError,
    },
}

/// Why a format pattern has no browser-side equivalent.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("pattern does not compile")]
    Invalid(#[from] regex::Error),

    #[error("pattern uses {construct}, which has no JavaScript equivalent")]
    Unsupported { construct: &'static str },
}

/// Failure while loading model definitions from a provider.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("i/o error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not walk model directory")]
    Walk(#[from] walkdir::Error),

    #[error("invalid TOML in {path}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("model `{class_name}` is defined more than once")]
    DuplicateModel { class_name: String },

    #[error("{message}")]
    Other { message: String },
}

impl From<String> for LoadError {
    fn from(message: String) -> Self {
        Self::Other { message }
    }
}
