pub mod derive;
pub mod models;
