pub mod agent;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod lm;
pub mod matching;
pub mod resume;
pub mod routes;
pub mod state;
pub mod text;
