// Job catalog: the in-memory posting list, its seed data and search/filter operations.

pub mod handlers;
pub mod models;
pub mod search;
pub mod seed;
