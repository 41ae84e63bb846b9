// Relevance matching: the pluggable scorer, match details and recommendation bands.

pub mod handlers;
pub mod relevance;
