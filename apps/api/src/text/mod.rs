// Text utilities: normalisation, skill extraction, TF-IDF similarity and
// plain-text formatting shared by the catalog, matcher and customizer.

pub mod extract;
pub mod format;
pub mod handlers;
pub mod normalize;
pub mod similarity;
pub mod skills;
