//! Skill extraction, clustering and recommendation stages

pub mod clustering;
pub mod document;
pub mod extractor;
pub mod pipeline;
pub mod recommender;
pub mod text_normalizer;
pub mod vectorizer;
