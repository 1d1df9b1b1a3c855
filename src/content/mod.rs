pub mod catalog;
pub mod glossary;

pub use catalog::{
    Answer, BuilderChallenge, Catalog, CatalogError, Challenge, Difficulty, Mode, TypingText,
};
pub use glossary::Glossary;
