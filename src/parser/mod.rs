//! Description parsers
//!
//! A parser turns free text into a `RawDraft`. Language-model clients live
//! outside this crate; their JSON replies are handled by `JsonDraftParser`,
//! and `KeywordParser` covers plain English descriptions without any external
//! service.

mod json;
mod keywords;

use anyhow::Result;

use crate::generation::RawDraft;

pub use json::{describe_draft, edit_draft, JsonDraftParser};
pub use keywords::KeywordParser;

/// Pluggable natural-language front end
pub trait DescriptionParser {
    /// Extracts a draft. Fields the description does not mention stay `None`.
    fn parse(&self, description: &str) -> Result<RawDraft>;
}

/// Picks the JSON parser for text that looks like JSON, the keyword parser otherwise
#[derive(Debug)]
pub struct AutoParser {
    json: JsonDraftParser,
    keywords: KeywordParser,
}

impl AutoParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            json: JsonDraftParser::new(),
            keywords: KeywordParser::new()?,
        })
    }
}

impl DescriptionParser for AutoParser {
    fn parse(&self, description: &str) -> Result<RawDraft> {
        let trimmed = description.trim_start();
        if trimmed.starts_with('{') || trimmed.starts_with("```") {
            self.json.parse(description)
        } else {
            self.keywords.parse(description)
        }
    }
}
