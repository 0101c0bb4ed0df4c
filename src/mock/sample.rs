//! Sample documents for the text tools.
//!
//! A sample is read straight from its fixture, with no request and no retry,
//! so it works whether or not the mock responder is switched on.

use serde_json::Value;

use super::fixtures::{self, FixtureSource};
use crate::error::FixtureError;
use crate::operation::Operation;

/// A ready-made input together with the result the tool would show for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub input: String,
    pub result: Value,
}

/// Fixture holding the sample for `operation`, if the tool has one.
pub fn fixture_for(operation: Operation) -> Option<&'static str> {
    match operation {
        Operation::Humanize => Some(fixtures::HUMANIZE),
        Operation::Detect => Some(fixtures::AI_CHECKER),
        Operation::GrammarCheck => Some(fixtures::GRAMMAR),
        Operation::PlagiarismCheck => Some(fixtures::PLAGIARISM),
        Operation::Translate => Some(fixtures::TRANSLATION),
        _ => None,
    }
}

/// Detection and plagiarism documents carry their input as `text`, the
/// others as `originalText`.
fn input_field(operation: Operation) -> &'static str {
    match operation {
        Operation::Detect | Operation::PlagiarismCheck => "text",
        _ => "originalText",
    }
}

pub async fn load(
    source: &dyn FixtureSource,
    operation: Operation,
) -> Result<Sample, FixtureError> {
    let name = fixture_for(operation)
        .ok_or_else(|| FixtureError::NoSample(operation.name().to_string()))?;
    let result = source.load(name).await?;
    let field = input_field(operation);
    let input = result
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| FixtureError::MissingField {
            name: name.to_string(),
            field: field.to_string(),
        })?
        .to_string();
    Ok(Sample { input, result })
}
