//! Static JSON documents that stand in for backend responses.
//!
//! Every load reads and parses the document again. Nothing is cached, so a
//! fixture edited on disk is picked up by the next request.

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

use crate::error::FixtureError;

pub const HUMANIZE: &str = "humanize_output.json";
pub const AI_CHECKER: &str = "ai_checker_results.json";
pub const GRAMMAR: &str = "grammar_results.json";
pub const PLAGIARISM: &str = "plagiarism_results.json";
pub const TRANSLATION: &str = "translation_results.json";
pub const CHAT: &str = "chat_assistant.json";

const EMBEDDED: &[(&str, &str)] = &[
    (HUMANIZE, include_str!("../../fixtures/humanize_output.json")),
    (AI_CHECKER, include_str!("../../fixtures/ai_checker_results.json")),
    (GRAMMAR, include_str!("../../fixtures/grammar_results.json")),
    (PLAGIARISM, include_str!("../../fixtures/plagiarism_results.json")),
    (TRANSLATION, include_str!("../../fixtures/translation_results.json")),
    (CHAT, include_str!("../../fixtures/chat_assistant.json")),
];

/// Somewhere fixture documents can be loaded from by file name.
#[async_trait]
pub trait FixtureSource: Send + Sync {
    async fn load(&self, name: &str) -> Result<Value, FixtureError>;
}

fn parse(name: &str, raw: &str) -> Result<Value, FixtureError> {
    serde_json::from_str(raw).map_err(|source| FixtureError::Parse {
        name: name.to_string(),
        source,
    })
}

/// The fixtures shipped inside the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedFixtures;

impl EmbeddedFixtures {
    pub fn names() -> impl Iterator<Item = &'static str> {
        EMBEDDED.iter().map(|(name, _)| *name)
    }
}

#[async_trait]
impl FixtureSource for EmbeddedFixtures {
    async fn load(&self, name: &str) -> Result<Value, FixtureError> {
        let raw = EMBEDDED
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, raw)| *raw)
            .ok_or_else(|| FixtureError::NotFound(name.to_string()))?;
        parse(name, raw)
    }
}

/// Fixtures read from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirFixtures {
    root: PathBuf,
}

impl DirFixtures {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FixtureSource for DirFixtures {
    async fn load(&self, name: &str) -> Result<Value, FixtureError> {
        let path = self.root.join(name);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FixtureError::NotFound(name.to_string()));
            }
            Err(source) => {
                return Err(FixtureError::Io {
                    name: name.to_string(),
                    source,
                });
            }
        };
        parse(name, &raw)
    }
}
