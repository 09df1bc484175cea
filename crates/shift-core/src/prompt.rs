//! Content-generation prompt templates.
//!
//! Platforms form a closed variant set, each mapped to a template
//! descriptor (structure text plus an optional length cap) instead of
//! chained conditionals, so adding a platform is one arm, not a rewrite.

use crate::error::{Result, ShiftError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Tiktok,
    Instagram,
    X,
    Linkedin,
    Devto,
    Medium,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Tiktok,
        Platform::Instagram,
        Platform::X,
        Platform::Linkedin,
        Platform::Devto,
        Platform::Medium,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Tiktok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::X => "x",
            Platform::Linkedin => "linkedin",
            Platform::Devto => "devto",
            Platform::Medium => "medium",
        }
    }

    pub fn template(&self) -> PromptTemplate {
        match self {
            Platform::Tiktok | Platform::Instagram => PromptTemplate {
                length_cap: None,
                structure: "Write a short video script (30-45 seconds) with a hook, main \
                            content, and call to action. Include suggestions for visuals."
                    .to_string(),
            },
            Platform::X => PromptTemplate {
                length_cap: Some(280),
                structure: "Keep it under 280 characters. Include relevant hashtags."
                    .to_string(),
            },
            Platform::Linkedin => PromptTemplate {
                length_cap: None,
                structure: "Write a professional but engaging post, longer format, with \
                            hashtags."
                    .to_string(),
            },
            Platform::Devto | Platform::Medium => PromptTemplate {
                length_cap: None,
                structure: format!(
                    "Write a full-length article (3-5 minute read) suitable for {}. Include:\n\
                     - A compelling title\n\
                     - An engaging introduction\n\
                     - 3-4 main sections with subheadings\n\
                     - A conclusion with key takeaways\n\
                     - Relevant tags (as a comma-separated list at the end)\n\n\
                     Make it informative, well-structured, and ready to publish.",
                    self.as_str()
                ),
            },
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ShiftError;

    fn from_str(s: &str) -> Result<Self> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ShiftError::UnknownPlatform(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// PromptTemplate / prompt assembly
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// Hard character cap the prompt asks for, when the platform has one.
    pub length_cap: Option<usize>,
    /// Platform-specific structural instructions.
    pub structure: String,
}

/// Assemble the content-generation prompt: base sentence, optional tone
/// modifier, platform structure, optional derived activity context, and
/// the closing copy-paste instruction, in that order.
pub fn build_content_prompt(
    platform: Platform,
    task: &str,
    tone: Option<&str>,
    context: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Generate a social media post for {platform} about the following task: \"{task}\"."
    );

    if let Some(tone) = tone.map(str::trim).filter(|t| !t.is_empty()) {
        prompt.push_str(&format!(" Use a {tone} tone."));
    }

    prompt.push(' ');
    prompt.push_str(&platform.template().structure);

    if let Some(context) = context.filter(|c| !c.is_empty()) {
        prompt.push_str(&format!("\n\nContext about the author: {context}"));
    }

    prompt.push_str(" The content should be ready to copy and paste.");
    prompt
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
