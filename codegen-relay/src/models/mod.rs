//! Request and response shapes of the relay endpoint and of the artifact write.

use crate::config::{ArtifactPath, ARTIFACT_BRANCH, DEFAULT_PROMPT};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Substituted when the generation response carries no usable text.
pub const FALLBACK_TEXT: &str = "No code generated.";

/// Inbound body of `POST /`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
}

impl GenerationRequest {
    /// Build from an already parsed JSON body.
    ///
    /// Anything other than a non-empty string in `prompt` selects the default
    /// prompt; that includes a body that is not an object at all.
    pub fn from_body(body: &Value) -> Self {
        let prompt = body
            .get("prompt")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PROMPT);

        Self {
            prompt: prompt.to_string(),
        }
    }
}

/// Text produced for one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub text: String,
}

impl GenerationResult {
    /// Trim what the provider returned, falling back to [`FALLBACK_TEXT`].
    pub fn from_extracted(extracted: Option<String>) -> Self {
        let text = extracted
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| FALLBACK_TEXT.to_string());

        Self { text }
    }
}

/// One create-or-update of a file in the artifact repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactWrite {
    pub path: String,
    /// Base64 of the UTF-8 bytes of the generated text.
    pub content: String,
    pub message: String,
    pub branch: String,
}

impl ArtifactWrite {
    pub fn new(path_policy: &ArtifactPath, prompt: &str, result: &GenerationResult) -> Self {
        Self {
            path: path_policy.resolve(prompt),
            content: STANDARD.encode(result.text.as_bytes()),
            message: format!("Add generated code for prompt: {}", prompt),
            branch: ARTIFACT_BRANCH.to_string(),
        }
    }
}

/// Body returned to the caller on success.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelayResponse {
    pub generated_code: String,
    /// The store's JSON reply, or an error object when the write was rejected.
    pub github_response: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use serde_json::json;

    #[test]
    fn prompt_is_taken_verbatim() {
        let request = GenerationRequest::from_body(&json!({ "prompt": " reverse a string " }));
        assert_eq!(request.prompt, " reverse a string ");
    }

    #[test]
    fn missing_empty_or_non_string_prompt_uses_default() {
        for body in [
            json!({}),
            json!({ "prompt": "" }),
            json!({ "prompt": null }),
            json!({ "prompt": 42 }),
            json!(null),
            json!(["prompt"]),
        ] {
            assert_eq!(GenerationRequest::from_body(&body).prompt, DEFAULT_PROMPT);
        }
    }

    #[test]
    fn blank_generation_falls_back() {
        assert_eq!(GenerationResult::from_extracted(None).text, FALLBACK_TEXT);
        assert_eq!(
            GenerationResult::from_extracted(Some("  \n".to_string())).text,
            FALLBACK_TEXT
        );
        assert_eq!(
            GenerationResult::from_extracted(Some("\nfn main() {}\n".to_string())).text,
            "fn main() {}"
        );
    }

    #[test]
    fn artifact_write_encodes_content_and_references_prompt() {
        let write = ArtifactWrite::new(
            &ArtifactPath::Fixed("code-gen-result.js".to_string()),
            "say hi",
            &GenerationResult {
                text: "console.log('hi')".to_string(),
            },
        );

        assert_eq!(write.path, "code-gen-result.js");
        assert_eq!(write.content, "Y29uc29sZS5sb2coJ2hpJyk=");
        assert_eq!(write.message, "Add generated code for prompt: say hi");
        assert_eq!(write.branch, "main");
    }

    #[test]
    fn artifact_write_handles_non_ascii_text() {
        let write = ArtifactWrite::new(
            &ArtifactPath::Fixed("out.txt".to_string()),
            "greet",
            &GenerationResult {
                text: "héllo".to_string(),
            },
        );
        assert_eq!(STANDARD.decode(&write.content).unwrap(), "héllo".as_bytes());
    }
}
