use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

/// Prompt used when the caller sends none.
pub const DEFAULT_PROMPT: &str = "Explain how AI works";

/// Branch every artifact is committed to.
pub const ARTIFACT_BRANCH: &str = "main";

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_COMPLETIONS_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_COMPLETIONS_MODEL: &str = "gpt-3.5-turbo-instruct";
const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
const DEFAULT_MAX_TOKENS: u32 = 512;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub common: core_config::Config,
    pub generation: GenerationConfig,
    pub github: GithubConfig,
    pub artifact: ArtifactConfig,
    pub otlp_endpoint: Option<String>,
}

/// Which generation schema the service is bound to.
///
/// The two payload shapes (and their auth schemes) are not interchangeable, so
/// one is picked at startup and used for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// `contents/parts` payload, API key in the query string.
    Gemini,
    /// `prompt/max_tokens` payload, bearer token.
    Completions,
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "completions" => Ok(ProviderKind::Completions),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "Unknown GENERATION_PROVIDER '{}', expected 'gemini' or 'completions'",
                other
            ))),
        }
    }
}

impl ProviderKind {
    fn default_api_base(self) -> &'static str {
        match self {
            ProviderKind::Gemini => DEFAULT_GEMINI_API_BASE,
            ProviderKind::Completions => DEFAULT_COMPLETIONS_API_BASE,
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Gemini => DEFAULT_GEMINI_MODEL,
            ProviderKind::Completions => DEFAULT_COMPLETIONS_MODEL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub provider: ProviderKind,
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
    /// Only sent by the completions provider.
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub token: Secret<String>,
    /// Account or organisation that owns the repository.
    pub owner: String,
    pub repo: String,
    pub api_base: String,
}

/// Where in the repository the generated text lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactPath {
    /// Every request overwrites the same file.
    Fixed(String),
    /// One file per prompt, named after the prompt text.
    FromPrompt { extension: String },
}

impl ArtifactPath {
    pub fn resolve(&self, prompt: &str) -> String {
        match self {
            ArtifactPath::Fixed(path) => path.clone(),
            ArtifactPath::FromPrompt { extension } => {
                let stem = prompt
                    .split(|c: char| c.is_whitespace() || c == '/')
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join("_");
                let stem = if stem.is_empty() { "prompt" } else { &stem };
                if extension.is_empty() {
                    stem.to_string()
                } else {
                    format!("{}.{}", stem, extension)
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactConfig {
    pub path: ArtifactPath,
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let provider: ProviderKind =
            get_env("GENERATION_PROVIDER", Some("gemini"), is_prod)?.parse()?;

        let api_key = match env::var("GENERATION_API_KEY") {
            Ok(key) => key,
            Err(_) => get_env("GEMINI_API_KEY", None, is_prod).map_err(|_| {
                AppError::ConfigError(anyhow::anyhow!(
                    "GENERATION_API_KEY (or GEMINI_API_KEY) is required but not set"
                ))
            })?,
        };

        let path_mode = get_env("ARTIFACT_PATH_MODE", Some("fixed"), is_prod)?;
        let path = match path_mode.trim().to_ascii_lowercase().as_str() {
            "fixed" => ArtifactPath::Fixed(get_env(
                "ARTIFACT_PATH",
                Some("code-gen-result.js"),
                is_prod,
            )?),
            "prompt" => ArtifactPath::FromPrompt {
                extension: get_env("ARTIFACT_EXTENSION", Some("js"), is_prod)?,
            },
            other => {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "Unknown ARTIFACT_PATH_MODE '{}', expected 'fixed' or 'prompt'",
                    other
                )))
            }
        };

        Ok(RelayConfig {
            common: common_config,
            generation: GenerationConfig {
                provider,
                api_key: Secret::new(api_key),
                model: get_env("GENERATION_MODEL", Some(provider.default_model()), is_prod)?,
                api_base: get_env(
                    "GENERATION_API_BASE",
                    Some(provider.default_api_base()),
                    is_prod,
                )?,
                max_tokens: parse_max_tokens(&get_env(
                    "GENERATION_MAX_TOKENS",
                    Some(&DEFAULT_MAX_TOKENS.to_string()),
                    is_prod,
                )?)?,
            },
            github: GithubConfig {
                token: Secret::new(get_env("GITHUB_TOKEN", None, is_prod)?),
                owner: get_env("GITHUB_USER", None, is_prod)?,
                repo: get_env("GITHUB_REPO", None, is_prod)?,
                api_base: get_env("GITHUB_API_BASE", Some(DEFAULT_GITHUB_API_BASE), is_prod)?,
            },
            artifact: ArtifactConfig { path },
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
        })
    }
}

fn parse_max_tokens(raw: &str) -> Result<u32, AppError> {
    raw.trim().parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!(
            "Invalid GENERATION_MAX_TOKENS '{}': {}",
            raw,
            e
        ))
    })
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
