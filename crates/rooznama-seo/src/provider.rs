//! AI provider variants (Tier 1)
//!
//! Provider selection is a closed set of variants behind one capability:
//! `refine(title, content, keywords, language)`. `Disabled` is the null
//! variant, so the deterministic fallback is simply "the provider returned
//! nothing" rather than a special-cased branch.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use rooznama_core::models::Language;
use rooznama_core::{AppError, SeoProviderConfig};

const OPENAI_DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";
const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";
const HUGGINGFACE_ENDPOINT: &str = "https://api-inference.huggingface.co/models";
const HUGGINGFACE_DEFAULT_MODEL: &str = "facebook/bart-large-cnn";

/// How much body text a provider is shown.
const CONTENT_SNIPPET_CHARS: usize = 2000;

/// What a provider contributed. Missing fields fall back to the
/// deterministic algorithm.
#[derive(Debug, Clone, Default)]
pub struct Refinement {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<Vec<String>>,
}

/// Request handed to a provider.
#[derive(Debug, Clone, Copy)]
pub struct RefineRequest<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub keywords: &'a [String],
    pub language: Language,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

/// The closed set of SEO refinement providers.
#[derive(Debug, Clone)]
pub enum AiProvider {
    Disabled,
    OpenAi(OpenAiConfig),
    HuggingFace(HuggingFaceConfig),
}

impl AiProvider {
    /// Build the provider from configuration. Unknown or incomplete
    /// selections degrade to `Disabled` — the pipeline must keep publishing.
    pub fn from_config(config: &SeoProviderConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);

        match config.provider.as_str() {
            "openai" => match config.api_key.clone() {
                Some(api_key) => AiProvider::OpenAi(OpenAiConfig {
                    api_key,
                    model: config
                        .model
                        .clone()
                        .unwrap_or_else(|| OPENAI_DEFAULT_MODEL.to_string()),
                    endpoint: config
                        .endpoint
                        .clone()
                        .unwrap_or_else(|| OPENAI_DEFAULT_ENDPOINT.to_string()),
                    timeout,
                }),
                None => {
                    tracing::warn!("openai provider selected without an API key, disabling");
                    AiProvider::Disabled
                }
            },
            "huggingface" => AiProvider::HuggingFace(HuggingFaceConfig {
                api_key: config.api_key.clone(),
                model: config
                    .model
                    .clone()
                    .unwrap_or_else(|| HUGGINGFACE_DEFAULT_MODEL.to_string()),
                timeout,
            }),
            _ => AiProvider::Disabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, AiProvider::Disabled)
    }

    /// Ask the provider to refine title/description/keywords. `Ok(None)`
    /// means no provider is configured; errors are the caller's cue to fall
    /// back, never to abort.
    pub async fn refine(&self, request: RefineRequest<'_>) -> Result<Option<Refinement>, AppError> {
        match self {
            AiProvider::Disabled => Ok(None),
            AiProvider::OpenAi(config) => Ok(Some(refine_openai(config, request).await?)),
            AiProvider::HuggingFace(config) => Ok(Some(refine_huggingface(config, request).await?)),
        }
    }
}

// --- OpenAI-compatible chat completions ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct RefinementPayload {
    #[serde(default)]
    meta_title: Option<String>,
    #[serde(default)]
    meta_description: Option<String>,
    #[serde(default)]
    keywords: Option<Vec<String>>,
}

fn snippet(content: &str) -> String {
    content.chars().take(CONTENT_SNIPPET_CHARS).collect()
}

fn openai_prompt(request: &RefineRequest<'_>) -> (String, String) {
    let keywords = if request.keywords.is_empty() {
        None
    } else {
        Some(request.keywords.join(", "))
    };

    match request.language {
        Language::Fa => (
            "شما یک متخصص SEO خبری هستید. فقط JSON معتبر برمی‌گردانید.".to_string(),
            format!(
                "عنوان و محتوای خبر زیر را تحلیل کن و JSON زیر را کامل کن:\n\
                 {{\"meta_title\": \"55-60 کاراکتر\", \"meta_description\": \"140-155 کاراکتر\", \"keywords\": [\"...\"]}}\n\n\
                 عنوان: {}\n\nمحتوا: {}\n\nکلمات کلیدی موجود: {}",
                request.title,
                snippet(request.content),
                keywords.unwrap_or_else(|| "خودکار استخراج شود".to_string()),
            ),
        ),
        Language::En => (
            "You are a news SEO expert. You only return valid JSON.".to_string(),
            format!(
                "Analyze the following news title and content and complete this JSON:\n\
                 {{\"meta_title\": \"55-60 characters\", \"meta_description\": \"140-155 characters\", \"keywords\": [\"...\"]}}\n\n\
                 Title: {}\n\nContent: {}\n\nExisting keywords: {}",
                request.title,
                snippet(request.content),
                keywords.unwrap_or_else(|| "auto-extract".to_string()),
            ),
        ),
    }
}

async fn refine_openai(
    config: &OpenAiConfig,
    request: RefineRequest<'_>,
) -> Result<Refinement, AppError> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| AppError::SeoProvider(format!("Failed to create HTTP client: {}", e)))?;

    let (system, user) = openai_prompt(&request);

    let body = ChatRequest {
        model: config.model.clone(),
        messages: vec![
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: user,
            },
        ],
        temperature: 0.3,
        max_tokens: 500,
    };

    let response = client
        .post(format!(
            "{}/chat/completions",
            config.endpoint.trim_end_matches('/')
        ))
        .bearer_auth(&config.api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| AppError::SeoProvider(format!("Provider request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(AppError::SeoProvider(format!(
            "Provider returned status {}",
            response.status()
        )));
    }

    let payload: ChatResponse = response
        .json()
        .await
        .map_err(|e| AppError::SeoProvider(format!("Invalid provider response: {}", e)))?;

    let content = payload
        .choices
        .first()
        .and_then(|c| c.message.content.as_deref())
        .unwrap_or("");

    let parsed = extract_json_object(content).ok_or_else(|| {
        AppError::SeoProvider("No JSON object found in provider response".to_string())
    })?;

    let refinement: RefinementPayload = serde_json::from_str(&parsed)
        .map_err(|e| AppError::SeoProvider(format!("Malformed provider JSON: {}", e)))?;

    Ok(Refinement {
        title: refinement.meta_title.filter(|t| !t.trim().is_empty()),
        description: refinement
            .meta_description
            .filter(|d| !d.trim().is_empty()),
        keywords: refinement.keywords.filter(|k| !k.is_empty()),
    })
}

/// Completions wrap JSON in prose often enough that we take the first
/// balanced `{...}` span instead of trusting the whole body.
fn extract_json_object(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    for (offset, c) in text[start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(text[start..start + offset + 1].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

// --- HuggingFace inference (summarization) ---

#[derive(Serialize)]
struct InferenceRequest {
    inputs: String,
}

#[derive(Deserialize)]
struct SummaryItem {
    #[serde(default)]
    summary_text: Option<String>,
    #[serde(default)]
    generated_text: Option<String>,
}

async fn refine_huggingface(
    config: &HuggingFaceConfig,
    request: RefineRequest<'_>,
) -> Result<Refinement, AppError> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| AppError::SeoProvider(format!("Failed to create HTTP client: {}", e)))?;

    let mut builder = client
        .post(format!("{}/{}", HUGGINGFACE_ENDPOINT, config.model))
        .json(&InferenceRequest {
            inputs: request.content.chars().take(1000).collect(),
        });

    if let Some(ref api_key) = config.api_key {
        builder = builder.bearer_auth(api_key);
    }

    let response = builder
        .send()
        .await
        .map_err(|e| AppError::SeoProvider(format!("Provider request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(AppError::SeoProvider(format!(
            "Provider returned status {}",
            response.status()
        )));
    }

    let items: Vec<SummaryItem> = response
        .json()
        .await
        .map_err(|e| AppError::SeoProvider(format!("Invalid provider response: {}", e)))?;

    let summary = items
        .first()
        .and_then(|item| item.summary_text.clone().or_else(|| item.generated_text.clone()))
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::SeoProvider("Empty summarization response".to_string()))?;

    // Summarization models only contribute the description
    Ok(Refinement {
        title: None,
        description: Some(summary),
        keywords: None,
    })
}
