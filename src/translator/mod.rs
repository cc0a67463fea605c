//! Request/response adapters for a chat-completion translation endpoint.
//!
//! The host application performs the HTTP call; these functions only build
//! the `[url, init]` pair it sends and read the translation back out of the
//! JSON reply.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};

const DEFAULT_SYSTEM_PROMPT: &str = "你是一名专业的中英文学术论文翻译专家，将用户输入的中文翻译成英文，或将用户输入的英文翻译成中文。用户可以向你发送需要翻译的内容，你回答相应的翻译结果，你可以调整语气和风格，并考虑到某些词语的文化内涵和地区差异。同时作为翻译家，需将原文翻译成具有信达雅标准的译文。'信' 即忠实于原文的内容与意图；'达' 意味着译文应通顺易懂，表达清晰；'雅' 则追求译文的文化审美和语言的优美。目标是创作出既忠于原作精神，又符合目标语言文化和读者审美的翻译。一些缩写比如方法名字、人名视情况可不进行翻译。同时翻译时需要注意上下文一些名词的翻译结果的一致性。";

/// Model parameters sent with every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TranslatorSettings {
    pub model: String,
    pub temperature: f64,
    pub system_prompt: String,
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            model: "glm-4-flash".to_string(),
            temperature: 0.7,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestHeaders {
    #[serde(rename = "Content-type")]
    pub content_type: String,
    #[serde(rename = "Authorization")]
    pub authorization: String,
}

/// Fetch options accompanying the endpoint URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInit {
    pub method: String,
    pub headers: RequestHeaders,
    /// JSON-encoded chat-completion payload
    pub body: String,
}

/// Serialises as `[url, init]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateRequest(pub String, pub RequestInit);

impl TranslateRequest {
    pub fn url(&self) -> &str {
        &self.0
    }

    pub fn init(&self) -> &RequestInit {
        &self.1
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

fn user_prompt(text: &str, to: &str) -> String {
    format!(
        "请将文本翻译成 {}，提供翻译结果并不做任何解释，翻译内容如下：\n{}",
        to, text
    )
}

/// Build the request for translating `text` into `to`.
///
/// `url` must be an absolute URL; relative endpoints are rejected with
/// [`Error::InvalidUrl`] rather than passed through. `from` is accepted for
/// hook compatibility; the model detects the source language itself.
pub fn build_request(
    text: &str,
    from: &str,
    to: &str,
    url: &str,
    key: &str,
    settings: &TranslatorSettings,
) -> Result<TranslateRequest> {
    Url::parse(url)?;
    debug!("Building translate request {} -> {}", from, to);

    let payload = ChatRequest {
        model: &settings.model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: settings.system_prompt.clone(),
            },
            ChatMessage {
                role: "user",
                content: user_prompt(text, to),
            },
        ],
        temperature: settings.temperature,
    };

    Ok(TranslateRequest(
        url.to_string(),
        RequestInit {
            method: "POST".to_string(),
            headers: RequestHeaders {
                content_type: "application/json".to_string(),
                authorization: key.to_string(),
            },
            body: serde_json::to_string(&payload)?,
        },
    ))
}

/// Extract the translation from a chat-completion reply.
///
/// Returns the trimmed text and whether it differs from the input.
pub fn parse_response(res: &Value, text: &str, _from: &str, _to: &str) -> Result<(String, bool)> {
    let content = res
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            Error::MalformedResponse("missing choices[0].message.content".to_string())
        })?;

    let translated = content.trim().to_string();
    let was_translated = translated != text;
    Ok((translated, was_translated))
}
