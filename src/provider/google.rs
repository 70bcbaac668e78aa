use super::{GenerateRequest, Provider, ProviderFuture};
use anyhow::{anyhow, Context};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Url;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/";

#[derive(Debug, Clone)]
pub struct GoogleProvider {
    http: reqwest::Client,
    api_key: String,
    api_base: Url,
}

impl GoogleProvider {
    pub fn with_api_base(http: reqwest::Client, api_key: String, api_base: &str) -> anyhow::Result<Self> {
        // Url::join drops the last segment unless the base ends in '/'.
        let base = if api_base.ends_with('/') {
            api_base.to_string()
        } else {
            format!("{api_base}/")
        };
        let api_base = Url::parse(&base).with_context(|| format!("invalid Gemini API base URL: {api_base}"))?;
        Ok(Self { http, api_key, api_base })
    }

    fn build_url(&self, model: &str) -> anyhow::Result<Url> {
        // Docs: https://ai.google.dev/api/generate-content#method:-models.generatecontent
        let mut url = self
            .api_base
            .join(&format!("v1beta/models/{model}:generateContent"))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    fn headers(&self) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        h
    }
}

impl Provider for GoogleProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    fn generate(&self, req: GenerateRequest) -> ProviderFuture {
        let this = self.clone();

        Box::pin(async move {
            let url = this.build_url(&req.model)?;

            let body = GenerateContentRequest {
                contents: vec![Content {
                    role: Some("user".to_string()),
                    parts: vec![Part { text: Some(req.prompt) }],
                }],
            };

            tracing::debug!(model = %req.model, "sending generateContent request");
            let resp = this
                .http
                .post(url)
                .headers(this.headers())
                .json(&body)
                .send()
                .await
                .context("failed to send Gemini request")?;

            let status = resp.status();
            let text = resp.text().await.context("failed to read Gemini response body")?;
            if !status.is_success() {
                return Err(anyhow!("Gemini API error: HTTP {status}: {text}"));
            }

            let parsed: GenerateContentResponse =
                serde_json::from_str(&text).context("failed to parse Gemini response JSON")?;

            match extract_text(&parsed) {
                Some(out) => Ok(out),
                None => {
                    let reason = parsed
                        .candidates
                        .first()
                        .and_then(|c| c.finish_reason.as_deref())
                        .unwrap_or("unknown");
                    Err(anyhow!("Gemini response contained no text (finish reason: {reason})"))
                }
            }
        })
    }
}

#[derive(Debug, Clone, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

fn extract_text(r: &GenerateContentResponse) -> Option<String> {
    // Concatenate all text parts of the first candidate.
    let cand = r.candidates.first()?;
    let content = cand.content.as_ref()?;
    let mut out = String::new();
    for p in &content.parts {
        if let Some(t) = &p.text {
            out.push_str(t);
        }
    }
    if out.is_empty() { None } else { Some(out) }
}
