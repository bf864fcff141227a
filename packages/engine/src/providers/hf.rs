//! Hugging Face Inference API collaborators.
//!
//! Backs the stance classifier (zero-shot NLI), the embedding model
//! (feature extraction over a sentence-transformer), and the optional
//! paraphraser (text2text generation). All three share the bearer-token
//! request shape; each parses its model's response into typed records at
//! this boundary and rejects unexpected shapes here, not downstream.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::{ClassifierError, EmbeddingError};
use crate::security::SecretString;
use crate::stance::StanceScores;
use crate::traits::{EmbeddingModel, Paraphraser, StanceClassifier};

const HF_BASE: &str = "https://api-inference.huggingface.co/models";

/// Candidate labels presented to the zero-shot classifier.
const CANDIDATE_LABELS: [&str; 3] = ["supports", "refutes", "not enough evidence"];

pub const DEFAULT_NLI_MODEL: &str = "facebook/bart-large-mnli";
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-mpnet-base-v2";

fn inference_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .expect("Failed to create HTTP client")
}

/// Zero-shot stance classifier on the HF Inference API.
pub struct HfStanceClassifier {
    api_key: SecretString,
    model: String,
    client: reqwest::Client,
    probe_client: reqwest::Client,
}

/// Zero-shot responses arrive either as one object or a singleton list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    One(ZeroShotResult),
    Many(Vec<ZeroShotResult>),
}

#[derive(Debug, Deserialize)]
struct ZeroShotResult {
    labels: Vec<String>,
    scores: Vec<f64>,
}

impl HfStanceClassifier {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key),
            model: DEFAULT_NLI_MODEL.to_string(),
            client: inference_client(60),
            // the probe must answer fast; a slow probe is an unavailable backend
            probe_client: inference_client(8),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl StanceClassifier for HfStanceClassifier {
    async fn classify(&self, claim: &str, passage: &str) -> Result<StanceScores, ClassifierError> {
        let payload = json!({
            "inputs": passage,
            "parameters": {
                "candidate_labels": CANDIDATE_LABELS,
                "hypothesis_template": format!("This article {{}} the claim: \"{claim}\""),
            }
        });

        let response = self
            .client
            .post(format!("{HF_BASE}/{}", self.model))
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .json(&payload)
            .send()
            .await
            .map_err(|e| ClassifierError::Http(Box::new(e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Api { status, body });
        }

        let parsed: ZeroShotResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::Malformed(e.to_string()))?;

        let result = match parsed {
            ZeroShotResponse::One(result) => result,
            ZeroShotResponse::Many(mut results) => {
                if results.is_empty() {
                    return Err(ClassifierError::Malformed("empty result list".to_string()));
                }
                results.remove(0)
            }
        };

        if result.labels.len() != result.scores.len() {
            return Err(ClassifierError::Malformed(format!(
                "{} labels vs {} scores",
                result.labels.len(),
                result.scores.len()
            )));
        }

        Ok(result.labels.into_iter().zip(result.scores).collect())
    }

    async fn is_available(&self) -> bool {
        let result = self
            .probe_client
            .get(format!("{HF_BASE}/{}", self.model))
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .send()
            .await;

        match result {
            Ok(response) => {
                let ok = response.status().is_success();
                debug!(model = %self.model, status = %response.status(), "classifier probe");
                ok
            }
            Err(e) => {
                warn!(model = %self.model, error = %e, "classifier probe failed");
                false
            }
        }
    }
}

/// Sentence embeddings via the HF feature-extraction pipeline.
pub struct HfEmbeddingModel {
    api_key: SecretString,
    model: String,
    client: reqwest::Client,
}

impl HfEmbeddingModel {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            client: inference_client(60),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl EmbeddingModel for HfEmbeddingModel {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let payload = json!({
            "inputs": texts,
            "options": {"wait_for_model": true}
        });

        let response = self
            .client
            .post(format!("{HF_BASE}/{}", self.model))
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .json(&payload)
            .send()
            .await
            .map_err(|e| EmbeddingError::Http(Box::new(e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api { status, body });
        }

        let vectors: Vec<Vec<f32>> = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Malformed(e.to_string()))?;

        if vectors.len() != texts.len() {
            return Err(EmbeddingError::Malformed(format!(
                "expected {} vectors, got {}",
                texts.len(),
                vectors.len()
            )));
        }

        Ok(vectors)
    }
}

/// Paraphrase generation via a text2text model.
///
/// Infallible surface: any transport or shape problem yields an empty list,
/// because paraphrases are an optional enrichment.
pub struct HfParaphraser {
    api_key: SecretString,
    model: String,
    client: reqwest::Client,
}

/// Generation output: one object, or a list of objects or bare strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    One(GeneratedText),
    Many(Vec<GenerationItem>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerationItem {
    Object(GeneratedText),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

impl HfParaphraser {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key),
            model: model.into(),
            client: inference_client(30),
        }
    }
}

#[async_trait]
impl Paraphraser for HfParaphraser {
    async fn paraphrase(&self, text: &str, max: usize) -> Vec<String> {
        let payload = json!({
            "inputs": text,
            "parameters": {"max_new_tokens": 64, "num_return_sequences": max}
        });

        let response = match self
            .client
            .post(format!("{HF_BASE}/{}", self.model))
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .json(&payload)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!(status = %response.status(), "paraphrase request rejected");
                return Vec::new();
            }
            Err(e) => {
                debug!(error = %e, "paraphrase request failed");
                return Vec::new();
            }
        };

        let parsed: GenerationResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(error = %e, "paraphrase response unparseable");
                return Vec::new();
            }
        };

        let outputs = match parsed {
            GenerationResponse::One(one) => vec![one.generated_text],
            GenerationResponse::Many(items) => items
                .into_iter()
                .map(|item| match item {
                    GenerationItem::Object(o) => o.generated_text,
                    GenerationItem::Text(t) => t,
                })
                .collect(),
        };

        // dedupe, drop echoes of the input, cap at max
        let mut unique: Vec<String> = Vec::new();
        for output in outputs {
            let trimmed = output.trim().to_string();
            if trimmed.is_empty()
                || trimmed.eq_ignore_ascii_case(text)
                || unique.iter().any(|u| u == &trimmed)
            {
                continue;
            }
            unique.push(trimmed);
            if unique.len() >= max {
                break;
            }
        }
        unique
    }
}
