//! Inference capabilities behind the relevance and bias evaluators.
//!
//! Two traits, two families of implementations:
//! * offline: [`LexicalSimilarity`] + [`LexiconSentiment`], deterministic, no I/O;
//! * remote: [`RemoteInference`], a hosted feature-extraction and
//!   text-classification service (Hugging Face Inference API shape).
//!
//! Both are `Send + Sync` and built once, then shared across evaluations.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{ModelMode, ModelsConfig};
use crate::sentiment::LexiconSentiment;
use crate::similarity::{cosine_similarity, LexicalSimilarity};

#[async_trait]
pub trait SimilarityModel: Send + Sync {
    /// Semantic similarity of `a` and `b` in [-1, 1].
    async fn similarity(&self, a: &str, b: &str) -> Result<f32>;
    fn name(&self) -> &'static str;
}

#[async_trait]
pub trait SentimentModel: Send + Sync {
    /// Top label for `text`, e.g. `POSITIVE`.
    async fn classify(&self, text: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

pub type DynSimilarity = Arc<dyn SimilarityModel>;
pub type DynSentiment = Arc<dyn SentimentModel>;

/// Factory: build both capabilities according to `models.mode`.
pub fn build_models(config: &ModelsConfig) -> Result<(DynSimilarity, DynSentiment)> {
    match config.mode {
        ModelMode::Offline => {
            info!(target: "models", "using offline similarity + lexicon sentiment");
            let similarity: DynSimilarity = Arc::new(LexicalSimilarity::new());
            let sentiment: DynSentiment = Arc::new(LexiconSentiment::new());
            Ok((similarity, sentiment))
        }
        ModelMode::Remote => {
            let remote = Arc::new(RemoteInference::new(config)?);
            info!(
                target: "models",
                endpoint = %config.endpoint,
                similarity_model = %config.similarity_model,
                sentiment_model = %config.sentiment_model,
                key_len = config.api_key.len(),
                "using remote inference"
            );
            let similarity: DynSimilarity = remote.clone();
            let sentiment: DynSentiment = remote;
            Ok((similarity, sentiment))
        }
    }
}

// ------------------------------------------------------------
// Remote provider
// ------------------------------------------------------------

/// Hosted inference over HTTP. One client, reused for both capabilities.
pub struct RemoteInference {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    similarity_model: String,
    sentiment_model: String,
    label_aliases: HashMap<String, String>,
}

#[derive(Serialize)]
struct InputsReq<T: Serialize> {
    inputs: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<ReqOptions>,
}

#[derive(Serialize)]
struct ReqOptions {
    /// Block until a cold model is loaded instead of failing with 503.
    wait_for_model: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub(crate) struct LabelScore {
    pub label: String,
    pub score: f32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassifyResp {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl RemoteInference {
    pub fn new(config: &ModelsConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("url-validator/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(config.timeout_secs.clamp(1, 4)))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("building inference HTTP client")?;
        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            similarity_model: config.similarity_model.clone(),
            sentiment_model: config.sentiment_model.clone(),
            label_aliases: config.label_aliases.clone(),
        })
    }

    fn options() -> Option<ReqOptions> {
        Some(ReqOptions {
            wait_for_model: true,
        })
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<reqwest::Response> {
        let mut req = self
            .http
            .post(format!("{}/{}", self.endpoint, path))
            .json(body);
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }
        let resp = req.send().await.context("inference request failed")?;
        let status = resp.status();
        if !status.is_success() {
            bail!("inference endpoint returned HTTP {}", status.as_u16());
        }
        Ok(resp)
    }

    /// Embed several texts in one call.
    pub async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let path = format!("pipeline/feature-extraction/{}", self.similarity_model);
        let body = InputsReq {
            inputs: texts,
            options: Self::options(),
        };
        let vectors: Vec<Vec<f32>> = self
            .post(&path, &body)
            .await?
            .json()
            .await
            .context("decoding embeddings")?;
        if vectors.len() != texts.len() {
            bail!(
                "expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            );
        }
        Ok(vectors)
    }

    fn canonical_label(&self, raw: &str) -> String {
        self.label_aliases
            .get(raw)
            .cloned()
            .unwrap_or_else(|| raw.to_string())
    }
}

/// Highest-scoring label across either response shape.
pub(crate) fn top_label(scores: Vec<LabelScore>) -> Option<LabelScore> {
    scores
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
}

#[async_trait]
impl SimilarityModel for RemoteInference {
    async fn similarity(&self, a: &str, b: &str) -> Result<f32> {
        let vectors = self.embed(&[a, b]).await?;
        Ok(cosine_similarity(&vectors[0], &vectors[1]))
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

#[async_trait]
impl SentimentModel for RemoteInference {
    async fn classify(&self, text: &str) -> Result<String> {
        let path = format!("models/{}", self.sentiment_model);
        let body = InputsReq {
            inputs: text,
            options: Self::options(),
        };
        let resp: ClassifyResp = self
            .post(&path, &body)
            .await?
            .json()
            .await
            .context("decoding classification")?;
        let scores = match resp {
            ClassifyResp::Nested(mut outer) => {
                if outer.is_empty() {
                    Vec::new()
                } else {
                    outer.swap_remove(0)
                }
            }
            ClassifyResp::Flat(v) => v,
        };
        let top = top_label(scores).ok_or_else(|| anyhow!("classifier returned no labels"))?;
        Ok(self.canonical_label(&top.label))
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ls(label: &str, score: f32) -> LabelScore {
        LabelScore {
            label: label.to_string(),
            score,
        }
    }

    #[test]
    fn top_label_picks_highest_score() {
        let top = top_label(vec![ls("NEGATIVE", 0.1), ls("POSITIVE", 0.7), ls("NEUTRAL", 0.2)]);
        assert_eq!(top.map(|l| l.label), Some("POSITIVE".to_string()));
        assert!(top_label(Vec::new()).is_none());
    }

    #[test]
    fn both_classification_shapes_decode() {
        let nested: ClassifyResp =
            serde_json::from_str(r#"[[{"label":"LABEL_2","score":0.9}]]"#).unwrap();
        assert!(matches!(nested, ClassifyResp::Nested(_)));
        let flat: ClassifyResp =
            serde_json::from_str(r#"[{"label":"NEUTRAL","score":0.5}]"#).unwrap();
        assert!(matches!(flat, ClassifyResp::Flat(_)));
    }

    #[test]
    fn label_aliases_translate_provider_labels() {
        let mut cfg = ModelsConfig::default();
        cfg.label_aliases
            .insert("LABEL_2".to_string(), "POSITIVE".to_string());
        let remote = RemoteInference::new(&cfg).unwrap();
        assert_eq!(remote.canonical_label("LABEL_2"), "POSITIVE");
        assert_eq!(remote.canonical_label("LABEL_0"), "LABEL_0");
    }

    #[test]
    fn request_body_shape() {
        let body = InputsReq {
            inputs: ["a", "b"],
            options: RemoteInference::options(),
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["inputs"], serde_json::json!(["a", "b"]));
        assert_eq!(v["options"]["wait_for_model"], serde_json::json!(true));
    }

    #[test]
    fn offline_factory_names() {
        let (sim, sent) = build_models(&ModelsConfig::default()).unwrap();
        assert_eq!(sim.name(), "lexical");
        assert_eq!(sent.name(), "lexicon");
    }
}
