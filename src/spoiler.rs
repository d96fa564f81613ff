//! Spoiler gate for reviews tagged as spoiler-free.

use async_trait::async_trait;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

use crate::config;

/// Label and confidence a classifier assigned to a text.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Verdict {
    pub label: String,
    pub score: f32,
}

#[derive(Debug, Display, From)]
pub enum Error {
    #[display("classifier request failed: {_0}")]
    #[from]
    Request(reqwest::Error),

    #[display("classifier returned no verdict")]
    Empty,
}

#[async_trait]
pub trait Classify: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Verdict, Error>;
}

/// Whether a comment may be published as spoiler-free.
pub fn is_non_spoiler(verdict: &Verdict, threshold: f32) -> bool {
    let label = verdict.label.to_lowercase();
    let spoiler = label.contains("spoiler")
        && !label.starts_with("non")
        && !label.starts_with("no_")
        && !label.starts_with("no-");
    !spoiler && verdict.score >= threshold
}

/// Text classification inference endpoint.
pub struct HttpClassifier {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

#[derive(Serialize)]
struct Request<'a> {
    inputs: &'a str,
}

/// Inference endpoints answer either with a flat list of verdicts or with
/// one list per input.
#[derive(Deserialize)]
#[serde(untagged)]
enum Response {
    Nested(Vec<Vec<Verdict>>),
    Flat(Vec<Verdict>),
}

impl Response {
    fn into_top(self) -> Option<Verdict> {
        match self {
            Self::Nested(lists) => lists.into_iter().next()?.into_iter().next(),
            Self::Flat(verdicts) => verdicts.into_iter().next(),
        }
    }
}

impl HttpClassifier {
    pub fn new(config: config::Spoiler) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.url,
            token: config.token,
        }
    }
}

#[async_trait]
impl Classify for HttpClassifier {
    async fn classify(&self, text: &str) -> Result<Verdict, Error> {
        let mut request =
            self.client.post(&self.url).json(&Request { inputs: text });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let verdict = request
            .send()
            .await?
            .error_for_status()?
            .json::<Response>()
            .await?
            .into_top()
            .ok_or(Error::Empty)?;

        tracing::debug!(label = %verdict.label, score = verdict.score, "classified");
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(label: &str, score: f32) -> Verdict {
        Verdict {
            label: label.to_owned(),
            score,
        }
    }

    #[test]
    fn confident_clean_label_passes() {
        assert!(is_non_spoiler(&verdict("LABEL_0", 0.99), 0.95));
        assert!(is_non_spoiler(&verdict("non_spoiler", 0.97), 0.95));
    }

    #[test]
    fn spoiler_label_is_rejected() {
        assert!(!is_non_spoiler(&verdict("SPOILER", 0.99), 0.95));
        assert!(!is_non_spoiler(&verdict("is_spoiler", 0.5), 0.95));
    }

    #[test]
    fn low_confidence_is_rejected() {
        assert!(!is_non_spoiler(&verdict("LABEL_0", 0.94), 0.95));
    }

    #[test]
    fn reads_nested_and_flat_responses() {
        let nested: Response = serde_json::from_str(
            r#"[[{"label": "LABEL_1", "score": 0.8}, {"label": "LABEL_0", "score": 0.2}]]"#,
        )
        .unwrap();
        assert_eq!(nested.into_top(), Some(verdict("LABEL_1", 0.8)));

        let flat: Response =
            serde_json::from_str(r#"[{"label": "LABEL_0", "score": 0.96}]"#)
                .unwrap();
        assert_eq!(flat.into_top(), Some(verdict("LABEL_0", 0.96)));

        let empty: Response = serde_json::from_str("[]").unwrap();
        assert_eq!(empty.into_top(), None);
    }
}
