use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::generator::AnswerGenerator;
use crate::core::config::Settings;
use crate::core::errors::ChatError;

/// Generator backed by a hosted text-model invoke endpoint
/// (Titan-style request/response shapes, keyed auth per region).
#[derive(Clone)]
pub struct TitanGenerator {
    base_url: String,
    api_key: String,
    region: String,
    model_id: String,
    client: Client,
}

impl TitanGenerator {
    pub fn new(settings: &Settings) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| ChatError::Configuration(e.to_string()))?;

        Ok(Self {
            base_url: settings.model_endpoint.trim_end_matches('/').to_string(),
            api_key: settings.model_api_key.clone(),
            region: settings.model_region.clone(),
            model_id: settings.model_id.clone(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct InvokeResponse {
    results: Vec<InvokeResult>,
}

#[derive(Debug, Deserialize)]
struct InvokeResult {
    #[serde(rename = "outputText")]
    output_text: String,
}

fn answer_from_response(response: InvokeResponse) -> Result<String, ChatError> {
    let text = response
        .results
        .into_iter()
        .next()
        .map(|r| r.output_text)
        .unwrap_or_default();

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ChatError::Generation("model returned no text".to_string()));
    }
    Ok(trimmed.to_string())
}

#[async_trait]
impl AnswerGenerator for TitanGenerator {
    fn name(&self) -> &str {
        "titan"
    }

    async fn health_check(&self) -> Result<bool, ChatError> {
        let url = format!("{}/models", self.base_url);
        let res = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .header("x-region", &self.region)
            .send()
            .await;
        match res {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, ChatError> {
        let url = format!("{}/model/{}/invoke", self.base_url, self.model_id);

        let body = json!({
            "inputText": prompt,
            "textGenerationConfig": {
                "maxTokenCount": 512,
                "temperature": 0.7,
                "topP": 0.9,
            },
        });

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("x-region", &self.region)
            .json(&body)
            .send()
            .await
            .map_err(ChatError::generation)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ChatError::Generation(format!(
                "model backend returned {}: {}",
                status, text
            )));
        }

        let response: InvokeResponse = res.json().await.map_err(ChatError::generation)?;
        answer_from_response(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: serde_json::Value) -> Result<String, ChatError> {
        let response: InvokeResponse = serde_json::from_value(value).expect("response shape");
        answer_from_response(response)
    }

    #[test]
    fn takes_first_result_text() {
        let answer = parse(serde_json::json!({
            "results": [
                { "outputText": "The Seahawks need a corner." },
                { "outputText": "ignored" },
            ]
        }))
        .expect("answer");
        assert_eq!(answer, "The Seahawks need a corner.");
    }

    #[test]
    fn empty_results_is_a_generation_error() {
        let err = parse(serde_json::json!({ "results": [] })).unwrap_err();
        assert!(matches!(err, ChatError::Generation(_)));
    }

    #[test]
    fn whitespace_output_is_a_generation_error() {
        let err = parse(serde_json::json!({ "results": [ { "outputText": "  \n" } ] })).unwrap_err();
        assert!(matches!(err, ChatError::Generation(_)));
    }

    #[test]
    fn output_is_trimmed() {
        let answer = parse(serde_json::json!({ "results": [ { "outputText": "\nanswer \n" } ] }))
            .expect("answer");
        assert_eq!(answer, "answer");
    }
}
