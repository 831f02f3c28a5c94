use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::retriever::DocumentRetriever;
use super::types::RetrievedDocument;
use crate::core::config::Settings;
use crate::core::errors::ChatError;

/// Retriever backed by an Elasticsearch-style `_search` endpoint with
/// basic auth. Hit shapes are validated at this boundary: a hit without
/// a `title` in its metadata is malformed and fails the whole query.
#[derive(Clone)]
pub struct ElasticRetriever {
    base_url: String,
    index: String,
    username: String,
    password: String,
    size: usize,
    client: Client,
}

impl ElasticRetriever {
    pub fn new(settings: &Settings) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| ChatError::Configuration(e.to_string()))?;

        Ok(Self {
            base_url: settings.search_endpoint.trim_end_matches('/').to_string(),
            index: settings.search_index.clone(),
            username: settings.search_username.clone(),
            password: settings.search_password.clone(),
            size: settings.retrieval_size,
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: HitSource,
}

#[derive(Debug, Deserialize)]
struct HitSource {
    content: String,
    #[serde(default)]
    metadata: std::collections::HashMap<String, String>,
}

fn documents_from_response(response: SearchResponse) -> Result<Vec<RetrievedDocument>, ChatError> {
    response
        .hits
        .hits
        .into_iter()
        .map(|hit| {
            let mut source = hit.source;
            let title = source
                .metadata
                .get("title")
                .cloned()
                .ok_or_else(|| ChatError::Retrieval("document missing title metadata".to_string()))?;
            Ok(RetrievedDocument {
                title,
                content: std::mem::take(&mut source.content),
                metadata: source.metadata,
            })
        })
        .collect()
}

#[async_trait]
impl DocumentRetriever for ElasticRetriever {
    fn name(&self) -> &str {
        "elastic"
    }

    async fn health_check(&self) -> Result<bool, ChatError> {
        let url = format!("{}/{}", self.base_url, self.index);
        let res = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await;
        match res {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<RetrievedDocument>, ChatError> {
        let url = format!("{}/{}/_search", self.base_url, self.index);

        let body = json!({
            "query": { "match": { "content": query } },
            "size": self.size,
            "_source": ["content", "metadata"],
        });

        let res = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&body)
            .send()
            .await
            .map_err(ChatError::retrieval)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ChatError::Retrieval(format!(
                "search backend returned {}: {}",
                status, text
            )));
        }

        let response: SearchResponse = res.json().await.map_err(ChatError::retrieval)?;
        let documents = documents_from_response(response)?;
        tracing::debug!("retrieved {} documents for query", documents.len());
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: serde_json::Value) -> Result<Vec<RetrievedDocument>, ChatError> {
        let response: SearchResponse = serde_json::from_value(value).expect("response shape");
        documents_from_response(response)
    }

    #[test]
    fn parses_hits_in_order() {
        let docs = parse(serde_json::json!({
            "hits": { "hits": [
                { "_source": { "content": "Pick analysis", "metadata": { "title": "Mock Draft 2024" } } },
                { "_source": { "content": "Trade rumors", "metadata": { "title": "Draft Buzz" } } },
            ]}
        }))
        .expect("parse");

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].title, "Mock Draft 2024");
        assert_eq!(docs[1].title, "Draft Buzz");
        assert_eq!(docs[0].content, "Pick analysis");
    }

    #[test]
    fn empty_hits_parse_to_empty_sequence() {
        let docs = parse(serde_json::json!({ "hits": { "hits": [] } })).expect("parse");
        assert!(docs.is_empty());
    }

    #[test]
    fn hit_without_title_is_malformed() {
        let err = parse(serde_json::json!({
            "hits": { "hits": [
                { "_source": { "content": "orphan", "metadata": {} } },
            ]}
        }))
        .unwrap_err();

        assert!(matches!(err, ChatError::Retrieval(_)));
    }

    #[test]
    fn missing_source_field_fails_deserialization() {
        let result = serde_json::from_value::<SearchResponse>(serde_json::json!({
            "hits": { "hits": [ { "_id": "1" } ] }
        }));
        assert!(result.is_err());
    }
}
