// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the external sentiment/classification service.
//!
//! One request per message: `POST {endpoint}` with `{subject, body,
//! from_email}` JSON, answered by a classification envelope. The client does
//! not retry; on any failure the pipeline writes the ticket with
//! [`Analysis::fallback`] values instead.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use innkeep_config::model::AnalysisConfig;
use innkeep_core::types::Analysis;
use innkeep_core::{InnkeepError, MessageAnalyzer};

/// Request body sent to the classification service.
#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    subject: &'a str,
    body: &'a str,
    from_email: &'a str,
}

/// Response envelope returned by the classification service.
///
/// The service echoes the submitted email alongside the analysis; only the
/// analysis block is consumed here.
#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    analysis: Analysis,
}

/// [`MessageAnalyzer`] implementation over HTTP.
pub struct HttpAnalyzer {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpAnalyzer {
    /// Build a client for the configured endpoint with the configured
    /// request timeout.
    pub fn new(config: &AnalysisConfig) -> Result<Self, InnkeepError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InnkeepError::Analysis {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
        })
    }
}

#[async_trait]
impl MessageAnalyzer for HttpAnalyzer {
    async fn analyze(
        &self,
        subject: &str,
        body: &str,
        from_email: &str,
    ) -> Result<Analysis, InnkeepError> {
        let request = AnalyzeRequest {
            subject,
            body,
            from_email,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| InnkeepError::Analysis {
                message: format!("analysis request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(InnkeepError::Analysis {
                message: format!("analysis service returned {status}"),
                source: None,
            });
        }

        let envelope: AnalyzeResponse =
            response.json().await.map_err(|e| InnkeepError::Analysis {
                message: format!("analysis response was not valid JSON: {e}"),
                source: Some(Box::new(e)),
            })?;

        debug!(
            category = envelope.analysis.category.as_str(),
            sentiment_confidence = envelope.analysis.sentiment_confidence,
            "message classified"
        );
        Ok(envelope.analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_config(endpoint: String) -> AnalysisConfig {
        AnalysisConfig {
            endpoint,
            timeout_secs: 5,
        }
    }

    fn classification_body() -> serde_json::Value {
        serde_json::json!({
            "analysis": {
                "category": "booking_request",
                "category_confidence": 0.91,
                "sentiment": "positive",
                "sentiment_confidence": 0.84,
                "booking_info": {
                    "guest_name": "Ada Lovelace",
                    "hotel_name": "Acacia Lodge",
                    "room_type": "double",
                    "check_in": "2026-09-01",
                    "check_out": "2026-09-04",
                    "num_nights": 3
                }
            },
            "email": {
                "subject": "Room for September",
                "body": "I'd like a double room.",
                "from_email": "ada@example.com"
            }
        })
    }

    #[tokio::test]
    async fn analyze_posts_expected_payload_and_maps_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/process_email"))
            .and(body_json(serde_json::json!({
                "subject": "Room for September",
                "body": "I'd like a double room.",
                "from_email": "ada@example.com"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(classification_body()))
            .expect(1)
            .mount(&server)
            .await;

        let analyzer =
            HttpAnalyzer::new(&make_config(format!("{}/api/process_email", server.uri())))
                .unwrap();
        let analysis = analyzer
            .analyze("Room for September", "I'd like a double room.", "ada@example.com")
            .await
            .unwrap();

        assert_eq!(analysis.category, "booking_request");
        assert_eq!(analysis.sentiment_confidence, 0.84);
        assert_eq!(analysis.booking_info.guest_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(analysis.booking_info.num_nights, Some(3));
    }

    #[tokio::test]
    async fn non_2xx_status_is_an_analysis_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let analyzer = HttpAnalyzer::new(&make_config(server.uri())).unwrap();
        let err = analyzer.analyze("s", "b", "f@example.com").await.unwrap_err();
        assert!(matches!(err, InnkeepError::Analysis { .. }));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn malformed_body_is_an_analysis_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let analyzer = HttpAnalyzer::new(&make_config(server.uri())).unwrap();
        let err = analyzer.analyze("s", "b", "f@example.com").await.unwrap_err();
        assert!(matches!(err, InnkeepError::Analysis { .. }));
    }

    #[tokio::test]
    async fn unreachable_service_is_an_analysis_error() {
        // Port 1 is never listening.
        let analyzer =
            HttpAnalyzer::new(&make_config("http://127.0.0.1:1/api".to_string())).unwrap();
        let err = analyzer.analyze("s", "b", "f@example.com").await.unwrap_err();
        assert!(matches!(err, InnkeepError::Analysis { .. }));
    }

    #[tokio::test]
    async fn partial_booking_info_is_tolerated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "analysis": {
                    "category": "general_inquiry",
                    "category_confidence": 0.6,
                    "sentiment": "neutral",
                    "sentiment_confidence": 0.5,
                    "booking_info": {}
                }
            })))
            .mount(&server)
            .await;

        let analyzer = HttpAnalyzer::new(&make_config(server.uri())).unwrap();
        let analysis = analyzer.analyze("s", "b", "f@example.com").await.unwrap();
        assert_eq!(analysis.category, "general_inquiry");
        assert!(analysis.booking_info.guest_name.is_none());
    }
}
