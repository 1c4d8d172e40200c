use serde::Deserialize;

use super::{NutritionService, UpstreamError};
use crate::models::{FoodRecord, NutrientEntry};

const SERVICE: &str = "USDA";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    foods: Option<Vec<SearchFood>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchFood {
    #[serde(default)]
    description: String,
    #[serde(default)]
    food_nutrients: Vec<SearchNutrient>,
}

// Search results are not uniform: survey foods omit some fields entirely
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchNutrient {
    #[serde(default)]
    nutrient_name: String,
    #[serde(default)]
    value: Option<f64>,
    #[serde(default)]
    unit_name: String,
}

impl From<SearchFood> for FoodRecord {
    fn from(food: SearchFood) -> Self {
        FoodRecord {
            description: food.description,
            nutrients: food
                .food_nutrients
                .into_iter()
                .map(|n| NutrientEntry::new(n.nutrient_name, n.value.unwrap_or(0.0), n.unit_name))
                .collect(),
        }
    }
}

/// USDA FoodData Central search client
pub struct UsdaClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl UsdaClient {
    pub fn new(api_key: String, base_url: String, client: reqwest::Client) -> Self {
        Self {
            api_key,
            base_url,
            client,
        }
    }

    fn search_url(&self) -> String {
        format!("{}/fdc/v1/foods/search", self.base_url.trim_end_matches('/'))
    }

    fn parse_search(body: &str) -> Result<Option<FoodRecord>, UpstreamError> {
        let response: SearchResponse =
            serde_json::from_str(body).map_err(|e| UpstreamError::Malformed {
                service: SERVICE,
                reason: e.to_string(),
            })?;

        Ok(response
            .foods
            .and_then(|foods| foods.into_iter().next())
            .map(FoodRecord::from))
    }
}

#[async_trait::async_trait]
impl NutritionService for UsdaClient {
    async fn search(&self, query: &str) -> Result<Option<FoodRecord>, UpstreamError> {
        let transport = |source: reqwest::Error| UpstreamError::Transport {
            service: SERVICE,
            source,
        };

        log::info!("🔎 Searching USDA for: {}", query);

        let response = self
            .client
            .get(self.search_url())
            .query(&[
                ("query", query),
                ("api_key", self.api_key.as_str()),
                ("pageSize", "1"),
            ])
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        log::debug!("📥 USDA response status: {}", status);

        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            log::error!("❌ USDA API error response: {}", body);
            return Err(UpstreamError::Status {
                service: SERVICE,
                status,
                body,
            });
        }

        Self::parse_search(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::http_client;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, timeout: Duration) -> UsdaClient {
        UsdaClient::new("usda_test".to_string(), server.uri(), http_client(timeout).unwrap())
    }

    #[tokio::test]
    async fn test_search_sends_query_key_and_page_size() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/fdc/v1/foods/search"))
            .and(query_param("query", "green apple"))
            .and(query_param("api_key", "usda_test"))
            .and(query_param("pageSize", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "totalHits": 1,
                "foods": [
                    {
                        "description": "Apples, granny smith, with skin, raw",
                        "foodNutrients": [
                            { "nutrientName": "Energy", "unitName": "KCAL", "value": 58 }
                        ]
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let record = client_for(&server, Duration::from_secs(5))
            .search("green apple")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(record.description, "Apples, granny smith, with skin, raw");
        assert_eq!(record.nutrients, vec![NutrientEntry::new("Energy", 58.0, "KCAL")]);
    }

    #[tokio::test]
    async fn test_search_zero_hits_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/fdc/v1/foods/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "totalHits": 0, "foods": [] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server, Duration::from_secs(5))
            .search("dragonfruit")
            .await
            .unwrap();

        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/fdc/v1/foods/search"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API_KEY_INVALID"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server, Duration::from_secs(5))
            .search("banana")
            .await
            .unwrap_err();

        match err {
            UpstreamError::Status { status, body, .. } => {
                assert_eq!(status, reqwest::StatusCode::FORBIDDEN);
                assert_eq!(body, "API_KEY_INVALID");
            }
            other => panic!("expected Status, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_timeout_is_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/fdc/v1/foods/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "foods": [] }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = client_for(&server, Duration::from_millis(100))
            .search("banana")
            .await
            .unwrap_err();

        match err {
            UpstreamError::Transport { source, .. } => assert!(source.is_timeout()),
            other => panic!("expected Transport, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_first_food() {
        let body = r#"{
            "totalHits": 2,
            "foods": [
                {
                    "fdcId": 1105314,
                    "description": "Bananas, raw",
                    "foodNutrients": [
                        { "nutrientId": 1003, "nutrientName": "Protein", "unitName": "G", "value": 1.09 },
                        { "nutrientId": 1008, "nutrientName": "Energy", "unitName": "KCAL", "value": 89 }
                    ]
                },
                { "description": "Banana bread", "foodNutrients": [] }
            ]
        }"#;

        let record = UsdaClient::parse_search(body).unwrap().unwrap();

        assert_eq!(record.description, "Bananas, raw");
        assert_eq!(
            record.nutrients,
            vec![
                NutrientEntry::new("Protein", 1.09, "G"),
                NutrientEntry::new("Energy", 89.0, "KCAL"),
            ]
        );
    }

    #[test]
    fn test_parse_search_no_results() {
        assert_eq!(
            UsdaClient::parse_search(r#"{ "totalHits": 0, "foods": [] }"#).unwrap(),
            None
        );
        assert_eq!(UsdaClient::parse_search(r#"{ "totalHits": 0 }"#).unwrap(), None);
    }

    #[test]
    fn test_parse_search_tolerates_missing_nutrient_fields() {
        let body = r#"{
            "foods": [
                { "description": "Apple", "foodNutrients": [ { "nutrientName": "Fiber" } ] }
            ]
        }"#;

        let record = UsdaClient::parse_search(body).unwrap().unwrap();
        assert_eq!(record.nutrients, vec![NutrientEntry::new("Fiber", 0.0, "")]);
    }

    #[test]
    fn test_parse_search_not_json() {
        let err = UsdaClient::parse_search("Service Unavailable").unwrap_err();
        assert!(matches!(err, UpstreamError::Malformed { .. }));
    }

    #[test]
    fn test_search_url() {
        let client = UsdaClient::new(
            "key".to_string(),
            "https://api.nal.usda.gov".to_string(),
            reqwest::Client::new(),
        );

        assert_eq!(client.search_url(), "https://api.nal.usda.gov/fdc/v1/foods/search");
    }
}
