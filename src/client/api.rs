//! HTTP client for the recipe API.

use crate::models::{Recipe, RecipeFields, RecipeQuery};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

/// Errors surfaced to the pages. The server's `{message}` is kept where
/// the user should see it.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("Recipe not found")]
    NotFound,

    #[error("Unexpected response ({status}): {message}")]
    Unexpected { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Where recipes come from. The pages only see this trait.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn list(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, ClientError>;

    /// `Ok(None)` when the recipe does not exist.
    async fn get(&self, id: &str) -> Result<Option<Recipe>, ClientError>;

    async fn create(&self, fields: &RecipeFields, token: &str) -> Result<Recipe, ClientError>;

    async fn update(
        &self,
        id: &str,
        fields: &RecipeFields,
        token: &str,
    ) -> Result<Recipe, ClientError>;

    async fn delete(&self, id: &str, token: &str) -> Result<(), ClientError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// [`RecipeSource`] over the REST API.
#[derive(Clone)]
pub struct HttpRecipeClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRecipeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn recipe_url(&self, id: &str) -> String {
        format!("{}/recipes/{}", self.base_url, urlencoding::encode(id))
    }

    fn list_url(&self, query: &RecipeQuery) -> String {
        let params: Vec<String> = [("search", &query.search), ("category", &query.category)]
            .into_iter()
            .filter_map(|(name, value)| {
                value
                    .as_deref()
                    .map(|v| format!("{name}={}", urlencoding::encode(v)))
            })
            .collect();

        if params.is_empty() {
            format!("{}/recipes", self.base_url)
        } else {
            format!("{}/recipes?{}", self.base_url, params.join("&"))
        }
    }

    /// Map a non-2xx response to a [`ClientError`].
    async fn error_from(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.message)
            .unwrap_or_default();

        match status {
            StatusCode::BAD_REQUEST => ClientError::Validation(message),
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound,
            _ => ClientError::Unexpected {
                status: status.as_u16(),
                message,
            },
        }
    }

    async fn json_or_error<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl RecipeSource for HttpRecipeClient {
    async fn list(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, ClientError> {
        let response = self.http.get(self.list_url(query)).send().await?;
        Self::json_or_error(response).await
    }

    async fn get(&self, id: &str) -> Result<Option<Recipe>, ClientError> {
        let response = self.http.get(self.recipe_url(id)).send().await?;
        match Self::json_or_error(response).await {
            Ok(recipe) => Ok(Some(recipe)),
            Err(ClientError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create(&self, fields: &RecipeFields, token: &str) -> Result<Recipe, ClientError> {
        let response = self
            .http
            .post(format!("{}/recipes", self.base_url))
            .bearer_auth(token)
            .json(fields)
            .send()
            .await?;
        Self::json_or_error(response).await
    }

    async fn update(
        &self,
        id: &str,
        fields: &RecipeFields,
        token: &str,
    ) -> Result<Recipe, ClientError> {
        let response = self
            .http
            .put(self.recipe_url(id))
            .bearer_auth(token)
            .json(fields)
            .send()
            .await?;
        Self::json_or_error(response).await
    }

    async fn delete(&self, id: &str, token: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.recipe_url(id))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn recipe_json(id: &str, title: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "category": "Soups",
            "prepMinutes": 30,
            "imageUrl": "",
            "ingredients": ["water"],
            "instructions": ["boil"],
            "ownerId": "alice",
            "createdAt": "2026-01-01T00:00:00.000Z",
            "updatedAt": "2026-01-01T00:00:00.000Z"
        })
    }

    fn fields() -> RecipeFields {
        RecipeFields {
            title: "Soup".into(),
            category: "Soups".into(),
            prep_minutes: 30,
            image_url: String::new(),
            ingredients: vec!["water".into()],
            instructions: vec!["boil".into()],
        }
    }

    #[test]
    fn test_list_url_encodes_and_skips_empty() {
        let client = HttpRecipeClient::new("http://api.test/");
        assert_eq!(
            client.list_url(&RecipeQuery::default()),
            "http://api.test/recipes"
        );
        assert_eq!(
            client.list_url(&RecipeQuery::new("mac & cheese", "")),
            "http://api.test/recipes?search=mac%20%26%20cheese"
        );
        assert_eq!(
            client.list_url(&RecipeQuery::new("", "Soups")),
            "http://api.test/recipes?category=Soups"
        );
    }

    #[tokio::test]
    async fn test_list_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/recipes"))
            .and(query_param("search", "soup"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([recipe_json("r1", "Soup")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpRecipeClient::new(server.uri());
        let recipes = client.list(&RecipeQuery::new("soup", "")).await.unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].owner_id.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/recipes/nope"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Recipe not found"})),
            )
            .mount(&server)
            .await;

        let client = HttpRecipeClient::new(server.uri());
        assert!(client.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_sends_bearer_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recipes"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(201).set_body_json(recipe_json("new", "Soup")))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpRecipeClient::new(server.uri());
        let created = client.create(&fields(), "tok").await.unwrap();
        assert_eq!(created.id, "new");

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["prepMinutes"], 30);
        assert_eq!(body["title"], "Soup");
    }

    #[tokio::test]
    async fn test_error_statuses_map_to_variants() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/recipes/theirs"))
            .respond_with(ResponseTemplate::new(403).set_body_json(
                json!({"message": "You can only modify your own recipes"}),
            ))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/recipes"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                json!({"message": "title and category are required"}),
            ))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/recipes/r1"))
            .respond_with(ResponseTemplate::new(401).set_body_json(
                json!({"message": "Invalid or expired token"}),
            ))
            .mount(&server)
            .await;

        let client = HttpRecipeClient::new(server.uri());

        match client.update("theirs", &fields(), "tok").await {
            Err(ClientError::Forbidden(msg)) => {
                assert_eq!(msg, "You can only modify your own recipes")
            }
            other => panic!("expected Forbidden, got {other:?}"),
        }
        match client.create(&fields(), "tok").await {
            Err(ClientError::Validation(msg)) => assert_eq!(msg, "title and category are required"),
            other => panic!("expected Validation, got {other:?}"),
        }
        assert!(matches!(
            client.delete("r1", "tok").await,
            Err(ClientError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_server_error_keeps_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/recipes"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "Database error"})))
            .mount(&server)
            .await;

        let client = HttpRecipeClient::new(server.uri());
        match client.list(&RecipeQuery::default()).await {
            Err(ClientError::Unexpected { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "Database error");
            }
            other => panic!("expected Unexpected, got {other:?}"),
        }
    }
}
