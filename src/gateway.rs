use crate::composition::{Composition, CompositionEntry};

/// Base URL of the deployed prediction service.
pub const DEFAULT_BASE_URL: &str = "https://apollo-8pu2.onrender.com";

/// Client for the external prediction service. Calls are single-shot: a
/// failure surfaces to the caller and is never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gateway {
    base_url: String,
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl Gateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("recipe not found: {name}")]
    RecipeNotFound { name: String },
    #[error("prediction service returned {status}: {body}")]
    Service { status: u16, body: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct MaterialListResponse {
    pub materials: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct RecipeListResponse {
    pub recipes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    pub recipe_name: String,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeCompositionResponse {
    pub material_compositions: Vec<CompositionEntry>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    pub material_compositions: Composition,
}

#[cfg(target_arch = "wasm32")]
mod http {
    use gloo_net::http::{Request, Response};

    use super::*;
    use crate::prediction::RawPrediction;

    async fn decode<T: serde::de::DeserializeOwned>(
        response: Response,
    ) -> Result<T, GatewayError> {
        if !response.ok() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("prediction service returned {status}");
            return Err(GatewayError::Service { status, body });
        }

        response
            .json::<T>()
            .await
            .map_err(|error| GatewayError::Decode(error.to_string()))
    }

    impl Gateway {
        pub async fn list_materials(&self) -> Result<Vec<String>, GatewayError> {
            let response = Request::get(&self.endpoint("/materials"))
                .send()
                .await
                .map_err(|error| GatewayError::Network(error.to_string()))?;

            decode::<MaterialListResponse>(response)
                .await
                .map(|list| list.materials)
        }

        pub async fn list_recipes(&self) -> Result<Vec<String>, GatewayError> {
            let response = Request::get(&self.endpoint("/recipes"))
                .send()
                .await
                .map_err(|error| GatewayError::Network(error.to_string()))?;

            decode::<RecipeListResponse>(response)
                .await
                .map(|list| list.recipes)
        }

        /// Fetches the stored composition for a named recipe. A 404 means
        /// the name did not resolve and maps to [`GatewayError::RecipeNotFound`].
        pub async fn recipe_composition(
            &self,
            recipe_name: &str,
        ) -> Result<Composition, GatewayError> {
            log::debug!("fetching composition for recipe {recipe_name}");
            let request = Request::post(&self.endpoint("/get-recipe-composition"))
                .json(&RecipeRequest {
                    recipe_name: recipe_name.to_string(),
                })
                .map_err(|error| GatewayError::Network(error.to_string()))?;

            let response = request
                .send()
                .await
                .map_err(|error| GatewayError::Network(error.to_string()))?;

            if response.status() == 404 {
                return Err(GatewayError::RecipeNotFound {
                    name: recipe_name.to_string(),
                });
            }

            decode::<RecipeCompositionResponse>(response)
                .await
                .map(|body| body.material_compositions)
        }

        /// Submits a validated composition and returns the raw prediction
        /// payload for the formatter.
        pub async fn predict(
            &self,
            composition: &[CompositionEntry],
        ) -> Result<RawPrediction, GatewayError> {
            log::debug!("submitting {} materials for prediction", composition.len());
            let request = Request::post(&self.endpoint("/predict"))
                .json(&PredictRequest {
                    material_compositions: composition.to_vec(),
                })
                .map_err(|error| GatewayError::Network(error.to_string()))?;

            let response = request
                .send()
                .await
                .map_err(|error| GatewayError::Network(error.to_string()))?;

            decode(response).await
        }

        /// Reachability probe against the service root.
        pub async fn health(&self) -> bool {
            match Request::get(&self.endpoint("/")).send().await {
                Ok(response) => response.ok(),
                Err(error) => {
                    log::warn!("health check failed: {error}");
                    false
                }
            }
        }
    }
}
