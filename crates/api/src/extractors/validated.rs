//! Body and query extractors that reject with the validation error shape.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// JSON body that has been deserialized and validated.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate()?;
        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::invalid("body", "Expected a JSON body with Content-Type: application/json")
        }
        other => ApiError::invalid("body", other.body_text()),
    }
}

/// Query string parsed into `T`.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid("query", e.body_text()))?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Named {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
    }

    #[derive(Debug, Deserialize)]
    struct Window {
        start: chrono::NaiveDate,
    }

    fn json_request(body: &str) -> Request {
        HttpRequest::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_json_passes() {
        let ValidatedJson(named) = ValidatedJson::<Named>::from_request(json_request(r#"{"name":"Ana"}"#), &())
            .await
            .unwrap();
        assert_eq!(named.name, "Ana");
    }

    #[tokio::test]
    async fn test_invalid_field_rejected() {
        let err = ValidatedJson::<Named>::from_request(json_request(r#"{"name":""}"#), &())
            .await
            .unwrap_err();
        match err {
            ApiError::Validation(errors) => {
                assert_eq!(errors[0].field, "name");
                assert_eq!(errors[0].message, "Name is required");
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let err = ValidatedJson::<Named>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref e) if e[0].field == "body"));
    }

    #[tokio::test]
    async fn test_unparsable_query_is_validation_error() {
        let req = HttpRequest::builder()
            .uri("/?start=yesterday")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = req.into_parts();
        let err = QueryParams::<Window>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref e) if e[0].field == "query"));

        let req = HttpRequest::builder()
            .uri("/?start=2024-03-01")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = req.into_parts();
        let QueryParams(window) = QueryParams::<Window>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(window.start, chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }
}
