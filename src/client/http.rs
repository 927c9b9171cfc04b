//! [`BookingApi`] over HTTP

use crate::booking::model::{City, Client, Tour};
use crate::booking::payload::{BookingPayload, BookingRecord};
use crate::config::ApiConfig;
use crate::core::error::{DeskError, DeskResult, EntityError, ErrorResponse, RemoteError};
use crate::core::service::BookingApi;
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Client for a remote booking back office
///
/// Error bodies in the server's `{code, message, details}` shape become
/// [`RemoteError::Rejected`] with the per-field errors preserved, so a form
/// can show them inline.
#[derive(Clone)]
pub struct HttpBookingApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBookingApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> DeskResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &ApiConfig) -> DeskResult<Self> {
        Self::new(config.base_url.clone(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> DeskResult<T> {
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "booking API response");

        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                RemoteError::Decode {
                    message: e.to_string(),
                }
                .into()
            });
        }

        let body = response.text().await.map_err(transport)?;
        Err(rejection(status, &body))
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn list_tours(&self) -> DeskResult<Vec<Tour>> {
        self.send(self.http.get(self.url("/tours/all"))).await
    }

    async fn list_clients(&self) -> DeskResult<Vec<Client>> {
        self.send(self.http.get(self.url("/clients/all"))).await
    }

    async fn list_cities(&self) -> DeskResult<Vec<City>> {
        self.send(self.http.get(self.url("/cities/all"))).await
    }

    async fn create_booking(&self, payload: BookingPayload) -> DeskResult<BookingRecord> {
        self.send(self.http.post(self.url("/bookings")).json(&payload))
            .await
    }

    async fn update_booking(
        &self,
        id: Uuid,
        payload: BookingPayload,
    ) -> DeskResult<BookingRecord> {
        let url = self.url(&format!("/bookings/{}", id));
        self.send(self.http.put(url).json(&payload))
            .await
            .map_err(|e| booking_not_found(e, id))
    }

    async fn get_booking(&self, id: Uuid) -> DeskResult<BookingRecord> {
        let url = self.url(&format!("/bookings/{}", id));
        self.send(self.http.get(url))
            .await
            .map_err(|e| booking_not_found(e, id))
    }
}

fn transport(e: reqwest::Error) -> DeskError {
    RemoteError::Transport {
        message: e.to_string(),
    }
    .into()
}

fn rejection(status: StatusCode, body: &str) -> DeskError {
    let err = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(response) => {
            let fields = response.field_errors();
            RemoteError::Rejected {
                status: status.as_u16(),
                code: response.code,
                message: response.message,
                fields,
            }
        }
        Err(_) => RemoteError::Rejected {
            status: status.as_u16(),
            code: "HTTP_ERROR".to_string(),
            message: if body.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body.to_string()
            },
            fields: Vec::new(),
        },
    };
    err.into()
}

fn booking_not_found(err: DeskError, id: Uuid) -> DeskError {
    match err {
        DeskError::Remote(RemoteError::Rejected { status: 404, .. }) => EntityError::NotFound {
            entity_type: "booking".to_string(),
            id,
        }
        .into(),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_trimmed() {
        let api = HttpBookingApi::new("http://localhost:3000/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:3000");
        assert_eq!(api.url("/tours/all"), "http://localhost:3000/tours/all");
    }

    #[test]
    fn test_rejection_keeps_field_errors() {
        let body = r#"{
            "code": "VALIDATION_ERROR",
            "message": "Validation errors",
            "details": {"fields": [{"field": "groupTourMembers[0].mobile", "message": "Mobile must be 10 digits"}]}
        }"#;
        let err = rejection(StatusCode::UNPROCESSABLE_ENTITY, body);

        let fields = err.field_errors().unwrap();
        assert_eq!(fields[0].field, "groupTourMembers[0].mobile");
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_rejection_with_plain_body() {
        let err = rejection(StatusCode::BAD_GATEWAY, "");
        assert!(err.field_errors().is_none());
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[test]
    fn test_not_found_maps_to_entity_error() {
        let id = Uuid::new_v4();
        let err = booking_not_found(rejection(StatusCode::NOT_FOUND, "{}"), id);
        assert_eq!(err.error_code(), "ENTITY_NOT_FOUND");
    }
}
