//! Request correlation ID middleware
//!
//! Reuses an incoming `x-correlation-id` header or generates a UUID v4,
//! stores it in request extensions as [`CorrelationId`] and echoes it on
//! the response.

use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use uuid::Uuid;

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

const MAX_CORRELATION_ID_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    fn from_header(value: Option<&HeaderValue>) -> Self {
        value
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty() && s.len() <= MAX_CORRELATION_ID_LEN)
            .map(|s| CorrelationId(s.to_string()))
            .unwrap_or_else(|| CorrelationId(Uuid::new_v4().to_string()))
    }
}

/// Middleware that manages request correlation IDs
#[derive(Clone, Default)]
pub struct CorrelationIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for CorrelationIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CorrelationIdMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorrelationIdMiddlewareService { service }))
    }
}

pub struct CorrelationIdMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for CorrelationIdMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let correlation_id = CorrelationId::from_header(req.headers().get(CORRELATION_ID_HEADER));
        req.extensions_mut().insert(correlation_id.clone());

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            match HeaderValue::from_str(&correlation_id.0) {
                Ok(value) => {
                    res.headers_mut()
                        .insert(HeaderName::from_static(CORRELATION_ID_HEADER), value);
                }
                Err(e) => tracing::debug!("correlation id not echoed: {}", e),
            }
            Ok(res)
        })
    }
}

impl FromRequest for CorrelationId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let id = req
            .extensions()
            .get::<CorrelationId>()
            .cloned()
            .unwrap_or_else(|| CorrelationId::from_header(req.headers().get(CORRELATION_ID_HEADER)));
        ready(Ok(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    async fn echo(id: CorrelationId) -> HttpResponse {
        HttpResponse::Ok().body(id.0)
    }

    #[actix_web::test]
    async fn test_reuses_incoming_header() {
        let app = test::init_service(
            App::new()
                .wrap(CorrelationIdMiddleware)
                .route("/", web::get().to(echo)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((CORRELATION_ID_HEADER, "abc-123"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.headers().get(CORRELATION_ID_HEADER).unwrap(), "abc-123");
        let body = test::read_body(resp).await;
        assert_eq!(body, "abc-123");
    }

    #[actix_web::test]
    async fn test_generates_uuid_when_missing() {
        let app = test::init_service(
            App::new()
                .wrap(CorrelationIdMiddleware)
                .route("/", web::get().to(echo)),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;

        let header = resp.headers().get(CORRELATION_ID_HEADER).unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(header).is_ok());
    }

    #[::core::prelude::v1::test]
    fn test_oversized_header_replaced() {
        let long = HeaderValue::from_str(&"x".repeat(MAX_CORRELATION_ID_LEN + 1)).unwrap();
        let id = CorrelationId::from_header(Some(&long));
        assert_eq!(id.0.len(), 36);
    }
}
