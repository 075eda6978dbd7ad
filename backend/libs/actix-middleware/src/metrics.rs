//! HTTP request metrics
//!
//! Labels use the matched route pattern (`/api/posts/{id}`) rather than the
//! raw path so per-id URLs do not explode label cardinality.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::{ready, Ready};
use prometheus::{HistogramVec, IntCounterVec};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::time::Instant;

const UNMATCHED_ROUTE: &str = "unmatched";

/// Prometheus Metrics Middleware
#[derive(Clone, Default)]
pub struct MetricsMiddleware;

lazy_static::lazy_static! {
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "http_requests_total",
        "Total HTTP requests",
        &["method", "route", "status"]
    ).unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = prometheus::register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request latency",
        &["method", "route", "status"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).unwrap();
}

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = MetricsMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let start = Instant::now();
        let method = req.method().to_string();
        let route = req
            .match_pattern()
            .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

        Box::pin(async move {
            let result = service.call(req).await;
            let status = match &result {
                Ok(res) => res.status().as_u16().to_string(),
                Err(e) => e.as_response_error().status_code().as_u16().to_string(),
            };

            HTTP_REQUESTS_TOTAL
                .with_label_values(&[&method, &route, &status])
                .inc();
            HTTP_REQUEST_DURATION_SECONDS
                .with_label_values(&[&method, &route, &status])
                .observe(start.elapsed().as_secs_f64());

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    async fn ok_handler() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn test_records_by_route_pattern() {
        let app = test::init_service(
            App::new()
                .wrap(MetricsMiddleware)
                .route("/items/{id}", web::get().to(ok_handler)),
        )
        .await;

        let before = HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/items/{id}", "200"])
            .get();

        for id in ["a", "b", "c"] {
            let req = test::TestRequest::get().uri(&format!("/items/{}", id)).to_request();
            let resp = test::call_service(&app, req).await;
            assert!(resp.status().is_success());
        }

        let after = HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/items/{id}", "200"])
            .get();
        assert_eq!(after - before, 3);
    }
}
