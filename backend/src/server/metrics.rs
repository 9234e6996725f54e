//! Prometheus request metrics for the API.
//!
//! [`MetricsLayer`] lets the app factory wrap the same middleware type whether
//! or not metrics initialised, so the app type stays the same either way.

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::BoxBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use futures_util::future::LocalBoxFuture;
use std::sync::Arc;

/// Metric name prefix.
pub(crate) const METRICS_NAMESPACE: &str = "foodgram";
/// Path the scrape endpoint is served from.
pub(crate) const METRICS_ENDPOINT: &str = "/metrics";
const UNMEASURED_PATHS: [&str; 2] = ["/health/ready", "/health/live"];

/// Build request metrics for the API, leaving probes unmeasured.
///
/// # Errors
/// Returns the Prometheus registration error when the collectors clash.
pub(crate) fn build_prometheus_metrics()
-> Result<PrometheusMetrics, impl std::fmt::Display + std::fmt::Debug> {
    UNMEASURED_PATHS
        .iter()
        .fold(
            PrometheusMetricsBuilder::new(METRICS_NAMESPACE).endpoint(METRICS_ENDPOINT),
            |builder, path| builder.exclude(*path),
        )
        .build()
}

#[derive(Clone)]
pub(crate) enum MetricsLayer {
    Enabled(Arc<PrometheusMetrics>),
    Disabled,
}

impl MetricsLayer {
    #[must_use]
    pub(crate) fn from_option(metrics: Option<PrometheusMetrics>) -> Self {
        match metrics {
            Some(metrics) => Self::Enabled(Arc::new(metrics)),
            None => Self::Disabled,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        match self.clone() {
            Self::Enabled(metrics) => {
                let fut = Compat::new((*metrics).clone()).new_transform(service);
                Box::pin(async move {
                    let svc = fut.await?;
                    Ok(boxed::service(svc))
                })
            }
            Self::Disabled => Box::pin(async move {
                let svc = service.map(|res: ServiceResponse<B>| res.map_into_boxed_body());
                Ok(boxed::service(svc))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn disabled_layer_passes_requests_through() {
        let app = test::init_service(
            App::new()
                .wrap(MetricsLayer::from_option(None))
                .route("/api/tags/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let response =
            test::call_service(&app, test::TestRequest::get().uri("/api/tags/").to_request())
                .await;
        assert!(response.status().is_success());
    }

    #[actix_web::test]
    async fn enabled_layer_serves_scrape_endpoint() {
        let metrics = build_prometheus_metrics().expect("metrics build");
        let app = test::init_service(
            App::new()
                .wrap(MetricsLayer::from_option(Some(metrics)))
                .route("/api/tags/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        test::call_service(&app, test::TestRequest::get().uri("/api/tags/").to_request()).await;
        let response =
            test::call_service(&app, test::TestRequest::get().uri(METRICS_ENDPOINT).to_request())
                .await;
        assert!(response.status().is_success());
        let body = test::read_body(response).await;
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("foodgram_http_requests_total"));
    }
}
