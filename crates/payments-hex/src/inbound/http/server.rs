use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    serve, Json, Router,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::application::payment_service::PaymentService;
use crate::errors::AppError;
use payments_types::domain::payment::{AccountQuery, PaymentCreated, PaymentRequest};
use payments_types::ports::payment_provider::PaymentProvider;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

#[derive(Clone)]
pub struct HttpServer<P>
where
    P: PaymentProvider,
{
    pub service: Arc<PaymentService<P>>,
    pub config: HttpServerConfig,
}

impl<P> HttpServer<P>
where
    P: PaymentProvider,
{
    pub async fn new(service: PaymentService<P>, config: HttpServerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }

    pub fn router(&self) -> Router {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http_request",
                    %request_id,
                    method = %request.method(),
                    uri
                )
            })
            .on_request(
                |request: &axum::extract::Request<_>, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        method = %request.method(),
                        uri = %request.uri(),
                        "request"
                    );
                },
            )
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            );

        Router::new()
            .route("/health", get(health))
            .route("/payment", post(create_payment::<P>).get(find_all::<P>))
            .route("/payment/tokens", get(tokens::<P>))
            .route("/payment/currencies", get(currencies::<P>))
            .route("/payment/institutions/{currency}", get(institutions::<P>))
            .route("/payment/orders/{id}", get(order::<P>))
            .route("/payment/verify-account", post(verify_account::<P>))
            .route(
                "/payment/{id}",
                get(find_one::<P>).patch(update::<P>).delete(remove::<P>),
            )
            .layer(trace_layer)
            .layer(CorsLayer::permissive())
            .with_state(self.service.clone())
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.router();
        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

type Svc<P> = State<Arc<PaymentService<P>>>;

fn bad_body(rejection: JsonRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}

fn numeric_id(id: &str) -> Result<i64, AppError> {
    id.parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("payment id must be numeric: {id}")))
}

async fn health() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

async fn create_payment<P: PaymentProvider>(
    State(service): Svc<P>,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PaymentCreated>), AppError> {
    let Json(request) = payload.map_err(bad_body)?;
    let created = service.create_payment(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn tokens<P: PaymentProvider>(State(service): Svc<P>) -> Result<Json<Value>, AppError> {
    Ok(Json(service.tokens().await?))
}

async fn currencies<P: PaymentProvider>(State(service): Svc<P>) -> Result<Json<Value>, AppError> {
    Ok(Json(service.currencies().await?))
}

async fn institutions<P: PaymentProvider>(
    State(service): Svc<P>,
    Path(currency): Path<String>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(service.institutions(&currency).await?))
}

async fn order<P: PaymentProvider>(
    State(service): Svc<P>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(service.order(&id).await?))
}

async fn verify_account<P: PaymentProvider>(
    State(service): Svc<P>,
    payload: Result<Json<AccountQuery>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(query) = payload.map_err(bad_body)?;
    Ok(Json(service.verify_account(query).await?))
}

async fn find_all<P: PaymentProvider>(State(service): Svc<P>) -> String {
    service.find_all()
}

async fn find_one<P: PaymentProvider>(
    State(service): Svc<P>,
    Path(id): Path<String>,
) -> Result<String, AppError> {
    Ok(service.find_one(numeric_id(&id)?))
}

async fn update<P: PaymentProvider>(
    State(service): Svc<P>,
    Path(id): Path<String>,
) -> Result<String, AppError> {
    Ok(service.update(numeric_id(&id)?))
}

async fn remove<P: PaymentProvider>(
    State(service): Svc<P>,
    Path(id): Path<String>,
) -> Result<String, AppError> {
    Ok(service.remove(numeric_id(&id)?))
}
