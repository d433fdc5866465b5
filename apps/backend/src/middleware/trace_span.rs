//! Per-request span carrying `trace_id`, `method`, `path` and, when the path
//! names them, `tournament_id` and `user_id`.
//!
//! Reads the `TraceId` that `RequestTrace` inserted, so it must run inside
//! it: `.wrap(TraceSpan).wrap(RequestTrace)`.

use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{field, info_span, Instrument};

use crate::trace_ctx::TraceId;

/// Ids a request path addresses. Runs before routing, so it reads the raw
/// path rather than `match_info`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PathIds<'a> {
    pub tournament_id: Option<&'a str>,
    pub user_id: Option<&'a str>,
}

impl<'a> PathIds<'a> {
    pub fn from_path(path: &'a str) -> Self {
        let mut segments = path.trim_matches('/').split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some("tournaments"), Some("end"), Some(id)) if !id.is_empty() => Self {
                tournament_id: Some(id),
                user_id: None,
            },
            (Some("tournaments"), Some(id), _)
                if !id.is_empty() && !matches!(id, "start" | "enter" | "end") =>
            {
                Self {
                    tournament_id: Some(id),
                    user_id: None,
                }
            }
            (Some("users"), Some(id), _) if !id.is_empty() => Self {
                tournament_id: None,
                user_id: Some(id),
            },
            _ => Self::default(),
        }
    }
}

#[derive(Clone, Default)]
pub struct TraceSpan;

impl<S, B> Transform<S, ServiceRequest> for TraceSpan
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceSpanMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceSpanMiddleware { service }))
    }
}

pub struct TraceSpanMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceSpanMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = req
            .extensions()
            .get::<TraceId>()
            .map(|t| t.as_str().to_string())
            .unwrap_or_else(|| "missing-trace-id".to_string());

        let span = info_span!(
            "request",
            trace_id = %trace_id,
            method = %req.method(),
            path = %req.path(),
            tournament_id = field::Empty,
            user_id = field::Empty
        );
        let ids = PathIds::from_path(req.path());
        if let Some(id) = ids.tournament_id {
            span.record("tournament_id", id);
        }
        if let Some(id) = ids.user_id {
            span.record("user_id", id);
        }

        Box::pin(self.service.call(req).instrument(span))
    }
}
