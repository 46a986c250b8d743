use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    extract::Request,
    response::{IntoResponse, Response},
};
use tower::Service;

use super::facade::ErrorFacade;
use super::negotiation::NegotiatedResponse;
use super::request_context::RequestContext;
use crate::api::errors::RequestError;
use crate::application::ports::ErrorLogger;

/// Error pipeline middleware layer
pub struct ErrorPipelineLayer<L: ErrorLogger> {
    facade: Arc<ErrorFacade<L>>,
}

impl<L: ErrorLogger> ErrorPipelineLayer<L> {
    pub fn new(facade: Arc<ErrorFacade<L>>) -> Self {
        Self { facade }
    }
}

impl<L: ErrorLogger> Clone for ErrorPipelineLayer<L> {
    fn clone(&self) -> Self {
        Self {
            facade: Arc::clone(&self.facade),
        }
    }
}

impl<S, L> tower::Layer<S> for ErrorPipelineLayer<L>
where
    L: ErrorLogger,
{
    type Service = ErrorPipelineService<S, L>;

    fn layer(&self, inner: S) -> Self::Service {
        ErrorPipelineService {
            inner,
            facade: Arc::clone(&self.facade),
        }
    }
}

/// Error pipeline service wrapper
pub struct ErrorPipelineService<S, L: ErrorLogger> {
    inner: S,
    facade: Arc<ErrorFacade<L>>,
}

impl<S: Clone, L: ErrorLogger> Clone for ErrorPipelineService<S, L> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            facade: Arc::clone(&self.facade),
        }
    }
}

impl<S, L> Service<Request> for ErrorPipelineService<S, L>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    L: ErrorLogger + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let facade = Arc::clone(&self.facade);

        // Captured up front: the inner service consumes the request
        let ctx = RequestContext::from_request(&req);
        let mut negotiated = NegotiatedResponse::from_headers(req.headers());

        Box::pin(async move {
            let mut response = inner.call(req).await?;

            match response.extensions_mut().remove::<RequestError>() {
                Some(err) => {
                    facade.handle_request_error(err, &ctx, &mut negotiated);
                    Ok(negotiated.into_response())
                }
                None => Ok(response),
            }
        })
    }
}

/// Create error pipeline middleware
pub fn create_error_pipeline_layer<L: ErrorLogger>(
    facade: Arc<ErrorFacade<L>>,
) -> ErrorPipelineLayer<L> {
    ErrorPipelineLayer::new(facade)
}
