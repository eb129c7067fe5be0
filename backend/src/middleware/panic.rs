//! Middleware turning handler panics into 500 envelopes.
//!
//! A panic inside a handler would otherwise drop the connection without a
//! body. The panic is surfaced as an [`ApiError::Unhandled`] error, so actix
//! renders the generic internal error envelope and the message is logged.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::FutureExt as _;
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::inbound::http::ApiError;

/// Panic caught while serving a request.
#[derive(Debug, thiserror::Error)]
#[error("request handler panicked: {message}")]
pub struct HandlerPanic {
    message: String,
}

impl HandlerPanic {
    fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|text| (*text).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_owned());
        Self { message }
    }
}

/// Middleware catching panics raised while a request is handled.
///
/// The request is handed to the inner service untouched; routing needs sole
/// ownership of it. Register [`super::Trace`] outside this middleware so the
/// failure is still recorded on the access log.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use minimus::middleware::{CatchPanic, Trace};
///
/// let _app = App::new().wrap(CatchPanic).wrap(Trace);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct CatchPanic;

impl<S, B> Transform<S, ServiceRequest> for CatchPanic
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CatchPanicMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CatchPanicMiddleware { service }))
    }
}

/// Service produced by [`CatchPanic`].
pub struct CatchPanicMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for CatchPanicMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fut = match std::panic::catch_unwind(AssertUnwindSafe(|| self.service.call(req))) {
            Ok(fut) => fut,
            Err(payload) => return Box::pin(ready(Err(panic_error(payload.as_ref())))),
        };

        Box::pin(async move {
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(result) => result,
                Err(payload) => Err(panic_error(payload.as_ref())),
            }
        })
    }
}

fn panic_error(payload: &(dyn Any + Send)) -> Error {
    ApiError::unhandled(HandlerPanic::from_payload(payload)).into()
}
