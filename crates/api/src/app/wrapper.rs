//! Handler wrapper: bind a controller operation to its receiver and route every
//! outcome to a response.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::response::Response;
use futures::FutureExt;
use futures::future::BoxFuture;

use crate::app::errors::{self, ApiError, ControllerResult};
use crate::context::RequestContext;

/// Adapt `op` (a method of `C` taking `self: Arc<Self>`) into an axum handler.
///
/// The controller instance is captured once; each request gets its own clone
/// of the `Arc`. The returned handler always yields exactly one response:
/// - `Ok(response)` is passed through untouched;
/// - `Err(e)` is handed to [`errors::forward`];
/// - a panic inside `op` is caught and forwarded as an internal error, so the
///   connection is answered and the server keeps serving.
pub fn wrap<C, F, Fut>(
    controller: &Arc<C>,
    op: F,
) -> impl Fn(RequestContext) -> BoxFuture<'static, Response> + Clone + Send + Sync + 'static
where
    C: Send + Sync + 'static,
    F: Fn(Arc<C>, RequestContext) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = ControllerResult> + Send + 'static,
{
    let controller = Arc::clone(controller);
    move |ctx: RequestContext| {
        let controller = Arc::clone(&controller);
        let op = op.clone();
        async move {
            let outcome = AssertUnwindSafe(async move { op(controller, ctx).await })
                .catch_unwind()
                .await;
            match outcome {
                Ok(Ok(response)) => response,
                Ok(Err(err)) => errors::forward(err),
                Err(panic) => errors::forward(ApiError::internal(format!(
                    "handler panicked: {}",
                    panic_message(panic.as_ref())
                ))),
            }
        }
        .boxed()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[derive(Default)]
    struct Spy {
        calls: AtomicUsize,
    }

    impl Spy {
        async fn ok(self: Arc<Self>, _ctx: RequestContext) -> ControllerResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(StatusCode::NO_CONTENT.into_response())
        }

        async fn fail(self: Arc<Self>, _ctx: RequestContext) -> ControllerResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ApiError::not_found("nothing here"))
        }

        async fn explode(self: Arc<Self>, _ctx: RequestContext) -> ControllerResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            panic!("boom");
        }
    }

    #[tokio::test]
    async fn success_passes_response_through() {
        let spy = Arc::new(Spy::default());
        let handler = wrap(&spy, Spy::ok);
        let response = handler(RequestContext::default()).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(spy.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn error_is_forwarded_to_error_path() {
        let spy = Arc::new(Spy::default());
        let handler = wrap(&spy, Spy::fail);
        let response = handler(RequestContext::default()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(spy.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn panic_becomes_internal_error_and_handler_stays_usable() {
        let spy = Arc::new(Spy::default());
        let handler = wrap(&spy, Spy::explode);

        let first = handler(RequestContext::default()).await;
        assert_eq!(first.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let second = handler(RequestContext::default()).await;
        assert_eq!(second.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(spy.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn panic_message_reads_common_payloads() {
        let s: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(s.as_ref()), "static");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(owned.as_ref()), "owned");
        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }
}
