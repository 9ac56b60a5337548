use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use tower::Service;

use crate::{
    authorizer::Authorizer, error::Unauthorized, event::AuthorizerEvent, policy::Decision,
};

/// Exposes [Authorizer::handle] as a tower [Service].
///
/// The authorizer holds no per-request state, so the service is always ready.
impl Service<AuthorizerEvent> for Authorizer {
    type Response = Option<Decision>;
    type Error = Unauthorized;
    type Future = BoxFuture<'static, Result<Option<Decision>, Unauthorized>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, event: AuthorizerEvent) -> Self::Future {
        let authorizer = self.clone();
        Box::pin(async move { authorizer.handle(&event).await })
    }
}
