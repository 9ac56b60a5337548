use crate::event::AuthorizerEvent;

pub const WARMUP_SOURCE: &str = "serverless-plugin-warmup";

pub trait WarmUpFilter: Send + Sync {
    fn is_warm_up(&self, event: &AuthorizerEvent) -> bool;
}

/// Recognises keep-alive invocations by their `source` field.
#[derive(Debug, Default)]
pub struct SourceWarmUpFilter;

impl WarmUpFilter for SourceWarmUpFilter {
    fn is_warm_up(&self, event: &AuthorizerEvent) -> bool {
        event.source.as_deref() == Some(WARMUP_SOURCE)
    }
}
