//! The translator capability injected into the cache.

use async_trait::async_trait;

use crate::{error::BoxError, language::Language};

/// An opaque, possibly remote, machine translation backend.
///
/// Implementations receive text whose placeholders have already been swapped
/// for sentinels and must return the translated text; they do not cache.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source: &Language,
        target: &Language,
    ) -> Result<String, BoxError>;
}

#[async_trait]
impl<T: Translator + ?Sized> Translator for std::sync::Arc<T> {
    async fn translate(
        &self,
        text: &str,
        source: &Language,
        target: &Language,
    ) -> Result<String, BoxError> {
        (**self).translate(text, source, target).await
    }
}

/// Returns its input unchanged. Useful for dry runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

#[async_trait]
impl Translator for IdentityTranslator {
    async fn translate(
        &self,
        text: &str,
        _source: &Language,
        _target: &Language,
    ) -> Result<String, BoxError> {
        Ok(text.to_string())
    }
}
