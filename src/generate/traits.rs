//! Generator trait and dynamic dispatch companion.

use crate::error::GenerationError;
use crate::generate::{GenerationContext, GeneratorKind};
use std::pin::Pin;

/// Static trait for response generators.
/// Use this for type-safe implementations.
pub trait Generator: Send + Sync + 'static {
    /// Which kind this implementation serves.
    fn kind(&self) -> GeneratorKind;

    /// Produce reply text from a context bundle. Fails with
    /// [`GenerationError`] when the backing service is unreachable or
    /// returns something unusable.
    fn generate(
        &self,
        context: GenerationContext,
    ) -> impl std::future::Future<Output = Result<String, GenerationError>> + Send;
}

/// Dynamic trait for runtime polymorphism.
/// Use this when you need `Arc<dyn GeneratorDyn>` for storing different generators.
pub trait GeneratorDyn: Send + Sync + 'static {
    fn kind(&self) -> GeneratorKind;

    fn generate<'a>(
        &'a self,
        context: GenerationContext,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<String, GenerationError>> + Send + 'a>>;
}

/// Blanket implementation: any type implementing Generator automatically implements GeneratorDyn.
impl<T: Generator> GeneratorDyn for T {
    fn kind(&self) -> GeneratorKind {
        Generator::kind(self)
    }

    fn generate<'a>(
        &'a self,
        context: GenerationContext,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<String, GenerationError>> + Send + 'a>>
    {
        Box::pin(Generator::generate(self, context))
    }
}
