//! Core Specification trait and slice combinators.

/// A predicate over an evaluation context.
///
/// Evaluation is pure: implementations read the context and never mutate
/// shared state, so a specification can be checked from any thread.
pub trait Specification<Ctx: ?Sized> {
    /// Check if the specification is satisfied by the given context.
    fn is_satisfied_by(&self, ctx: &Ctx) -> bool;
}

/// Every specification in the slice must be satisfied. Empty is `true`.
pub fn all_of<Ctx: ?Sized, S: Specification<Ctx>>(specs: &[S], ctx: &Ctx) -> bool {
    specs.iter().all(|spec| spec.is_satisfied_by(ctx))
}

/// At least one specification in the slice must be satisfied. Empty is `false`.
pub fn any_of<Ctx: ?Sized, S: Specification<Ctx>>(specs: &[S], ctx: &Ctx) -> bool {
    specs.iter().any(|spec| spec.is_satisfied_by(ctx))
}
