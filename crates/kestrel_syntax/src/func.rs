//! Fallible function contracts for composing front-end stages.
//!
//! The standard closure traits cannot say "this call may fail with a compile error", so pipeline stages that
//! want to be passed around as values implement one of four small contracts instead:
//!
//! | Contract | Operation | Closure form |
//! |---|---|---|
//! | [`CompileSupplier<T>`] | `get(&mut self) -> CompileResult<T>` | `FnMut() -> CompileResult<T>` |
//! | [`CompileConsumer<T>`] | `accept(&mut self, T) -> CompileResult<()>` | `FnMut(T) -> CompileResult<()>` |
//! | [`CompileFunction<T, R>`] | `apply(&self, T) -> CompileResult<R>` | `Fn(T) -> CompileResult<R>` |
//! | [`CompilePredicate<T>`] | `test(&self, &T) -> CompileResult<bool>` | `Fn(&T) -> CompileResult<bool>` |
//!
//! ## Notes
//! - The only failure type is [`CompileError`](crate::diagnostics::CompileError). Combinators and helpers return the first error exactly as the
//!   stage produced it; nothing is wrapped or re-labelled on the way up.
//! - Closures get the contracts through blanket impls, so ad-hoc stages need no wrapper types. Closures taking a
//!   reference need an annotated parameter type (`|t: &Token| ...`) to be inferred as higher-ranked.
//!
//! ## Examples
//! ```rust
//! use kestrel_syntax::diagnostics::CompileResult;
//! use kestrel_syntax::func::{CompileFunction, CompilePredicate, try_map};
//!
//! let double = |x: i32| -> CompileResult<i32> { Ok(x * 2) };
//! let plus_one = |x: i32| -> CompileResult<i32> { Ok(x + 1) };
//! assert_eq!(double.and_then(plus_one).apply(4).unwrap(), 9);
//!
//! let positive = |x: &i32| -> CompileResult<bool> { Ok(*x > 0) };
//! assert!(!positive.negate().test(&3).unwrap());
//!
//! assert_eq!(try_map([1, 2], &double).unwrap(), vec![2, 4]);
//! ```

use std::marker::PhantomData;

use crate::diagnostics::CompileResult;

// ============================================================================
// Contracts
// ============================================================================

/// Produces values on demand; each call may fail.
pub trait CompileSupplier<T> {
    fn get(&mut self) -> CompileResult<T>;
}

/// Accepts values one at a time; each call may fail.
pub trait CompileConsumer<T> {
    fn accept(&mut self, value: T) -> CompileResult<()>;
}

/// Maps one input to one output or fails.
pub trait CompileFunction<T, R> {
    fn apply(&self, value: T) -> CompileResult<R>;

    /// Feed this function's output into `next`. Stops at the first failure.
    fn and_then<S, G>(self, next: G) -> AndThen<Self, G, R>
    where
        Self: Sized,
        G: CompileFunction<R, S>,
    {
        AndThen {
            first: self,
            second: next,
            _mid: PhantomData,
        }
    }

    /// Transform a successful output with an infallible function.
    fn map<S, M>(self, f: M) -> Map<Self, M, R>
    where
        Self: Sized,
        M: Fn(R) -> S,
    {
        Map {
            inner: self,
            f,
            _mid: PhantomData,
        }
    }
}

/// Tests a value or fails.
pub trait CompilePredicate<T: ?Sized> {
    fn test(&self, value: &T) -> CompileResult<bool>;

    /// Short-circuiting conjunction.
    fn and<Q>(self, other: Q) -> And<Self, Q>
    where
        Self: Sized,
        Q: CompilePredicate<T>,
    {
        And(self, other)
    }

    /// Short-circuiting disjunction.
    fn or<Q>(self, other: Q) -> Or<Self, Q>
    where
        Self: Sized,
        Q: CompilePredicate<T>,
    {
        Or(self, other)
    }

    fn negate(self) -> Not<Self>
    where
        Self: Sized,
    {
        Not(self)
    }
}

// ============================================================================
// Closure impls
// ============================================================================

impl<T, F> CompileSupplier<T> for F
where
    F: FnMut() -> CompileResult<T>,
{
    fn get(&mut self) -> CompileResult<T> {
        self()
    }
}

impl<T, F> CompileConsumer<T> for F
where
    F: FnMut(T) -> CompileResult<()>,
{
    fn accept(&mut self, value: T) -> CompileResult<()> {
        self(value)
    }
}

impl<T, R, F> CompileFunction<T, R> for F
where
    F: Fn(T) -> CompileResult<R>,
{
    fn apply(&self, value: T) -> CompileResult<R> {
        self(value)
    }
}

impl<T: ?Sized, F> CompilePredicate<T> for F
where
    F: Fn(&T) -> CompileResult<bool>,
{
    fn test(&self, value: &T) -> CompileResult<bool> {
        self(value)
    }
}

// ============================================================================
// Combinators
// ============================================================================

/// See [`CompileFunction::and_then`].
pub struct AndThen<F, G, R> {
    first: F,
    second: G,
    _mid: PhantomData<fn() -> R>,
}

impl<T, R, S, F, G> CompileFunction<T, S> for AndThen<F, G, R>
where
    F: CompileFunction<T, R>,
    G: CompileFunction<R, S>,
{
    fn apply(&self, value: T) -> CompileResult<S> {
        self.second.apply(self.first.apply(value)?)
    }
}

/// See [`CompileFunction::map`].
pub struct Map<F, M, R> {
    inner: F,
    f: M,
    _mid: PhantomData<fn() -> R>,
}

impl<T, R, S, F, M> CompileFunction<T, S> for Map<F, M, R>
where
    F: CompileFunction<T, R>,
    M: Fn(R) -> S,
{
    fn apply(&self, value: T) -> CompileResult<S> {
        self.inner.apply(value).map(&self.f)
    }
}

/// See [`CompilePredicate::and`].
pub struct And<P, Q>(P, Q);

impl<T: ?Sized, P, Q> CompilePredicate<T> for And<P, Q>
where
    P: CompilePredicate<T>,
    Q: CompilePredicate<T>,
{
    fn test(&self, value: &T) -> CompileResult<bool> {
        Ok(self.0.test(value)? && self.1.test(value)?)
    }
}

/// See [`CompilePredicate::or`].
pub struct Or<P, Q>(P, Q);

impl<T: ?Sized, P, Q> CompilePredicate<T> for Or<P, Q>
where
    P: CompilePredicate<T>,
    Q: CompilePredicate<T>,
{
    fn test(&self, value: &T) -> CompileResult<bool> {
        Ok(self.0.test(value)? || self.1.test(value)?)
    }
}

/// See [`CompilePredicate::negate`].
pub struct Not<P>(P);

impl<T: ?Sized, P> CompilePredicate<T> for Not<P>
where
    P: CompilePredicate<T>,
{
    fn test(&self, value: &T) -> CompileResult<bool> {
        Ok(!self.0.test(value)?)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Apply `f` to every item, stopping at the first failure.
pub fn try_map<T, R, I, F>(items: I, f: &F) -> CompileResult<Vec<R>>
where
    I: IntoIterator<Item = T>,
    F: CompileFunction<T, R> + ?Sized,
{
    items.into_iter().map(|item| f.apply(item)).collect()
}

/// Keep the items `predicate` accepts, stopping at the first failure.
pub fn try_filter<T, I, P>(items: I, predicate: &P) -> CompileResult<Vec<T>>
where
    I: IntoIterator<Item = T>,
    P: CompilePredicate<T> + ?Sized,
{
    let mut kept = Vec::new();
    for item in items {
        if predicate.test(&item)? {
            kept.push(item);
        }
    }
    Ok(kept)
}

/// Hand every item to `consumer`, stopping at the first failure.
pub fn try_for_each<T, I, C>(items: I, consumer: &mut C) -> CompileResult<()>
where
    I: IntoIterator<Item = T>,
    C: CompileConsumer<T> + ?Sized,
{
    items.into_iter().try_for_each(|item| consumer.accept(item))
}

/// Pull from `supplier` until `stop` accepts an item. The stopping item is included.
pub fn drain_until<T, S, P>(supplier: &mut S, stop: &P) -> CompileResult<Vec<T>>
where
    S: CompileSupplier<T> + ?Sized,
    P: CompilePredicate<T> + ?Sized,
{
    let mut items = Vec::new();
    loop {
        let item = supplier.get()?;
        let done = stop.test(&item)?;
        items.push(item);
        if done {
            return Ok(items);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Span;
    use crate::diagnostics::CompileError;

    fn fail(message: &str) -> CompileError {
        CompileError::syntax(message, Span::new(1, 2))
    }

    #[test]
    fn test_and_then_propagates_first_error_unaltered() {
        let parse = |s: &str| -> CompileResult<i32> { s.parse::<i32>().map_err(|_| fail("not a number")) };
        let halve = |n: i32| -> CompileResult<i32> {
            if n % 2 == 0 { Ok(n / 2) } else { Err(fail("odd")) }
        };
        let pipeline = parse.and_then(halve);

        assert_eq!(pipeline.apply("8").unwrap(), 4);
        assert_eq!(pipeline.apply("x").unwrap_err(), fail("not a number"));
        assert_eq!(pipeline.apply("3").unwrap_err(), fail("odd"));
    }

    #[test]
    fn test_map_only_touches_success() {
        let f = (|n: i32| -> CompileResult<i32> { if n > 0 { Ok(n) } else { Err(fail("neg")) } }).map(|n| n * 10);
        assert_eq!(f.apply(2).unwrap(), 20);
        assert_eq!(f.apply(-1).unwrap_err().message, "neg");
    }

    #[test]
    fn test_predicate_combinators_short_circuit() {
        let never_called = |_: &i32| -> CompileResult<bool> { Err(fail("evaluated")) };
        let small = |n: &i32| -> CompileResult<bool> { Ok(*n < 10) };

        let and = small.and(never_called);
        assert!(!and.test(&50).unwrap());
        assert_eq!(and.test(&5).unwrap_err().message, "evaluated");

        let or = small.or(never_called);
        assert!(or.test(&5).unwrap());
        assert!(small.negate().test(&50).unwrap());
    }

    #[test]
    fn test_try_helpers_stop_at_first_failure() {
        let mut seen = Vec::new();
        let mut consumer = |n: i32| -> CompileResult<()> {
            if n == 3 {
                return Err(fail("three"));
            }
            seen.push(n);
            Ok(())
        };
        let err = try_for_each([1, 2, 3, 4], &mut consumer).unwrap_err();
        assert_eq!(err.message, "three");
        assert_eq!(seen, vec![1, 2]);

        let even = |n: &i32| -> CompileResult<bool> { Ok(n % 2 == 0) };
        assert_eq!(try_filter(1..=6, &even).unwrap(), vec![2, 4, 6]);
    }

    #[test]
    fn test_drain_until_includes_terminator() {
        let mut next = 0;
        let mut counter = || -> CompileResult<i32> {
            next += 1;
            Ok(next)
        };
        let items = drain_until(&mut counter, &|n: &i32| -> CompileResult<bool> { Ok(*n == 3) }).unwrap();
        assert_eq!(items, vec![1, 2, 3]);
    }
}
