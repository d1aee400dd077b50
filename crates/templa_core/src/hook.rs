//! Hook chains around builder steps.
//!
//! Processing and building each have a base step (render then parse, and
//! build). Hooks wrap that step middleware-style: a hook receives the step
//! input and a [`Next`] handle, may change the input, calls [`Next::run`], and
//! may post-process what comes back.
//!
//! A hook has to return a [`Stamped`] value, and the only way to obtain one is
//! from [`Next::run`]. A hook therefore cannot skip the base step; it can only
//! decide what goes into it and what to do with its result.

use crate::error::BuilderResult;

/// A hook around a step taking `I` and producing `O`.
pub type Hook<I, O> = Box<dyn Fn(I, Next<'_, I, O>) -> BuilderResult<Stamped<O>> + Send + Sync>;

/// Handle to the remainder of a hook chain.
pub struct Next<'a, I, O> {
    hooks: &'a [Hook<I, O>],
    base: &'a dyn Fn(I) -> BuilderResult<O>,
}

impl<'a, I, O> Next<'a, I, O> {
    pub(crate) fn new(hooks: &'a [Hook<I, O>], base: &'a dyn Fn(I) -> BuilderResult<O>) -> Self {
        Self { hooks, base }
    }

    /// Run the next hook, or the base step once the chain is exhausted.
    pub fn run(self, input: I) -> BuilderResult<Stamped<O>> {
        match self.hooks.split_first() {
            Some((hook, rest)) => hook(
                input,
                Next {
                    hooks: rest,
                    base: self.base,
                },
            ),
            None => (self.base)(input).map(Stamped),
        }
    }
}

/// Output of a base step, possibly post-processed by hooks.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamped<T>(T);

impl<T> Stamped<T> {
    pub fn get(&self) -> &T {
        &self.0
    }

    /// Transform the value while keeping the stamp.
    pub fn map(self, f: impl FnOnce(T) -> T) -> Self {
        Self(f(self.0))
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestHook = Hook<i32, Vec<String>>;

    fn hook<F>(f: F) -> TestHook
    where
        F: Fn(i32, Next<'_, i32, Vec<String>>) -> BuilderResult<Stamped<Vec<String>>>
            + Send
            + Sync
            + 'static,
    {
        Box::new(f)
    }

    fn chain(hooks: &[TestHook], input: i32) -> Vec<String> {
        let base = |n: i32| -> BuilderResult<Vec<String>> { Ok(vec![format!("base({})", n)]) };
        Next::new(hooks, &base).run(input).unwrap().into_inner()
    }

    #[test]
    fn test_empty_chain_runs_base() {
        assert_eq!(chain(&[], 1), vec!["base(1)"]);
    }

    #[test]
    fn test_hooks_wrap_in_registration_order() {
        let hooks = vec![
            hook(|n, next| {
                Ok(next.run(n + 1)?.map(|mut out| {
                    out.push("outer".to_string());
                    out
                }))
            }),
            hook(|n, next| {
                Ok(next.run(n * 10)?.map(|mut out| {
                    out.push("inner".to_string());
                    out
                }))
            }),
        ];

        assert_eq!(chain(&hooks, 1), vec!["base(20)", "inner", "outer"]);
    }

    #[test]
    fn test_stamped_accessors() {
        let stamped = Stamped(3).map(|n| n * 2);
        assert_eq!(*stamped.get(), 6);
        assert_eq!(stamped.into_inner(), 6);
    }
}
