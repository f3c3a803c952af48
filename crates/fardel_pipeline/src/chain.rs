//! The override/transform chain behind every named operation.

use crate::context::OpContext;

/// The result of one override handler.
///
/// `NotHandled` is the explicit fall-through sentinel: the next override in
/// registration order is tried, and ultimately the default implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideOutcome<R> {
    /// The override produced a final result; remaining overrides are skipped.
    Handled(R),
    /// The override declined; fall through to the next handler.
    NotHandled,
}

type OverrideFn<A, R, E> =
    Box<dyn Fn(&A, &mut OpContext) -> Result<OverrideOutcome<R>, E> + Send + Sync>;
type TransformFn<A, R> = Box<dyn Fn(R, &A, &mut OpContext) -> R + Send + Sync>;

/// A named, extensible operation: ordered overrides plus ordered transforms.
///
/// Invocation semantics: overrides run first, in registration order, each
/// receiving the original arguments; the first non-fall-through result
/// short-circuits the rest, and if all fall through the supplied default
/// implementation runs. The result (from whichever source) then passes
/// through every transform in registration order. All chain members of one
/// invocation run strictly in sequence against that invocation's own forked
/// context.
pub struct Chain<A, R, E> {
    name: &'static str,
    overrides: Vec<OverrideFn<A, R, E>>,
    transforms: Vec<TransformFn<A, R>>,
}

impl<A, R, E> Chain<A, R, E> {
    /// Creates an empty chain for the operation with the given name.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            overrides: Vec::new(),
            transforms: Vec::new(),
        }
    }

    /// The operation's name, used in plugin registration and diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Registers an override, appended after any existing overrides.
    pub fn override_with<F>(&mut self, handler: F)
    where
        F: Fn(&A, &mut OpContext) -> Result<OverrideOutcome<R>, E> + Send + Sync + 'static,
    {
        self.overrides.push(Box::new(handler));
    }

    /// Registers a transform, appended after any existing transforms.
    pub fn transform_with<F>(&mut self, handler: F)
    where
        F: Fn(R, &A, &mut OpContext) -> R + Send + Sync + 'static,
    {
        self.transforms.push(Box::new(handler));
    }

    /// Returns `true` if any override or transform is registered.
    pub fn is_extended(&self) -> bool {
        !self.overrides.is_empty() || !self.transforms.is_empty()
    }

    /// Invokes the operation with the given default implementation.
    ///
    /// Forks `parent` for this invocation; the fork is shared by the
    /// override chain, the default, and the transform chain, and is dropped
    /// when the invocation returns.
    pub fn invoke<F>(&self, args: &A, parent: &OpContext, default: F) -> Result<R, E>
    where
        F: FnOnce(&A, &mut OpContext) -> Result<R, E>,
    {
        let mut ctx = parent.fork();
        let mut result = None;
        for handler in &self.overrides {
            match handler(args, &mut ctx)? {
                OverrideOutcome::Handled(value) => {
                    result = Some(value);
                    break;
                }
                OverrideOutcome::NotHandled => {}
            }
        }
        let mut current = match result {
            Some(value) => value,
            None => default(args, &mut ctx)?,
        };
        for transform in &self.transforms {
            current = transform(current, args, &mut ctx);
        }
        Ok(current)
    }
}

impl<A, R, E> std::fmt::Debug for Chain<A, R, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("name", &self.name)
            .field("overrides", &self.overrides.len())
            .field("transforms", &self.transforms.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestChain = Chain<i32, i32, String>;

    #[test]
    fn default_runs_when_no_overrides() {
        let chain = TestChain::new("double");
        let result = chain
            .invoke(&21, &OpContext::new(), |args, _| Ok(args * 2))
            .unwrap();
        assert_eq!(result, 42);
    }

    #[test]
    fn first_handled_override_short_circuits() {
        let mut chain = TestChain::new("op");
        chain.override_with(|_, _| Ok(OverrideOutcome::NotHandled));
        chain.override_with(|args, _| Ok(OverrideOutcome::Handled(args + 100)));
        chain.override_with(|_, _| panic!("must not run after a handled override"));
        let result = chain
            .invoke(&1, &OpContext::new(), |_, _| {
                panic!("default must not run when an override handled")
            })
            .unwrap();
        assert_eq!(result, 101);
    }

    #[test]
    fn all_not_handled_falls_to_default() {
        let mut chain = TestChain::new("op");
        chain.override_with(|_, _| Ok(OverrideOutcome::NotHandled));
        chain.override_with(|_, _| Ok(OverrideOutcome::NotHandled));
        let result = chain.invoke(&5, &OpContext::new(), |args, _| Ok(args + 1)).unwrap();
        assert_eq!(result, 6);
    }

    #[test]
    fn transforms_apply_in_order() {
        let mut chain = TestChain::new("op");
        chain.transform_with(|r, _, _| r + 1);
        chain.transform_with(|r, _, _| r * 10);
        // (5 + 1) * 10, not 5 * 10 + 1
        let result = chain.invoke(&0, &OpContext::new(), |_, _| Ok(5)).unwrap();
        assert_eq!(result, 60);
    }

    #[test]
    fn transforms_apply_to_override_result_too() {
        let mut chain = TestChain::new("op");
        chain.override_with(|_, _| Ok(OverrideOutcome::Handled(7)));
        chain.transform_with(|r, _, _| r * 2);
        let result = chain
            .invoke(&0, &OpContext::new(), |_, _| Ok(0))
            .unwrap();
        assert_eq!(result, 14);
    }

    #[test]
    fn override_error_propagates() {
        let mut chain = TestChain::new("op");
        chain.override_with(|_, _| Err("boom".to_string()));
        let err = chain.invoke(&0, &OpContext::new(), |_, _| Ok(0)).unwrap_err();
        assert_eq!(err, "boom");
    }

    #[test]
    fn chain_members_share_invocation_context() {
        let mut chain = TestChain::new("op");
        chain.override_with(|_, ctx| {
            ctx.set("seen", serde_json::json!(1));
            Ok(OverrideOutcome::NotHandled)
        });
        chain.transform_with(|r, _, ctx| {
            assert_eq!(ctx.get("seen"), Some(&serde_json::json!(1)));
            r
        });
        chain
            .invoke(&0, &OpContext::new(), |_, ctx| {
                assert_eq!(ctx.get("seen"), Some(&serde_json::json!(1)));
                Ok(0)
            })
            .unwrap();
    }

    #[test]
    fn invocation_context_does_not_leak_to_parent() {
        let mut chain = TestChain::new("op");
        chain.override_with(|_, ctx| {
            ctx.set("leak", serde_json::json!(true));
            Ok(OverrideOutcome::Handled(0))
        });
        let parent = OpContext::new();
        chain.invoke(&0, &parent, |_, _| Ok(0)).unwrap();
        assert!(parent.get("leak").is_none());
    }

    #[test]
    fn is_extended_reflects_registrations() {
        let mut chain = TestChain::new("op");
        assert!(!chain.is_extended());
        chain.transform_with(|r, _, _| r);
        assert!(chain.is_extended());
    }
}
