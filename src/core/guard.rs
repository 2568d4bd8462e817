//! Guard predicates for controlling state transitions.
//!
//! Guards are pure boolean functions over the property bag that decide
//! whether a transition fires. The machine treats them as opaque.

use super::properties::Properties;
use std::fmt;

/// Capability interface for anything that can judge a property bag.
///
/// Every `Fn(&Properties) -> bool + Send + Sync` closure is a
/// `PropertyGuard`, so most callers never implement this by hand.
/// Implement it directly for guards that carry configuration.
///
/// # Example
///
/// ```rust
/// use statebag::core::{Properties, PropertyGuard};
///
/// struct FasterThan(f64);
///
/// impl PropertyGuard for FasterThan {
///     fn evaluate(&self, props: &Properties) -> bool {
///         props.number("velocity_x").is_some_and(|v| v.abs() > self.0)
///     }
/// }
///
/// let mut props = Properties::new();
/// props.insert("velocity_x", -12.0);
/// assert!(FasterThan(10.0).evaluate(&props));
/// ```
pub trait PropertyGuard: Send + Sync {
    fn evaluate(&self, props: &Properties) -> bool;
}

impl<F> PropertyGuard for F
where
    F: Fn(&Properties) -> bool + Send + Sync,
{
    fn evaluate(&self, props: &Properties) -> bool {
        self(props)
    }
}

/// Pure predicate that determines if a transition can fire.
///
/// Guards should be deterministic and free of side effects. This is not
/// enforced; a panicking guard unwinds through the property update that
/// evaluated it.
///
/// # Example
///
/// ```rust
/// use statebag::core::{Guard, Properties};
///
/// let moving = Guard::new(|p: &Properties| p.number("velocity_x").is_some_and(|v| v != 0.0));
///
/// let mut props = Properties::new();
/// assert!(!moving.check(&props));
///
/// props.insert("velocity_x", 5);
/// assert!(moving.check(&props));
/// ```
pub struct Guard {
    predicate: Box<dyn PropertyGuard>,
    unconditional: bool,
}

impl Guard {
    /// Create a guard from a pure predicate.
    pub fn new<G>(predicate: G) -> Self
    where
        G: PropertyGuard + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            unconditional: false,
        }
    }

    /// A guard that always passes.
    ///
    /// A transition carrying this guard fires the moment its origin is
    /// current, so it starves every transition registered after it from
    /// the same origin.
    pub fn always() -> Self {
        Guard {
            predicate: Box::new(|_: &Properties| true),
            unconditional: true,
        }
    }

    /// Evaluate the guard against a snapshot of the property bag.
    pub fn check(&self, props: &Properties) -> bool {
        self.predicate.evaluate(props)
    }

    /// True for guards created by [`Guard::always`].
    pub fn is_unconditional(&self) -> bool {
        self.unconditional
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("unconditional", &self.unconditional)
            .finish_non_exhaustive()
    }
}
