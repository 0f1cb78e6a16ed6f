//! Capsule contents: behavior variants and the payload they bind.

use std::fmt;

use super::{CapsuleError, CapsuleResult};

/// Behavior bound into a capsule at construction time.
///
/// A closed set dispatched through an exhaustive match. The numeric
/// selectors are part of the host contract: `1` is Add, `2` is Multiply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Behavior {
    Add = 1,
    Multiply = 2,
}

impl Behavior {
    /// Decode a raw selector from the host. Returns `None` for anything
    /// outside the recognized set.
    pub fn from_selector(raw: u32) -> Option<Behavior> {
        match raw {
            1 => Some(Behavior::Add),
            2 => Some(Behavior::Multiply),
            _ => None,
        }
    }

    /// The selector this behavior is addressed by on the host side.
    pub fn selector(&self) -> u32 {
        *self as u32
    }

    /// Apply the behavior to a payload and argument.
    ///
    /// Arithmetic wraps on overflow; checked arithmetic is out of scope.
    pub fn apply(&self, payload: i64, arg: i64) -> i64 {
        match self {
            Behavior::Add => payload.wrapping_add(arg),
            Behavior::Multiply => payload.wrapping_mul(arg),
        }
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Behavior::Add => write!(f, "add"),
            Behavior::Multiply => write!(f, "multiply"),
        }
    }
}

/// The contents behind a capsule token.
///
/// Both fields are fixed at construction and immutable for the capsule's
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapsuleContents {
    behavior: Behavior,
    payload: i64,
}

impl CapsuleContents {
    /// Bind a behavior to a payload.
    pub fn new(behavior: Behavior, payload: i64) -> Self {
        Self { behavior, payload }
    }

    /// Construct from a raw host selector.
    pub fn from_raw(selector: u32, payload: i64) -> CapsuleResult<Self> {
        let behavior =
            Behavior::from_selector(selector).ok_or(CapsuleError::InvalidSelector(selector))?;
        Ok(Self::new(behavior, payload))
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    pub fn payload(&self) -> i64 {
        self.payload
    }

    /// Dispatch to the bound behavior.
    pub fn invoke(&self, arg: i64) -> i64 {
        self.behavior.apply(self.payload, arg)
    }
}
