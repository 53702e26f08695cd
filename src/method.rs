//! Method identity: static signatures and aggregation keys

use std::any::{type_name, TypeId};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Static description of one capability method
///
/// Generated by [`profiled_trait!`](crate::profiled_trait) for every method
/// of a capability trait. `params` holds the parameter types as written in
/// the trait declaration, excluding the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    name: &'static str,
    params: &'static [&'static str],
    profiled: bool,
}

impl MethodSignature {
    pub const fn new(name: &'static str, params: &'static [&'static str], profiled: bool) -> Self {
        Self {
            name,
            params,
            profiled,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn params(&self) -> &'static [&'static str] {
        self.params
    }

    /// Whether calls to this method are timed
    pub const fn is_profiled(&self) -> bool {
        self.profiled
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.params.join(", "))
    }
}

/// Aggregation key: declaring type plus method name and parameter types
///
/// Two keys are equal when they name the same concrete target type and the
/// same signature. The `profiled` flag of the signature plays no part.
#[derive(Debug, Clone, Copy)]
pub struct MethodKey {
    type_id: TypeId,
    type_name: &'static str,
    method: &'static str,
    params: &'static [&'static str],
}

impl MethodKey {
    /// Key for `signature` invoked on a target of type `T`
    pub fn of<T: ?Sized + 'static>(signature: &MethodSignature) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            method: signature.name(),
            params: signature.params(),
        }
    }

    /// Fully qualified name of the declaring type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    pub fn params(&self) -> &'static [&'static str] {
        self.params
    }

    /// Report ordering: method name first, then type name, then parameters
    pub(crate) fn report_cmp(&self, other: &Self) -> Ordering {
        self.method
            .cmp(other.method)
            .then_with(|| self.type_name.cmp(other.type_name))
            .then_with(|| self.params.cmp(other.params))
    }
}

impl PartialEq for MethodKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.method == other.method && self.params == other.params
    }
}

impl Eq for MethodKey {}

impl Hash for MethodKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.method.hash(state);
        self.params.hash(state);
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}({})",
            self.type_name,
            self.method,
            self.params.join(", ")
        )
    }
}
