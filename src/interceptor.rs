//! Call interception: timing, delegation, and the `Profiled<T>` proxy
//!
//! Every method of a capability trait implemented for [`Profiled<T>`] is
//! routed through [`Interceptor::invoke`] (or `invoke_mut`). The interceptor
//! calls the real target and hands the result back untouched. For measured
//! methods it brackets the call with two clock reads and records the
//! difference once the call has finished, whether it returned or unwound.

use crate::clock::Clock;
use crate::method::{MethodKey, MethodSignature};
use crate::state::ProfilingState;
use chrono::{DateTime, FixedOffset};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

/// Per-proxy invocation handler bound to one target
#[derive(Debug, Clone)]
pub struct Interceptor<T> {
    clock: Arc<dyn Clock>,
    target: T,
    state: Arc<ProfilingState>,
}

impl<T: 'static> Interceptor<T> {
    pub fn new(clock: Arc<dyn Clock>, target: T, state: Arc<ProfilingState>) -> Self {
        Self {
            clock,
            target,
            state,
        }
    }

    /// Route a `&self` call to the target
    pub fn invoke<'a, R>(
        &'a self,
        signature: &'static MethodSignature,
        call: impl FnOnce(&'a T) -> R,
    ) -> R {
        if !signature.is_profiled() {
            return call(&self.target);
        }
        let _timer = CallTimer::start(self.clock.as_ref(), &self.state, MethodKey::of::<T>(signature));
        call(&self.target)
    }

    /// Route a `&mut self` call to the target
    pub fn invoke_mut<'a, R>(
        &'a mut self,
        signature: &'static MethodSignature,
        call: impl FnOnce(&'a mut T) -> R,
    ) -> R {
        if !signature.is_profiled() {
            return call(&mut self.target);
        }
        let _timer = CallTimer::start(self.clock.as_ref(), &self.state, MethodKey::of::<T>(signature));
        call(&mut self.target)
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }
}

/// Records elapsed time for one measured call when dropped
///
/// Dropping happens on normal return and during panic unwinding alike, so
/// a failing call is recorded exactly once and its payload keeps unwinding
/// unchanged.
struct CallTimer<'a> {
    clock: &'a dyn Clock,
    state: &'a ProfilingState,
    key: MethodKey,
    start: DateTime<FixedOffset>,
}

impl<'a> CallTimer<'a> {
    fn start(clock: &'a dyn Clock, state: &'a ProfilingState, key: MethodKey) -> Self {
        Self {
            clock,
            state,
            key,
            start: clock.now(),
        }
    }
}

impl Drop for CallTimer<'_> {
    fn drop(&mut self) {
        let end = self.clock.now();
        let elapsed = (end - self.start).to_std().unwrap_or_else(|_| {
            tracing::warn!(
                method = %self.key,
                "clock moved backwards during measured call; recording zero"
            );
            Duration::ZERO
        });
        tracing::trace!(method = %self.key, ?elapsed, "recorded call");
        self.state.record(self.key, elapsed);
    }
}

/// Transparent profiling proxy around a target of type `T`
///
/// Created by [`Profiler::wrap`](crate::Profiler::wrap). Implements every
/// capability trait declared with [`profiled_trait!`](crate::profiled_trait)
/// that `T` implements. Equality, hashing and `Debug` are answered by the
/// target itself and never measured, so two proxies around equal targets
/// compare equal.
#[derive(Clone)]
pub struct Profiled<T> {
    interceptor: Interceptor<T>,
}

impl<T: 'static> Profiled<T> {
    pub(crate) fn new(interceptor: Interceptor<T>) -> Self {
        Self { interceptor }
    }

    /// Used by generated capability impls for `&self` methods
    ///
    /// Associated functions rather than methods, so a capability method of
    /// the same name is never shadowed on the proxy.
    #[doc(hidden)]
    pub fn invoke<'a, R>(
        this: &'a Self,
        signature: &'static MethodSignature,
        call: impl FnOnce(&'a T) -> R,
    ) -> R {
        this.interceptor.invoke(signature, call)
    }

    /// Used by generated capability impls for `&mut self` methods
    #[doc(hidden)]
    pub fn invoke_mut<'a, R>(
        this: &'a mut Self,
        signature: &'static MethodSignature,
        call: impl FnOnce(&'a mut T) -> R,
    ) -> R {
        this.interceptor.invoke_mut(signature, call)
    }

    /// The wrapped target, bypassing measurement
    ///
    /// Called as `Profiled::target(&proxy)`.
    pub fn target(this: &Self) -> &T {
        this.interceptor.target()
    }

    /// Unwrap the proxy, returning the target
    pub fn into_inner(this: Self) -> T {
        this.interceptor.into_target()
    }
}

impl<T: PartialEq> PartialEq for Profiled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.interceptor.target == other.interceptor.target
    }
}

impl<T: Eq> Eq for Profiled<T> {}

impl<T: Hash> Hash for Profiled<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.interceptor.target.hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for Profiled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Profiled").field(&self.interceptor.target).finish()
    }
}
