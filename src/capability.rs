//! Capability descriptors and the `profiled_trait!` proxy generator
//!
//! A capability is a trait whose methods a [`Profiled<T>`](crate::Profiled)
//! proxy forwards. [`profiled_trait!`](crate::profiled_trait) declares the
//! trait and generates three things alongside it:
//!
//! - a [`CapabilityDescriptor`] impl on `dyn Trait` listing every method's
//!   [`MethodSignature`], including whether it carries `#[profiled]`
//! - a [`Capability<T>`] impl on `dyn Trait` for every `T: Trait`, which is
//!   what lets [`Profiler::wrap`](crate::Profiler::wrap) accept `T`
//! - `impl Trait for Profiled<T>`, forwarding each method through the
//!   interceptor
//!
//! # Example
//!
//! ```
//! use method_profiler::{profiled_trait, CapabilityDescriptor};
//!
//! profiled_trait! {
//!     /// Fetches pages for the crawler
//!     pub trait PageFetcher: Send + Sync {
//!         #[profiled]
//!         fn fetch(&self, url: &str) -> Result<String, String>;
//!         fn user_agent(&self) -> String;
//!     }
//! }
//!
//! let fetch = <dyn PageFetcher as CapabilityDescriptor>::method("fetch").unwrap();
//! assert!(fetch.is_profiled());
//! assert_eq!(fetch.to_string(), "fetch(&str)");
//! assert!(!<dyn PageFetcher as CapabilityDescriptor>::method("user_agent")
//!     .unwrap()
//!     .is_profiled());
//! ```

use crate::method::MethodSignature;

/// Static method table of a capability trait
///
/// Implemented on `dyn Trait` by [`profiled_trait!`](crate::profiled_trait).
pub trait CapabilityDescriptor {
    /// Fully qualified trait name
    const NAME: &'static str;
    /// Every method the trait declares, in declaration order
    const METHODS: &'static [MethodSignature];

    /// True when at least one method carries `#[profiled]`
    fn has_profiled_methods() -> bool {
        Self::METHODS.iter().any(MethodSignature::is_profiled)
    }

    /// Signature of the method called `name`
    fn method(name: &str) -> Option<&'static MethodSignature> {
        Self::METHODS.iter().find(|m| m.name() == name)
    }
}

/// Marks `T` as a valid target for proxies of this capability
pub trait Capability<T>: CapabilityDescriptor {}

/// Declare a capability trait and generate its profiling proxy
///
/// Methods take `&self` or `&mut self`, named arguments (no trailing comma)
/// and an optional return type. Mark timed methods with `#[profiled]`; doc
/// comments and other attributes pass through. Supertraits are limited to
/// plain identifiers such as `Send + Sync`. The trait must be dyn-compatible.
#[macro_export]
macro_rules! profiled_trait {
    // `#[profiled]` marks the next method as measured
    (@parse [$($header:tt)*] $name:ident [$($methods:tt)*] [$profiled:tt] [$($attrs:tt)*]
        #[profiled] $($rest:tt)*
    ) => {
        $crate::profiled_trait! {
            @parse [$($header)*] $name [$($methods)*] [true] [$($attrs)*] $($rest)*
        }
    };
    (@parse [$($header:tt)*] $name:ident [$($methods:tt)*] [$profiled:tt] [$($attrs:tt)*]
        #[$attr:meta] $($rest:tt)*
    ) => {
        $crate::profiled_trait! {
            @parse [$($header)*] $name [$($methods)*] [$profiled] [$($attrs)* #[$attr]] $($rest)*
        }
    };
    (@parse [$($header:tt)*] $name:ident [$($methods:tt)*] [$profiled:tt] [$($attrs:tt)*]
        fn $method:ident(&self $(, $arg:ident : $ty:ty)*) $(-> $ret:ty)?; $($rest:tt)*
    ) => {
        $crate::profiled_trait! {
            @parse [$($header)*] $name
            [$($methods)* {[$profiled] [$($attrs)*] [&self] invoke $method [$($arg: $ty),*] [$($ret)?]}]
            [false] []
            $($rest)*
        }
    };
    (@parse [$($header:tt)*] $name:ident [$($methods:tt)*] [$profiled:tt] [$($attrs:tt)*]
        fn $method:ident(&mut self $(, $arg:ident : $ty:ty)*) $(-> $ret:ty)?; $($rest:tt)*
    ) => {
        $crate::profiled_trait! {
            @parse [$($header)*] $name
            [$($methods)* {[$profiled] [$($attrs)*] [&mut self] invoke_mut $method [$($arg: $ty),*] [$($ret)?]}]
            [false] []
            $($rest)*
        }
    };
    (@parse [$($header:tt)*] $name:ident [$($methods:tt)*] [$profiled:tt] [$($attrs:tt)*]) => {
        $crate::profiled_trait! { @emit [$($header)*] $name $($methods)* }
    };

    (@emit [$($header:tt)*] $name:ident
        $({[$profiled:tt] [$($attrs:tt)*] [$($receiver:tt)*] $invoke:ident $method:ident
            [$($arg:ident: $ty:ty),*] [$($ret:ty)?]})*
    ) => {
        $($header)* {
            $(
                $($attrs)*
                fn $method($($receiver)* $(, $arg: $ty)*) $(-> $ret)?;
            )*
        }

        impl $crate::CapabilityDescriptor for dyn $name {
            const NAME: &'static str = concat!(module_path!(), "::", stringify!($name));
            const METHODS: &'static [$crate::MethodSignature] = &[
                $(
                    $crate::MethodSignature::new(
                        stringify!($method),
                        &[$(stringify!($ty)),*],
                        $profiled,
                    ),
                )*
            ];
        }

        impl<__Target: $name + 'static> $crate::Capability<__Target> for dyn $name {}

        impl<__Target: $name + 'static> $name for $crate::Profiled<__Target> {
            $(
                $crate::profiled_trait!(
                    @forward $name [$profiled] $invoke $method [$($arg: $ty),*] [$($ret)?]
                );
            )*
        }
    };

    (@forward $name:ident [$profiled:tt] invoke $method:ident
        [$($arg:ident: $ty:ty),*] [$($ret:ty)?]
    ) => {
        fn $method(&self $(, $arg: $ty)*) $(-> $ret)? {
            static SIGNATURE: $crate::MethodSignature = $crate::MethodSignature::new(
                stringify!($method),
                &[$(stringify!($ty)),*],
                $profiled,
            );
            $crate::Profiled::invoke(self, &SIGNATURE, |target| <__Target as $name>::$method(target $(, $arg)*))
        }
    };
    (@forward $name:ident [$profiled:tt] invoke_mut $method:ident
        [$($arg:ident: $ty:ty),*] [$($ret:ty)?]
    ) => {
        fn $method(&mut self $(, $arg: $ty)*) $(-> $ret)? {
            static SIGNATURE: $crate::MethodSignature = $crate::MethodSignature::new(
                stringify!($method),
                &[$(stringify!($ty)),*],
                $profiled,
            );
            $crate::Profiled::invoke_mut(self, &SIGNATURE, |target| <__Target as $name>::$method(target $(, $arg)*))
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis trait $name:ident $(: $bound:ident $(+ $bounds:ident)*)? {
            $($body:tt)*
        }
    ) => {
        $crate::profiled_trait! {
            @parse [$(#[$meta])* $vis trait $name $(: $bound $(+ $bounds)*)?] $name [] [false] []
            $($body)*
        }
    };
}
