// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros shared by the model and engine crates.
//!
//! - [`simple_display!`]: `Display` for enums whose variants print as fixed words
//! - [`setters!`]: chained by-value setters inside a builder `impl`
//! - [`builder!`]: test-only builder with defaults, expanded through [`setters!`]

/// Implement `Display` by mapping each variant to a string literal.
///
/// Variants carrying data take a `(..)` pattern.
///
/// ```ignore
/// cfb_core::simple_display! {
///     RunnerState {
///         Created => "created",
///         Running => "running",
///     }
/// }
/// ```
#[macro_export]
macro_rules! simple_display {
    ($enum:ty { $( $variant:ident $(( $($ignore:tt)* ))? => $str:expr ),+ $(,)? }) => {
        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $( Self::$variant $(( $($ignore)* ))? => $str, )+
                })
            }
        }
    };
}

/// Chained setters for a builder that is consumed by value.
///
/// - `into { field: T }` replaces `field` with `impl Into<T>`
/// - `set { field: T }` replaces `field` with a `T`
/// - `push { method => field: T }` appends an `impl Into<T>` to the `Vec<T>` in `field`
///
/// ```ignore
/// impl RequestBuilder {
///     cfb_core::setters! {
///         into { module_name: String }
///         set { flags: i64 }
///         push { include_dir => include_dirs: String }
///     }
/// }
/// ```
#[macro_export]
macro_rules! setters {
    (
        $(into { $( $into_field:ident : $into_ty:ty ),* $(,)? })?
        $(set { $( $set_field:ident : $set_ty:ty ),* $(,)? })?
        $(push {
            $( $(#[$push_meta:meta])* $push_fn:ident => $push_field:ident : $push_ty:ty ),* $(,)?
        })?
    ) => {
        $($(
            pub fn $into_field(mut self, value: impl Into<$into_ty>) -> Self {
                self.$into_field = value.into();
                self
            }
        )*)?

        $($(
            pub fn $set_field(mut self, value: $set_ty) -> Self {
                self.$set_field = value;
                self
            }
        )*)?

        $($(
            $(#[$push_meta])*
            pub fn $push_fn(mut self, value: impl Into<$push_ty>) -> Self {
                self.$push_field.push(value.into());
                self
            }
        )*)?
    };
}

/// Test builder for a plain struct: every field gets a default and a setter.
///
/// Only compiled under `test` or the `test-support` feature. Adds
/// `Target::builder()` returning the builder.
///
/// ```ignore
/// crate::builder! {
///     pub struct MessagePartBuilder => MessagePart {
///         into { filename: String = "main.cpp" }
///         set { line: i32 = 1 }
///     }
/// }
/// ```
#[macro_export]
macro_rules! builder {
    (
        pub struct $builder:ident => $target:ident {
            $(into { $( $into_field:ident : $into_ty:ty = $into_default:expr ),* $(,)? })?
            $(set { $( $set_field:ident : $set_ty:ty = $set_default:expr ),* $(,)? })?
        }
    ) => {
        #[cfg(any(test, feature = "test-support"))]
        pub struct $builder {
            $($( $into_field: $into_ty, )*)?
            $($( $set_field: $set_ty, )*)?
        }

        #[cfg(any(test, feature = "test-support"))]
        impl Default for $builder {
            fn default() -> Self {
                Self {
                    $($( $into_field: $into_default.into(), )*)?
                    $($( $set_field: $set_default, )*)?
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $builder {
            $crate::setters! {
                $(into { $( $into_field: $into_ty ),* })?
                $(set { $( $set_field: $set_ty ),* })?
            }

            pub fn build(self) -> $target {
                $target {
                    $($( $into_field: self.$into_field, )*)?
                    $($( $set_field: self.$set_field, )*)?
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $target {
            pub fn builder() -> $builder {
                $builder::default()
            }
        }
    };
}
