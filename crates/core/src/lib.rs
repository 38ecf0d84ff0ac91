// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cfb-core: message model shared by the analyzer wire codec and the engine

pub mod macros;

pub mod id;
pub mod request;
pub mod response;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use id::{short, RunId};
pub use request::{Request, RequestBuilder};
#[cfg(any(test, feature = "test-support"))]
pub use response::{MessageBuilder, MessagePartBuilder};
pub use response::{Message, MessagePart, Response};
