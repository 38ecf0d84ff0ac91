// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Analysis findings returned by the native analyzer.

use serde::{Deserialize, Serialize};

/// Decoded analyzer output: the findings, in the order the analyzer sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub messages: Vec<Message>,
}

impl Response {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages reported against `filename`, in wire order.
    pub fn messages_for<'a>(&'a self, filename: &'a str) -> impl Iterator<Item = &'a Message> {
        self.messages.iter().filter(move |m| m.filename == filename)
    }
}

/// A single finding. Positions are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub rule_key: String,
    pub filename: String,
    pub line: i32,
    pub column: i32,
    pub end_line: i32,
    pub end_column: i32,
    pub text: String,
    /// When set, `parts` are the ordered steps of an execution flow rather
    /// than independent secondary locations.
    pub parts_make_flow: bool,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

impl Message {
    /// Secondary locations forming a flow, if the analyzer marked them as one.
    pub fn flow(&self) -> Option<&[MessagePart]> {
        (self.parts_make_flow && !self.parts.is_empty()).then_some(self.parts.as_slice())
    }
}

/// Secondary location attached to a [`Message`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePart {
    pub filename: String,
    pub line: i32,
    pub column: i32,
    pub end_line: i32,
    pub end_column: i32,
    pub text: String,
}

crate::builder! {
    pub struct MessageBuilder => Message {
        into {
            rule_key: String = "cpp:S1135",
            filename: String = "/src/main.cpp",
            text: String = "Complete the task associated to this TODO comment.",
        }
        set {
            line: i32 = 1,
            column: i32 = 1,
            end_line: i32 = 1,
            end_column: i32 = 10,
            parts_make_flow: bool = false,
            parts: Vec<MessagePart> = Vec::new(),
        }
    }
}

crate::builder! {
    pub struct MessagePartBuilder => MessagePart {
        into {
            filename: String = "/src/main.cpp",
            text: String = "",
        }
        set {
            line: i32 = 1,
            column: i32 = 1,
            end_line: i32 = 1,
            end_column: i32 = 1,
        }
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
