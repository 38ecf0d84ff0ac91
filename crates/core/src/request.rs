// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Analysis request sent to the native analyzer.

use serde::{Deserialize, Serialize};

/// One analysis invocation for a single translation unit.
///
/// Built once through [`RequestBuilder`] and then only borrowed by the codec.
/// Every array field is always present; an empty `Vec` encodes as a zero count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Analyzer options (`-std=c++17` style switches already resolved by the host)
    pub options: Vec<String>,
    /// Analyzer feature flags
    pub flags: i64,
    /// MSVC version emulated by the analyzer (0 when not targeting MSVC)
    pub ms_version: i64,
    pub include_dirs: Vec<String>,
    pub framework_dirs: Vec<String>,
    pub vfs_overlay_files: Vec<String>,
    pub module_name: String,
    /// Predefined macro text, one `#define` per line
    pub predefines: String,
    pub macros: Vec<String>,
    pub target_triple: String,
    /// Absolute path of the file to analyze
    pub file: String,
}

impl Request {
    pub fn builder(file: impl Into<String>) -> RequestBuilder {
        RequestBuilder { file: file.into(), ..RequestBuilder::default() }
    }

    /// Iterate over every string field in wire order, paired with its field name.
    ///
    /// Used to validate a request as a whole before any bytes are produced.
    pub fn strings(&self) -> impl Iterator<Item = (&'static str, &str)> {
        let arrays = [
            ("options", &self.options),
            ("include_dirs", &self.include_dirs),
            ("framework_dirs", &self.framework_dirs),
            ("vfs_overlay_files", &self.vfs_overlay_files),
        ];
        let scalars = [("module_name", &self.module_name), ("predefines", &self.predefines)];
        let tail = [("target_triple", &self.target_triple), ("file", &self.file)];

        arrays
            .into_iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (name, v.as_str())))
            .chain(scalars.into_iter().map(|(name, v)| (name, v.as_str())))
            .chain(self.macros.iter().map(|v| ("macros", v.as_str())))
            .chain(tail.into_iter().map(|(name, v)| (name, v.as_str())))
    }
}

/// Builder for [`Request`].
///
/// Scalar fields are set directly; array fields accumulate one entry per call.
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    options: Vec<String>,
    flags: i64,
    ms_version: i64,
    include_dirs: Vec<String>,
    framework_dirs: Vec<String>,
    vfs_overlay_files: Vec<String>,
    module_name: String,
    predefines: String,
    macros: Vec<String>,
    target_triple: String,
    file: String,
}

impl RequestBuilder {
    crate::setters! {
        into { module_name: String, predefines: String, target_triple: String }
        set { flags: i64, ms_version: i64 }
        push {
            option => options: String,
            include_dir => include_dirs: String,
            framework_dir => framework_dirs: String,
            vfs_overlay_file => vfs_overlay_files: String,
            /// Add a macro definition (`NAME` or `NAME=VALUE`).
            define => macros: String,
        }
    }

    pub fn build(self) -> Request {
        Request {
            options: self.options,
            flags: self.flags,
            ms_version: self.ms_version,
            include_dirs: self.include_dirs,
            framework_dirs: self.framework_dirs,
            vfs_overlay_files: self.vfs_overlay_files,
            module_name: self.module_name,
            predefines: self.predefines,
            macros: self.macros,
            target_triple: self.target_triple,
            file: self.file,
        }
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
