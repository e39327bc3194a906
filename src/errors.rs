//! Error types for the nodeup CLI.
//!
//! Most fallible paths use `anyhow::Result` with added context. The typed
//! variants below exist for the cases the binary has to inspect after the
//! fact — most importantly `ProcessExitCode`, which carries a child
//! process's exit code up to `main` so the tool can terminate with the
//! exact same code.

use std::path::PathBuf;
use thiserror::Error;

/// Consolidated error type for nodeup operations.
#[derive(Debug, Error)]
pub enum NodeupError {
    /// No Node.js version satisfies the requested constraint.
    #[error("no Node.js version matches the constraint: {constraint}")]
    NoMatchingVersion {
        /// The constraint that could not be satisfied.
        constraint: String,
    },

    /// The host OS/architecture has no published Node.js artifact.
    #[error("unsupported platform for Node.js {version}: {os} on {arch}")]
    UnsupportedPlatform {
        /// The version that was requested.
        version: String,
        /// Host operating system.
        os: &'static str,
        /// Host architecture.
        arch: &'static str,
    },

    /// An archive entry tried to escape the extraction directory.
    #[error("archive entry escapes extraction directory: {entry}")]
    PathTraversal {
        /// The offending entry name.
        entry: PathBuf,
    },

    /// The archive suffix maps to no known extractor.
    #[error("unsupported archive format: {file}")]
    UnsupportedArchive {
        /// The archive file name.
        file: String,
    },

    /// No command was given where one is required.
    #[error("no command provided")]
    NoCommand,

    /// Subprocess exited with a non-zero code.
    ///
    /// This is not a failure of nodeup itself; the code is propagated as
    /// the process exit code without printing an additional message.
    #[error("process exited with code {code}")]
    ProcessExitCode {
        /// The exit code from the subprocess.
        code: i32,
    },
}

impl NodeupError {
    /// Creates a new `NoMatchingVersion` error.
    #[must_use]
    pub fn no_matching_version(constraint: impl Into<String>) -> Self {
        Self::NoMatchingVersion {
            constraint: constraint.into(),
        }
    }

    /// Creates a new `ProcessExitCode` error.
    #[must_use]
    pub const fn process_exit_code(code: i32) -> Self {
        Self::ProcessExitCode { code }
    }
}
