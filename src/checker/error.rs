//! How the checker propagates failed steps.
//!
//! Diagnostics themselves are recorded in the [`crate::output::Output`] log;
//! this type only says how far the failure reaches.

/// Error type for the checker.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The current variant is dropped; remaining variants of an allele set
    /// continue against the mutator state as it stood.
    #[error("the variant was rejected")]
    VariantRejected,
    /// The whole check is abandoned; only the output accumulated so far is
    /// available.
    #[error("the check was abandoned")]
    CheckAborted,
}

// <LICENSE>
// Copyright 2023 hgvs-checker Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
// </LICENSE>
