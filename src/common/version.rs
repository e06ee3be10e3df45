// Copyright 2026 NumBridge Contributors
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

//! Version information for NumBridge

/// Crate version in semver format
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit hash at build time
/// Set via NUMBRIDGE_GIT_COMMIT environment variable during compilation
pub const GIT_COMMIT: &str = match option_env!("NUMBRIDGE_GIT_COMMIT") {
    Some(commit) => commit,
    None => "unknown",
};

/// Returns version info as a formatted string
pub fn version_info() -> String {
    format!("numbridge {} (commit: {})", VERSION, GIT_COMMIT)
}
