// Copyright 2025 rcompute Authors
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

//! # rcompute CLI
//!
//! Command-line access to a remote geometry compute service.
//!
//! ## Key Commands
//!
//! - `rcompute path`: Print the REST path for an operation
//! - `rcompute call`: Invoke an operation with JSON arguments (outputs raw JSON for scripting)
//!
//! Connection settings come from flags, falling back to the
//! `RHINO_COMPUTE_*` environment variables.

pub mod invoke;
