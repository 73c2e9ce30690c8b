//! Version statistics layer
//!
//! This module fetches the published-version history of an npm package,
//! normalizes it into [`types::VersionRecord`]s and narrows it down with the
//! filter/sort/limit engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│    Fetch    │────▶│   Filter    │
//! │ (raw page)  │     │(orchestrate)│     │(sort/limit) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │                   │
//!                            ▼                   ▼
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │  Extract    │     │   Semver    │
//!                     │(payload,html│     │(range match)│
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`registry`]: Page source trait and the npm website implementation
//! - [`fetch`]: Fetch orchestrator with payload-then-HTML fallback
//! - [`extract`]: Extractors for the embedded payload and the HTML listing
//! - [`tags`]: Reconciles dist-tag entries onto their versions
//! - [`filter`]: Filter/sort/limit engine
//! - [`number`]: Validation of numeric and percentage options
//! - [`semver`]: npm range matching and version ordering
//! - [`error`]: Error types for every stage
//! - [`types`]: `VersionRecord`

pub mod error;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod number;
pub mod registry;
pub mod semver;
pub mod tags;
pub mod types;
