//! # fairdiv - Fair division of indivisible items
//!
//! fairdiv decides whether an allocation of indivisible items is fair when
//! agents' preferences may be known only as rankings, and constructs or
//! searches for allocations that are fair under the strongest notions.
//!
//! ## Modules
//!
//! - [`preference`] - Rankings, optional cardinal values and Borda scores
//! - [`dominance`] - Necessary / possible dominance between bundles
//! - [`fairness`] - Proportionality and envy-freeness predicates
//! - [`allocation`] - Draft algorithms, random baseline and bounded search
//! - [`experiment`] - Random profiles, per-profile checks and sweeps
//! - [`types`] - Items, agents, bundles and allocations
//! - [`error`] - Error types and handling
//! - [`config`] - Experiment configuration
//! - [`logger`] - Tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```rust
//! use fairdiv::*;
//!
//! let profile = PreferenceProfile::new([
//!     ("Alice", Preference::from_order([6, 5, 4, 3, 2, 1])?),
//!     ("Bob", Preference::from_order([5, 6, 4, 3, 2, 1])?),
//!     ("Carl", Preference::from_order([4, 5, 6, 3, 2, 1])?),
//! ])?;
//!
//! let allocation = find_ndd_proportional_allocation(&profile)?.expect("best items differ");
//! assert_eq!(allocation.to_string(), "{Alice:[6, 1], Bob:[5, 2], Carl:[4, 3]}");
//! assert!(is_ndd_proportional(&profile, &allocation)?);
//! assert!(!is_necessarily_proportional(&profile, &allocation)?);
//! # Ok::<(), fairdiv::Error>(())
//! ```

pub mod allocation;
pub mod config;
pub mod dominance;
pub mod error;
pub mod experiment;
pub mod fairness;
pub mod logger;
pub mod preference;
pub mod types;

pub use allocation::*;
pub use dominance::*;
pub use error::*;
pub use fairness::*;
pub use preference::*;
pub use types::*;
