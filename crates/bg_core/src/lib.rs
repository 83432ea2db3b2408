//! # Battle Ground Core
//!
//! Deterministic medieval battle simulation core.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No networking
//! - No wall-clock-dependent behavior outside the opt-in timed runner mode
//!
//! Given an identical `(scenario, seed)` pair, [`battle::run`] produces a
//! bitwise-identical [`result::BattleResult`] every time (same-process
//! reproducibility; see `DESIGN.md` on why this crate uses `f64` rather than
//! a fixed-point representation).
//!
//! ## Crate structure
//!
//! - [`unit`] - unit model: stats, identity, the closed type vocabulary
//! - [`stats`] - canonical per-type stat table
//! - [`math`] - battlefield vector math
//! - [`order`] - the order vocabulary and per-unit `OrderManager`
//! - [`strategy`] - troop/start/depletion strategies and the named-strategy registry
//! - [`general`] - per-side strategic controller
//! - [`scenario`] - formation layout and the Lanchester builder
//! - [`engine`] - world state and the query/mutation primitives orders call
//! - [`battle`] - the tick-loop runner
//! - [`result`] - battle outcome summary
//! - [`persistence`] - RON scenario save/load
//! - [`error`] - crate-wide error type

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod battle;
pub mod engine;
pub mod error;
pub mod general;
pub mod math;
pub mod order;
pub mod persistence;
pub mod result;
pub mod scenario;
pub mod stats;
pub mod strategy;
pub mod unit;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::battle::{run, Pacing, PauseFlag, StopFlag};
    pub use crate::engine::{Engine, Winner};
    pub use crate::error::{BattleError, Result};
    pub use crate::general::General;
    pub use crate::math::Vec2;
    pub use crate::order::{Order, OrderKind, OrderManager};
    pub use crate::result::{BattleResult, BattleWinner, TeamSummary};
    pub use crate::scenario::{build, build_lanchester, FormationTag, Scenario};
    pub use crate::stats::{base_stats, UnitStats};
    pub use crate::strategy::{DepletionHandler, StartStrategy, StrategyName, StrategyProfile, TroopStrategy};
    pub use crate::unit::{DamageKind, Team, Unit, UnitId, UnitType};
}
