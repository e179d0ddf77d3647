//! Boundary to the game simulation
//!
//! `GameStateProvider` is read-only game state, `ExecutiveGateway` performs
//! actions. `SandboxWorld` implements both in memory.

pub mod gateway;
pub mod military;
pub mod provider;
pub mod sandbox;

pub use gateway::{AttackOutcome, ExecutiveGateway};
pub use military::{aggregate_strength, GarrisonRow, Hero, MilitaryStatus};
pub use provider::{neighbor_cities, CityInfo, GameStateProvider};
pub use sandbox::{GatewayCall, SandboxWorld, Scenario};
