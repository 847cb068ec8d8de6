//! MIRa Core - Minimalist Internet Radio engine
//!
//! This crate provides everything behind the front panel: the preset
//! catalog and its paging, the persisted playback state, control of the
//! external player, and the controller tying them together.

pub mod command;
pub mod config;
pub mod controller;
pub mod link;
pub mod pager;
pub mod panel;
pub mod player;
pub mod preset;
pub mod state;
pub mod timer;

pub use command::PlayerCommand;
pub use config::{ Config, ConfigError };
pub use controller::{ Controller, Selection };
pub use link::{ ConfiguredProbe, LinkProbe };
pub use pager::Pager;
pub use panel::{ Panel, PanelEvent };
pub use player::{ Mpc, PlayerControl, PlayerError };
pub use preset::{ Catalog, Preset, Station };
pub use state::{ StateError, StateStore };
pub use timer::PeriodicTask;
