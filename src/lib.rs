mod board;
mod client;
mod common;
mod config;
mod coord;
mod logging;
pub mod net;
mod notify;
mod player;
pub mod protocol;
mod service;
mod session;
mod ship;
mod status;

pub use board::*;
pub use client::*;
pub use common::*;
pub use config::*;
pub use coord::*;
pub use logging::init_logging;
pub use net::serve;
pub use notify::{Notice, PlayerHandle, RecordingHandle};
pub use player::*;
pub use protocol::*;
pub use service::*;
pub use session::*;
pub use ship::*;
pub use status::*;
