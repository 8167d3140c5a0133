//! Input module: Host key and mouse events → stream control commands.
//!
//! The engine never polls the terminal. The host reads crossterm events on
//! its own loop and routes them through [`KeyBindings::command_for`]; the
//! resulting [`StreamCommand`] goes to
//! [`StreamEngine::apply`](crate::StreamEngine::apply).

mod bindings;

pub use bindings::{KeyBindings, StreamCommand};
