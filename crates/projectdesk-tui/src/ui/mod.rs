//! Terminal UI module using ratatui.
//!
//! This module provides the TUI rendering and input handling:
//!
//! - `render`: Main frame rendering, layout and overlays
//! - `input`: Keyboard event handling
//! - `styles`: Color schemes and text styling
//! - `screens`: Per-route content (login, project list, form, etc.)

pub mod input;
pub mod render;
pub mod screens;
pub mod styles;
