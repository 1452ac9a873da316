//! Dioxus UI primitives for the complaint desk. Each component ships its own stylesheet.

pub mod components;

pub use components::*;
