//! Activation triggers

pub mod button;

pub use button::DebouncedButton;
