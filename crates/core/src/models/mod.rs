pub mod chart;
pub mod event;
pub mod input;
pub mod mover;
pub mod point;
pub mod settings;
pub mod time;
pub mod view;
