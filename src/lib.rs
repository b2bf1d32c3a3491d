pub mod components;
pub mod config;
pub mod document;
pub mod events;
pub mod hierarchy;
pub mod loading;
pub mod rng;
pub mod scene;
pub mod selection;
pub mod session;
pub mod ui;
