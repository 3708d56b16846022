pub mod app;
pub mod events;
pub mod layout;
pub mod services;
pub mod theme;
pub mod views;
