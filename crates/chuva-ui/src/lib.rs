pub mod autocomplete;
pub mod controller;
pub mod error_mapping;
pub mod format;
pub mod render;
pub mod services;
pub mod state;
pub mod status;
pub mod theme;
pub mod tour;
pub mod view;

pub use controller::{client_options, ControllerSettings, Update, WeatherController};
pub use state::{AppState, RequestSequencer, RequestToken, ViewMode};
pub use view::{build_screen, explanation, Screen};
