//! Terminal UI: board, scores and move list for one session, with a cosmetic
//! thinking delay before the computer's token shows.

mod app;
mod delay;
mod game_view;

pub use app::App;
pub use delay::{DelayRange, UiConfig};
