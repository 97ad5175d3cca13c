//! Game core: board types, position codec, rules, and the engine.

mod engine;
mod error;
mod position;
mod rules;
mod types;

pub use engine::{Engine, Outcome};
pub use error::{ConfigError, ParseError, PlayError};
pub use position::Position;
pub use rules::{Line, check_winner, is_draw};
pub use types::{Board, Mark, Square};
