pub mod cli;
pub mod fetch;
pub mod filter;
pub mod normalize;
pub mod parser;
pub mod query;
pub mod schema;
pub mod ui;
pub mod writer;

pub use cli::{Cli, Commands};
pub use ui::{LogUi, Phase, SilentUi, Ui, UiApp};
