mod loader;
mod parse;
mod source;

pub use loader::load_store;
pub use parse::{parse_menu_payload, parse_numeric_label};
pub use source::{GraphQlMenuClient, MenuSource};
