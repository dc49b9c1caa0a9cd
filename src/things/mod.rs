//! Export to Things by Cultured Code
//!
//! The outline tree is rendered into the Things JSON import schema and packed
//! into a `things:///json` URL, which Things imports when it is opened.
//! - `json`: Things item types and the tree conversion
//! - `dates`: `@start`/`@due` date arithmetic
//! - `link`: URL building and opening

mod dates;
mod json;
mod link;

pub use dates::compute_date;
pub use json::{
    ProjectAttributes, ThingsItem, TitleAttributes, ToDoAttributes, project_item, to_json,
};
pub use link::{JSON_URL_PREFIX, build_url, open_url};
