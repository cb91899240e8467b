pub mod assets;
pub mod errors;
pub mod html;

pub use assets::{asset_response, json_response};
pub use errors::{error_response, ResultResp};
pub use html::{html_response, htmx_redirect, redirect, with_trigger};
