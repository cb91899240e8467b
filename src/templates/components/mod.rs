use maud::{html, Markup, PreEscaped};

pub mod error;
pub mod property;

pub use error::{alert, blocking_notice, error_page, map_unavailable};
pub use property::{info_window, property_details};

pub fn spinner(label: &str) -> Markup {
    html! {
        div class="loading" {
            div class="spinner" aria-hidden="true" {}
            p { (label) }
        }
    }
}

/// Element the map glue script mounts the widget into.
pub fn map_container(id: &str, api_key: &str, zoom: u8, commands_json: Option<&str>) -> Markup {
    html! {
        div id=(id) class="map" data-maps-key=(api_key) data-zoom=(zoom) {}
        @if let Some(json) = commands_json {
            // record text may contain "</script>"
            script type="application/json" id="map-commands" { (PreEscaped(json.replace("</", "<\\/"))) }
        }
    }
}
