// templates/pages/listing.rs

use crate::map::{MapCanvas, ScriptedMap, DEFAULT_ZOOM};
use crate::templates::components::{
    alert, blocking_notice, map_container, property_details, spinner,
};
use crate::templates::desktop_layout;
use crate::workflows::listing::HoverPreview;
use crate::workflows::{ListingPhase, ListingWorkflow};
use maud::{html, Markup};

/// `snapshot` is the token of the records this page loaded; every follow-up
/// request (search, hover, focus, close) carries it.
pub fn listing_page(
    wf: &ListingWorkflow<ScriptedMap>,
    api_key: &str,
    commands_json: &str,
    snapshot: Option<u64>,
) -> Markup {
    let phase = wf.phase();
    let loading_label = match phase {
        ListingPhase::LoadingData { .. } => "Loading property data...",
        _ => "Loading Google Maps...",
    };

    desktop_layout(
        "Property Explorer",
        &["/static/listing.js"],
        html! {
            main class="listing" data-phase=(phase.as_str()) data-snapshot=[snapshot] {
                div class="listing-toolbar" {
                    span class="listing-count" { (wf.total()) " listings" }
                    button type="button"
                        class="secondary sidebar-toggle"
                        data-sidebar-toggle
                        aria-controls="sidebar"
                        aria-expanded="true"
                    { "Hide List" }
                    @if let Some(token) = snapshot {
                        input type="search"
                            name="q"
                            placeholder="Search by city, broker, ID..."
                            value=(wf.query())
                            hx-get="/show/search"
                            hx-vals=(format!(r#"{{"snap": {token}}}"#))
                            hx-trigger="keyup changed delay:300ms, search"
                            hx-target="#sidebar"
                            hx-swap="outerHTML"
                            hx-sync="this:replace";
                    }
                }

                @if let Some(err) = wf.load_error() {
                    (blocking_notice("Error", &err.to_string()))
                } @else {
                    div class="listing-body" {
                        div class="listing-map" {
                            @if let Some(err) = wf.map_error() {
                                (alert(&err.to_string(), None))
                            } @else {
                                (map_container("listing-map", api_key, DEFAULT_ZOOM, Some(commands_json)))
                                div id="map-loading" { (spinner(loading_label)) }
                            }
                            (hover_card(None))
                        }
                        (sidebar(wf))
                    }
                }
            }
        },
    )
}

pub fn listing_unconfigured(message: &str) -> Markup {
    desktop_layout(
        "Property Explorer",
        &[],
        blocking_notice("Configuration error", message),
    )
}

/// Side list of the visible records. Swapped on its own by the search box.
pub fn sidebar<C: MapCanvas>(wf: &ListingWorkflow<C>) -> Markup {
    html! {
        aside id="sidebar" class="sidebar" {
            div class="sidebar-head" {
                h2 { "Property List" }
                button type="button" class="sidebar-close" data-sidebar-toggle title="Close sidebar" { "×" }
            }
            @if matches!(wf.phase(), ListingPhase::LoadFailed) {
                p class="muted" { "Properties could not be loaded." }
            } @else if wf.visible_count() == 0 {
                p class="muted" { "No properties match your search criteria" }
            } @else {
                ul {
                    @for record in wf.visible() {
                        li class="property-row"
                            data-focus-id=(record.id)
                            data-renderable=(record.is_renderable())
                        {
                            h3 { "Property #" (record.id) }
                            (property_details(record))
                        }
                    }
                }
            }
            @if let Some(caption) = wf.caption() {
                p class="caption" { (caption) }
            }
        }
    }
}

/// Popup next to the pointer; `None` renders the empty placeholder.
pub fn hover_card(preview: Option<HoverPreview<'_>>) -> Markup {
    html! {
        @match preview {
            Some(p) => div id="hover-card"
                class="hover-card"
                style=(format!("left: {}px; top: {}px;", p.position.x, p.position.y))
            {
                h3 { "Property #" (p.record.id) }
                (property_details(p.record))
            },
            None => div id="hover-card" class="hover-card" hidden {},
        }
    }
}
