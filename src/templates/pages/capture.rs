// templates/pages/capture.rs

use crate::domain::format::format_coordinate;
use crate::map::CAPTURE_ZOOM;
use crate::templates::components::{alert, blocking_notice, map_container, spinner};
use crate::templates::desktop_layout;
use crate::workflows::{CapturePhase, CaptureWorkflow};
use maud::{html, Markup};

pub fn capture_page(wf: &CaptureWorkflow, api_key: &str) -> Markup {
    desktop_layout(
        "Location Selector",
        &["/static/capture.js"],
        html! {
            main class="capture" {
                div class="capture-map" {
                    (map_container("capture-map", api_key, CAPTURE_ZOOM, None))
                    div id="map-loading" { (spinner("Loading Google Maps...")) }
                }
                aside class="capture-side" {
                    (capture_panel(wf))
                }
            }
        },
    )
}

/// Shown instead of the map when no Maps credential is configured.
pub fn capture_unconfigured(message: &str) -> Markup {
    desktop_layout(
        "Location Selector",
        &[],
        blocking_notice("Configuration error", message),
    )
}

/// The whole form. Every capture route re-renders and swaps this element.
pub fn capture_panel(wf: &CaptureWorkflow) -> Markup {
    let phase = wf.phase();
    let interactive = !matches!(phase, CapturePhase::AwaitingMapReady | CapturePhase::Submitted);
    let fields = wf.fields();
    let selection = wf.selection();
    let displayed = wf.displayed();

    html! {
        form id="capture-form"
            class="capture-panel"
            method="post"
            action="/capture/submit"
            hx-post="/capture/submit"
            hx-target="this"
            hx-swap="outerHTML"
            hx-sync="this:replace"
            data-phase=(phase.as_str())
            data-lat=[displayed.map(|p| p.lat())]
            data-lng=[displayed.map(|p| p.lng())]
            data-geo-pending=[wf.geolocation_slot().pending().map(|t| t.0)]
        {
            (hidden_state(wf))

            @if let Some(err) = wf.error() {
                (alert(&err.to_string(), Some("/capture/dismiss")))
            }

            fieldset disabled[!interactive] {
                section {
                    h2 { "Property Details" }
                    label for="broker" { "Broker Name" }
                    input id="broker" name="broker" type="text" placeholder="Enter broker name" value=(fields.broker);

                    label for="price" { "Price" }
                    input id="price" name="price" type="text" inputmode="decimal" placeholder="Enter property price" value=(fields.price);

                    label for="acres" { "Property Size (Acres)" }
                    input id="acres" name="acres" type="text" inputmode="decimal" placeholder="Enter property size in acres" value=(fields.acres);
                }

                section {
                    h2 { "Address Details" }
                    label for="state" { "State" }
                    input id="state" name="state" type="text" placeholder="Enter state" value=(fields.state);

                    label for="city" { "City" }
                    input id="city" name="city" type="text" placeholder="Enter city" value=(fields.city);

                    label for="street" { "Street" }
                    input id="street" name="street" type="text" placeholder="Enter street" value=(fields.street);

                    button type="button" class="secondary"
                        hx-post="/capture/address"
                        hx-indicator="#geocode-indicator"
                    { "Update Map Location" }
                }

                section {
                    h2 { "Selected Location" }
                    div class="selected" {
                        @match selection {
                            Some(sel) => p { (sel.address) },
                            None => p class="muted" { "No location selected yet. Click on the map to select." },
                        }
                    }
                    div id="geocode-indicator" class="htmx-indicator" { (spinner("Looking up address...")) }

                    @if let Some(point) = displayed {
                        div class="coordinates" {
                            h3 { "Coordinates" }
                            p { "Lat: " span class="mono" { (format_coordinate(point.lat())) } }
                            p { "Lng: " span class="mono" { (format_coordinate(point.lng())) } }
                            button type="button" class="copy"
                                hx-post="/capture/copy"
                                hx-swap="none"
                                title="Copy coordinates"
                            { "Copy" }
                            span id="copy-status" class="copy-status" role="status" aria-live="polite" {}
                        }
                    }

                    button type="button" class="locate"
                        hx-post="/capture/locate/start"
                    {
                        @if wf.geolocation_slot().pending().is_some() {
                            "Locating..."
                        } @else {
                            "Use my location"
                        }
                    }

                    button type="submit" class="primary" disabled[selection.is_none()] {
                        "Confirm Location"
                    }
                }
            }

            @if phase == CapturePhase::AwaitingMapReady {
                p class="muted" { "Waiting for the map to load..." }
            }
        }
    }
}

/// Workflow state carried between requests.
fn hidden_state(wf: &CaptureWorkflow) -> Markup {
    let slot = wf.geolocation_slot();
    html! {
        @if wf.is_ready() {
            input type="hidden" name="map_ready" value="1";
        }
        @if let Some(p) = wf.displayed() {
            input type="hidden" name="disp_lat" value=(p.lat());
            input type="hidden" name="disp_lng" value=(p.lng());
        }
        @if let Some(sel) = wf.selection() {
            input type="hidden" name="sel_address" value=(sel.address);
            input type="hidden" name="sel_place_id" value=(sel.place_id);
            input type="hidden" name="sel_lat" value=(sel.position.lat());
            input type="hidden" name="sel_lng" value=(sel.position.lng());
            @if let Some(v) = &sel.state { input type="hidden" name="sel_state" value=(v); }
            @if let Some(v) = &sel.city { input type="hidden" name="sel_city" value=(v); }
            @if let Some(v) = &sel.street { input type="hidden" name="sel_street" value=(v); }
        }
        input type="hidden" name="geo_issued" value=(slot.issued());
        @if let Some(t) = slot.pending() {
            input type="hidden" name="geo_pending" value=(t.0);
        }
    }
}
