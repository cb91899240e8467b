use crate::domain::format::{format_acres, format_number, format_price, format_text};
use crate::domain::PropertyRecord;
use maud::{html, Markup};

/// Broker, price, size and city of one record.
pub fn property_details(record: &PropertyRecord) -> Markup {
    html! {
        dl class="property-details" {
            dt { "Broker:" } dd { (format_text(record.broker.as_deref())) }
            dt { "Price:" } dd { (format_price(record.price)) }
            dt { "Size:" } dd { (format_acres(record.acres)) }
            dt { "City:" } dd { (format_text(record.city.as_deref())) }
        }
    }
}

/// Content of the map info window opened by a marker click.
pub fn info_window(record: &PropertyRecord) -> Markup {
    html! {
        div class="info-window" {
            div class="info-title" { "Property #" (record.id) }
            div { "Broker: " (format_text(record.broker.as_deref())) }
            div { "Price: " (format_price(record.price)) }
            div { "Acres: " (format_number(record.acres)) }
            div { "City: " (format_text(record.city.as_deref())) }
        }
    }
}
