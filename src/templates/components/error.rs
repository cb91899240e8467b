use maud::{html, Markup, DOCTYPE};

/// Full error page for a failed request.
pub fn error_page(status: u16, message: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Error " (status) }
                link rel="stylesheet" href="/static/main.css";
            }
            body class="error-page" {
                h1 { "Error " (status) }
                p { (message) }
                p { a href="/" { "← Back to capture" } }
            }
        }
    }
}

/// Recoverable error shown inside a screen. The dismiss button posts to
/// `dismiss_url` when given; otherwise the alert cannot be closed.
pub fn alert(message: &str, dismiss_url: Option<&str>) -> Markup {
    html! {
        div class="alert" role="alert" {
            svg class="alert-icon" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" {
                path stroke-linecap="round" stroke-linejoin="round" stroke-width="2"
                    d="M12 8v4m0 4h.01M21 12a9 9 0 11-18 0 9 9 0 0118 0z" {}
            }
            p { (message) }
            @if let Some(url) = dismiss_url {
                button type="button" class="alert-dismiss"
                    hx-post=(url)
                    hx-include="closest form"
                    hx-target="closest form"
                    hx-swap="outerHTML"
                { "Dismiss" }
            }
        }
    }
}

/// Blocking message for a screen that cannot work at all.
pub fn blocking_notice(title: &str, message: &str) -> Markup {
    html! {
        div class="blocking" {
            div class="blocking-card" {
                h2 { (title) }
                p { (message) }
            }
        }
    }
}

/// Replaces a screen's `main` once the map widget has failed to load.
pub fn map_unavailable(message: &str) -> Markup {
    html! {
        main class="blocking-screen" {
            (blocking_notice("Error", message))
        }
    }
}
