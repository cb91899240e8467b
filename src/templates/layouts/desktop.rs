use maud::{html, Markup, DOCTYPE};

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@1.9.12";

/// Page shell shared by both screens. `scripts` are loaded deferred after htmx.
pub fn desktop_layout(title: &str, scripts: &[&str], content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href="/static/main.css";
                script src=(HTMX_SRC) defer {};
                @for src in scripts {
                    script src=(src) defer {};
                }
            }
            body {
              header class="topbar" {
                  svg
                      xmlns="http://www.w3.org/2000/svg"
                      width="24"
                      height="24"
                      viewBox="0 0 24 24"
                      fill="none"
                      stroke="#4338CA"
                      stroke-width="2"
                      stroke-linecap="round"
                      stroke-linejoin="round"
                  {
                      path d="M17.657 16.657L13.414 20.9a1.998 1.998 0 01-2.827 0l-4.244-4.243a8 8 0 1111.314 0z" {}
                      path d="M15 11a3 3 0 11-6 0 3 3 0 016 0z" {}
                  }
                  h3 { (title) }
                  nav {
                      ul {
                          li { a href="/" { "Capture" } }
                          li { a href="/show" { "Listings" } }
                      }
                  }
              }
                (content)
            }
        }
    }
}
