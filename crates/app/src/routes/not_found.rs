use crate::routes::Route;
use dioxus::prelude::*;

#[component]
pub fn NotFound(route: Vec<String>) -> Element {
    let path = route.join("/");
    rsx! {
        div { class: "desk-loading",
            div {
                h1 { "Page not found" }
                p { "Nothing lives at /{path}." }
                Link { to: Route::Home {}, "Back to the desk" }
            }
        }
    }
}
