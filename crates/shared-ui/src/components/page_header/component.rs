use dioxus::prelude::*;

/// Page header container: a title on the left, actions on the right.
#[component]
pub fn PageHeader(children: Element) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div { class: "page-header",
            {children}
        }
    }
}

#[component]
pub fn PageTitle(children: Element) -> Element {
    rsx! {
        h1 { class: "page-title", {children} }
    }
}

/// Secondary line under the title, such as a greeting.
#[component]
pub fn PageSubtitle(children: Element) -> Element {
    rsx! {
        p { class: "page-subtitle", {children} }
    }
}

#[component]
pub fn PageActions(children: Element) -> Element {
    rsx! {
        div { class: "page-actions", {children} }
    }
}
