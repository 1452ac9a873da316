use dioxus::prelude::*;
use shared_types::UserProfile;
use shared_ui::components::{PageHeader, PageSubtitle, PageTitle};

/// Dashboard header naming the signed-in user and their institutional id.
#[component]
pub fn Greeting(profile: UserProfile, title: String) -> Element {
    rsx! {
        PageHeader {
            PageTitle { "{title}" }
            PageSubtitle { "Hello, {profile.name} · {profile.student_id} · {profile.department}" }
        }
    }
}
