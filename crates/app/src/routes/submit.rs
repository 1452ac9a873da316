use std::collections::HashMap;

use dioxus::prelude::*;
use shared_types::{
    category_label, AppError, Section, SubmitComplaintRequest, Urgency, COMPLAINT_CATEGORIES,
};
use shared_ui::components::{
    Button, Card, CardContent, CardDescription, CardHeader, CardTitle, FormSelect, Input, Textarea,
};

use crate::notify::use_notifier;
use crate::routes::use_desk_nav;

#[component]
pub fn SubmitComplaint() -> Element {
    let notifier = use_notifier();
    let mut nav = use_desk_nav();

    let mut category = use_signal(String::new);
    let mut location = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut urgency = use_signal(Urgency::default);
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut loading = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| async move {
        evt.prevent_default();
        field_errors.set(HashMap::new());

        let request = SubmitComplaintRequest {
            category: category(),
            location: location(),
            description: description(),
            urgency: urgency(),
        };
        if let Err(err) = request.precheck() {
            notifier.error(err.message.clone());
            field_errors.set(err.field_errors);
            return;
        }

        loading.set(true);
        match server::api::submit_complaint(request).await {
            Ok(_) => {
                notifier.success("Complaint submitted successfully!");
                category.set(String::new());
                location.set(String::new());
                description.set(String::new());
                urgency.set(Urgency::default());
                nav.go(Section::UserDashboard);
            }
            Err(e) => {
                field_errors.set(AppError::parse_field_errors(&e.to_string()));
                notifier.failure(&e, "Error submitting complaint");
            }
        }
        loading.set(false);
    };

    let error_for = move |field: &str| field_errors.read().get(field).cloned();

    rsx! {
        Card { class: "submit-card",
            CardHeader {
                CardTitle { "File a complaint" }
                CardDescription { "Tell us what is wrong and where. Critical issues are flagged for the admins." }
            }
            CardContent {
                form { class: "desk-form", onsubmit: handle_submit,
                    div { class: "desk-form-row",
                        div {
                            FormSelect {
                                label: "Category",
                                value: category(),
                                onchange: move |e: Event<FormData>| category.set(e.value()),
                                option { value: "", disabled: true, "Choose a category" }
                                for slug in COMPLAINT_CATEGORIES.iter() {
                                    option { key: "{slug}", value: *slug, "{category_label(slug)}" }
                                }
                            }
                            if let Some(msg) = error_for("category") {
                                p { class: "desk-form-error", "{msg}" }
                            }
                        }
                        FormSelect {
                            label: "Urgency",
                            value: urgency().as_str().to_string(),
                            onchange: move |e: Event<FormData>| {
                                urgency.set(Urgency::parse(&e.value()).unwrap_or_default())
                            },
                            for level in Urgency::ALL {
                                option { key: "{level.as_str()}", value: level.as_str(), "{level.label()}" }
                            }
                        }
                    }
                    Input {
                        label: "Location",
                        placeholder: "Building, floor or room",
                        value: location(),
                        required: true,
                        error: error_for("location"),
                        on_input: move |e: FormEvent| location.set(e.value()),
                    }
                    Textarea {
                        label: "Description",
                        rows: 5,
                        value: description(),
                        required: true,
                        on_input: move |e: FormEvent| description.set(e.value()),
                    }
                    if let Some(msg) = error_for("description") {
                        p { class: "desk-form-error", "{msg}" }
                    }
                    Button { button_type: "submit", disabled: loading(),
                        if loading() { "Submitting..." } else { "Submit complaint" }
                    }
                }
            }
        }
    }
}
