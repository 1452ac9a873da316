use std::collections::HashMap;

use dioxus::prelude::*;
use shared_types::{AppError, FeatureFlags, RegisterRequest, Section};
use shared_ui::components::{
    Button, Card, CardContent, CardDescription, CardFooter, CardHeader, CardTitle, Input,
};

use crate::notify::use_notifier;
use crate::routes::use_desk_nav;

/// Student self-registration. Does not sign the new account in.
#[component]
pub fn Register() -> Element {
    let flags: FeatureFlags = use_context();
    let notifier = use_notifier();
    let mut nav = use_desk_nav();

    let mut name = use_signal(String::new);
    let mut student_id = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut department = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut loading = use_signal(|| false);

    let handle_register = move |evt: FormEvent| async move {
        evt.prevent_default();
        field_errors.set(HashMap::new());

        let request = RegisterRequest {
            name: name(),
            student_id: student_id(),
            email: email(),
            department: department(),
            password: password(),
            confirm_password: confirm_password(),
        };

        if let Err(err) = request.precheck() {
            notifier.error(err.message.clone());
            field_errors.set(err.field_errors);
            return;
        }

        loading.set(true);
        match server::api::register(request).await {
            Ok(_) => {
                notifier.success("Registration successful! Please login.");
                nav.go(Section::UserLogin);
            }
            Err(e) => {
                field_errors.set(AppError::parse_field_errors(&e.to_string()));
                notifier.failure(&e, "Error creating account");
            }
        }
        loading.set(false);
    };

    if !flags.registration {
        return rsx! {
            div { class: "desk-auth-page",
                Card { class: "desk-auth-card",
                    CardHeader {
                        CardTitle { "Registration closed" }
                        CardDescription { "New accounts are not being accepted right now." }
                    }
                }
            }
        };
    }

    let error_for = move |field: &str| field_errors.read().get(field).cloned();

    rsx! {
        div { class: "desk-auth-page",
            Card { class: "desk-auth-card",
                CardHeader {
                    CardTitle { "Create an account" }
                    CardDescription { "Register with your institutional details." }
                }
                CardContent {
                    form { class: "desk-form", onsubmit: handle_register,
                        Input {
                            label: "Full name",
                            value: name(),
                            required: true,
                            error: error_for("name"),
                            on_input: move |e: FormEvent| name.set(e.value()),
                        }
                        div { class: "desk-form-row",
                            Input {
                                label: "Student ID",
                                value: student_id(),
                                required: true,
                                error: error_for("student_id"),
                                on_input: move |e: FormEvent| student_id.set(e.value()),
                            }
                            Input {
                                label: "Department",
                                value: department(),
                                required: true,
                                error: error_for("department"),
                                on_input: move |e: FormEvent| department.set(e.value()),
                            }
                        }
                        Input {
                            label: "Email",
                            input_type: "email",
                            value: email(),
                            required: true,
                            error: error_for("email"),
                            on_input: move |e: FormEvent| email.set(e.value()),
                        }
                        div { class: "desk-form-row",
                            Input {
                                label: "Password",
                                input_type: "password",
                                value: password(),
                                required: true,
                                error: error_for("password"),
                                on_input: move |e: FormEvent| password.set(e.value()),
                            }
                            Input {
                                label: "Confirm password",
                                input_type: "password",
                                value: confirm_password(),
                                required: true,
                                error: error_for("confirm_password"),
                                on_input: move |e: FormEvent| confirm_password.set(e.value()),
                            }
                        }
                        Button { button_type: "submit", disabled: loading(),
                            if loading() { "Registering..." } else { "Register" }
                        }
                    }
                }
                CardFooter {
                    p { class: "desk-auth-switch",
                        "Already registered? "
                        button { r#type: "button", onclick: move |_| nav.go(Section::UserLogin), "Login" }
                    }
                }
            }
        }
    }
}
