use dioxus::prelude::*;
use shared_types::{AppError, ErrorCategory, FeatureFlags, LoginSurface, Section, UserProfile};
use shared_ui::components::{
    Button, Card, CardContent, CardDescription, CardFooter, CardHeader, CardTitle, Input,
};

use crate::notify::use_notifier;
use crate::routes::use_desk_nav;
use crate::session::use_session;

#[component]
pub fn UserLogin() -> Element {
    rsx! { LoginForm { surface: LoginSurface::User } }
}

#[component]
pub fn AdminLogin() -> Element {
    rsx! { LoginForm { surface: LoginSurface::Admin } }
}

fn landing(profile: &UserProfile) -> Section {
    if profile.is_admin {
        Section::AdminDashboard
    } else {
        Section::UserDashboard
    }
}

fn welcome(profile: &UserProfile, surface: LoginSurface) -> String {
    match surface {
        LoginSurface::User => format!("Welcome back, {}!", profile.name),
        LoginSurface::Admin => "Admin login successful!".to_string(),
    }
}

/// Email and password form for one login surface.
///
/// The server checks that the account's role matches `surface`; on a
/// mismatch it ends the session, so the client drops its copy as well.
#[component]
fn LoginForm(surface: LoginSurface) -> Element {
    let mut session = use_session();
    let flags: FeatureFlags = use_context();
    let notifier = use_notifier();
    let mut nav = use_desk_nav();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut loading = use_signal(|| false);

    use_effect(move || {
        let signed_in = session.current_user.read().as_ref().map(landing);
        if let Some(section) = signed_in {
            nav.go(section);
        }
    });

    let handle_login = move |evt: FormEvent| async move {
        evt.prevent_default();
        loading.set(true);

        match server::api::login(email(), password(), surface).await {
            Ok(profile) => {
                notifier.success(welcome(&profile, surface));
                password.set(String::new());
                session.set_user(profile);
            }
            Err(e) => {
                let ended = AppError::from_server_error(&e.to_string())
                    .is_some_and(|err| err.category() == ErrorCategory::Data);
                if ended {
                    session.clear();
                }
                notifier.failure(&e, "Error logging in");
            }
        }
        loading.set(false);
    };

    let (title, description) = match surface {
        LoginSurface::User => ("Student login", "Sign in to file and track complaints."),
        LoginSurface::Admin => ("Admin login", "Sign in to review and resolve complaints."),
    };

    rsx! {
        div { class: "desk-auth-page",
            Card { class: "desk-auth-card",
                CardHeader {
                    CardTitle { "{title}" }
                    CardDescription { "{description}" }
                }
                CardContent {
                    form { class: "desk-form", onsubmit: handle_login,
                        Input {
                            label: "Email",
                            input_type: "email",
                            value: email(),
                            required: true,
                            on_input: move |e: FormEvent| email.set(e.value()),
                        }
                        Input {
                            label: "Password",
                            input_type: "password",
                            value: password(),
                            required: true,
                            on_input: move |e: FormEvent| password.set(e.value()),
                        }
                        Button { button_type: "submit", disabled: loading(),
                            if loading() { "Signing in..." } else { "Login" }
                        }
                    }
                }
                CardFooter {
                    p { class: "desk-auth-switch",
                        match surface {
                            LoginSurface::User => rsx! {
                                if flags.registration {
                                    "No account yet? "
                                    button { r#type: "button", onclick: move |_| nav.go(Section::Register), "Register" }
                                    " · "
                                }
                                button { r#type: "button", onclick: move |_| nav.go(Section::AdminLogin), "Admin login" }
                            },
                            LoginSurface::Admin => rsx! {
                                button { r#type: "button", onclick: move |_| nav.go(Section::UserLogin), "Student login" }
                            },
                        }
                    }
                }
            }
        }
    }
}
