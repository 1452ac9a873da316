use dioxus::prelude::*;
use shared_types::FeatureFlags;

mod components;
pub mod notify;
mod routes;
mod session;
use routes::Route;
use session::SessionContext;

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    #[cfg(feature = "server")]
    dioxus::serve(|| async move {
        server::config::load_feature_flags();
        let flags = server::config::feature_flags();

        if flags.telemetry {
            server::telemetry::init_telemetry();
        }
        server::health::record_start_time();

        let pool = server::db::create_pool();
        server::db::run_migrations(&pool).await;

        let state = server::db::AppState::new(pool.clone());

        let mut router = dioxus::server::router(App).merge(server::openapi::api_router(pool));

        if flags.telemetry {
            router = router.layer(server::telemetry::OtelTraceLayer);
        }

        let router = router
            .layer(axum::middleware::from_fn_with_state(
                state,
                server::auth::middleware::auth_middleware,
            ))
            .layer(tower_http::request_id::PropagateRequestIdLayer::x_request_id())
            .layer(tower_http::request_id::SetRequestIdLayer::x_request_id(
                tower_http::request_id::MakeRequestUuid,
            ));
        Ok(router)
    });

    #[cfg(not(feature = "server"))]
    dioxus::launch(App);
}

/// Detect the client platform from compile-time feature flags.
pub fn client_platform() -> &'static str {
    if cfg!(feature = "web") {
        "web"
    } else if cfg!(feature = "desktop") {
        "desktop"
    } else if cfg!(feature = "mobile") {
        "mobile"
    } else {
        "unknown"
    }
}

#[component]
fn App() -> Element {
    // Set the X-Client-Platform header on all server function calls
    use_hook(|| {
        use dioxus::fullstack::{set_request_headers, HeaderMap, HeaderValue};

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-client-platform",
            HeaderValue::from_static(client_platform()),
        );
        set_request_headers(headers);
    });

    // Fetch feature flags once and provide via context (defaults on error)
    let flags_resource =
        use_server_future(move || async move { server::api::get_feature_flags().await })?;

    let flags = flags_resource
        .read()
        .as_ref()
        .cloned()
        .unwrap_or(Ok(FeatureFlags::default()))
        .unwrap_or_default();

    use_context_provider(|| flags);
    use_context_provider(SessionContext::new);

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        shared_ui::ToastProvider {
            SuspenseBoundary {
                fallback: |_| rsx! {
                    div { class: "desk-loading",
                        p { "Loading..." }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
