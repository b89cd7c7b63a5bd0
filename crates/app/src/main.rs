use dioxus::prelude::*;

mod access_gate;
mod routes;
mod session;
use routes::Route;
use session::AccessContext;

fn main() {
    access::telemetry::init_logging();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    // Config and the on-disk cache are read once per process.
    let context = use_hook(|| session::build_context(access::config::load_access_config()));

    match context {
        Ok(context) => rsx! { AccessRoot { context } },
        Err(err) => {
            tracing::error!(error = %err, "Access core failed to start");
            rsx! {
                div { class: "startup-error", role: "alert",
                    p { "The app could not start: {err}" }
                }
            }
        }
    }
}

#[component]
fn AccessRoot(context: AccessContext) -> Element {
    use_context_provider(|| context);

    rsx! { Router::<Route> {} }
}
