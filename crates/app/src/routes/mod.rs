pub mod dashboards;
pub mod not_found;

use crate::session::{use_access, AccessStateContext};
use dioxus::prelude::*;

use dashboards::{AdminDashboard, InstructorDashboard, MemberDashboard};
use not_found::NotFound;

/// Application routes.
#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[redirect("/", || Route::MemberDashboard {})]
    #[layout(AccessShell)]
    #[route("/dashboard")]
    MemberDashboard {},
    #[route("/instructor")]
    InstructorDashboard {},
    #[route("/admin")]
    AdminDashboard {},
    #[end_layout]
    #[route("/:..route")]
    NotFound { route: Vec<String> },
}

/// Access layout. Resolves the session once per mount and publishes the
/// result to the dashboards below it.
#[component]
fn AccessShell() -> Element {
    let state = use_access();
    use_context_provider(|| AccessStateContext(state));

    let current = state.read().clone();

    if current.loading {
        return rsx! {
            div { class: "access-loading",
                p { "Loading..." }
            }
        };
    }

    rsx! {
        if let Some(error) = current.error {
            div { class: "access-error", role: "alert", "{error}" }
        }
        Outlet::<Route> {}
    }
}
