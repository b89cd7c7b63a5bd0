use crate::session::use_role;
use dioxus::prelude::*;
use shared_types::Role;

/// Check if the current user's role satisfies `required`.
pub fn use_role_check(required: &Role) -> bool {
    use_role().satisfies(required)
}

/// Conditionally render children based on role.
/// Shows `fallback` if the user's role is insufficient.
#[component]
pub fn AccessGate(required: Role, fallback: Element, children: Element) -> Element {
    let has_access = use_role_check(&required);

    if has_access {
        rsx! { {children} }
    } else {
        rsx! { {fallback} }
    }
}
