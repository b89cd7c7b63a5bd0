use crate::access_gate::AccessGate;
use crate::session::use_access_state;
use dioxus::prelude::*;
use shared_types::{EffectiveSubscription, Role};

/// Member landing page: subscription summary.
#[component]
pub fn MemberDashboard() -> Element {
    let state = use_access_state();

    rsx! {
        div { class: "dashboard-page",
            h2 { class: "dashboard-title", "Dashboard" }
            SubscriptionSummary { subscription: state.subscription }
        }
    }
}

#[component]
pub fn InstructorDashboard() -> Element {
    rsx! {
        AccessGate {
            required: Role::Instructor,
            fallback: rsx! { Restricted {} },
            div { class: "dashboard-page",
                h2 { class: "dashboard-title", "Instructor" }
                p { "Your classes and rosters." }
            }
        }
    }
}

#[component]
pub fn AdminDashboard() -> Element {
    rsx! {
        AccessGate {
            required: Role::Admin,
            fallback: rsx! { Restricted {} },
            div { class: "dashboard-page",
                h2 { class: "dashboard-title", "Administration" }
                p { "Members, instructors, plans and payments." }
            }
        }
    }
}

#[component]
fn SubscriptionSummary(subscription: Option<EffectiveSubscription>) -> Element {
    match subscription {
        Some(sub) => {
            let record = sub.record().clone();
            let status_class = if record.is_active() {
                "subscription-active"
            } else {
                "subscription-inactive"
            };
            rsx! {
                div { class: "subscription-card {status_class}",
                    p { class: "subscription-plan", "{record.plan_type}" }
                    p { class: "subscription-status", "{record.status}" }
                    p { class: "subscription-end", "Valid until {record.end_date}" }
                }
            }
        }
        None => rsx! {
            div { class: "subscription-card subscription-none",
                p { "No active subscription." }
            }
        },
    }
}

#[component]
fn Restricted() -> Element {
    rsx! {
        div { class: "access-restricted",
            p { "You don't have access to this page." }
        }
    }
}
