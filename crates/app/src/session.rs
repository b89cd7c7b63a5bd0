use access::platform::PlatformClient;
use access::{
    AccessCoordinator, CancellationToken, Collaborators, FileStore, KeyValueStore, SystemClock,
};
use dioxus::prelude::*;
use shared_types::{AccessState, AppConfig, AppError, Role};
use std::cell::RefCell;
use std::sync::Arc;

use crate::routes::Route;

/// The application's single access coordinator, shared by every view.
#[derive(Clone)]
pub struct AccessContext {
    pub coordinator: Arc<AccessCoordinator>,
}

impl PartialEq for AccessContext {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.coordinator, &other.coordinator)
    }
}

/// Wire the coordinator to the hosted platform and the on-disk cache.
pub fn build_context(config: &AppConfig) -> Result<AccessContext, AppError> {
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.platform.cache_path)?);
    let client = Arc::new(PlatformClient::new(config.platform.clone(), store.clone())?);

    let coordinator = AccessCoordinator::new(
        config.access.clone(),
        Collaborators {
            identity: client.clone(),
            roles: client.clone(),
            subscriptions: client,
            store,
            clock: Arc::new(SystemClock),
        },
    );

    Ok(AccessContext {
        coordinator: Arc::new(coordinator),
    })
}

/// Resolved access state published by the layout for its routes.
#[derive(Clone, Copy, PartialEq)]
pub struct AccessStateContext(pub Signal<AccessState>);

/// Holds the redirect the coordinator asked for until the pass completes.
struct PendingNavigator {
    current: String,
    target: RefCell<Option<String>>,
}

impl access::Navigator for PendingNavigator {
    fn current_path(&self) -> String {
        self.current.clone()
    }

    fn replace(&self, path: &str) {
        *self.target.borrow_mut() = Some(path.to_string());
    }
}

/// Run one resolution pass for the mounting view.
///
/// The pass is scoped to the component: unmounting cancels it, and a
/// cancelled pass neither writes state nor navigates.
pub fn use_access() -> Signal<AccessState> {
    let ctx = use_context::<AccessContext>();
    let route = use_route::<Route>();
    let mut state = use_signal(AccessState::default);
    let scope = use_hook(CancellationToken::new);

    {
        let scope = scope.clone();
        use_drop(move || scope.cancel());
    }

    use_hook(move || {
        let coordinator = ctx.coordinator.clone();
        let router = navigator();
        let pending = PendingNavigator {
            current: route.to_string(),
            target: RefCell::new(None),
        };

        spawn(async move {
            let Some(resolved) = coordinator.resolve(&scope, &pending).await else {
                tracing::debug!("Access pass cancelled");
                return;
            };
            state.set(resolved);

            if let Some(target) = pending.target.take() {
                match target.parse::<Route>() {
                    Ok(route) => {
                        router.replace(route);
                    }
                    Err(_) => tracing::warn!(path = %target, "Redirect target is not a known route"),
                }
                coordinator.guard().settle();
            }
        })
    });

    state
}

/// Access state provided by the enclosing layout.
pub fn use_access_state() -> AccessState {
    use_context::<AccessStateContext>().0.read().clone()
}

/// Role implied by the current access state.
pub fn use_role() -> Role {
    use_access_state().role()
}
