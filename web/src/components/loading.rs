use leptos::prelude::*;
use thaw::{Spinner, SpinnerSize};

#[component]
pub fn LoadingView(message: Option<String>) -> impl IntoView {
    let message = message.unwrap_or_else(|| "Loading, please wait...".to_string());

    view! {
        <div class="loading-container" role="status" aria-live="polite">
            <Spinner size=SpinnerSize::Small />
            <span class="loading-message">{message}</span>
        </div>
    }
}
