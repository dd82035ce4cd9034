use leptos::prelude::*;
use thaw::{MessageBar, MessageBarIntent};

/// Inline error shown in place of a widget that could not load.
#[component]
pub fn ErrorView(message: Option<String>) -> impl IntoView {
    view! {
        <div class="error-container" role="alert">
            <MessageBar intent=MessageBarIntent::Error>
                {message.unwrap_or_else(|| "Something went wrong. Please reload the page.".to_string())}
            </MessageBar>
        </div>
    }
}
