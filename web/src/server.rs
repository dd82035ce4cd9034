use leptos::prelude::*;
use leptos::server;

use crate::config::PickerOptions;

/// Picker settings for the host page, built from the environment at startup.
#[server]
pub async fn load_picker_options() -> Result<PickerOptions, ServerFnError> {
    let config = crate::config::get_config()
        .ok_or_else(|| ServerFnError::new("Picker configuration not initialized".to_string()))?;
    tracing::debug!(api_url = %config.slots_api_url, "serving picker options");
    Ok(config.picker_options())
}
