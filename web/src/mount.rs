//! Entry point for pages rendered elsewhere (the questionnaire templates)
//! that want the picker inside one of their own elements.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::components::TimeSlotsPicker;
use crate::config::PickerOptions;

/// Mounts a picker into the element matching `container_selector`.
///
/// `options_json` is a serialized `PickerOptions`. Bad options or a missing
/// container are logged and leave the page untouched.
#[wasm_bindgen]
pub fn mount_time_slots_picker(options_json: &str) {
    console_error_panic_hook::set_once();

    let options = match PickerOptions::from_json(options_json) {
        Ok(options) => options,
        Err(e) => {
            leptos::logging::warn!("time slots picker not mounted: {}", e);
            return;
        }
    };

    let Some(container) = find_container(&options.container_selector) else {
        leptos::logging::warn!(
            "time slots picker not mounted: no element matches {:?}",
            options.container_selector
        );
        return;
    };

    leptos::mount::mount_to(container, move || view! { <TimeSlotsPicker options=options/> }).forget();
}

fn find_container(selector: &str) -> Option<HtmlElement> {
    let document = web_sys::window()?.document()?;
    let element = document.query_selector(selector).ok()??;
    element.dyn_into::<HtmlElement>().ok()
}
