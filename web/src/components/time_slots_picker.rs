use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::AbortController;

use crate::autosave::Autosave;
use crate::components::{ErrorView, LoadingView};
use crate::config::PickerOptions;
use crate::slots::{
    day_row, fetch_slot_feed, hidden_inputs, slot_grid, PickerState, SlotTime, PREFERRED_SLOTS_FIELD,
};

/// Day row, slot grid and `preferred_slots` hidden inputs for one client.
///
/// The selection lives in `PickerState`; button classes and hidden inputs are
/// derived from it on every render.
#[component]
pub fn TimeSlotsPicker(options: PickerOptions) -> impl IntoView {
    let picker = RwSignal::new(Option::<PickerState>::None);
    let load_error = RwSignal::new(Option::<String>::None);
    let is_loading = RwSignal::new(true);
    let abort = StoredValue::new_local(Option::<AbortController>::None);
    let autosave = StoredValue::new_local(Option::<Autosave>::None);

    on_cleanup(move || {
        abort.try_with_value(|controller| {
            if let Some(controller) = controller {
                controller.abort();
            }
        });
        // a toggle made just before teardown is still sent
        autosave.try_with_value(|saver| {
            if let Some(saver) = saver {
                saver.flush();
            }
        });
    });

    // Effects only run in the browser, so the feed is never fetched during SSR
    Effect::new(move |_| {
        let api_url = options.api_url.clone();
        let seed = options.initial_selected_slots.clone();
        let autosave_options = options.autosave();

        let controller = AbortController::new().ok();
        let signal = controller.as_ref().map(|c| c.signal());
        abort.set_value(controller);

        spawn_local(async move {
            let loaded = match PickerState::load(fetch_slot_feed(&api_url, signal.as_ref()).await, &seed) {
                Ok(loaded) => loaded,
                Err(e) => {
                    if load_error
                        .try_set(Some("Could not load available time slots.".to_string()))
                        .is_some()
                    {
                        leptos::logging::debug_warn!("time slots picker removed before load failed");
                        return;
                    }
                    leptos::logging::error!("Failed to fetch time slots from {}: {}", api_url, e);
                    is_loading.try_set(false);
                    return;
                }
            };

            if loaded.pruned > 0 {
                leptos::logging::log!(
                    "dropped {} preferred slots that are already in the past",
                    loaded.pruned
                );
            }
            let current = loaded.state.selection().canonical_set();

            if picker.try_set(Some(loaded.state)).is_some() {
                leptos::logging::debug_warn!("time slots picker removed before slots arrived");
                return;
            }
            is_loading.try_set(false);

            if let Some(autosave_options) = autosave_options {
                let saver = Autosave::new(autosave_options, loaded.seeded);
                saver.save_now(current);
                autosave.try_update_value(|slot| *slot = Some(saver));
            }
        });
    });

    let select_day = move |key: String| {
        picker.update(|state| {
            if let Some(state) = state.as_mut() {
                state.select_day(&key);
            }
        });
    };

    let toggle_slot = move |slot: SlotTime| {
        let mut current = None;
        picker.update(|state| {
            if let Some(state) = state.as_mut() {
                if state.toggle_slot(&slot).changed() {
                    current = Some(state.selection().canonical_set());
                }
            }
        });
        let Some(current) = current else {
            return;
        };
        autosave.with_value(|saver| {
            if let Some(saver) = saver {
                saver.request_save(current);
            }
        });
    };

    view! {
        <div class="time-slots-picker">
            {move || {
                if is_loading.get() {
                    view! {
                        <LoadingView message=Some("Loading available time slots...".to_string())/>
                    }.into_any()
                } else if let Some(message) = load_error.get() {
                    view! { <ErrorView message=Some(message)/> }.into_any()
                } else {
                    view! {}.into_any()
                }
            }}

            <div class="ts-days-row">
                {move || {
                    picker
                        .with(|state| day_row(state.as_ref()))
                        .into_iter()
                        .map(|day| {
                            let key = day.key.clone();
                            view! {
                                <button
                                    type="button"
                                    class="ts-day-button"
                                    class:active=day.active
                                    data-value=day.key
                                    on:click=move |_| select_day(key.clone())
                                >
                                    <div class="ts-day-weekday">{day.label.weekday}</div>
                                    <div class="ts-day-date">{day.label.day_month}</div>
                                </button>
                            }
                        })
                        .collect::<Vec<_>>()
                }}
            </div>

            <div class="ts-slots-grid">
                {move || {
                    picker
                        .with(|state| slot_grid(state.as_ref()))
                        .into_iter()
                        .map(|button| {
                            let slot = button.slot;
                            let disabled = button.disabled;
                            view! {
                                <button
                                    type="button"
                                    class="ts-slot-button"
                                    class:selected=button.selected
                                    class:unavailable=disabled
                                    disabled=disabled
                                    data-value=button.raw
                                    on:click=move |_| {
                                        if disabled {
                                            return;
                                        }
                                        if let Some(slot) = slot {
                                            toggle_slot(slot);
                                        }
                                    }
                                >
                                    {button.label}
                                </button>
                            }
                        })
                        .collect::<Vec<_>>()
                }}
            </div>

            <div class="ts-hidden-inputs">
                {move || {
                    picker
                        .with(|state| hidden_inputs(state.as_ref()))
                        .into_iter()
                        .map(|value| {
                            view! { <input type="hidden" name=PREFERRED_SLOTS_FIELD value=value/> }
                        })
                        .collect::<Vec<_>>()
                }}
            </div>
        </div>
    }
}
