//! Saves the picked slots without a submit button: every toggle schedules a
//! debounced POST of the full selection, sent only if it differs from what
//! was last saved.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::Duration;

use gloo_net::http::Request;
use leptos::task::spawn_local;
use shared_types::SaveSlotsResponse;
use thiserror::Error;
use web_sys::RequestCredentials;

use crate::debounce::{BrowserTimer, Debouncer, Timer};

/// DOM event fired on `document` after the server confirmed a save. The
/// psychologist list on the questionnaire page listens for it.
pub const PROFILE_UPDATED_EVENT: &str = "clientProfileUpdated";

const SLOTS_FORM_KEY: &str = "slots[]";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AutosaveError {
    #[error("could not build save request: {0}")]
    Build(String),
    #[error("save request failed: {0}")]
    Request(String),
    #[error("save rejected with status {status}: {reason}")]
    Rejected { status: u16, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AutosaveOptions {
    pub save_url: String,
    pub csrf_token: Option<String>,
    pub debounce: Duration,
}

/// A save that has been handed to the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTicket {
    pub seq: u64,
    pub values: Vec<String>,
}

/// Tracks what the server holds so unchanged selections are not resent.
///
/// Requests can overlap and finish in any order. Only the completion of the
/// most recent request moves the baseline; older completions are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct AutosaveTracker {
    /// `None` once a failed save leaves the server state unknown.
    last_saved: Option<BTreeSet<String>>,
    in_flight: Option<(u64, BTreeSet<String>)>,
    next_seq: u64,
}

impl AutosaveTracker {
    pub fn new(last_saved: BTreeSet<String>) -> Self {
        Self {
            last_saved: Some(last_saved),
            in_flight: None,
            next_seq: 0,
        }
    }

    /// The values to send, or `None` when `current` is what the server
    /// already has or is about to get (including the both-empty case).
    pub fn changes(&self, current: &BTreeSet<String>) -> Option<Vec<String>> {
        let baseline = match &self.in_flight {
            Some((_, sent)) => Some(sent),
            None => self.last_saved.as_ref(),
        };
        if baseline == Some(current) {
            return None;
        }
        Some(current.iter().cloned().collect())
    }

    /// Registers a request for `current` if it differs from the baseline.
    pub fn begin(&mut self, current: &BTreeSet<String>) -> Option<SaveTicket> {
        let values = self.changes(current)?;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight = Some((seq, current.clone()));
        Some(SaveTicket { seq, values })
    }

    /// Records how request `seq` ended. Returns whether the baseline moved.
    pub fn finish(&mut self, seq: u64, saved: bool) -> bool {
        match &self.in_flight {
            Some((latest, _)) if *latest == seq => {}
            _ => return false,
        }
        let Some((_, sent)) = self.in_flight.take() else {
            return false;
        };
        if saved {
            self.last_saved = Some(sent);
            true
        } else {
            self.last_saved = None;
            false
        }
    }
}

/// `slots[]=a&slots[]=b`, percent-encoded the way `URLSearchParams` does it.
/// An empty selection encodes to an empty body, which clears the saved slots.
pub fn encode_slots_form(values: &[String]) -> String {
    let key = urlencoding::encode(SLOTS_FORM_KEY);
    values
        .iter()
        .map(|value| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

pub async fn post_preferred_slots(
    options: &AutosaveOptions,
    values: &[String],
) -> Result<Option<SaveSlotsResponse>, AutosaveError> {
    let mut request = Request::post(&options.save_url)
        .header("X-Requested-With", "XMLHttpRequest")
        .header(
            "Content-Type",
            "application/x-www-form-urlencoded;charset=UTF-8",
        )
        .credentials(RequestCredentials::SameOrigin);
    if let Some(token) = &options.csrf_token {
        request = request.header("X-CSRFToken", token);
    }

    let response = request
        .body(encode_slots_form(values))
        .map_err(|e| AutosaveError::Build(e.to_string()))?
        .send()
        .await
        .map_err(|e| AutosaveError::Request(e.to_string()))?;

    let status = response.status();
    let body: Option<SaveSlotsResponse> = response.json().await.ok();

    let rejected = !response.ok() || body.as_ref().is_some_and(|b| !b.is_ok());
    if rejected {
        let reason = body
            .and_then(|b| b.error)
            .unwrap_or_else(|| "no error code".to_string());
        return Err(AutosaveError::Rejected { status, reason });
    }

    Ok(body)
}

/// Tells the rest of the page (psychologist filtering, mostly) that the
/// client profile changed.
pub fn dispatch_profile_updated() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    match web_sys::Event::new(PROFILE_UPDATED_EVENT) {
        Ok(event) => {
            if let Err(e) = document.dispatch_event(&event) {
                leptos::logging::warn!("could not dispatch {}: {:?}", PROFILE_UPDATED_EVENT, e);
            }
        }
        Err(e) => leptos::logging::warn!("could not create {}: {:?}", PROFILE_UPDATED_EVENT, e),
    }
}

/// Debounced saver bound to one picker instance.
///
/// The selection is captured when a save is requested and held until the
/// quiet period ends, so `flush` can still send it after the picker is gone.
pub struct Autosave<T: Timer = BrowserTimer> {
    debouncer: Debouncer<T>,
    pending: Rc<RefCell<Option<BTreeSet<String>>>>,
    save: Rc<dyn Fn(BTreeSet<String>)>,
}

impl Autosave<BrowserTimer> {
    pub fn new(options: AutosaveOptions, last_saved: BTreeSet<String>) -> Self {
        let delay = options.debounce;
        let options = Rc::new(options);
        let tracker = Rc::new(RefCell::new(AutosaveTracker::new(last_saved)));
        Self::with_timer(BrowserTimer, delay, move |current| {
            save_if_changed(Rc::clone(&options), Rc::clone(&tracker), current)
        })
    }
}

impl<T: Timer> Autosave<T>
where
    T::Handle: 'static,
{
    pub fn with_timer(timer: T, delay: Duration, save: impl Fn(BTreeSet<String>) + 'static) -> Self {
        Self {
            debouncer: Debouncer::new(timer, delay),
            pending: Rc::new(RefCell::new(None)),
            save: Rc::new(save),
        }
    }

    /// Schedules a save of `current`, replacing any selection still waiting
    /// for its quiet period to end.
    pub fn request_save(&self, current: BTreeSet<String>) {
        *self.pending.borrow_mut() = Some(current);

        let pending = Rc::clone(&self.pending);
        let save = Rc::clone(&self.save);
        self.debouncer.trigger(move || {
            let current = pending.borrow_mut().take();
            if let Some(current) = current {
                save(current);
            }
        });
    }

    /// Saves right away, skipping the debounce. Used when the selection
    /// changes without a click, e.g. past slots pruned on load.
    pub fn save_now(&self, current: BTreeSet<String>) {
        self.debouncer.cancel();
        self.pending.borrow_mut().take();
        (self.save)(current);
    }

    /// Sends the selection still waiting in the debounce, if any.
    pub fn flush(&self) {
        self.debouncer.cancel();
        let current = self.pending.borrow_mut().take();
        if let Some(current) = current {
            (self.save)(current);
        }
    }
}

fn save_if_changed(
    options: Rc<AutosaveOptions>,
    tracker: Rc<RefCell<AutosaveTracker>>,
    current: BTreeSet<String>,
) {
    let Some(ticket) = tracker.borrow_mut().begin(&current) else {
        return;
    };

    spawn_local(async move {
        match post_preferred_slots(&options, &ticket.values).await {
            Ok(response) => {
                if !tracker.borrow_mut().finish(ticket.seq, true) {
                    leptos::logging::log!("preferred slots save {} superseded", ticket.seq);
                }
                if let Some(count) = response.and_then(|r| r.slots_count) {
                    leptos::logging::log!("preferred slots saved: {}", count);
                }
                dispatch_profile_updated();
            }
            Err(e) => {
                tracker.borrow_mut().finish(ticket.seq, false);
                leptos::logging::error!("preferred_slots autosave error: {}", e);
            }
        }
    });
}
