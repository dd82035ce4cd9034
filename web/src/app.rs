use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::{
    components::{Route, Router, Routes},
    StaticSegment,
};
use thaw::ssr::SSRMountStyleProvider;
use thaw::*;

use crate::components::{ErrorView, LoadingView, TimeSlotsPicker};
use crate::server::load_picker_options;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <SSRMountStyleProvider>
            <!DOCTYPE html>
            <html lang="en">
                <head>
                    <meta charset="utf-8"/>
                    <meta name="viewport" content="width=device-width, initial-scale=1"/>
                    <AutoReload options=options.clone() />
                    <HydrationScripts options/>
                    <MetaTags/>
                </head>
                <body>
                    <App/>
                </body>
            </html>
        </SSRMountStyleProvider>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    view! {
        // id=leptos means cargo-leptos will hot-reload this stylesheet
        <Stylesheet id="leptos" href="/pkg/web.css"/>

        <Title text="Preferred session times"/>

        <ConfigProvider>
            <Router>
                <main>
                    <Routes fallback=|| "Page not found.".into_view()>
                        <Route path=StaticSegment("") view=PreferredSlotsPage/>
                    </Routes>
                </main>
            </Router>
        </ConfigProvider>
    }
}

/// Questionnaire step where the client marks the times that suit them.
#[component]
fn PreferredSlotsPage() -> impl IntoView {
    let picker_options = Resource::new(|| (), |_| async move { load_picker_options().await });

    view! {
        <div class="preferred-slots-page">
            <h1 class="preferred-slots-title">"When would you like to meet?"</h1>
            <p class="preferred-slots-subtitle">
                "Pick every time that suits you. Times are shown in your own timezone."
            </p>

            <form class="preferred-slots-form" method="post">
                <Suspense fallback=move || view! { <LoadingView message=None/> }>
                    {move || {
                        picker_options.get().map(|result| match result {
                            Ok(options) => {
                                let autosaves = options.autosave().is_some();
                                view! {
                                    <TimeSlotsPicker options=options/>
                                    {autosaves.then(|| view! {
                                        <p class="preferred-slots-hint">"Your choice is saved automatically."</p>
                                    })}
                                }.into_any()
                            }
                            Err(e) => {
                                leptos::logging::error!("Failed to load picker options: {}", e);
                                view! { <ErrorView message=None/> }.into_any()
                            }
                        })
                    }}
                </Suspense>
            </form>
        </div>
    }
}
