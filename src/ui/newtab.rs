/// New tab page: prompt, search box, recent-domain shortcuts and settings

use log::{debug, warn};
use patternfly_yew::prelude::{Button, ButtonVariant};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::context::NewTabContext;
use crate::history::{ChromeHistory, ImportOptions, import_from_history};
use crate::search::search_url;
use crate::storage::BrowserStore;
use crate::ui::settings_modal::{SettingsChange, SettingsModal};
use crate::ui::shortcuts::ShortcutStrip;

#[function_component(App)]
pub fn app() -> Html {
    let context = use_memo((), |_| NewTabContext::new(BrowserStore::new()));
    let settings = use_state(|| context.settings());
    let recent = use_state(|| context.recent());
    let query = use_state(String::new);
    let is_settings_open = use_state(|| false);

    // Fill free shortcut slots from browser history once per page load
    {
        let context = context.clone();
        let recent = recent.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let provider = ChromeHistory::detect();
                let outcome = import_from_history(
                    context.tracker(),
                    provider.as_ref(),
                    &ImportOptions::default(),
                    now(),
                )
                .await;
                debug!("History import finished: {:?}", outcome);
                recent.set(context.recent());
            });
            || ()
        });
    }

    // Shortcut click: record first, then leave the page
    let on_visit = {
        let context = context.clone();
        let recent = recent.clone();
        Callback::from(move |url: String| {
            recent.set(context.visit(&url, now()));
            navigate(&url);
        })
    };

    let on_query_input = {
        let query = query.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                query.set(input.value());
            }
        })
    };

    let on_search = {
        let query = query.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if let Some(url) = search_url(&query) {
                navigate(&url);
            }
        })
    };

    let on_open_settings = {
        let is_settings_open = is_settings_open.clone();
        Callback::from(move |_: MouseEvent| is_settings_open.set(true))
    };

    let on_close_settings = {
        let is_settings_open = is_settings_open.clone();
        Callback::from(move |_: ()| is_settings_open.set(false))
    };

    let on_settings_change = {
        let context = context.clone();
        let settings = settings.clone();
        Callback::from(move |change: SettingsChange| {
            let store = context.store();
            let mut next = (*settings).clone();
            match change {
                SettingsChange::Prompt(prompt) => next.set_prompt(store, &prompt),
                SettingsChange::Mode(mode) => next.set_background_mode(store, mode),
                SettingsChange::Color(color) => {
                    if !next.set_background_color(store, &color) {
                        warn!("Ignoring invalid background color {}", color);
                    }
                }
                SettingsChange::Image(data_uri) => next.set_background_image(store, data_uri),
            }
            settings.set(next);
        })
    };

    let on_reset = {
        let context = context.clone();
        let settings = settings.clone();
        let recent = recent.clone();
        Callback::from(move |_: ()| {
            settings.set(context.reset());
            recent.set(context.recent());
        })
    };

    html! {
        <div class="page" style={settings.page_style()}>
            <div class="page-toolbar">
                <Button onclick={on_open_settings} variant={ButtonVariant::Plain}>
                    {"⚙"}
                </Button>
            </div>

            <main class="page-main">
                <h1 class="prompt">{&settings.prompt}</h1>

                <form class="search-form" onsubmit={on_search}>
                    <input
                        type="search"
                        class="search-input"
                        placeholder="Search the web"
                        autofocus={true}
                        value={(*query).clone()}
                        oninput={on_query_input}
                    />
                </form>

                <ShortcutStrip records={(*recent).clone()} on_visit={on_visit} />
            </main>

            <SettingsModal
                open={*is_settings_open}
                settings={(*settings).clone()}
                on_change={on_settings_change}
                on_reset={on_reset}
                on_close={on_close_settings}
            />
        </div>
    }
}

fn now() -> i64 {
    js_sys::Date::now() as i64
}

fn navigate(url: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(e) = window.location().set_href(url) {
        warn!("Failed to open {}: {:?}", url, e);
    }
}

