/// Recent-domain shortcut strip

use yew::prelude::*;

use crate::recent::DomainRecord;
use crate::shortcut::{ShortcutView, shortcut_views};

#[derive(Properties, PartialEq)]
pub struct ShortcutStripProps {
    pub records: Vec<DomainRecord>,
    /// Receives the canonical URL of the clicked shortcut
    pub on_visit: Callback<String>,
}

#[function_component(ShortcutStrip)]
pub fn shortcut_strip(props: &ShortcutStripProps) -> Html {
    if props.records.is_empty() {
        return html! {};
    }

    html! {
        <nav class="shortcuts">
            {for shortcut_views(&props.records).into_iter().map(|view| {
                let key = view.domain.clone();
                html! {
                    <ShortcutTile key={key} view={view} on_visit={props.on_visit.clone()} />
                }
            })}
        </nav>
    }
}

#[derive(Properties, PartialEq)]
struct ShortcutTileProps {
    view: ShortcutView,
    on_visit: Callback<String>,
}

#[function_component(ShortcutTile)]
fn shortcut_tile(props: &ShortcutTileProps) -> Html {
    let icon_failed = use_state(|| false);
    let view = &props.view;

    let on_icon_error = {
        let icon_failed = icon_failed.clone();
        Callback::from(move |_: Event| {
            icon_failed.set(true);
        })
    };

    let on_click = {
        let href = view.href.clone();
        props.on_visit.reform(move |e: MouseEvent| {
            e.prevent_default();
            href.clone()
        })
    };

    let icon_src = if *icon_failed {
        view.fallback_icon.clone()
    } else {
        view.favicon_url.clone()
    };

    html! {
        <a class="shortcut" href={view.href.clone()} title={view.domain.clone()} onclick={on_click}>
            <img class="shortcut-icon" src={icon_src} alt="" width="32" height="32" onerror={on_icon_error} />
            <span class="shortcut-label">{&view.label}</span>
        </a>
    }
}
