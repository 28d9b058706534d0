/// Settings dialog: prompt text, background color or image, reset

use log::warn;
use patternfly_yew::prelude::{Button, ButtonVariant};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::settings::{BackgroundMode, Settings};
use crate::ui::components::{Modal, Swatch};

// Import JS bridge functions
#[wasm_bindgen(module = "/newtab.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn readImageFile(input: &HtmlInputElement) -> Result<JsValue, JsValue>;
}

/// A single edit made in the dialog
#[derive(Clone, Debug, PartialEq)]
pub enum SettingsChange {
    Prompt(String),
    Mode(BackgroundMode),
    Color(String),
    Image(Option<String>),
}

#[derive(Properties, PartialEq)]
pub struct SettingsModalProps {
    pub open: bool,
    pub settings: Settings,
    pub on_change: Callback<SettingsChange>,
    pub on_reset: Callback<()>,
    pub on_close: Callback<()>,
}

#[function_component(SettingsModal)]
pub fn settings_modal(props: &SettingsModalProps) -> Html {
    let settings = &props.settings;

    let on_prompt_input = props.on_change.reform(|e: InputEvent| {
        let value = e
            .target_dyn_into::<HtmlInputElement>()
            .map(|input| input.value())
            .unwrap_or_default();
        SettingsChange::Prompt(value)
    });

    let on_mode = |mode: BackgroundMode| props.on_change.reform(move |_: Event| SettingsChange::Mode(mode));

    let on_color_input = {
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                on_change.emit(SettingsChange::Color(input.value()));
            }
        })
    };

    // Upload background image
    let on_image_selected = {
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let on_change = on_change.clone();
            spawn_local(async move {
                match readImageFile(&input).await {
                    Ok(data_uri) => {
                        if let Some(uri) = data_uri.as_string() {
                            on_change.emit(SettingsChange::Image(Some(uri)));
                        }
                    }
                    Err(e) => warn!("Failed to read background image: {:?}", e),
                }
            });
        })
    };

    let on_clear_image = props.on_change.reform(|_: MouseEvent| SettingsChange::Image(None));
    let on_reset = props.on_reset.reform(|_: MouseEvent| ());

    html! {
        <Modal title="Customize" open={props.open} on_close={props.on_close.clone()}>
            <label class="settings-field">
                <span class="settings-label">{"Prompt"}</span>
                <input
                    type="text"
                    class="settings-input"
                    value={settings.prompt.clone()}
                    oninput={on_prompt_input}
                />
            </label>

            <fieldset class="settings-field">
                <legend class="settings-label">{"Background"}</legend>
                <label>
                    <input
                        type="radio"
                        name="background-mode"
                        checked={settings.background_mode == BackgroundMode::Color}
                        onchange={on_mode(BackgroundMode::Color)}
                    />
                    {"Color"}
                </label>
                <label>
                    <input
                        type="radio"
                        name="background-mode"
                        checked={settings.background_mode == BackgroundMode::Image}
                        onchange={on_mode(BackgroundMode::Image)}
                    />
                    {"Image"}
                </label>
            </fieldset>

            if settings.background_mode == BackgroundMode::Color {
                <label class="settings-field">
                    <span class="settings-label">
                        {"Color "}
                        <Swatch color={settings.background_color.clone()} />
                    </span>
                    <input
                        type="color"
                        value={settings.background_color.clone()}
                        oninput={on_color_input}
                    />
                </label>
            } else {
                <div class="settings-field">
                    <input type="file" accept="image/*" onchange={on_image_selected} />
                    if settings.background_image.is_some() {
                        <Button onclick={on_clear_image} variant={ButtonVariant::Secondary}>
                            {"Remove image"}
                        </Button>
                    }
                </div>
            }

            <div class="settings-actions">
                <Button onclick={on_reset} variant={ButtonVariant::Danger}>
                    {"Reset to defaults"}
                </Button>
            </div>
        </Modal>
    }
}
