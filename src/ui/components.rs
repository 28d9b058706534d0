/// Reusable UI components

use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ModalProps {
    pub title: String,
    pub open: bool,
    pub on_close: Callback<()>,
    pub children: Children,
}

/// Dialog over a dimmed backdrop; clicking the backdrop closes it
#[function_component(Modal)]
pub fn modal(props: &ModalProps) -> Html {
    if !props.open {
        return html! {};
    }

    let on_backdrop_click = props.on_close.reform(|_: MouseEvent| ());
    let on_close_click = props.on_close.reform(|_: MouseEvent| ());
    let stop_propagation = Callback::from(|e: MouseEvent| e.stop_propagation());

    html! {
        <div class="modal-backdrop" onclick={on_backdrop_click}>
            <div class="modal" role="dialog" aria-label={props.title.clone()} onclick={stop_propagation}>
                <div class="modal-header">
                    <h2 class="modal-title">{&props.title}</h2>
                    <button class="modal-close" onclick={on_close_click}>{"✕"}</button>
                </div>
                <div class="modal-body">
                    {props.children.clone()}
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SwatchProps {
    pub color: String,
}

#[function_component(Swatch)]
pub fn swatch(props: &SwatchProps) -> Html {
    html! {
        <span style={format!("display: inline-block; width: 16px; height: 16px; border-radius: 50%; border: 1px solid #ccc; vertical-align: middle; background-color: {};", props.color)}></span>
    }
}
