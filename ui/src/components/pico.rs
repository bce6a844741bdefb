//! A set of reusable, lifetime-free Dioxus components for the Pico.css framework.
//! To use, ensure pico.min.css is linked in the main application.

#![allow(non_snake_case)] // Allow PascalCase for component function names

use dioxus::prelude::*;

//=============================================================================
// Layout Components
//=============================================================================

/// A centered container for your content.
/// Wraps content in a `<main class="container">` element.
#[component]
pub fn Container(children: Element) -> Element {
    rsx! { main { class: "container", {children} } }
}

/// A card for grouping related content.
/// Wraps content in an `<article>` element.
#[component]
pub fn Card(children: Element) -> Element {
    rsx! { article { {children} } }
}

//=============================================================================
// Interactive Components
//=============================================================================

#[derive(Props, PartialEq, Clone)]
pub struct ButtonProps {
    children: Element,
    #[props(optional)]
    on_click: Option<EventHandler<MouseEvent>>,
    #[props(default = false)]
    disabled: bool,
    /// Shows Pico's busy spinner and blocks clicks.
    #[props(default = false)]
    loading: bool,
}

/// A primary Pico button.
pub fn Button(props: ButtonProps) -> Element {
    rsx! {
        button {
            "aria-busy": props.loading,
            disabled: props.disabled || props.loading,
            onclick: move |evt| {
                if let Some(handler) = &props.on_click {
                    handler.call(evt);
                }
            },
            {props.children}
        }
    }
}

#[derive(Props, PartialEq, Clone)]
pub struct InputProps {
    label: String,
    name: String,
    #[props(default = "text".to_string())]
    input_type: String,
    #[props(optional)]
    placeholder: Option<String>,
    #[props(into)]
    value: String,
    #[props(optional)]
    on_input: Option<EventHandler<String>>,
    #[props(default = false)]
    readonly: bool,
    #[props(default = false)]
    disabled: bool,
}

/// A labeled form input field. Reports the raw text on every keystroke.
pub fn Input(props: InputProps) -> Element {
    rsx! {
        label {
            r#for: "{props.name}",
            "{props.label}",
            input {
                id: "{props.name}",
                r#type: "{props.input_type}",
                name: "{props.name}",
                placeholder: "{props.placeholder.as_deref().unwrap_or(\"\")}",
                value: "{props.value}",
                readonly: props.readonly,
                disabled: props.disabled,
                oninput: move |evt| {
                    if let Some(handler) = &props.on_input {
                        handler.call(evt.value());
                    }
                },
            }
        }
    }
}
