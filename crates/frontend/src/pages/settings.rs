use dioxus::prelude::*;
use escom_shared::models::{PlayerColor, PlayerShape};
use escom_shared::settings::SettingsForm;

use crate::storage::LocalStoragePreferences;
use crate::Route;

#[component]
pub fn SettingsScreen() -> Element {
    let mut form = use_signal(|| SettingsForm::from_preferences(&LocalStoragePreferences::open()));
    let mut error = use_signal(|| None::<String>);
    let nav = navigator();

    let current = *form.read();

    rsx! {
        div { class: "app settings",
            div { class: "header",
                h1 { "Ajustes del jugador" }
                Link { class: "settings-link", to: Route::Home {}, "Volver" }
            }

            div { class: "panel",
                h3 { "Color" }
                for color in PlayerColor::ALL {
                    label { class: "radio",
                        input {
                            r#type: "radio",
                            name: "color",
                            value: color.pref_value(),
                            checked: current.color == Some(color),
                            onchange: move |_| form.write().select_color(color),
                        }
                        "{color}"
                    }
                }
            }

            div { class: "panel",
                h3 { "Forma" }
                for shape in PlayerShape::ALL {
                    label { class: "radio",
                        input {
                            r#type: "radio",
                            name: "shape",
                            value: shape.pref_value(),
                            checked: current.shape == Some(shape),
                            onchange: move |_| form.write().select_shape(shape),
                        }
                        "{shape}"
                    }
                }
            }

            button {
                class: "save-button",
                onclick: move |_| {
                    let mut prefs = LocalStoragePreferences::open();
                    let result = form.read().save(&mut prefs);
                    match result {
                        Ok(()) => {
                            nav.push(Route::Home {});
                        }
                        Err(e) => error.set(Some(e.to_string())),
                    }
                },
                "Guardar"
            }

            if let Some(msg) = error.read().as_ref() {
                p { class: "error", "{msg}" }
            }
        }
    }
}
