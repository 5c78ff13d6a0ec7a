use dioxus::prelude::*;
use escom_shared::models::CellPosition;

use crate::components::map_view::MapView;
use crate::Route;

#[component]
pub fn MapScreen() -> Element {
    // Positions in grid cells. The local one follows taps on the map; the
    // remote one is fed by whatever session layer hosts this screen.
    let local_player = use_signal(|| None::<CellPosition>);
    let remote_player = use_signal(|| None::<CellPosition>);

    let local = *local_player.read();
    let remote = *remote_player.read();

    rsx! {
        div { class: "app",
            div { class: "header",
                h1 { "Mapa ESCOM" }
                Link { class: "settings-link", to: Route::Settings {}, "Ajustes" }
            }

            MapView {
                local_player: local_player,
                remote_player: remote_player,
            }

            div { class: "coord-readout",
                if let Some(pos) = local {
                    span { "Tú: {pos.col},{pos.row} " }
                }
                if let Some(pos) = remote {
                    span { "Rival: {pos.col},{pos.row}" }
                }
            }
        }
    }
}
