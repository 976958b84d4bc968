//! Bottom navigation bar.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdCamera, LdHistory, LdHome as LdHouse, LdInfo};
use skinscan_core::Screen;

/// Props for the [`NavBar`] component.
#[derive(Props, Clone, PartialEq)]
pub struct NavBarProps {
    /// The screen currently shown, highlighted in the bar.
    current: Screen,
    /// Fired with the screen to switch to.
    on_navigate: EventHandler<Screen>,
}

/// Icon buttons for [`Screen::NAV`].
#[component]
pub fn NavBar(props: NavBarProps) -> Element {
    rsx! {
        nav { class: "nav-bar",
            for screen in Screen::NAV {
                button {
                    key: "{screen.title()}",
                    class: if screen == props.current { "nav-item active" } else { "nav-item" },
                    aria_label: "{screen.title()}",
                    onclick: move |_| props.on_navigate.call(screen),
                    {render_icon(screen)}
                    span { "{screen.title()}" }
                }
            }
        }
    }
}

fn render_icon(screen: Screen) -> Element {
    match screen {
        Screen::Camera => rsx! { Icon { icon: LdCamera, width: 22, height: 22 } },
        Screen::History => rsx! { Icon { icon: LdHistory, width: 22, height: 22 } },
        Screen::Info => rsx! { Icon { icon: LdInfo, width: 22, height: 22 } },
        _ => rsx! { Icon { icon: LdHouse, width: 22, height: 22 } },
    }
}
