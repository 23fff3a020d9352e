//! Lightbox overlay skeleton.
//!
//! One fixed block of markup per page: a slide container, a title, navigation
//! controls, and a modal wrapper for the bootstrap-style presentation. The
//! thumbnails' `data-gallery` links feed slides into it at runtime. The two
//! display flags are only recorded as data attributes (`"1"` / `"0"`) for the
//! client script; they do not change the structure.

use maud::{Markup, PreEscaped, html};

/// Element id the client script looks for.
pub const LIGHTBOX_ID: &str = "blueimp-gallery";

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

pub fn build(full_screen: bool, use_modal_style: bool) -> Markup {
    html! {
        div id=(LIGHTBOX_ID) class="blueimp-gallery"
            data-use-bootstrap-modal=(flag(use_modal_style))
            data-full-screen=(flag(full_screen)) {
            div.slides {}
            h3.title {}
            a.prev { (PreEscaped("&#xffe9;")) }
            a.next { (PreEscaped("&#xffeb;")) }
            a.close { (PreEscaped("&#120;")) }
            a.play-pause {}
            ol.indicator {}
            div.modal.fade {
                div.modal-dialog {
                    div.modal-content {
                        div.modal-header {
                            button.close type="button" aria-hidden="true" { (PreEscaped("&times;")) }
                            h4.modal-title {}
                        }
                        div.modal-body.next {}
                        div.modal-footer {
                            button.btn.btn-default.pull-left.prev type="button" { "<" }
                            button.btn.btn-primary.next type="button" { ">" }
                        }
                    }
                }
            }
        }
    }
}
