use crate::audio::Chime;
use crate::constants::{BANNER_VISIBLE_MS, FLASH_VISIBLE_MS, NOTICE_CONTAINER_ID};
use crate::dom;
use crate::notice::{page_changes, PageChange};
use protocol_core::Notice;
use web_sys as web;

/// Apply queued session notices to the page.
pub fn present(document: &web::Document, notices: &[Notice], chime: &mut Chime) {
    for notice in notices {
        log::debug!("[overlay] {:?}", notice);
        for change in page_changes(notice) {
            apply(document, change, chime);
        }
    }
}

fn apply(document: &web::Document, change: PageChange, chime: &mut Chime) {
    match change {
        PageChange::Banner(text) => show_banner(document, &text),
        PageChange::Chime => chime.play(),
        PageChange::AddClass(class) => dom::add_body_class(&class),
        PageChange::RemoveClass(class) => dom::remove_body_class(&class),
        PageChange::Flash(class) => {
            dom::add_body_class(&class);
            dom::after_ms(FLASH_VISIBLE_MS, move || dom::remove_body_class(&class));
        }
        PageChange::Anchor { x, y } => {
            dom::set_body_property("--gesture-x", &x);
            dom::set_body_property("--gesture-y", &y);
        }
    }
}

/// Transient banner; falls back to the body when the container is missing.
fn show_banner(document: &web::Document, text: &str) {
    let parent: Option<web::Element> = document
        .get_element_by_id(NOTICE_CONTAINER_ID)
        .or_else(|| document.body().map(Into::into));
    let Some(parent) = parent else {
        return;
    };
    let banner = match document.create_element("div") {
        Ok(el) => el,
        Err(e) => {
            log::warn!("[overlay] banner element error: {:?}", e);
            return;
        }
    };
    banner.set_class_name("unlock-notice");
    banner.set_text_content(Some(text));
    if parent.append_child(&banner).is_err() {
        return;
    }
    dom::after_ms(BANNER_VISIBLE_MS, move || banner.remove());
}
