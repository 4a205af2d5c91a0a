use protocol_core::Notice;

/// DOM-side consequence of a session notice. Kept free of `web_sys` so the
/// mapping can be checked on the host.
#[derive(Clone, Debug, PartialEq)]
pub enum PageChange {
    Banner(String),
    Chime,
    AddClass(String),
    RemoveClass(String),
    Flash(String),
    /// CSS custom properties positioning a gesture overlay, in CSS pixels.
    Anchor { x: String, y: String },
}

pub fn effect_class(name: &str) -> String {
    format!("fx-{}", name.replace('_', "-"))
}

pub fn flash_class(name: &str) -> String {
    format!("flash-{}", name.replace('_', "-"))
}

pub fn banner_text(label: &str) -> String {
    format!("\u{1F513} {label} MODE UNLOCKED")
}

pub fn page_changes(notice: &Notice) -> Vec<PageChange> {
    match notice {
        Notice::Unlocked { label, .. } => vec![PageChange::Banner(banner_text(label)), PageChange::Chime],
        Notice::Started(name) => vec![PageChange::AddClass(effect_class(name))],
        Notice::Ended(name) => vec![PageChange::RemoveClass(effect_class(name))],
        Notice::Pulse(name) => vec![PageChange::Flash(flash_class(name))],
        Notice::Gesture { at, .. } => vec![PageChange::Anchor {
            x: format!("{:.0}px", at.x),
            y: format!("{:.0}px", at.y),
        }],
    }
}
