use glam::Vec2;

/// Element-relative CSS position to uv (0..1, y up), as the shaders expect.
#[inline]
pub fn css_to_uv(x_css: f32, y_css: f32, width: f32, height: f32) -> Vec2 {
    if width > 0.0 && height > 0.0 && x_css.is_finite() && y_css.is_finite() {
        let u = (x_css / width).clamp(0.0, 1.0);
        let v = (y_css / height).clamp(0.0, 1.0);
        Vec2::new(u, 1.0 - v)
    } else {
        Vec2::splat(0.5)
    }
}

/// Canvas-relative uv for a pointer at `client` given the canvas rect origin and size.
#[inline]
pub fn client_to_uv(client: Vec2, rect_origin: Vec2, rect_size: Vec2) -> Vec2 {
    let local = client - rect_origin;
    css_to_uv(local.x, local.y, rect_size.x, rect_size.y)
}

#[inline]
pub fn is_text_entry_tag(tag: &str) -> bool {
    matches!(
        tag.to_ascii_uppercase().as_str(),
        "INPUT" | "TEXTAREA" | "SELECT"
    )
}

/// Keys with a command modifier held belong to the browser, not the matchers.
#[inline]
pub fn is_shortcut(ctrl: bool, meta: bool, alt: bool) -> bool {
    ctrl || meta || alt
}
