//! JavaScript snippets evaluated in the page
//!
//! Scripts are built from the configured selector set; selectors are
//! embedded as JSON string literals so quoting inside them is safe.

/// Scroll the listing to the bottom.
pub const SCROLL_TO_BOTTOM_SCRIPT: &str =
    "window.scrollTo(0, document.body.scrollHeight)";

/// Cheap liveness probe; evaluation failure means the view is gone.
pub const LIVENESS_SCRIPT: &str = "true";

fn js_str(s: &str) -> String {
    // Serialization of a &str cannot fail; fall back to an empty literal
    // rather than panicking in the page-driving path.
    serde_json::to_string(s).unwrap_or_else(|_| String::from("\"\""))
}

/// Outer HTML of every listing entry, in document order.
pub fn entry_fragments_script(entry_selector: &str) -> String {
    let sel = js_str(entry_selector);
    format!(
        "(() => Array.from(document.querySelectorAll({sel})).map(el => el.outerHTML))()"
    )
}

/// Click the next-page control if present; report whether it was.
pub fn advance_page_script(next_selector: &str) -> String {
    let sel = js_str(next_selector);
    format!(
        "(() => {{ const btn = document.querySelector({sel}); if (!btn) return false; btn.click(); return true; }})()"
    )
}

/// Whether a challenge or login marker is present.
pub fn challenge_script(marker_selectors: &str) -> String {
    let sel = js_str(marker_selectors);
    format!("(() => !!document.querySelector({sel}))()")
}

/// Presence and visibility of the disclosure control.
///
/// Visibility uses the offsetParent test: an element detached from layout
/// has no offset parent.
pub fn disclosure_state_script(control_selector: &str) -> String {
    let sel = js_str(control_selector);
    format!(
        "(() => {{ const el = document.querySelector({sel}); if (!el) return 'absent'; return el.offsetParent !== null ? 'visible' : 'hidden'; }})()"
    )
}

/// Dispatch a bubbling click event to the disclosure control.
pub fn click_disclosure_script(control_selector: &str) -> String {
    let sel = js_str(control_selector);
    format!(
        "(() => {{ const el = document.querySelector({sel}); if (!el) return false; el.dispatchEvent(new Event('click', {{ bubbles: true }})); return true; }})()"
    )
}

/// Snapshot of the contact panel: primary selector, then fallback.
pub fn contact_panel_script(primary_selector: &str, fallback_selector: &str) -> String {
    let primary = js_str(primary_selector);
    let fallback = js_str(fallback_selector);
    format!(
        "(() => {{ let section = document.querySelector({primary}); if (!section) section = document.querySelector({fallback}); if (!section) return null; return {{ html: section.outerHTML, rawText: (section.textContent || '').trim() }}; }})()"
    )
}
