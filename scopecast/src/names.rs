//! Event-name table.
//!
//! A static bidirectional mapping between canonical lowercase event kinds
//! and the host framework's listener-prop names (`click` ↔ `onClick`).
//! Pure lookup, no state. Names outside the table pass through unchanged
//! in both directions; they are assumed to already be valid native names.

/// Kind ↔ listener-prop pairs, sorted by kind for binary search.
const TABLE: &[(&str, &str)] = &[
    ("blur", "onBlur"),
    ("change", "onChange"),
    ("click", "onClick"),
    ("contextmenu", "onContextMenu"),
    ("copy", "onCopy"),
    ("cut", "onCut"),
    ("dblclick", "onDoubleClick"),
    ("drag", "onDrag"),
    ("dragend", "onDragEnd"),
    ("dragenter", "onDragEnter"),
    ("dragleave", "onDragLeave"),
    ("dragover", "onDragOver"),
    ("dragstart", "onDragStart"),
    ("drop", "onDrop"),
    ("focus", "onFocus"),
    ("input", "onInput"),
    ("keydown", "onKeyDown"),
    ("keypress", "onKeyPress"),
    ("keyup", "onKeyUp"),
    ("mousedown", "onMouseDown"),
    ("mouseenter", "onMouseEnter"),
    ("mouseleave", "onMouseLeave"),
    ("mousemove", "onMouseMove"),
    ("mouseout", "onMouseOut"),
    ("mouseover", "onMouseOver"),
    ("mouseup", "onMouseUp"),
    ("paste", "onPaste"),
    ("scroll", "onScroll"),
    ("submit", "onSubmit"),
    ("touchcancel", "onTouchCancel"),
    ("touchend", "onTouchEnd"),
    ("touchmove", "onTouchMove"),
    ("touchstart", "onTouchStart"),
    ("wheel", "onWheel"),
];

/// Translate a canonical event kind into the host listener-prop name.
///
/// Unrecognized kinds are returned unchanged.
pub fn listener_prop(kind: &str) -> &str {
    match TABLE.binary_search_by_key(&kind, |&(k, _)| k) {
        Ok(index) => TABLE[index].1,
        Err(_) => kind,
    }
}

/// Translate a host listener-prop name back into the canonical event kind.
///
/// Unrecognized props are returned unchanged.
pub fn event_kind(prop: &str) -> &str {
    TABLE
        .iter()
        .find(|&&(_, p)| p == prop)
        .map_or(prop, |&(kind, _)| kind)
}
