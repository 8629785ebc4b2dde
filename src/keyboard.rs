use std::collections::HashSet;

use lazy_static::lazy_static;

lazy_static! {
    // names as reported by the browser (KeyboardEvent.key) and by SDL (Keycode::name)
    static ref BUTTON_KEYS: HashSet<&'static str> = {
        let mut set = HashSet::new();
        set.insert(" ");
        set.insert("Space");
        set.insert("ArrowUp");
        set.insert("Up");
        set.insert("Enter");
        set.insert("Return");
        set.insert("Keypad Enter");
        set.insert("W");
        set
    };
}

/// Whether a key stands in for the handheld's single push button.
pub fn is_button_key(name: &str) -> bool {
    if name.len() == 1 {
        // letters count regardless of shift state
        let upper = name.to_ascii_uppercase();
        BUTTON_KEYS.contains(upper.as_str())
    } else {
        BUTTON_KEYS.contains(name)
    }
}
