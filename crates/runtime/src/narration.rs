//! Narration output.

/// Speaks text to the user (screen reader, text-to-speech, console).
pub trait Narrator {
    /// `force` interrupts whatever is currently being spoken.
    fn say(&self, text: &str, force: bool);
}

impl<F> Narrator for F
where
    F: Fn(&str, bool),
{
    fn say(&self, text: &str, force: bool) {
        self(text, force)
    }
}
