/// Everything the user (or the clock) can ask the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Like,
    Dislike,
    Skip,
    Reset,
    ToggleHistory,
    ToggleAuthors,
    ToggleAbstract,
    ShowUrl,
    ToggleHelp,
    /// Close whichever overlay is open.
    NavigateBack,
    PageDown,
    PageUp,
    Quit,
    Tick,
    Resize(u16, u16),
    None,
}
