/// A user-intent action produced from terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Tick,
    Quit,
    MoveUp,
    MoveDown,
    /// Enter: select the document under the cursor, or activate the
    /// highlighted citation when the answer panel has focus.
    DrillIn,
    NavigateBack,
    /// Tab: cycle focus between the document list and the QA panel.
    FocusNext,
    StartQuery,
    QueryInput(char),
    QueryCancel,
    QuerySubmit,
    ToggleScope,
    DeleteDoc,
    ViewDoc,
    Refresh,
    NextCitation,
    PrevCitation,
    ToggleHelp,
    Resize(u16, u16),
}
