pub mod constants;
pub mod layout;
pub mod locale;
pub mod render;
pub mod terminal;

/// Identifies one control of the page; the value is the element id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(&'static str);

impl ControlId {
    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSeverity {
    Information,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    SetControlText {
        control_id: ControlId,
        text: String,
    },
    /// Status-style text; `detail` is shown preformatted below it.
    UpdateLabelText {
        control_id: ControlId,
        text: String,
        severity: MessageSeverity,
        detail: Option<String>,
    },
    SetControlEnabled {
        control_id: ControlId,
        enabled: bool,
    },
    SetControlVisible {
        control_id: ControlId,
        visible: bool,
    },
    /// Replaces the whole list: heading first, then one item per entry.
    PopulateList {
        control_id: ControlId,
        heading: String,
        items: Vec<String>,
    },
    ClearList {
        control_id: ControlId,
    },
}
