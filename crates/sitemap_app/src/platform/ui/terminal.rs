//! Line-oriented surface: prints a control only when its state changes.

use std::collections::HashMap;
use std::io::{self, Write};

use super::constants::*;
use super::{ControlId, MessageSeverity, UiCommand};

#[derive(Debug, Default)]
struct ControlState {
    text: Option<String>,
    label: Option<(String, MessageSeverity, Option<String>)>,
    enabled: Option<bool>,
    visible: Option<bool>,
    items: Option<Vec<String>>,
}

pub struct TerminalSurface<W: Write> {
    out: W,
    controls: HashMap<ControlId, ControlState>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            controls: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    #[cfg(test)]
    pub fn is_enabled(&self, control_id: ControlId) -> bool {
        self.controls
            .get(&control_id)
            .and_then(|state| state.enabled)
            .unwrap_or(false)
    }

    pub fn apply(&mut self, commands: &[UiCommand]) -> io::Result<()> {
        for command in commands {
            self.apply_one(command)?;
        }
        self.out.flush()
    }

    /// Progress and list live inside the results panel and stay silent while it is hidden.
    fn suppressed(&self, control_id: ControlId) -> bool {
        matches!(control_id, LABEL_PROGRESS | LIST_URLS)
            && self
                .controls
                .get(&PANEL_RESULTS)
                .and_then(|panel| panel.visible)
                == Some(false)
    }

    fn apply_one(&mut self, command: &UiCommand) -> io::Result<()> {
        match command {
            UiCommand::SetControlText { control_id, text } => {
                let state = self.controls.entry(*control_id).or_default();
                if state.text.as_deref() == Some(text.as_str()) {
                    return Ok(());
                }
                state.text = Some(text.clone());
                match *control_id {
                    CRAWL_FORM => writeln!(self.out, "== {text} =="),
                    INPUT_URL => writeln!(self.out, "{text}"),
                    BUTTON_SUBMIT => writeln!(self.out, "[{text}]"),
                    _ => Ok(()),
                }
            }
            UiCommand::UpdateLabelText {
                control_id,
                text,
                severity,
                detail,
            } => {
                let next = (text.clone(), *severity, detail.clone());
                let silent = self.suppressed(*control_id);
                let state = self.controls.entry(*control_id).or_default();
                if state.label.as_ref() == Some(&next) {
                    return Ok(());
                }
                state.label = Some(next);
                if silent || text.is_empty() {
                    return Ok(());
                }
                let prefix = match severity {
                    MessageSeverity::Information => "",
                    MessageSeverity::Warning => "[warn] ",
                    MessageSeverity::Error => "[error] ",
                };
                writeln!(self.out, "{prefix}{text}")?;
                if let Some(detail) = detail {
                    for line in detail.lines() {
                        writeln!(self.out, "    {line}")?;
                    }
                }
                Ok(())
            }
            UiCommand::SetControlEnabled {
                control_id,
                enabled,
            } => {
                self.controls.entry(*control_id).or_default().enabled = Some(*enabled);
                Ok(())
            }
            UiCommand::SetControlVisible {
                control_id,
                visible,
            } => {
                let state = self.controls.entry(*control_id).or_default();
                let previous = state.visible.replace(*visible);
                if previous == Some(*visible) || (previous.is_none() && !*visible) {
                    return Ok(());
                }
                match (*control_id, *visible) {
                    (BUTTON_DOWNLOAD | BUTTON_CSV, true) => {
                        let label = state.text.clone().unwrap_or_default();
                        writeln!(self.out, "  -> {label}")
                    }
                    (PANEL_RESULTS, false) => writeln!(self.out, "(results hidden)"),
                    _ => Ok(()),
                }
            }
            UiCommand::PopulateList {
                control_id,
                heading,
                items,
            } => {
                let silent = self.suppressed(*control_id);
                let state = self.controls.entry(*control_id).or_default();
                if state.items.as_ref() == Some(items) {
                    return Ok(());
                }
                state.items = Some(items.clone());
                if silent {
                    return Ok(());
                }
                writeln!(self.out, "{heading}")?;
                for item in items {
                    writeln!(self.out, "  - {item}")?;
                }
                Ok(())
            }
            UiCommand::ClearList { control_id } => {
                self.controls.entry(*control_id).or_default().items = Some(Vec::new());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::platform::ui::layout::initial_commands;
    use crate::platform::ui::locale::Locale;

    fn output(surface: TerminalSurface<Vec<u8>>) -> String {
        String::from_utf8(surface.into_inner()).unwrap()
    }

    #[test]
    fn initial_layout_prints_title_and_hint_only() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.apply(&initial_commands(Locale::English)).unwrap();

        assert!(surface.is_enabled(BUTTON_SUBMIT));
        let text = output(surface);
        assert!(text.starts_with("== Sitemap generator ==\n"));
        assert!(!text.contains("->"));
        assert!(!text.contains("results hidden"));
    }

    #[test]
    fn unchanged_label_is_printed_once() {
        let mut surface = TerminalSurface::new(Vec::new());
        let cmd = UiCommand::UpdateLabelText {
            control_id: LABEL_PROGRESS,
            text: "Generating sitemap: 1 URLs".to_string(),
            severity: MessageSeverity::Information,
            detail: None,
        };
        surface.apply(&[cmd.clone()]).unwrap();
        surface.apply(&[cmd]).unwrap();

        assert_eq!(output(surface), "Generating sitemap: 1 URLs\n");
    }

    #[test]
    fn error_detail_is_indented() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface
            .apply(&[UiCommand::UpdateLabelText {
                control_id: LABEL_PROGRESS,
                text: "Error: boom".to_string(),
                severity: MessageSeverity::Error,
                detail: Some("Details:\nURL: http://example.com".to_string()),
            }])
            .unwrap();

        assert_eq!(
            output(surface),
            "[error] Error: boom\n    Details:\n    URL: http://example.com\n"
        );
    }

    #[test]
    fn list_is_reprinted_in_full_when_it_changes() {
        let mut surface = TerminalSurface::new(Vec::new());
        let populate = |items: &[&str]| UiCommand::PopulateList {
            control_id: LIST_URLS,
            heading: "Crawled URLs:".to_string(),
            items: items.iter().map(|item| item.to_string()).collect(),
        };
        surface.apply(&[populate(&["http://a"])]).unwrap();
        surface.apply(&[populate(&["http://a"])]).unwrap();
        surface.apply(&[populate(&["http://a", "http://b"])]).unwrap();

        assert_eq!(
            output(surface),
            "Crawled URLs:\n  - http://a\nCrawled URLs:\n  - http://a\n  - http://b\n"
        );
    }

    #[test]
    fn download_buttons_announce_when_shown_and_results_when_hidden() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.apply(&initial_commands(Locale::English)).unwrap();
        let before = surface.out.len();

        surface
            .apply(&[
                UiCommand::SetControlVisible {
                    control_id: PANEL_RESULTS,
                    visible: true,
                },
                UiCommand::SetControlVisible {
                    control_id: BUTTON_DOWNLOAD,
                    visible: true,
                },
                UiCommand::SetControlVisible {
                    control_id: BUTTON_CSV,
                    visible: true,
                },
                UiCommand::SetControlVisible {
                    control_id: PANEL_RESULTS,
                    visible: false,
                },
            ])
            .unwrap();

        let text = output(surface);
        assert_eq!(
            &text[before..],
            "  -> Download sitemap (XML) with :sitemap\n  -> Download URL list (CSV) with :csv\n(results hidden)\n"
        );
    }

    #[test]
    fn hidden_results_silence_progress_and_list() {
        let mut surface = TerminalSurface::new(Vec::new());
        let progress = |text: &str| UiCommand::UpdateLabelText {
            control_id: LABEL_PROGRESS,
            text: text.to_string(),
            severity: MessageSeverity::Information,
            detail: None,
        };
        let populate = |items: &[&str]| UiCommand::PopulateList {
            control_id: LIST_URLS,
            heading: "Crawled URLs:".to_string(),
            items: items.iter().map(|item| item.to_string()).collect(),
        };
        let panel = |visible: bool| UiCommand::SetControlVisible {
            control_id: PANEL_RESULTS,
            visible,
        };

        surface
            .apply(&[
                panel(true),
                progress("Generating sitemap: 1 URLs"),
                populate(&["http://a"]),
            ])
            .unwrap();
        surface
            .apply(&[
                panel(false),
                progress("Generating sitemap: 2 URLs"),
                populate(&["http://a", "http://b"]),
            ])
            .unwrap();
        surface.apply(&[panel(true), progress("Starting crawl...")]).unwrap();

        assert_eq!(
            output(surface),
            "Generating sitemap: 1 URLs\nCrawled URLs:\n  - http://a\n(results hidden)\nStarting crawl...\n"
        );
    }
}
