use sitemap_core::AppViewModel;

use super::constants::*;
use super::locale::Locale;
use super::UiCommand;

#[allow(clippy::vec_init_then_push)]
pub fn render(view: &AppViewModel, locale: Locale) -> Vec<UiCommand> {
    let mut cmds = Vec::new();

    cmds.push(UiCommand::SetControlVisible {
        control_id: PANEL_RESULTS,
        visible: view.results_visible,
    });

    cmds.push(UiCommand::SetControlEnabled {
        control_id: BUTTON_SUBMIT,
        enabled: view.submit_enabled,
    });
    cmds.push(UiCommand::SetControlText {
        control_id: BUTTON_SUBMIT,
        text: locale.submit_label(view.submit_enabled).to_string(),
    });

    let notice = locale.notice(&view.notice);
    cmds.push(UiCommand::UpdateLabelText {
        control_id: LABEL_PROGRESS,
        text: notice.text,
        severity: notice.severity,
        detail: notice.detail,
    });

    if view.url_list.is_empty() {
        cmds.push(UiCommand::ClearList {
            control_id: LIST_URLS,
        });
    } else {
        cmds.push(UiCommand::PopulateList {
            control_id: LIST_URLS,
            heading: locale.list_heading().to_string(),
            items: view.url_list.clone(),
        });
    }

    cmds.push(UiCommand::SetControlVisible {
        control_id: BUTTON_DOWNLOAD,
        visible: view.downloads_visible,
    });
    cmds.push(UiCommand::SetControlVisible {
        control_id: BUTTON_CSV,
        visible: view.downloads_visible,
    });

    if let Some(status) = &view.last_download {
        let status = locale.download_status(status);
        cmds.push(UiCommand::UpdateLabelText {
            control_id: LABEL_STATUS,
            text: status.text,
            severity: status.severity,
            detail: None,
        });
    }

    cmds
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sitemap_core::{
        update, AppState, DownloadKind, DownloadStatus, Msg, Notice, Phase, ProgressSnapshot,
    };

    use super::*;
    use crate::platform::ui::{ControlId, MessageSeverity};

    fn find_label(cmds: &[UiCommand], id: ControlId) -> Option<&UiCommand> {
        cmds.iter().find(|cmd| {
            matches!(cmd, UiCommand::UpdateLabelText { control_id, .. } if *control_id == id)
        })
    }

    fn visibility(cmds: &[UiCommand], id: ControlId) -> Option<bool> {
        cmds.iter().find_map(|cmd| match cmd {
            UiCommand::SetControlVisible { control_id, visible } if *control_id == id => {
                Some(*visible)
            }
            _ => None,
        })
    }

    #[test]
    fn completed_example_renders_three_items_and_downloads() {
        let (state, _) = update(
            AppState::new(),
            Msg::InputChanged("http://example.com".to_string()),
        );
        let (state, _) = update(state, Msg::Submitted);
        let (state, _) = update(
            state,
            Msg::CrawlAccepted {
                generation: 1,
                session_id: "abc123".to_string(),
                url: "http://example.com".to_string(),
            },
        );
        let (state, _) = update(
            state,
            Msg::ProgressReceived {
                generation: 1,
                snapshot: ProgressSnapshot {
                    crawled_urls: 3,
                    visited_urls: vec![
                        "http://example.com".to_string(),
                        "http://example.com/a".to_string(),
                        "http://example.com/b".to_string(),
                    ],
                    completed: true,
                    ..ProgressSnapshot::default()
                },
            },
        );

        let cmds = render(&state.view(), Locale::English);

        assert!(cmds.contains(&UiCommand::PopulateList {
            control_id: LIST_URLS,
            heading: "Crawled URLs:".to_string(),
            items: vec![
                "http://example.com".to_string(),
                "http://example.com/a".to_string(),
                "http://example.com/b".to_string(),
            ],
        }));
        assert_eq!(visibility(&cmds, BUTTON_DOWNLOAD), Some(true));
        assert_eq!(visibility(&cmds, BUTTON_CSV), Some(true));
        assert_eq!(visibility(&cmds, PANEL_RESULTS), Some(true));
        assert_eq!(
            find_label(&cmds, LABEL_PROGRESS),
            Some(&UiCommand::UpdateLabelText {
                control_id: LABEL_PROGRESS,
                text: "Done! 3 URLs found".to_string(),
                severity: MessageSeverity::Information,
                detail: None,
            })
        );
        assert!(cmds.contains(&UiCommand::SetControlEnabled {
            control_id: BUTTON_SUBMIT,
            enabled: true,
        }));
    }

    #[test]
    fn submitting_view_disables_submit_with_processing_label() {
        let view = AppViewModel {
            phase: Phase::Submitting,
            submit_enabled: false,
            notice: Notice::Starting,
            results_visible: true,
            ..AppViewModel::default()
        };

        let cmds = render(&view, Locale::Turkish);

        assert!(cmds.contains(&UiCommand::SetControlText {
            control_id: BUTTON_SUBMIT,
            text: "İşleniyor...".to_string(),
        }));
        assert!(cmds.contains(&UiCommand::ClearList {
            control_id: LIST_URLS
        }));
        assert_eq!(visibility(&cmds, BUTTON_DOWNLOAD), Some(false));
        assert!(find_label(&cmds, LABEL_STATUS).is_none());
    }

    #[test]
    fn session_error_carries_details() {
        let view = AppViewModel {
            phase: Phase::Failed,
            submit_enabled: true,
            notice: Notice::SessionError {
                error: "Taranacak URL bulunamadı".to_string(),
                details: Some("HTTP Status: 404".to_string()),
            },
            ..AppViewModel::default()
        };

        let cmds = render(&view, Locale::Turkish);

        assert_eq!(
            find_label(&cmds, LABEL_PROGRESS),
            Some(&UiCommand::UpdateLabelText {
                control_id: LABEL_PROGRESS,
                text: "Hata: Taranacak URL bulunamadı".to_string(),
                severity: MessageSeverity::Error,
                detail: Some("Detay:\nHTTP Status: 404".to_string()),
            })
        );
    }

    #[test]
    fn rejected_request_without_reason_uses_generic_text() {
        let view = AppViewModel {
            notice: Notice::RequestFailed { reason: None },
            ..AppViewModel::default()
        };

        let cmds = render(&view, Locale::English);

        match find_label(&cmds, LABEL_PROGRESS) {
            Some(UiCommand::UpdateLabelText { text, .. }) => {
                assert_eq!(text, "Error: Failed to start crawling")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn download_status_goes_to_status_bar() {
        let view = AppViewModel {
            last_download: Some(DownloadStatus::Saved {
                kind: DownloadKind::Csv,
                path: "downloads/sitemap_urls.csv".to_string(),
            }),
            ..AppViewModel::default()
        };

        let cmds = render(&view, Locale::English);

        match find_label(&cmds, LABEL_STATUS) {
            Some(UiCommand::UpdateLabelText { text, .. }) => {
                assert_eq!(text, "Saved CSV to downloads/sitemap_urls.csv")
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
