use sitemap_core::DownloadKind;

use super::constants::*;
use super::locale::Locale;
use super::UiCommand;

/// Page state before anything was submitted: results and downloads hidden.
#[allow(clippy::vec_init_then_push)]
pub fn initial_commands(locale: Locale) -> Vec<UiCommand> {
    let mut commands = Vec::new();

    commands.push(UiCommand::SetControlText {
        control_id: CRAWL_FORM,
        text: locale.title().to_string(),
    });
    commands.push(UiCommand::SetControlText {
        control_id: INPUT_URL,
        text: locale.input_hint().to_string(),
    });
    commands.push(UiCommand::SetControlEnabled {
        control_id: BUTTON_SUBMIT,
        enabled: true,
    });
    commands.push(UiCommand::SetControlText {
        control_id: BUTTON_DOWNLOAD,
        text: locale.download_label(DownloadKind::Sitemap).to_string(),
    });
    commands.push(UiCommand::SetControlText {
        control_id: BUTTON_CSV,
        text: locale.download_label(DownloadKind::Csv).to_string(),
    });
    commands.push(UiCommand::SetControlVisible {
        control_id: BUTTON_DOWNLOAD,
        visible: false,
    });
    commands.push(UiCommand::SetControlVisible {
        control_id: BUTTON_CSV,
        visible: false,
    });
    commands.push(UiCommand::SetControlVisible {
        control_id: PANEL_RESULTS,
        visible: false,
    });

    commands
}
