use egui::{menu, RichText, Ui};

use presales_gantt::model::ViewMode;

use crate::app::GanttApp;
use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileAction {
    New,
    Open,
    Save,
    SaveAs,
    ImportCsv,
    ExportCsv,
}

impl FileAction {
    /// Menu entries in order; `None` draws a separator.
    const MENU: [Option<(FileAction, &'static str, &'static str)>; 8] = [
        Some((FileAction::New, "New Project", "")),
        Some((FileAction::Open, "Open...", "")),
        None,
        Some((FileAction::Save, "Save", "Ctrl+S")),
        Some((FileAction::SaveAs, "Save As...", "")),
        None,
        Some((FileAction::ImportCsv, "Import Phases (CSV)...", "")),
        Some((FileAction::ExportCsv, "Export Schedule (CSV)...", "")),
    ];

    fn run(self, app: &mut GanttApp) {
        match self {
            FileAction::New => app.new_project(),
            FileAction::Open => app.open_project(),
            FileAction::Save => app.save_project(),
            FileAction::SaveAs => app.save_project_as(),
            FileAction::ImportCsv => app.import_csv(),
            FileAction::ExportCsv => app.export_csv(),
        }
    }
}

/// Menu bar with file actions, zoom, help and the project start picker.
pub fn show_toolbar(app: &mut GanttApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new(" File ").font(theme::font_menu()), |ui| {
            for entry in FileAction::MENU {
                let Some((action, label, shortcut)) = entry else {
                    ui.separator();
                    continue;
                };
                let button = egui::Button::new(label).shortcut_text(shortcut);
                if ui.add(button).clicked() {
                    ui.close_menu();
                    action.run(app);
                }
            }
        });

        ui.menu_button(RichText::new(" View ").font(theme::font_menu()), |ui| {
            ui.label(RichText::new("Zoom").small().weak());
            for mode in ViewMode::ALL {
                if ui.radio(app.view_mode == mode, mode.label()).clicked() {
                    app.set_view_mode(mode);
                    ui.close_menu();
                }
            }
            ui.separator();
            if ui.button("Holidays...").clicked() {
                app.show_holidays = true;
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new(" Help ").font(theme::font_menu()), |ui| {
            if ui.button("CSV Format").clicked() {
                app.show_csv_help = true;
                ui.close_menu();
            }
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
        let before = app.start_date_picker;
        ui.add(egui_extras::DatePickerButton::new(&mut app.start_date_picker).id_salt("project_start"));
        if app.start_date_picker != before {
            app.set_start_date(app.start_date_picker);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let title = match &app.file_path {
                Some(path) => format!("{}  ·  {}", app.project.name, path.display()),
                None => format!("{}  ·  not saved", app.project.name),
            };
            ui.label(RichText::new(title).small().color(theme::TEXT_DIM));
        });
    });
}
