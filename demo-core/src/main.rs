use demo_core::BudgetApp;
use eframe::run_native;

fn main() -> eframe::Result<()> {
    let native_options = eframe::NativeOptions::default();
    run_native(
        "egui_stage_budget_demo",
        native_options,
        Box::new(|cc| Ok(Box::new(BudgetApp::new(cc)))),
    )
}
