use std::fmt::{self, Display, Formatter};

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::*;

use crate::gof::GoodnessOfFitReport;

const CONFIDENCE: f64 = 0.95;

fn interpretation(p: f64) -> &'static str {
    if p.is_nan() {
        "⚪ Undefined"
    } else if p < 0.01 {
        "🔴 Model rejected"
    } else if p < 0.05 {
        "🟠 Poor fit"
    } else if p < 0.10 {
        "🟡 Marginal fit"
    } else {
        "🟢 Acceptable fit"
    }
}

impl GoodnessOfFitReport {
    /// Render the report as title, p-value table and success footer.
    pub fn display(&self) -> String {
        let mut title_table = Table::new();
        title_table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .add_row(vec![Cell::new("Monte Carlo Goodness of Fit")
                .set_alignment(CellAlignment::Center)]);

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Dataset").set_alignment(CellAlignment::Center),
                Cell::new("p-value").set_alignment(CellAlignment::Center),
                Cell::new(format!("MC error ({:.0}%)", CONFIDENCE * 100.0)).set_alignment(CellAlignment::Center),
                Cell::new("Interpretation").set_alignment(CellAlignment::Center),
            ]);

        for (name, p) in self.iter() {
            let ci = crate::statistics::proportion_interval(p, self.n_requested, CONFIDENCE);
            let p_display = if p == 0.0 {
                format!("< {:.4}", 1.0 / self.n_requested.max(1) as f64)
            } else {
                format!("{p:.4}")
            };

            table.add_row(vec![
                Cell::new(name).set_alignment(CellAlignment::Left),
                Cell::new(&p_display).set_alignment(CellAlignment::Right),
                Cell::new(format!("[{:.4}, {:.4}]", ci.lower, ci.upper)).set_alignment(CellAlignment::Right),
                Cell::new(interpretation(p)).set_alignment(CellAlignment::Left),
            ]);
        }

        let mut footer = Table::new();
        footer
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .add_row(vec![Cell::new(format!(
                "{} of {} simulations refitted successfully",
                self.n_successful, self.n_requested
            ))]);

        format!("{}\n{}\n{}", title_table, table, footer)
    }
}

impl Display for GoodnessOfFitReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
