//! Sections of a COSHH assessment document, in print order.

use crate::fields::{format_date, or_na, yes_no_or_na};
use crate::icons::{ResolvedImage, GRID_COLUMNS};
use crate::layout::LayoutCursor;
use crate::models::AssessmentRecord;
use crate::sink::DocumentSink;
use crate::table::{Cell, Row, Table};
use crate::theme::{Color, StyleTheme};

use super::{bullet_list, finish, has_text, key_value_row, key_value_section, key_value_table, titled_table};

pub const ASSESSOR_QUESTIONS: [&str; 5] = [
    "Is the substance being used in the correct manner?",
    "Are the existing control measures adequate?",
    "Is the correct PPE available and being worn?",
    "Have persons using the substance received adequate training?",
    "Is health surveillance required?",
];

pub fn substance_details(
    sink: &mut dyn DocumentSink,
    record: &AssessmentRecord,
    theme: &StyleTheme,
    cursor: LayoutCursor,
) -> LayoutCursor {
    let fields = [
        ("Substance Name", &record.substance_name),
        ("Product Code", &record.product_code),
        ("Supplier", &record.supplier),
        ("Description", &record.description),
    ];
    if fields.iter().all(|(_, v)| !has_text(v)) && !has_text(&record.hazard_level) {
        return cursor;
    }
    let mut table = key_value_table(sink, "Substance Details", theme);
    for (label, value) in fields {
        table.push(key_value_row(label, value, theme));
    }
    let level = if has_text(&record.hazard_level) {
        Cell::text(record.hazard_level.trim())
            .filled(theme.hazard_level_color(&record.hazard_level))
            .colored(Color::WHITE)
            .bolded()
    } else {
        Cell::text(or_na(""))
    };
    table.push(Row::new(vec![Cell::label("Hazard Level", theme), level]));
    finish(sink, &table, cursor)
}

pub fn chemical_properties(
    sink: &mut dyn DocumentSink,
    record: &AssessmentRecord,
    theme: &StyleTheme,
    cursor: LayoutCursor,
) -> LayoutCursor {
    let rows = [
        ("Form", record.substance_form.clone()),
        ("Colour", record.colour.clone()),
        ("Odour", record.odour.clone()),
    ];
    key_value_section(sink, "Chemical Properties", &rows, theme, cursor)
}

pub fn ingredients(
    sink: &mut dyn DocumentSink,
    record: &AssessmentRecord,
    theme: &StyleTheme,
    cursor: LayoutCursor,
) -> LayoutCursor {
    if record.ingredients.is_empty() {
        return cursor;
    }
    let mut table = titled_table(sink, "Hazardous Ingredients", &[90.0, 46.0, 46.0], theme).with_head(Row::new(vec![
        Cell::label("Ingredient", theme),
        Cell::label("WEL Long-term (8-hr TWA)", theme),
        Cell::label("WEL Short-term (15-min STEL)", theme),
    ]));
    for row in &record.ingredients {
        table.push(Row::new(vec![
            Cell::text(or_na(&row.name)),
            Cell::text(or_na(&row.wel_long_term)),
            Cell::text(or_na(&row.wel_short_term)),
        ]));
    }
    finish(sink, &table, cursor)
}

/// Grid rows of [`GRID_COLUMNS`] cells: the icon when it resolved, the bare
/// label when it did not, and blank padding after the last item.
pub fn grid_rows(labels: &[String], icons: &[ResolvedImage]) -> Vec<Row> {
    labels
        .chunks(GRID_COLUMNS)
        .enumerate()
        .map(|(r, chunk)| {
            let mut cells: Vec<Cell> = chunk
                .iter()
                .enumerate()
                .map(|(c, label)| {
                    let resolved = icons
                        .get(r * GRID_COLUMNS + c)
                        .filter(|i| i.label == *label)
                        .and_then(|i| i.image.clone());
                    match resolved {
                        Some(image) => Cell::image(image, label.trim()),
                        None => Cell::text(label.trim()).centered(),
                    }
                })
                .collect();
            cells.resize_with(GRID_COLUMNS, Cell::empty);
            Row::new(cells)
        })
        .collect()
}

fn icon_grid(
    sink: &mut dyn DocumentSink,
    title: &str,
    labels: &[String],
    icons: &[ResolvedImage],
    note: Option<(&str, &str)>,
    theme: &StyleTheme,
    cursor: LayoutCursor,
) -> LayoutCursor {
    let note = note.filter(|(_, text)| has_text(text));
    if labels.is_empty() && note.is_none() {
        return cursor;
    }
    let mut table = titled_table(sink, title, &[1.0; GRID_COLUMNS], theme);
    for row in grid_rows(labels, icons) {
        table.push(row);
    }
    if let Some((label, text)) = note {
        table.push(Row::new(vec![
            Cell::label(label, theme),
            Cell::text(text.trim()).spanning(GRID_COLUMNS - 1),
        ]));
    }
    finish(sink, &table, cursor)
}

pub fn ppe_grid(
    sink: &mut dyn DocumentSink,
    record: &AssessmentRecord,
    icons: &[ResolvedImage],
    theme: &StyleTheme,
    cursor: LayoutCursor,
) -> LayoutCursor {
    icon_grid(
        sink,
        "Personal Protective Equipment (PPE)",
        &record.selected_ppe,
        icons,
        Some(("PPE Location", record.ppe_location.as_str())),
        theme,
        cursor,
    )
}

pub fn hazard_grid(
    sink: &mut dyn DocumentSink,
    record: &AssessmentRecord,
    icons: &[ResolvedImage],
    theme: &StyleTheme,
    cursor: LayoutCursor,
) -> LayoutCursor {
    icon_grid(
        sink,
        "Hazard Identification",
        &record.selected_hazards,
        icons,
        Some(("Hazards to Health", record.hazards_to_health.as_str())),
        theme,
        cursor,
    )
}

pub fn exposure_limits(
    sink: &mut dyn DocumentSink,
    record: &AssessmentRecord,
    theme: &StyleTheme,
    cursor: LayoutCursor,
) -> LayoutCursor {
    let rows = [
        ("Persons at Risk", record.persons_at_risk.join(", ")),
        ("Routes of Entry", record.routes_of_entry.join(", ")),
        ("WEL Long-term (8-hr TWA)", record.long_term_exposure_limit.clone()),
        ("WEL Short-term (15-min STEL)", record.short_term_exposure_limit.clone()),
    ];
    key_value_section(sink, "Exposure", &rows, theme, cursor)
}

pub fn usage_frequency(
    sink: &mut dyn DocumentSink,
    record: &AssessmentRecord,
    theme: &StyleTheme,
    cursor: LayoutCursor,
) -> LayoutCursor {
    let rows = [
        ("Method of Use", record.method_of_use.clone()),
        ("Site of Use", record.site_of_use.clone()),
        ("Frequency of Use", record.frequency_of_use.clone()),
        ("Duration of Use", record.duration_of_use.clone()),
        ("Quantity Used", record.quantity_used.clone()),
    ];
    key_value_section(sink, "Usage", &rows, theme, cursor)
}

pub fn has_control_measures(record: &AssessmentRecord) -> bool {
    has_text(&record.control_measures)
        || has_text(&bullet_list(&record.additional_control_items))
        || has_text(&record.storage_requirements)
        || has_text(&record.health_surveillance)
}

pub fn control_measures(
    sink: &mut dyn DocumentSink,
    record: &AssessmentRecord,
    theme: &StyleTheme,
    cursor: LayoutCursor,
) -> LayoutCursor {
    let rows = [
        ("Control Measures", record.control_measures.clone()),
        ("Additional Controls", bullet_list(&record.additional_control_items)),
        ("Storage Requirements", record.storage_requirements.clone()),
        ("Health Surveillance", record.health_surveillance.clone()),
    ];
    key_value_section(sink, "Control Measures", &rows, theme, cursor)
}

pub fn has_emergency_procedures(record: &AssessmentRecord) -> bool {
    [
        &record.first_aid_measures,
        &record.spillage_procedure,
        &record.fire_fighting_measures,
        &record.disposal_procedure,
    ]
    .iter()
    .any(|v| has_text(v))
}

pub fn emergency_procedures(
    sink: &mut dyn DocumentSink,
    record: &AssessmentRecord,
    theme: &StyleTheme,
    cursor: LayoutCursor,
) -> LayoutCursor {
    let rows = [
        ("First Aid", record.first_aid_measures.clone()),
        ("Spillage", record.spillage_procedure.clone()),
        ("Fire Fighting", record.fire_fighting_measures.clone()),
        ("Disposal", record.disposal_procedure.clone()),
    ];
    key_value_section(sink, "Emergency Procedures", &rows, theme, cursor)
}

pub fn comments(
    sink: &mut dyn DocumentSink,
    record: &AssessmentRecord,
    theme: &StyleTheme,
    cursor: LayoutCursor,
) -> LayoutCursor {
    key_value_section(sink, "Comments", &[("Comments", record.comments.clone())], theme, cursor)
}

/// The fixed five-question table. Always printed.
pub fn assessor_summary(
    sink: &mut dyn DocumentSink,
    record: &AssessmentRecord,
    theme: &StyleTheme,
    cursor: LayoutCursor,
) -> LayoutCursor {
    let mut table = titled_table(sink, "Assessor Summary", &[100.0, 18.0, 64.0], theme).with_head(Row::new(vec![
        Cell::label("Question", theme),
        Cell::label("Answer", theme),
        Cell::label("Action Required", theme),
    ]));
    for (question, (answer, action)) in ASSESSOR_QUESTIONS.iter().zip(record.assessor_answers.pairs()) {
        table.push(Row::new(vec![
            Cell::text(*question),
            Cell::text(yes_no_or_na(answer)).centered(),
            Cell::text(or_na(action)),
        ]));
    }
    finish(sink, &table, cursor)
}

pub fn conclusion_text(conclusion: &str) -> String {
    match conclusion.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
        "adequate" => "Adequate - the current control measures are sufficient".to_string(),
        "inadequate" | "further_action" | "further_action_required" => {
            "Inadequate - further control measures are required".to_string()
        }
        _ => conclusion.trim().to_string(),
    }
}

pub fn conclusion(
    sink: &mut dyn DocumentSink,
    record: &AssessmentRecord,
    theme: &StyleTheme,
    cursor: LayoutCursor,
) -> LayoutCursor {
    if !has_text(&record.assessment_conclusion) {
        return cursor;
    }
    let mut table: Table = key_value_table(sink, "Assessment Conclusion", theme);
    table.push(key_value_row("Conclusion", &conclusion_text(&record.assessment_conclusion), theme));
    table.push(key_value_row("Assessed By", &record.assessor_name, theme));
    finish(sink, &table, cursor)
}

/// Meta lines printed in the right-hand header column.
pub fn meta_lines(record: &AssessmentRecord) -> Vec<String> {
    vec![
        format!("Reference: {}", or_na(&record.product_code)),
        format!("Assessment Date: {}", format_date(&record.assessment_date)),
        format!("Review Date: {}", format_date(&record.review_date)),
        format!("Assessor: {}", or_na(&record.assessor_name)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::EmbeddedImage;
    use crate::sink::testing::RecordingSink;
    use crate::table::CellContent;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    type Builder = fn(&mut dyn DocumentSink, &AssessmentRecord, &StyleTheme, LayoutCursor) -> LayoutCursor;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn icon(label: &str) -> ResolvedImage {
        ResolvedImage {
            label: label.to_string(),
            image: Some(EmbeddedImage { width: 2, height: 2, pixels: Arc::from(vec![0u8; 12]) }),
            valid_until: None,
        }
    }

    #[test]
    fn optional_sections_leave_cursor_alone_when_empty() {
        let record = AssessmentRecord::default();
        let theme = StyleTheme::default();
        let cursor = LayoutCursor::at(42.0);
        let builders: [(&str, Builder); 9] = [
            ("substance_details", substance_details),
            ("chemical_properties", chemical_properties),
            ("ingredients", ingredients),
            ("exposure_limits", exposure_limits),
            ("usage_frequency", usage_frequency),
            ("control_measures", control_measures),
            ("emergency_procedures", emergency_procedures),
            ("comments", comments),
            ("conclusion", conclusion),
        ];
        for (name, build) in builders {
            let mut sink = RecordingSink::portrait();
            assert_eq!(build(&mut sink, &record, &theme, cursor), cursor, "{name}");
            assert!(sink.is_empty(), "{name} drew something");
        }
        let mut sink = RecordingSink::portrait();
        assert_eq!(ppe_grid(&mut sink, &record, &[], &theme, cursor), cursor);
        assert_eq!(hazard_grid(&mut sink, &record, &[], &theme, cursor), cursor);
        assert!(sink.is_empty());
    }

    #[test]
    fn grid_has_ceil_n_over_four_rows_padded_to_four() {
        for n in 1..=9 {
            let items: Vec<String> = (0..n).map(|i| format!("Item {i}")).collect();
            let rows = grid_rows(&items, &[]);
            assert_eq!(rows.len(), (n + 3) / 4, "n={n}");
            assert!(rows.iter().all(|r| r.cells.len() == 4));
            let padding = rows.last().unwrap().cells.iter().filter(|c| c.content == CellContent::Empty).count();
            assert_eq!(padding, (4 - n % 4) % 4, "n={n}");
        }
    }

    #[test]
    fn failed_icon_falls_back_to_label_without_shifting_siblings() {
        let items = labels(&["Hard Hat", "Safety Gloves", "Dust Mask"]);
        let icons = vec![icon("Hard Hat"), ResolvedImage::text_only("Safety Gloves"), icon("Dust Mask")];
        let row = &grid_rows(&items, &icons)[0];
        assert!(matches!(&row.cells[0].content, CellContent::Image { caption, .. } if caption == "Hard Hat"));
        assert_eq!(row.cells[1].content, CellContent::Text("Safety Gloves".into()));
        assert!(matches!(&row.cells[2].content, CellContent::Image { caption, .. } if caption == "Dust Mask"));
        assert_eq!(row.cells[3].content, CellContent::Empty);
    }

    #[test]
    fn encoded_ppe_renders_one_padded_row() {
        let record: AssessmentRecord =
            serde_json::from_value(serde_json::json!({"selected_ppe": "[\"Hard Hat\",\"Safety Gloves\"]"})).unwrap();
        let icons = vec![icon("Hard Hat"), icon("Safety Gloves")];
        let rows = grid_rows(&record.selected_ppe, &icons);
        assert_eq!(rows.len(), 1);
        let empties = rows[0].cells.iter().filter(|c| c.content == CellContent::Empty).count();
        assert_eq!(empties, 2);

        let mut sink = RecordingSink::portrait();
        let theme = StyleTheme::default();
        let next = ppe_grid(&mut sink, &record, &icons, &theme, LayoutCursor::at(40.0));
        assert!(next.y() > 40.0);
        assert_eq!(sink.images(), 2);
        assert!(!sink.contains_text("PPE Location"));
    }

    #[test]
    fn ppe_location_note_renders_without_icons() {
        let record = AssessmentRecord { ppe_location: "Site cabin".into(), ..Default::default() };
        let mut sink = RecordingSink::portrait();
        ppe_grid(&mut sink, &record, &[], &StyleTheme::default(), LayoutCursor::at(40.0));
        assert!(sink.contains_text("PPE Location"));
        assert!(sink.contains_text("Site cabin"));
    }

    #[test]
    fn assessor_summary_always_renders_five_questions() {
        let record = AssessmentRecord::default();
        let mut sink = RecordingSink::portrait();
        let next = assessor_summary(&mut sink, &record, &StyleTheme::default(), LayoutCursor::at(30.0));
        assert!(next.y() > 30.0);
        for q in ASSESSOR_QUESTIONS {
            assert!(sink.texts().iter().any(|t| q.starts_with(*t)), "missing {q}");
        }
        // five answers and five actions
        assert_eq!(sink.texts().iter().filter(|t| **t == "N/A").count(), 10);
    }

    #[test]
    fn narrative_fields_print_na_when_section_has_content() {
        let record = AssessmentRecord { first_aid_measures: "Rinse eyes with water".into(), ..Default::default() };
        let mut sink = RecordingSink::portrait();
        emergency_procedures(&mut sink, &record, &StyleTheme::default(), LayoutCursor::at(30.0));
        assert!(sink.contains_text("Rinse eyes with water"));
        assert_eq!(sink.texts().iter().filter(|t| **t == "N/A").count(), 3);
    }

    #[test]
    fn hazard_level_alone_renders_details() {
        let record = AssessmentRecord { hazard_level: "High".into(), ..Default::default() };
        let mut sink = RecordingSink::portrait();
        let next = substance_details(&mut sink, &record, &StyleTheme::default(), LayoutCursor::at(30.0));
        assert!(next.y() > 30.0);
        assert!(sink.contains_text("High"));
    }

    #[test]
    fn conclusion_codes_are_spelled_out() {
        assert_eq!(conclusion_text("adequate"), "Adequate - the current control measures are sufficient");
        assert_eq!(conclusion_text("Further action"), "Inadequate - further control measures are required");
        assert_eq!(conclusion_text("Refer to manager"), "Refer to manager");
    }

    #[test]
    fn additional_controls_become_bullets() {
        let record = AssessmentRecord {
            additional_control_items: labels(&["Local exhaust ventilation", "Signage"]),
            ..Default::default()
        };
        assert!(has_control_measures(&record));
        let mut sink = RecordingSink::portrait();
        control_measures(&mut sink, &record, &StyleTheme::default(), LayoutCursor::at(30.0));
        assert!(sink.contains_text("- Local exhaust ventilation"));
        assert!(sink.contains_text("- Signage"));
    }
}
