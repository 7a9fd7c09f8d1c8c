//! Document assembly: fetch the letterhead, resolve pictograms, then lay out
//! every section in order and encode the result.
//!
//! Generation is split in two phases. All network work (settings, logo,
//! icons) happens first and produces plain data; the layout pass that
//! follows is synchronous and runs on the blocking pool, so row placement
//! never waits on I/O.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::embed::{decode_image, encode_data_url};
use crate::error::ReportError;
use crate::header::{draw_header, stamp_footers, Letterhead};
use crate::icons::{IconResolver, ResolvedImage};
use crate::layout::{BreakPoint, LayoutCursor, PageBreakPolicy};
use crate::models::{AssessmentRecord, SubstanceRegisterRecord};
use crate::pdf::{Orientation, PdfSink};
use crate::sections::{assessment, register};
use crate::settings::CompanySettingsProvider;
use crate::sink::DocumentSink;
use crate::storage::ImageFetcher;
use crate::theme::StyleTheme;

pub const ASSESSMENT_TITLE: &str = "COSHH Risk Assessment";
pub const REGISTER_TITLE: &str = "COSHH Substance Register";

/// Pictograms resolved for one assessment, in the order of the record's lists.
#[derive(Debug, Clone, Default)]
pub struct AssessmentIcons {
    pub ppe: Vec<ResolvedImage>,
    pub hazards: Vec<ResolvedImage>,
}

#[derive(Clone)]
pub struct ReportGenerator {
    settings: Arc<dyn CompanySettingsProvider>,
    ppe: IconResolver,
    hazards: IconResolver,
    fetcher: Arc<dyn ImageFetcher>,
    theme: StyleTheme,
    policy: PageBreakPolicy,
}

impl ReportGenerator {
    pub fn new(
        settings: Arc<dyn CompanySettingsProvider>,
        ppe: IconResolver,
        hazards: IconResolver,
        fetcher: Arc<dyn ImageFetcher>,
    ) -> Self {
        Self {
            settings,
            ppe,
            hazards,
            fetcher,
            theme: StyleTheme::default(),
            policy: PageBreakPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: PageBreakPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Missing settings abort generation; a broken logo only drops the logo.
    async fn letterhead(&self) -> Result<Letterhead, ReportError> {
        let settings = self.settings.fetch().await?.ok_or_else(|| {
            ReportError::MissingCompanySettings("add company details before generating reports".into())
        })?;

        let logo = match settings.logo_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => match self.fetcher.fetch(url).await.and_then(|b| decode_image(&b)) {
                Ok(image) => Some(image),
                Err(e) => {
                    warn!("⚠️ Company logo unavailable, continuing without it: {}", e);
                    None
                }
            },
            None => None,
        };
        Ok(Letterhead { settings, logo })
    }

    /// Renders an assessment and returns it as a PDF data URL.
    pub async fn assessment_pdf(&self, record: &AssessmentRecord) -> Result<String, ReportError> {
        let report_id = Uuid::new_v4();
        let span = info_span!("assessment_report", %report_id, substance = %record.substance_name);
        async move {
            info!("📄 Generating assessment report");
            let letterhead = self.letterhead().await?;
            let icons = AssessmentIcons {
                ppe: self.ppe.resolve_grid(&record.selected_ppe).await,
                hazards: self.hazards.resolve_grid(&record.selected_hazards).await,
            };
            debug!(
                ppe = icons.ppe.iter().filter(|i| i.is_resolved()).count(),
                hazards = icons.hazards.iter().filter(|i| i.is_resolved()).count(),
                "icons resolved"
            );

            let record = record.clone();
            let theme = self.theme;
            let policy = self.policy.clone();
            let bytes = render_blocking(move || {
                let mut sink = PdfSink::new(ASSESSMENT_TITLE, Orientation::Portrait)?;
                compose_assessment(&mut sink, &record, &letterhead, &icons, &theme, &policy);
                let pages = sink.page_count();
                let bytes = sink.finalize()?;
                info!(pages, bytes = bytes.len(), "✅ Assessment report rendered");
                Ok(bytes)
            })
            .await?;
            Ok(encode_data_url(&bytes))
        }
        .instrument(span)
        .await
    }

    /// Renders the substance register and returns it as a PDF data URL.
    pub async fn register_pdf(&self, records: &[SubstanceRegisterRecord]) -> Result<String, ReportError> {
        let report_id = Uuid::new_v4();
        let span = info_span!("register_report", %report_id, substances = records.len());
        async move {
            info!("📄 Generating substance register");
            let letterhead = self.letterhead().await?;

            let records = records.to_vec();
            let theme = self.theme;
            let generated_on = Utc::now().format("%Y-%m-%d").to_string();
            let bytes = render_blocking(move || {
                let mut sink = PdfSink::new(REGISTER_TITLE, Orientation::Landscape)?;
                compose_register(&mut sink, &records, &letterhead, &generated_on, &theme);
                let pages = sink.page_count();
                let bytes = sink.finalize()?;
                info!(pages, bytes = bytes.len(), "✅ Substance register rendered");
                Ok(bytes)
            })
            .await?;
            Ok(encode_data_url(&bytes))
        }
        .instrument(span)
        .await
    }
}

/// Runs the layout pass off the async workers. A panic inside the rendering
/// library comes back as a render error.
async fn render_blocking<F>(render: F) -> Result<Vec<u8>, ReportError>
where
    F: FnOnce() -> Result<Vec<u8>, ReportError> + Send + 'static,
{
    let span = tracing::Span::current();
    let result = tokio::task::spawn_blocking(move || span.in_scope(render))
        .await
        .map_err(|e| ReportError::Render(format!("render task failed: {}", e)))
        .and_then(|r| r);
    if let Err(e) = &result {
        error!("❌ {}", e);
    }
    result
}

/// Lays out a full assessment in print order.
pub fn compose_assessment(
    sink: &mut dyn DocumentSink,
    record: &AssessmentRecord,
    letterhead: &Letterhead,
    icons: &AssessmentIcons,
    theme: &StyleTheme,
    policy: &PageBreakPolicy,
) {
    let mut cursor: LayoutCursor =
        draw_header(sink, letterhead, ASSESSMENT_TITLE, &assessment::meta_lines(record), theme);

    cursor = assessment::substance_details(sink, record, theme, cursor);
    cursor = assessment::chemical_properties(sink, record, theme, cursor);
    cursor = assessment::ingredients(sink, record, theme, cursor);
    cursor = assessment::ppe_grid(sink, record, &icons.ppe, theme, cursor);
    cursor = assessment::hazard_grid(sink, record, &icons.hazards, theme, cursor);
    cursor = assessment::exposure_limits(sink, record, theme, cursor);
    cursor = assessment::usage_frequency(sink, record, theme, cursor);

    cursor = policy.apply(sink, BreakPoint::ControlMeasures, cursor, assessment::has_control_measures(record));
    cursor = assessment::control_measures(sink, record, theme, cursor);

    cursor = policy.apply(
        sink,
        BreakPoint::EmergencyProcedures,
        cursor,
        assessment::has_emergency_procedures(record),
    );
    cursor = assessment::emergency_procedures(sink, record, theme, cursor);

    cursor = policy.apply(sink, BreakPoint::Comments, cursor, !record.comments.trim().is_empty());
    cursor = assessment::comments(sink, record, theme, cursor);

    cursor = policy.apply(sink, BreakPoint::AssessorSummary, cursor, true);
    cursor = assessment::assessor_summary(sink, record, theme, cursor);

    cursor = policy.apply(
        sink,
        BreakPoint::Conclusion,
        cursor,
        !record.assessment_conclusion.trim().is_empty(),
    );
    cursor = assessment::conclusion(sink, record, theme, cursor);
    debug!(final_y = cursor.y(), pages = sink.page_count(), "assessment composed");

    stamp_footers(sink, &letterhead.settings, theme);
}

/// Lays out the register: header, the substances table, then the category counts.
pub fn compose_register(
    sink: &mut dyn DocumentSink,
    records: &[SubstanceRegisterRecord],
    letterhead: &Letterhead,
    generated_on: &str,
    theme: &StyleTheme,
) {
    let mut cursor = draw_header(
        sink,
        letterhead,
        REGISTER_TITLE,
        &register::meta_lines(records, generated_on),
        theme,
    );
    cursor = register::substances_table(sink, records, theme, cursor);
    cursor = register::category_breakdown(sink, records, theme, cursor);
    debug!(final_y = cursor.y(), pages = sink.page_count(), "register composed");

    stamp_footers(sink, &letterhead.settings, theme);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icons::fakes::{FakeBucket, FakeFetcher};
    use crate::icons::{HAZARD_ICONS, PPE_ICONS};
    use crate::models::CompanySettings;
    use crate::settings::StaticCompanySettings;
    use crate::sink::testing::{Op, RecordingSink};

    fn letterhead() -> Letterhead {
        Letterhead {
            settings: CompanySettings { name: "Acme Build Ltd".into(), ..Default::default() },
            logo: None,
        }
    }

    fn generator(settings: Option<CompanySettings>) -> ReportGenerator {
        let fetcher: Arc<dyn ImageFetcher> = Arc::new(FakeFetcher::default());
        ReportGenerator::new(
            Arc::new(StaticCompanySettings(settings)),
            IconResolver::new(&PPE_ICONS, Arc::new(FakeBucket::default()), fetcher.clone()),
            IconResolver::new(&HAZARD_ICONS, Arc::new(FakeBucket::default()), fetcher.clone()),
            fetcher,
        )
    }

    fn first_page_of(sink: &RecordingSink, needle: &str) -> Option<usize> {
        sink.ops.iter().find_map(|op| match op {
            Op::Text { page, text, .. } if text == needle => Some(*page),
            _ => None,
        })
    }

    #[test]
    fn empty_conclusion_is_omitted_but_summary_stays() {
        let record = AssessmentRecord { substance_name: "Cement".into(), ..Default::default() };
        let mut sink = RecordingSink::portrait();
        compose_assessment(
            &mut sink,
            &record,
            &letterhead(),
            &AssessmentIcons::default(),
            &StyleTheme::default(),
            &PageBreakPolicy::default(),
        );
        assert!(sink.contains_text("Assessor Summary"));
        assert!(!sink.contains_text("Assessment Conclusion"));
        assert!(sink.contains_text("Page 1 of 1"));
    }

    #[test]
    fn sections_print_in_order() {
        let record = AssessmentRecord {
            substance_name: "Cement".into(),
            substance_form: "Powder".into(),
            control_measures: "Damp down".into(),
            first_aid_measures: "Rinse".into(),
            comments: "None".into(),
            assessment_conclusion: "adequate".into(),
            ..Default::default()
        };
        let mut sink = RecordingSink::portrait();
        compose_assessment(
            &mut sink,
            &record,
            &letterhead(),
            &AssessmentIcons::default(),
            &StyleTheme::default(),
            &PageBreakPolicy::default(),
        );
        let order = [
            "Substance Details",
            "Chemical Properties",
            "Control Measures",
            "Emergency Procedures",
            "Comments",
            "Assessor Summary",
            "Assessment Conclusion",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|title| sink.texts().iter().position(|t| t == title).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn assessor_summary_moves_to_new_page_past_threshold() {
        let record = AssessmentRecord { substance_name: "Cement".into(), ..Default::default() };
        let compose = |policy: &PageBreakPolicy| {
            let mut sink = RecordingSink::portrait();
            compose_assessment(
                &mut sink,
                &record,
                &letterhead(),
                &AssessmentIcons::default(),
                &StyleTheme::default(),
                policy,
            );
            sink
        };

        let default = compose(&PageBreakPolicy::default());
        assert_eq!(first_page_of(&default, "Assessor Summary"), Some(0));
        assert_eq!(default.page_count(), 1);

        let tight = compose(&PageBreakPolicy::default().with_threshold(BreakPoint::AssessorSummary, 50.0));
        assert_eq!(first_page_of(&tight, "Assessor Summary"), Some(1));
        assert_eq!(tight.page_count(), 2);
        assert!(tight.contains_text("Page 2 of 2"));
    }

    #[test]
    fn register_without_substances_has_header_and_table_only() {
        let mut sink = RecordingSink::landscape();
        compose_register(&mut sink, &[], &letterhead(), "2024-06-01", &StyleTheme::default());
        assert!(sink.contains_text(REGISTER_TITLE));
        assert!(sink.contains_text("Total Substances: 0"));
        assert!(sink.contains_text("Generated: 01/06/2024"));
        assert!(sink.contains_text("Substances"));
        assert!(!sink.contains_text("Category Breakdown"));
    }

    #[tokio::test]
    async fn missing_settings_fail_before_rendering() {
        let err = generator(None).assessment_pdf(&AssessmentRecord::default()).await.unwrap_err();
        assert!(matches!(err, ReportError::MissingCompanySettings(_)));
        let err = generator(None).register_pdf(&[]).await.unwrap_err();
        assert!(err.is_precondition());
    }

    #[tokio::test]
    async fn produces_pdf_data_url() {
        let settings = CompanySettings { name: "Acme Build Ltd".into(), ..Default::default() };
        let record = AssessmentRecord {
            substance_name: "Cement".into(),
            selected_ppe: vec!["Hard Hat".into(), "Unknown Kit".into()],
            selected_hazards: vec!["Corrosive".into()],
            ..Default::default()
        };
        let url = generator(Some(settings)).assessment_pdf(&record).await.unwrap();
        assert!(url.starts_with("data:application/pdf;base64,JVBER"));
    }
}
