//! Vertical layout state and the page-break policy applied between sections.
//!
//! All positions are millimetres from the top edge of the current page.

use crate::sink::DocumentSink;

pub const TOP_MARGIN: f32 = 20.0;
pub const BOTTOM_MARGIN: f32 = 20.0;
pub const SIDE_MARGIN: f32 = 14.0;
pub const SECTION_GAP: f32 = 10.0;

/// Where the next block starts on the current page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    y: f32,
}

impl LayoutCursor {
    pub fn at(y: f32) -> Self {
        Self { y }
    }

    pub fn top() -> Self {
        Self::at(TOP_MARGIN)
    }

    pub fn y(self) -> f32 {
        self.y
    }

    /// Cursor for the block following one that ended at `final_y`.
    pub fn below(final_y: f32) -> Self {
        Self::at(final_y + SECTION_GAP)
    }
}

/// Sections preceded by a page-break check in an assessment document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakPoint {
    ControlMeasures,
    EmergencyProcedures,
    Comments,
    AssessorSummary,
    Conclusion,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBreakRule {
    pub section: BreakPoint,
    /// Cursor position beyond which the section starts on a fresh page.
    pub threshold: f32,
    /// Only break when the section will actually render.
    pub requires_content: bool,
}

/// Per-section break thresholds. These are tuned for A4 portrait with the
/// table metrics in [`crate::table`]; a taller section gets a lower threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct PageBreakPolicy {
    rules: Vec<PageBreakRule>,
}

impl Default for PageBreakPolicy {
    fn default() -> Self {
        use BreakPoint::*;
        let rule = |section, threshold, requires_content| PageBreakRule { section, threshold, requires_content };
        Self {
            rules: vec![
                rule(ControlMeasures, 200.0, false),
                rule(EmergencyProcedures, 220.0, true),
                rule(Comments, 230.0, true),
                rule(AssessorSummary, 180.0, false),
                rule(Conclusion, 240.0, true),
            ],
        }
    }
}

impl PageBreakPolicy {
    pub fn rule(&self, section: BreakPoint) -> Option<&PageBreakRule> {
        self.rules.iter().find(|r| r.section == section)
    }

    pub fn with_threshold(mut self, section: BreakPoint, threshold: f32) -> Self {
        match self.rules.iter_mut().find(|r| r.section == section) {
            Some(rule) => rule.threshold = threshold,
            None => self.rules.push(PageBreakRule { section, threshold, requires_content: true }),
        }
        self
    }

    pub fn should_break(&self, section: BreakPoint, cursor: LayoutCursor, has_content: bool) -> bool {
        self.rule(section)
            .map(|r| (has_content || !r.requires_content) && cursor.y() > r.threshold)
            .unwrap_or(false)
    }

    /// Starts a new page when the rule for `section` says so.
    pub fn apply(
        &self,
        sink: &mut dyn DocumentSink,
        section: BreakPoint,
        cursor: LayoutCursor,
        has_content: bool,
    ) -> LayoutCursor {
        if self.should_break(section, cursor, has_content) {
            tracing::debug!(?section, y = cursor.y(), "page break before section");
            sink.add_page();
            LayoutCursor::top()
        } else {
            cursor
        }
    }
}
