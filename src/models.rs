use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::fields;

#[serde_as]
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct IngredientRow {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default, alias = "ingredient_name")]
    pub name: String,
    /// 8-hour TWA workplace exposure limit.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default, alias = "wel_twa")]
    pub wel_long_term: String,
    /// 15-minute STEL workplace exposure limit.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default, alias = "wel_stel")]
    pub wel_short_term: String,
}

/// A COSHH assessment as persisted. List-typed columns are normalized while
/// deserializing, see [`crate::fields`].
#[serde_as]
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AssessmentRecord {
    #[serde_as(as = "DefaultOnNull")]
    pub substance_name: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(alias = "reference_code")]
    pub product_code: String,
    #[serde_as(as = "DefaultOnNull")]
    pub supplier: String,
    #[serde_as(as = "DefaultOnNull")]
    pub description: String,
    #[serde_as(as = "DefaultOnNull")]
    pub hazard_level: String,

    #[serde_as(as = "DefaultOnNull")]
    pub substance_form: String,
    #[serde_as(as = "DefaultOnNull")]
    pub odour: String,
    #[serde_as(as = "DefaultOnNull")]
    pub colour: String,

    #[serde(deserialize_with = "fields::ingredient_list")]
    pub ingredients: Vec<IngredientRow>,

    #[serde(deserialize_with = "fields::list")]
    pub selected_ppe: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub ppe_location: String,
    #[serde(deserialize_with = "fields::list")]
    pub selected_hazards: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub hazards_to_health: String,

    #[serde(deserialize_with = "fields::list")]
    pub persons_at_risk: Vec<String>,
    #[serde(deserialize_with = "fields::list")]
    pub routes_of_entry: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub long_term_exposure_limit: String,
    #[serde_as(as = "DefaultOnNull")]
    pub short_term_exposure_limit: String,

    #[serde_as(as = "DefaultOnNull")]
    pub method_of_use: String,
    #[serde_as(as = "DefaultOnNull")]
    pub site_of_use: String,
    #[serde_as(as = "DefaultOnNull")]
    pub frequency_of_use: String,
    #[serde_as(as = "DefaultOnNull")]
    pub duration_of_use: String,
    #[serde_as(as = "DefaultOnNull")]
    pub quantity_used: String,

    #[serde_as(as = "DefaultOnNull")]
    pub control_measures: String,
    #[serde(deserialize_with = "fields::list")]
    pub additional_control_items: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub storage_requirements: String,
    #[serde_as(as = "DefaultOnNull")]
    pub health_surveillance: String,

    #[serde_as(as = "DefaultOnNull")]
    pub first_aid_measures: String,
    #[serde_as(as = "DefaultOnNull")]
    pub spillage_procedure: String,
    #[serde_as(as = "DefaultOnNull")]
    pub fire_fighting_measures: String,
    #[serde_as(as = "DefaultOnNull")]
    pub disposal_procedure: String,

    #[serde_as(as = "DefaultOnNull")]
    pub comments: String,

    #[serde(flatten)]
    pub assessor_answers: AssessorAnswers,

    #[serde_as(as = "DefaultOnNull")]
    pub assessment_conclusion: String,
    #[serde_as(as = "DefaultOnNull")]
    pub assessor_name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub assessment_date: String,
    #[serde_as(as = "DefaultOnNull")]
    pub review_date: String,
}

/// The five fixed assessor questions, each a yes/no with an optional action note.
#[serde_as]
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AssessorAnswers {
    #[serde(deserialize_with = "fields::yes_no")]
    pub q1_answer: Option<bool>,
    #[serde_as(as = "DefaultOnNull")]
    pub q1_action: String,
    #[serde(deserialize_with = "fields::yes_no")]
    pub q2_answer: Option<bool>,
    #[serde_as(as = "DefaultOnNull")]
    pub q2_action: String,
    #[serde(deserialize_with = "fields::yes_no")]
    pub q3_answer: Option<bool>,
    #[serde_as(as = "DefaultOnNull")]
    pub q3_action: String,
    #[serde(deserialize_with = "fields::yes_no")]
    pub q4_answer: Option<bool>,
    #[serde_as(as = "DefaultOnNull")]
    pub q4_action: String,
    #[serde(deserialize_with = "fields::yes_no")]
    pub q5_answer: Option<bool>,
    #[serde_as(as = "DefaultOnNull")]
    pub q5_action: String,
}

impl AssessorAnswers {
    pub fn pairs(&self) -> [(Option<bool>, &str); 5] {
        [
            (self.q1_answer, &self.q1_action),
            (self.q2_answer, &self.q2_action),
            (self.q3_answer, &self.q3_action),
            (self.q4_answer, &self.q4_action),
            (self.q5_answer, &self.q5_action),
        ]
    }
}

#[serde_as]
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SubstanceRegisterRecord {
    #[serde_as(as = "DefaultOnNull")]
    pub substance_name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub manufacturer: String,
    #[serde(deserialize_with = "fields::list", alias = "categories")]
    pub category: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub storage_location: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(alias = "coshh_sheet_location")]
    pub safety_data_sheet_location: String,
    #[serde_as(as = "DefaultOnNull")]
    pub date_added: String,
    #[serde_as(as = "DefaultOnNull")]
    pub date_reviewed: String,
    #[serde_as(as = "DefaultOnNull")]
    pub next_review_date: String,
    #[serde_as(as = "DefaultOnNull")]
    pub auditor_name: String,
}

/// Letterhead details shown in every document header and footer.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CompanySettings {
    pub name: String,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub town: Option<String>,
    pub county: Option<String>,
    pub postcode: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub logo_url: Option<String>,
    pub company_number: Option<String>,
    pub vat_number: Option<String>,
}

impl CompanySettings {
    /// Name first, then every present address and contact line.
    pub fn info_lines(&self) -> Vec<String> {
        let locality = [&self.county, &self.postcode]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let mut lines = vec![self.name.clone()];
        for part in [&self.address_line1, &self.address_line2, &self.town].into_iter().flatten() {
            if !part.trim().is_empty() {
                lines.push(part.trim().to_string());
            }
        }
        if !locality.is_empty() {
            lines.push(locality);
        }
        if let Some(phone) = self.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            lines.push(format!("Tel: {}", phone.trim()));
        }
        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            lines.push(format!("Email: {}", email.trim()));
        }
        lines
    }

    pub fn footer_line(&self) -> String {
        let mut parts = vec![self.name.clone()];
        if let Some(n) = self.company_number.as_deref().filter(|n| !n.trim().is_empty()) {
            parts.push(format!("Company No: {}", n.trim()));
        }
        if let Some(v) = self.vat_number.as_deref().filter(|v| !v.trim().is_empty()) {
            parts.push(format!("VAT No: {}", v.trim()));
        }
        parts.join(" | ")
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReportResponse {
    pub data_url: String,
}
