use serde::{Deserialize, Serialize};

/// Number of wizard steps. The schema partitions every field into exactly one step.
pub const STEP_COUNT: usize = 4;

/// Display metadata for one wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepInfo {
    pub title: &'static str,
    pub description: &'static str,
}

/// Step headings shown by the production form, reused by the CLI walkthrough.
pub const STEPS: [StepInfo; STEP_COUNT] = [
    StepInfo {
        title: "الشروط والجاهزية",
        description: "تأكيد المتطلبات التقنية",
    },
    StepInfo {
        title: "البيانات الشخصية",
        description: "معلومات التواصل",
    },
    StepInfo {
        title: "المؤهلات",
        description: "إجازات ودورات",
    },
    StepInfo {
        title: "الخبرة والمنهجية",
        description: "طريقة التدريس",
    },
];

/// Options offered for marital status in the interactive step.
///
/// The validated set in the schema accepts only three of these five literals
/// ("مخطوبة" and "متزوجة وحامل" are shown but rejected at validation time).
/// TODO: reconcile the offered options with the accepted set together with the
/// hiring team before widening or narrowing either list.
pub const MARITAL_STATUS_CHOICES: [&str; 5] =
    ["آنسة", "مخطوبة", "متزوجة", "متزوجة وحامل", "مطلقة-أرملة"];

/// The normalized application record produced by full validation.
///
/// Field names match the wire names of the public form one-to-one; the struct
/// serializes back into exactly the shape the spreadsheet webhook expects.
/// Numeric fields are typed after the digits-only check, everything else stays
/// a trimmed string carrying the accepted literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherApplication {
    // الشروط الأساسية والجاهزية التقنية
    pub agree_all_conditions: String,
    pub available_1_to_8: String,
    pub internet_type: String,
    pub device_type: String,
    pub can_use_tools: String,
    pub agree_no_direct_contact: String,

    // البيانات الشخصية
    pub full_name_3: String,
    pub age: u32,
    pub marital_status: String,
    pub whatsapp_number: String,
    pub education: String,
    pub finished_study: String,

    // المؤهلات القرآنية والعلمية
    pub ijazat_and_courses: String,
    pub ijazah_hafs: String,
    pub ijazah_tajweed: String,
    pub can_teach_tajweed: String,
    pub can_teach_noor_al_bayan: String,
    pub other_subjects: String,

    // الخبرة والمنهجية التعليمية
    pub online_years: u32,
    pub kids_years: u32,
    pub good_with_kids: String,
    pub teaching_age_from: String,
    pub preferred_students: String,
    pub academies_worked_with: String,
    pub session_plan: String,
    pub agree_no_stopping_students_policy: String,
}
