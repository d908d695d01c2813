//! Shared validation schema for the teacher application form.
//!
//! One declarative rule table drives both validation modes: the wizard checks a
//! single step's fields before advancing (`check_step`), while the submission
//! endpoint validates the whole record and produces the normalized
//! [`TeacherApplication`] (`parse_full`). Because both modes walk the same
//! table, a record that satisfies every step also satisfies the full check.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use super::domain::TeacherApplication;

const YES_NO: &[&str] = &["نعم", "لا"];
const YES_NO_MESSAGE: &str = "من فضلك اختاري نعم أو لا.";

/// Validation rule attached to a single field.
#[derive(Debug, Clone, Copy)]
pub(crate) enum FieldRule {
    /// Trimmed free text with a minimum character count.
    Text { min_chars: usize },
    /// Trimmed free text, may be empty.
    OptionalText,
    /// Must be one of a fixed set of literals.
    Choice {
        options: &'static [&'static str],
        message: &'static str,
    },
    /// Must equal exactly one accepted literal (hard gate).
    Gate {
        accepted: &'static str,
        message: &'static str,
    },
    /// ASCII-digits-only input parsed to an integer within an inclusive range.
    Digits { min: u32, max: u32 },
    /// WhatsApp number: optional leading `+`, then 10-15 ASCII digits.
    Phone,
}

/// One entry of the schema: wire name, owning wizard step, label for messages,
/// and the rule itself.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldSpec {
    pub(crate) name: &'static str,
    pub(crate) step: usize,
    pub(crate) label: &'static str,
    pub(crate) rule: FieldRule,
}

/// The full schema, ordered by step then by on-screen position.
pub(crate) const SCHEMA: &[FieldSpec] = &[
    // الخطوة 1: الشروط الأساسية والجاهزية التقنية
    FieldSpec {
        name: "agree_all_conditions",
        step: 0,
        label: "الموافقة على الشروط",
        rule: FieldRule::Gate {
            accepted: "نعم، موافقة ومتوفرة لدي",
            message: "لا يمكن إرسال الطلب دون الموافقة على جميع الشروط المذكورة.",
        },
    },
    FieldSpec {
        name: "available_1_to_8",
        step: 0,
        label: "التفرغ من 1 إلى 8",
        rule: FieldRule::Choice {
            options: YES_NO,
            message: "من فضلك اختاري إجابة صحيحة.",
        },
    },
    FieldSpec {
        name: "internet_type",
        step: 0,
        label: "نوع الإنترنت",
        rule: FieldRule::Choice {
            options: &["واي فاي منزلي (Wi-Fi)", "باقة بيانات (Data)", "كلاهما"],
            message: "من فضلك اختاري نوع الإنترنت من الخيارات.",
        },
    },
    FieldSpec {
        name: "device_type",
        step: 0,
        label: "نوع الجهاز",
        rule: FieldRule::Choice {
            options: &["هاتف", "لابتوب / كمبيوتر", "تابلت"],
            message: "من فضلك اختاري نوع الجهاز من الخيارات.",
        },
    },
    FieldSpec {
        name: "can_use_tools",
        step: 0,
        label: "استخدام أدوات زووم/ميت/السبورة",
        rule: FieldRule::Gate {
            accepted: "نعم",
            message: "يشترط القدرة على استخدام زووم/ميت/السبورة/مشاركة الشاشة.",
        },
    },
    FieldSpec {
        name: "agree_no_direct_contact",
        step: 0,
        label: "الموافقة على سياسة عدم التواصل المباشر",
        rule: FieldRule::Gate {
            accepted: "موافقة",
            message: "يلزم الموافقة على سياسة عدم التواصل المباشر.",
        },
    },
    // الخطوة 2: البيانات الشخصية
    FieldSpec {
        name: "full_name_3",
        step: 1,
        label: "الاسم الثلاثي",
        rule: FieldRule::Text { min_chars: 3 },
    },
    FieldSpec {
        name: "age",
        step: 1,
        label: "السن",
        rule: FieldRule::Digits { min: 14, max: 80 },
    },
    FieldSpec {
        name: "marital_status",
        step: 1,
        label: "الحالة الاجتماعية",
        // Strict subset of the five options displayed interactively, see
        // `domain::MARITAL_STATUS_CHOICES`.
        rule: FieldRule::Choice {
            options: &["آنسة", "متزوجة", "مطلقة-أرملة"],
            message: "من فضلك اختاري الحالة الاجتماعية من الخيارات المتاحة.",
        },
    },
    FieldSpec {
        name: "whatsapp_number",
        step: 1,
        label: "رقم الواتساب",
        rule: FieldRule::Phone,
    },
    FieldSpec {
        name: "education",
        step: 1,
        label: "المؤهل العلمي",
        rule: FieldRule::Text { min_chars: 2 },
    },
    FieldSpec {
        name: "finished_study",
        step: 1,
        label: "هل أنهيتم الدراسة؟",
        rule: FieldRule::Choice {
            options: YES_NO,
            message: YES_NO_MESSAGE,
        },
    },
    // الخطوة 3: المؤهلات القرآنية والعلمية
    FieldSpec {
        name: "ijazat_and_courses",
        step: 2,
        label: "الإجازات والدورات",
        rule: FieldRule::Text { min_chars: 2 },
    },
    FieldSpec {
        name: "ijazah_hafs",
        step: 2,
        label: "إجازة حفص",
        rule: FieldRule::Choice {
            options: YES_NO,
            message: YES_NO_MESSAGE,
        },
    },
    FieldSpec {
        name: "ijazah_tajweed",
        step: 2,
        label: "إجازة تجويد",
        rule: FieldRule::Choice {
            options: YES_NO,
            message: YES_NO_MESSAGE,
        },
    },
    FieldSpec {
        name: "can_teach_tajweed",
        step: 2,
        label: "تدريس التجويد",
        rule: FieldRule::Choice {
            options: &["نظري", "عملي", "كلاهما"],
            message: "من فضلك اختاري (نظري/عملي/كلاهما).",
        },
    },
    FieldSpec {
        name: "can_teach_noor_al_bayan",
        step: 2,
        label: "تدريس نور البيان",
        rule: FieldRule::Choice {
            options: YES_NO,
            message: YES_NO_MESSAGE,
        },
    },
    FieldSpec {
        name: "other_subjects",
        step: 2,
        label: "مواد أخرى",
        rule: FieldRule::OptionalText,
    },
    // الخطوة 4: الخبرة والمنهجية التعليمية
    FieldSpec {
        name: "online_years",
        step: 3,
        label: "سنوات الخبرة أونلاين",
        rule: FieldRule::Digits { min: 0, max: 60 },
    },
    FieldSpec {
        name: "kids_years",
        step: 3,
        label: "سنوات الخبرة مع الأطفال",
        rule: FieldRule::Digits { min: 0, max: 60 },
    },
    FieldSpec {
        name: "good_with_kids",
        step: 3,
        label: "الصبر مع الأطفال",
        rule: FieldRule::Choice {
            options: YES_NO,
            message: YES_NO_MESSAGE,
        },
    },
    FieldSpec {
        name: "teaching_age_from",
        step: 3,
        label: "أصغر سن للتدريس",
        rule: FieldRule::Text { min_chars: 1 },
    },
    FieldSpec {
        name: "preferred_students",
        step: 3,
        label: "الفئة المفضلة",
        rule: FieldRule::Choice {
            options: &["أطفال", "كبار", "كلاهما"],
            message: "من فضلك اختاري الفئة من الخيارات.",
        },
    },
    FieldSpec {
        name: "academies_worked_with",
        step: 3,
        label: "الأكاديميات التي عملت بها",
        rule: FieldRule::Text { min_chars: 2 },
    },
    FieldSpec {
        name: "session_plan",
        step: 3,
        label: "طريقة تقسيم الحلقة",
        rule: FieldRule::Text { min_chars: 10 },
    },
    FieldSpec {
        name: "agree_no_stopping_students_policy",
        step: 3,
        label: "الموافقة على شرط عدم التوقف",
        rule: FieldRule::Gate {
            accepted: "نعم أوافق ولا بأس في ذلك",
            message: "يلزم الموافقة على شرط عدم التوقف لاستكمال الإرسال.",
        },
    },
];

/// Wire names of the fields assigned to one step, in schema order.
pub fn step_field_names(step: usize) -> impl Iterator<Item = &'static str> {
    SCHEMA
        .iter()
        .filter(move |spec| spec.step == step)
        .map(|spec| spec.name)
}

/// Wire names of every field in the schema, in schema order.
pub fn field_names() -> impl Iterator<Item = &'static str> {
    SCHEMA.iter().map(|spec| spec.name)
}

/// Ordered field -> messages mapping reported to callers.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FieldErrors(pub BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First message recorded for a field, if any.
    pub fn first_message(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }
}

/// Normalized value produced by a passing rule.
enum FieldValue {
    Text(String),
    Number(u32),
}

fn text_value(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    }
}

fn missing_message(label: &str) -> String {
    format!("من فضلك اكتبي {label}.")
}

fn english_digits_message(label: &str) -> String {
    format!("من فضلك اكتبي {label} بالأرقام الإنجليزية فقط.")
}

fn empty_choice_message(label: &str) -> String {
    format!("من فضلك اختاري إجابة لـ \"{label}\".")
}

/// `/^\+?[0-9]{10,15}$/` without pulling in a regex engine for one pattern.
fn is_valid_whatsapp(value: &str) -> bool {
    let digits = value.strip_prefix('+').unwrap_or(value);
    (10..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

fn apply_rule(spec: &FieldSpec, raw: Option<&Value>) -> Result<FieldValue, Vec<String>> {
    match spec.rule {
        FieldRule::Text { min_chars } => {
            let value = text_value(raw);
            if value.chars().count() < min_chars {
                return Err(vec![format!(
                    "من فضلك اكتبي {} بشكل صحيح.",
                    spec.label
                )]);
            }
            Ok(FieldValue::Text(value))
        }
        FieldRule::OptionalText => Ok(FieldValue::Text(text_value(raw))),
        FieldRule::Choice { options, message } => {
            let value = text_value(raw);
            if value.is_empty() {
                return Err(vec![empty_choice_message(spec.label)]);
            }
            if !options.contains(&value.as_str()) {
                return Err(vec![message.to_string()]);
            }
            Ok(FieldValue::Text(value))
        }
        FieldRule::Gate { accepted, message } => {
            let value = text_value(raw);
            if value.is_empty() {
                return Err(vec![empty_choice_message(spec.label)]);
            }
            if value != accepted {
                return Err(vec![message.to_string()]);
            }
            Ok(FieldValue::Text(value))
        }
        FieldRule::Digits { min, max } => {
            // Input may arrive as a native JSON number or a string; anything else
            // is a wrong-type failure, not a silent coercion.
            let value = match raw {
                None | Some(Value::Null) => return Err(vec![missing_message(spec.label)]),
                Some(Value::String(s)) => s.trim().to_string(),
                Some(Value::Number(n)) => n.to_string(),
                Some(_) => return Err(vec![english_digits_message(spec.label)]),
            };
            if value.is_empty() {
                return Err(vec![missing_message(spec.label)]);
            }
            if !value.chars().all(|c| c.is_ascii_digit()) {
                return Err(vec![english_digits_message(spec.label)]);
            }
            match value.parse::<u32>() {
                Ok(n) if (min..=max).contains(&n) => Ok(FieldValue::Number(n)),
                _ => Err(vec![format!(
                    "من فضلك اكتبي {} رقمًا بين {min} و {max}.",
                    spec.label
                )]),
            }
        }
        FieldRule::Phone => {
            let value = text_value(raw);
            if value.is_empty() {
                return Err(vec!["من فضلك اكتبي رقم الواتساب.".to_string()]);
            }
            if !is_valid_whatsapp(&value) {
                return Err(vec![
                    "رقم واتساب غير صالح. اكتبيه بالأرقام الإنجليزية فقط (مثال: +201234567890)."
                        .to_string(),
                ]);
            }
            Ok(FieldValue::Text(value))
        }
    }
}

/// Partial validation: only the fields assigned to `step` are evaluated.
/// Fields outside the subset never contribute errors.
pub fn check_step(record: &Map<String, Value>, step: usize) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    for spec in SCHEMA.iter().filter(|spec| spec.step == step) {
        if let Err(messages) = apply_rule(spec, record.get(spec.name)) {
            errors.0.insert(spec.name, messages);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Full validation: every field is evaluated unconditionally. On success the
/// normalized, typed record is returned; this is the only mode trusted at the
/// submission boundary.
pub fn parse_full(record: &Map<String, Value>) -> Result<TeacherApplication, FieldErrors> {
    let mut errors = FieldErrors::default();
    let mut values: BTreeMap<&'static str, FieldValue> = BTreeMap::new();

    for spec in SCHEMA {
        match apply_rule(spec, record.get(spec.name)) {
            Ok(value) => {
                values.insert(spec.name, value);
            }
            Err(messages) => {
                errors.0.insert(spec.name, messages);
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    // Every field passed, so each lookup below hits; the fallbacks are inert.
    let mut text = |name: &str| match values.remove(name) {
        Some(FieldValue::Text(value)) => value,
        _ => String::new(),
    };
    let agree_all_conditions = text("agree_all_conditions");
    let available_1_to_8 = text("available_1_to_8");
    let internet_type = text("internet_type");
    let device_type = text("device_type");
    let can_use_tools = text("can_use_tools");
    let agree_no_direct_contact = text("agree_no_direct_contact");
    let full_name_3 = text("full_name_3");
    let marital_status = text("marital_status");
    let whatsapp_number = text("whatsapp_number");
    let education = text("education");
    let finished_study = text("finished_study");
    let ijazat_and_courses = text("ijazat_and_courses");
    let ijazah_hafs = text("ijazah_hafs");
    let ijazah_tajweed = text("ijazah_tajweed");
    let can_teach_tajweed = text("can_teach_tajweed");
    let can_teach_noor_al_bayan = text("can_teach_noor_al_bayan");
    let other_subjects = text("other_subjects");
    let good_with_kids = text("good_with_kids");
    let teaching_age_from = text("teaching_age_from");
    let preferred_students = text("preferred_students");
    let academies_worked_with = text("academies_worked_with");
    let session_plan = text("session_plan");
    let agree_no_stopping_students_policy = text("agree_no_stopping_students_policy");

    let mut number = |name: &str| match values.remove(name) {
        Some(FieldValue::Number(value)) => value,
        _ => 0,
    };
    let age = number("age");
    let online_years = number("online_years");
    let kids_years = number("kids_years");

    Ok(TeacherApplication {
        agree_all_conditions,
        available_1_to_8,
        internet_type,
        device_type,
        can_use_tools,
        agree_no_direct_contact,
        full_name_3,
        age,
        marital_status,
        whatsapp_number,
        education,
        finished_study,
        ijazat_and_courses,
        ijazah_hafs,
        ijazah_tajweed,
        can_teach_tajweed,
        can_teach_noor_al_bayan,
        other_subjects,
        online_years,
        kids_years,
        good_with_kids,
        teaching_age_from,
        preferred_students,
        academies_worked_with,
        session_plan,
        agree_no_stopping_students_policy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::domain::STEP_COUNT;
    use serde_json::json;

    fn valid_record() -> Map<String, Value> {
        let value = json!({
            "agree_all_conditions": "نعم، موافقة ومتوفرة لدي",
            "available_1_to_8": "نعم",
            "internet_type": "واي فاي منزلي (Wi-Fi)",
            "device_type": "لابتوب / كمبيوتر",
            "can_use_tools": "نعم",
            "agree_no_direct_contact": "موافقة",
            "full_name_3": "سارة أحمد محمود",
            "age": "25",
            "marital_status": "آنسة",
            "whatsapp_number": "+201234567890",
            "education": "بكالوريوس",
            "finished_study": "نعم",
            "ijazat_and_courses": "إجازة برواية حفص عن عاصم",
            "ijazah_hafs": "نعم",
            "ijazah_tajweed": "نعم",
            "can_teach_tajweed": "كلاهما",
            "can_teach_noor_al_bayan": "نعم",
            "other_subjects": "",
            "online_years": "3",
            "kids_years": "4",
            "good_with_kids": "نعم",
            "teaching_age_from": "5",
            "preferred_students": "أطفال",
            "academies_worked_with": "أكاديمية النور",
            "session_plan": "عشر دقائق مراجعة ثم تسميع الحفظ الجديد",
            "agree_no_stopping_students_policy": "نعم أوافق ولا بأس في ذلك",
        });
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn full_validation_accepts_complete_record() {
        let record = parse_full(&valid_record()).expect("record validates");
        assert_eq!(record.age, 25);
        assert_eq!(record.online_years, 3);
        assert_eq!(record.full_name_3, "سارة أحمد محمود");
        assert_eq!(record.other_subjects, "");
    }

    #[test]
    fn numeric_fields_reject_arabic_indic_digits() {
        for (field, label) in [
            ("age", "السن"),
            ("online_years", "سنوات الخبرة أونلاين"),
            ("kids_years", "سنوات الخبرة مع الأطفال"),
        ] {
            let mut record = valid_record();
            record.insert(field.to_string(), json!("٢٥"));
            let errors = parse_full(&record).expect_err("arabic digits rejected");
            assert_eq!(
                errors.first_message(field),
                Some(english_digits_message(label).as_str()),
            );
        }
    }

    #[test]
    fn numeric_fields_accept_native_numbers() {
        let mut record = valid_record();
        record.insert("age".to_string(), json!(25));
        record.insert("online_years".to_string(), json!(0));
        let parsed = parse_full(&record).expect("native numbers coerce");
        assert_eq!(parsed.age, 25);
        assert_eq!(parsed.online_years, 0);
    }

    #[test]
    fn numeric_fields_enforce_inclusive_bounds() {
        let mut record = valid_record();
        record.insert("age".to_string(), json!("13"));
        let errors = parse_full(&record).expect_err("below range rejected");
        assert_eq!(
            errors.first_message("age"),
            Some("من فضلك اكتبي السن رقمًا بين 14 و 80."),
        );

        let mut record = valid_record();
        record.insert("age".to_string(), json!("80"));
        assert!(parse_full(&record).is_ok(), "upper bound is inclusive");
    }

    #[test]
    fn missing_numeric_field_reports_missing_message() {
        let mut record = valid_record();
        record.remove("age");
        let errors = parse_full(&record).expect_err("missing age rejected");
        assert_eq!(errors.first_message("age"), Some("من فضلك اكتبي السن."));
    }

    #[test]
    fn hard_gates_reject_any_other_value() {
        let gates = [
            ("agree_all_conditions", "لا"),
            ("can_use_tools", "لا"),
            ("agree_no_direct_contact", "غير موافقة"),
            ("agree_no_stopping_students_policy", "لا أوافق"),
        ];
        for (field, wrong) in gates {
            let mut record = valid_record();
            record.insert(field.to_string(), json!(wrong));
            let errors = parse_full(&record).expect_err("gate enforces literal");
            assert!(errors.contains(field), "expected error for {field}");
        }
    }

    #[test]
    fn gate_rejects_syntactically_valid_choice_with_directive_message() {
        // "لا" is a well-formed choice elsewhere in the form, yet the gate
        // still refuses it with the directive message rather than the generic
        // choice message.
        let mut record = valid_record();
        record.insert("can_use_tools".to_string(), json!("لا"));
        let errors = parse_full(&record).expect_err("gate rejects");
        assert_eq!(
            errors.first_message("can_use_tools"),
            Some("يشترط القدرة على استخدام زووم/ميت/السبورة/مشاركة الشاشة."),
        );
    }

    #[test]
    fn marital_status_accepts_only_schema_subset() {
        let mut record = valid_record();
        record.insert("marital_status".to_string(), json!("مخطوبة"));
        let errors = parse_full(&record).expect_err("displayed option outside schema");
        assert_eq!(
            errors.first_message("marital_status"),
            Some("من فضلك اختاري الحالة الاجتماعية من الخيارات المتاحة."),
        );
    }

    #[test]
    fn whatsapp_number_requires_english_digit_pattern() {
        let cases = ["0123", "+2012345678901234", "٠١٢٣٤٥٦٧٨٩٠", "01234abc890"];
        for wrong in cases {
            let mut record = valid_record();
            record.insert("whatsapp_number".to_string(), json!(wrong));
            let errors = parse_full(&record).expect_err("invalid phone rejected");
            assert!(errors.contains("whatsapp_number"), "{wrong} should fail");
        }

        let mut record = valid_record();
        record.insert("whatsapp_number".to_string(), json!("01234567890"));
        assert!(parse_full(&record).is_ok(), "local form without + is valid");
    }

    #[test]
    fn free_text_is_trimmed_before_length_check() {
        let mut record = valid_record();
        record.insert("full_name_3".to_string(), json!("  اب  "));
        let errors = parse_full(&record).expect_err("two chars after trim");
        assert_eq!(
            errors.first_message("full_name_3"),
            Some("من فضلك اكتبي الاسم الثلاثي بشكل صحيح."),
        );
    }

    #[test]
    fn partial_validation_scopes_errors_to_the_step() {
        // Record is valid for step 0 but broken everywhere else.
        let mut record = valid_record();
        record.insert("age".to_string(), json!(""));
        record.insert("session_plan".to_string(), json!("قصير"));

        assert!(check_step(&record, 0).is_ok());

        let errors = check_step(&record, 1).expect_err("step 1 sees the age error");
        assert!(errors.contains("age"));
        assert!(!errors.contains("session_plan"));
    }

    #[test]
    fn union_of_passing_steps_implies_full_pass() {
        let record = valid_record();
        for step in 0..STEP_COUNT {
            assert!(check_step(&record, step).is_ok(), "step {step} passes");
        }
        assert!(parse_full(&record).is_ok());
    }

    #[test]
    fn schema_partitions_every_field_into_one_step() {
        let total: usize = (0..STEP_COUNT)
            .map(|step| step_field_names(step).count())
            .sum();
        assert_eq!(total, SCHEMA.len());
        assert_eq!(field_names().count(), 26);
    }

    #[test]
    fn empty_choice_reports_choice_message() {
        let mut record = valid_record();
        record.insert("internet_type".to_string(), json!(""));
        let errors = parse_full(&record).expect_err("empty choice rejected");
        assert_eq!(
            errors.first_message("internet_type"),
            Some("من فضلك اختاري إجابة لـ \"نوع الإنترنت\"."),
        );
    }
}
