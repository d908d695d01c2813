use clap::Args;
use serde_json::{json, Map, Value};

use crate::error::AppError;
use crate::intake::{
    parse_full, step_field_names, FormWizard, GatewayResponse, SubmissionGateway, WizardPhase,
    STEPS, STEP_COUNT,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the payload that would be forwarded as pretty JSON
    #[arg(long)]
    pub(crate) pretty: bool,
}

/// Gateway that stops short of the network: it runs the authoritative full
/// validation and prints the payload the forwarder would send.
struct DryRunGateway {
    pretty: bool,
}

impl SubmissionGateway for DryRunGateway {
    fn submit(&self, record: &Map<String, Value>) -> GatewayResponse {
        match parse_full(record) {
            Ok(application) => {
                let rendered = if self.pretty {
                    serde_json::to_string_pretty(&application)
                } else {
                    serde_json::to_string(&application)
                };
                match rendered {
                    Ok(body) => println!("  Would forward: {body}"),
                    Err(err) => println!("  Payload rendering failed: {err}"),
                }
                GatewayResponse {
                    ok: true,
                    message: None,
                    errors: None,
                }
            }
            Err(errors) => GatewayResponse {
                ok: false,
                message: Some("هناك بعض الحقول تحتاج مراجعة بسيطة قبل الإرسال.".to_string()),
                errors: Some(
                    errors
                        .0
                        .into_iter()
                        .map(|(field, messages)| (field.to_string(), messages))
                        .collect(),
                ),
            },
        }
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Teacher intake wizard demo (dry run, no network)");

    let mut wizard = FormWizard::new();
    let sample = sample_application();

    for step in 0..STEP_COUNT {
        let info = STEPS[step];
        println!("\nStep {}: {} — {}", step + 1, info.title, info.description);

        for name in step_field_names(step) {
            if let Some(value) = sample.get(name) {
                wizard.set_field(name, value.clone());
                println!("  {name} = {value}");
            }
        }

        if step < STEP_COUNT - 1 {
            if wizard.go_next() {
                println!("  -> step validated, moving forward");
            } else {
                for (field, messages) in wizard.field_errors() {
                    println!("  !! {field}: {}", messages.join(" | "));
                }
                return Ok(());
            }
        }
    }

    println!("\nSubmitting accumulated record");
    let accepted = wizard.submit(&DryRunGateway { pretty: args.pretty });
    match wizard.phase() {
        WizardPhase::Success => println!("  Submission accepted"),
        _ => {
            if let Some(message) = wizard.form_error() {
                println!("  Submission refused: {message}");
            }
            for (field, messages) in wizard.field_errors() {
                println!("  !! {field}: {}", messages.join(" | "));
            }
        }
    }

    if accepted && wizard.reset() {
        println!("  Wizard reset for a fresh application");
    }

    Ok(())
}

fn sample_application() -> Map<String, Value> {
    let value = json!({
        "agree_all_conditions": "نعم، موافقة ومتوفرة لدي",
        "available_1_to_8": "نعم",
        "internet_type": "واي فاي منزلي (Wi-Fi)",
        "device_type": "لابتوب / كمبيوتر",
        "can_use_tools": "نعم",
        "agree_no_direct_contact": "موافقة",
        "full_name_3": "آية محمد إبراهيم",
        "age": "27",
        "marital_status": "آنسة",
        "whatsapp_number": "+201234567890",
        "education": "ليسانس آداب",
        "finished_study": "نعم",
        "ijazat_and_courses": "إجازة برواية حفص عن عاصم",
        "ijazah_hafs": "نعم",
        "ijazah_tajweed": "لا",
        "can_teach_tajweed": "عملي",
        "can_teach_noor_al_bayan": "نعم",
        "other_subjects": "التربية الإسلامية",
        "online_years": "3",
        "kids_years": "5",
        "good_with_kids": "نعم",
        "teaching_age_from": "4 سنوات",
        "preferred_students": "أطفال",
        "academies_worked_with": "أكاديمية النور، أكاديمية الفرقان",
        "session_plan": "عشر دقائق مراجعة، ثم تسميع الحفظ الجديد، ثم تصحيح التلاوة",
        "agree_no_stopping_students_policy": "نعم أوافق ولا بأس في ذلك",
    });
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
