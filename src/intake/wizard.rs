//! Four-step form wizard modeled as an explicit state machine.
//!
//! The machine owns the working record and gates forward navigation on the
//! step-scoped schema check. It knows nothing about rendering or transport:
//! submission goes through the [`SubmissionGateway`] seam so the transition
//! table can be exercised without a UI or a network.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::domain::STEP_COUNT;
use super::schema;

/// Current position in the flow. `Success` is terminal until `reset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    Step(usize),
    Submitting,
    Success,
}

/// Last navigation direction, recorded for presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Result of handing the record to the submission boundary.
#[derive(Debug, Clone, Default)]
pub struct GatewayResponse {
    pub ok: bool,
    pub message: Option<String>,
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Seam between the wizard and whatever carries the record to the server.
pub trait SubmissionGateway {
    fn submit(&self, record: &Map<String, Value>) -> GatewayResponse;
}

const DEFAULT_SUBMIT_ERROR: &str = "تعذر الإرسال الآن. جرّبي مرة أخرى بعد قليل.";

/// The wizard state machine.
pub struct FormWizard {
    phase: WizardPhase,
    direction: Direction,
    record: Map<String, Value>,
    field_errors: BTreeMap<String, Vec<String>>,
    form_error: Option<String>,
}

impl Default for FormWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl FormWizard {
    pub fn new() -> Self {
        Self {
            phase: WizardPhase::Step(0),
            direction: Direction::Forward,
            record: empty_record(),
            field_errors: BTreeMap::new(),
            form_error: None,
        }
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn record(&self) -> &Map<String, Value> {
        &self.record
    }

    pub fn field_errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.field_errors
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    /// Mutate one field of the working record. Ignored outside of a step so a
    /// submission in flight cannot be edited underneath.
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) {
        if let WizardPhase::Step(_) = self.phase {
            self.record.insert(name.to_string(), value.into());
        }
    }

    /// Validate the current step and advance on success. On failure the
    /// machine stays put and surfaces the step's field messages.
    pub fn go_next(&mut self) -> bool {
        let WizardPhase::Step(step) = self.phase else {
            return false;
        };
        if step + 1 >= STEP_COUNT {
            return false;
        }

        self.form_error = None;
        match schema::check_step(&self.record, step) {
            Ok(()) => {
                self.field_errors.clear();
                self.direction = Direction::Forward;
                self.phase = WizardPhase::Step(step + 1);
                true
            }
            Err(errors) => {
                self.attach_errors(errors);
                false
            }
        }
    }

    /// Move back one step. Never validates and never blocks.
    pub fn go_prev(&mut self) -> bool {
        let WizardPhase::Step(step) = self.phase else {
            return false;
        };
        if step == 0 {
            return false;
        }

        self.form_error = None;
        self.direction = Direction::Backward;
        self.phase = WizardPhase::Step(step - 1);
        true
    }

    /// Submit the accumulated record from the final step. The local full check
    /// runs first so the gateway only ever sees records every step accepted;
    /// server-reported errors are re-attached to their fields on failure and
    /// the record is preserved for correction.
    pub fn submit<G: SubmissionGateway>(&mut self, gateway: &G) -> bool {
        if self.phase != WizardPhase::Step(STEP_COUNT - 1) {
            return false;
        }

        self.form_error = None;
        if let Err(errors) = schema::parse_full(&self.record) {
            self.attach_errors(errors);
            return false;
        }

        self.phase = WizardPhase::Submitting;
        let response = gateway.submit(&self.record);

        if response.ok {
            self.field_errors.clear();
            self.phase = WizardPhase::Success;
            return true;
        }

        if let Some(errors) = response.errors {
            for (field, messages) in errors {
                if !messages.is_empty() {
                    self.field_errors.insert(field, messages);
                }
            }
        }
        self.form_error = Some(
            response
                .message
                .unwrap_or_else(|| DEFAULT_SUBMIT_ERROR.to_string()),
        );
        self.phase = WizardPhase::Step(STEP_COUNT - 1);
        false
    }

    /// Leave the terminal state: clear the record back to its empty defaults
    /// and return to the first step.
    pub fn reset(&mut self) -> bool {
        if self.phase != WizardPhase::Success {
            return false;
        }
        *self = Self::new();
        true
    }

    fn attach_errors(&mut self, errors: schema::FieldErrors) {
        self.field_errors.clear();
        for (field, messages) in errors.0 {
            self.field_errors.insert(field.to_string(), messages);
        }
    }
}

/// Every schema field starts as an empty string, matching the form defaults.
fn empty_record() -> Map<String, Value> {
    let mut record = Map::new();
    for name in schema::field_names() {
        record.insert(name.to_string(), Value::String(String::new()));
    }
    record
}
