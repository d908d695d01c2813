//! Teacher-application intake pipeline: shared validation schema, wizard state
//! machine, submission rate governor, and the forwarding trust boundary.

pub mod domain;
pub mod forwarder;
pub mod ratelimit;
pub mod router;
pub mod schema;
pub mod service;
pub mod wizard;

pub use domain::{StepInfo, TeacherApplication, MARITAL_STATUS_CHOICES, STEPS, STEP_COUNT};
pub use forwarder::{ForwardError, SheetForwarder};
pub use ratelimit::{FixedWindowLimiter, RateDecision, RateLimitOptions};
pub use router::intake_router;
pub use schema::{check_step, parse_full, step_field_names, FieldErrors};
pub use service::{SubmissionOutcome, SubmissionService};
pub use wizard::{Direction, FormWizard, GatewayResponse, SubmissionGateway, WizardPhase};
