use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use formwright_core::{AppError, AppResult};
use formwright_domain::{AssistInstruction, FormColumn, FormComponent, FormSchema};
use serde_json::json;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::form_assist_ports::{
    FormAssistRequest, GeneratedSchemaEdit, SchemaGenerationPrompt, SchemaGenerator,
};

use super::{FormAssistPolicy, FormAssistService, SafetyPolicy};

enum Behaviour {
    Reply(GeneratedSchemaEdit),
    Fail(AppError),
    Hang,
}

struct FakeSchemaGenerator {
    available: bool,
    behaviour: Mutex<Option<Behaviour>>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<SchemaGenerationPrompt>>,
}

impl FakeSchemaGenerator {
    fn new(behaviour: Behaviour) -> Self {
        Self {
            available: true,
            behaviour: Mutex::new(Some(behaviour)),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    fn replying(explanation: &str, components: Vec<FormComponent>, warnings: &[&str]) -> Self {
        Self::new(Behaviour::Reply(GeneratedSchemaEdit {
            explanation: explanation.to_owned(),
            components,
            warnings: warnings.iter().map(|warning| (*warning).to_owned()).collect(),
        }))
    }

    fn disabled() -> Self {
        Self {
            available: false,
            ..Self::new(Behaviour::Hang)
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SchemaGenerator for FakeSchemaGenerator {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn generate(&self, prompt: SchemaGenerationPrompt) -> AppResult<GeneratedSchemaEdit> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().await = Some(prompt);

        let behaviour = self.behaviour.lock().await.take();
        match behaviour {
            Some(Behaviour::Reply(edit)) => Ok(edit),
            Some(Behaviour::Fail(error)) => Err(error),
            Some(Behaviour::Hang) | None => std::future::pending().await,
        }
    }
}

fn field(component_type: &str, key: &str) -> FormComponent {
    FormComponent::new(component_type, key)
}

fn numbered_fields(count: usize) -> Vec<FormComponent> {
    (0..count)
        .map(|index| field("textfield", &format!("field_{index}")))
        .collect()
}

fn request(message: &str, current_schema: FormSchema) -> FormAssistRequest {
    FormAssistRequest {
        instruction: AssistInstruction::new(message).unwrap_or_else(|_| unreachable!()),
        current_schema,
    }
}

fn build_service(policy: FormAssistPolicy, generator: Arc<FakeSchemaGenerator>) -> FormAssistService {
    FormAssistService::new(policy).with_generator(generator)
}

#[tokio::test]
async fn adds_field_end_to_end() {
    let generator = Arc::new(FakeSchemaGenerator::replying(
        "Added an email field below the name.",
        vec![field("textfield", "name"), field("email", "email")],
        &[],
    ));
    let service = build_service(FormAssistPolicy::default(), generator.clone());
    let current = FormSchema::new(vec![field("textfield", "name")]);
    assert_eq!(current.complexity(), 1);

    let result = service
        .generate(request("add an email field", current), &CancellationToken::new())
        .await;

    assert!(result.is_ok());
    let result = result.unwrap_or_else(|_| unreachable!());
    assert_eq!(result.schema.components().len(), 2);
    assert_eq!(result.schema.complexity(), 2);
    assert_eq!(result.complexity, 2);
    assert!(result.markdown.contains('2'));
    assert!(result.markdown.contains("Added an email field below the name."));
    assert!(result.warnings.is_empty());
    assert!(!result.markdown.contains("Warnings"));
    assert_eq!(generator.calls(), 1);

    let prompt = generator.last_prompt.lock().await.clone();
    let prompt = prompt.unwrap_or_else(|| unreachable!());
    assert!(prompt.user_prompt.contains("add an email field"));
    assert!(prompt.user_prompt.contains("\"name\""));
    assert!(prompt.system_prompt.contains("50 components"));
}

#[tokio::test]
async fn oversized_schema_is_rejected_without_calling_generator() {
    let generator = Arc::new(FakeSchemaGenerator::replying("unused", Vec::new(), &[]));
    let service = build_service(FormAssistPolicy::default(), generator.clone());

    let result = service
        .generate(
            request("tidy up", FormSchema::new(numbered_fields(51))),
            &CancellationToken::new(),
        )
        .await;

    assert!(matches!(
        result,
        Err(AppError::ComplexityExceeded {
            actual: 51,
            limit: 50
        })
    ));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn nested_components_count_toward_the_gate() {
    let generator = Arc::new(FakeSchemaGenerator::replying("unused", Vec::new(), &[]));
    let policy = FormAssistPolicy::new(5, 2, 0.5).unwrap_or_else(|_| unreachable!());
    let service = build_service(policy, generator.clone());
    let current = FormSchema::new(vec![
        field("columns", "layout").with_columns(vec![FormColumn::new(numbered_fields(5))]),
    ]);

    let result = service
        .generate(request("add a field", current), &CancellationToken::new())
        .await;

    assert!(matches!(
        result,
        Err(AppError::ComplexityExceeded { actual: 6, limit: 5 })
    ));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn schema_at_limit_is_accepted() {
    let generator = Arc::new(FakeSchemaGenerator::replying(
        "No changes needed.",
        numbered_fields(50),
        &[],
    ));
    let service = build_service(FormAssistPolicy::default(), generator.clone());

    let result = service
        .generate(
            request("check labels", FormSchema::new(numbered_fields(50))),
            &CancellationToken::new(),
        )
        .await;

    assert!(result.is_ok());
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn missing_generator_is_unavailable_even_for_empty_schema() {
    let service = FormAssistService::new(FormAssistPolicy::default());

    let result = service
        .generate(
            request("add a name field", FormSchema::new(Vec::new())),
            &CancellationToken::new(),
        )
        .await;

    assert!(matches!(result, Err(AppError::Unavailable(_))));
    assert!(!service.limits().ai_enabled);
}

#[tokio::test]
async fn disabled_generator_is_unavailable() {
    let generator = Arc::new(FakeSchemaGenerator::disabled());
    let service = build_service(FormAssistPolicy::default(), generator.clone());

    let result = service
        .generate(
            request("add a name field", FormSchema::new(Vec::new())),
            &CancellationToken::new(),
        )
        .await;

    assert!(matches!(result, Err(AppError::Unavailable(_))));
    assert_eq!(generator.calls(), 0);
    assert!(!service.limits().ai_enabled);
}

#[tokio::test]
async fn generator_errors_surface_as_generation_failures() {
    let generator = Arc::new(FakeSchemaGenerator::new(Behaviour::Fail(AppError::Internal(
        "connection reset".to_owned(),
    ))));
    let service = build_service(FormAssistPolicy::default(), generator);

    let result = service
        .generate(
            request("add a field", FormSchema::new(Vec::new())),
            &CancellationToken::new(),
        )
        .await;

    match result {
        Err(AppError::Generation(message)) => assert!(message.contains("connection reset")),
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn fail_open_returns_candidate_with_safety_warnings() {
    let generator = Arc::new(FakeSchemaGenerator::replying(
        "Simplified the form.",
        numbered_fields(10).split_off(6),
        &["Several fields were merged."],
    ));
    let service = build_service(FormAssistPolicy::default(), generator);

    let result = service
        .generate(
            request("simplify the form", FormSchema::new(numbered_fields(10))),
            &CancellationToken::new(),
        )
        .await;

    let result = result.unwrap_or_else(|_| unreachable!());
    assert_eq!(result.schema.complexity(), 4);
    assert_eq!(result.warnings.len(), 2);
    assert_eq!(result.warnings[0], "Several fields were merged.");
    assert!(result.warnings[1].contains("removes 6 of 10"));
    assert!(result.markdown.contains("### Warnings"));
    assert!(result.markdown.contains("- Several fields were merged."));
}

#[tokio::test]
async fn fail_closed_rejects_unsafe_candidate() {
    let generator = Arc::new(FakeSchemaGenerator::replying(
        "Added a second email.",
        vec![field("email", "email"), field("email", "email")],
        &[],
    ));
    let policy = FormAssistPolicy::default().with_safety_policy(SafetyPolicy::FailClosed);
    let service = build_service(policy, generator);

    let result = service
        .generate(
            request(
                "add another email",
                FormSchema::new(vec![field("email", "email")]),
            ),
            &CancellationToken::new(),
        )
        .await;

    match result {
        Err(AppError::SafetyCheckFailed(issues)) => {
            assert_eq!(issues, vec!["updated form reuses component keys: email".to_owned()]);
        }
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn fail_closed_accepts_safe_candidate() {
    let generator = Arc::new(FakeSchemaGenerator::replying(
        "Added a phone field.",
        vec![field("email", "email"), field("phoneNumber", "phone")],
        &[],
    ));
    let policy = FormAssistPolicy::default().with_safety_policy(SafetyPolicy::FailClosed);
    let service = build_service(policy, generator);

    let result = service
        .generate(
            request("add a phone field", FormSchema::new(vec![field("email", "email")])),
            &CancellationToken::new(),
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn root_properties_are_preserved() {
    let generator = Arc::new(FakeSchemaGenerator::replying(
        "Renamed nothing.",
        vec![field("textfield", "name")],
        &[],
    ));
    let service = build_service(FormAssistPolicy::default(), generator);
    let current = serde_json::from_value::<FormSchema>(json!({
        "title": "Registration",
        "name": "registration",
        "type": "wizard",
        "display": "wizard",
        "settings": {"pdf": false},
        "components": [{"type": "textfield", "key": "name"}]
    }))
    .unwrap_or_else(|_| unreachable!());

    let result = service
        .generate(request("keep as is", current.clone()), &CancellationToken::new())
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(result.schema, current);
}

#[tokio::test]
async fn slow_generator_times_out() {
    let generator = Arc::new(FakeSchemaGenerator::new(Behaviour::Hang));
    let policy = FormAssistPolicy::default().with_generation_timeout(Duration::from_millis(20));
    let service = build_service(policy, generator);

    let result = service
        .generate(
            request("add a field", FormSchema::new(Vec::new())),
            &CancellationToken::new(),
        )
        .await;

    assert!(matches!(result, Err(AppError::Timeout(_))));
}

#[tokio::test]
async fn cancelled_request_returns_no_result() {
    let generator = Arc::new(FakeSchemaGenerator::new(Behaviour::Hang));
    let service = build_service(FormAssistPolicy::default(), generator);
    let cancellation = CancellationToken::new();

    let canceller = cancellation.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        canceller.cancel();
    });

    let result = service
        .generate(request("add a field", FormSchema::new(Vec::new())), &cancellation)
        .await;

    assert!(matches!(result, Err(AppError::Cancelled(_))));
}

#[test]
fn validate_schema_reports_complexity_and_limit() {
    let policy = FormAssistPolicy::new(2, 2, 0.5).unwrap_or_else(|_| unreachable!());
    let service = FormAssistService::new(policy);

    let report = service.validate_schema(&json!({
        "components": [
            {"type": "panel", "key": "p", "components": [{"type": "textfield", "key": "a"}]},
            {"type": "textfield", "key": "b"}
        ]
    }));
    assert!(report.valid);
    assert!(report.errors.is_empty());
    assert_eq!(report.complexity, 3);
    assert!(report.exceeds_ai_limit);

    let report = service.validate_schema(&json!({
        "type": "survey",
        "components": [{"type": "textfield", "key": "a"}]
    }));
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.complexity, 1);
    assert!(!report.exceeds_ai_limit);
}

#[test]
fn validate_schema_rejects_mistyped_nested_component_and_counts_it() {
    let service = FormAssistService::new(FormAssistPolicy::default());
    let mut children = (0..60)
        .map(|index| json!({"type": "textfield", "key": format!("field_{index}")}))
        .collect::<Vec<_>>();
    children.push(json!({"type": "checkbox", "key": "agree", "input": "yes"}));

    let report = service.validate_schema(&json!({
        "components": [{"type": "columns", "key": "layout", "columns": [{"components": children}]}]
    }));

    assert!(!report.valid);
    assert_eq!(report.complexity, 62);
    assert!(report.exceeds_ai_limit);
}

#[test]
fn limits_reflect_policy_and_generator() {
    let generator = Arc::new(FakeSchemaGenerator::replying("unused", Vec::new(), &[]));
    let policy = FormAssistPolicy::new(30, 2, 0.5).unwrap_or_else(|_| unreachable!());
    let limits = build_service(policy, generator).limits();

    assert_eq!(limits.max_complexity, 30);
    assert!(limits.ai_enabled);
}
