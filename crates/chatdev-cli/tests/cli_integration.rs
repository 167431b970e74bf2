//! Integration tests for the chatdev CLI code paths.
//!
//! These exercise workflow loading and validation the way the binary
//! does, without touching any provider.

use chatdev_core::workflow::builtin;
use chatdev_core::workflow::schema::WorkflowDefinition;
use chatdev_core::EngineError;

#[test]
fn every_builtin_workflow_resolves() {
    let definitions = builtin::builtin_workflows();
    assert!(!definitions.is_empty());
    for definition in definitions {
        let workflow = definition.resolve().expect("built-in must resolve");
        assert!(!workflow.phases().is_empty());
    }
}

#[test]
fn builtin_slugs_are_addressable() {
    for slug in builtin::slugs() {
        assert!(builtin::find(&slug).is_some(), "slug '{slug}' must resolve");
    }
}

#[tokio::test]
async fn yaml_definition_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workflow.yml");
    tokio::fs::write(
        &path,
        r#"
name: "Review"
description: "review a change"
roles:
  - name: Author
    description: wrote the change
    model: gpt-4o
  - name: Reviewer
    description: reviews the change
    model: claude-3-opus-20240229
artifacts:
  - name: Diff
    description: the change under review
  - name: Verdict
    description: the review verdict
conversations:
  - name: Review Session
    description: author and reviewer walk the diff
    lead: Author
    assistant: Reviewer
    input: Diff
    output: Verdict
phases:
  - name: Review
    description: the review phase
    conversations: [Review Session]
"#,
    )
    .await
    .unwrap();

    let source = tokio::fs::read_to_string(&path).await.unwrap();
    let workflow = WorkflowDefinition::from_yaml(&source)
        .unwrap()
        .resolve()
        .unwrap();
    assert_eq!(workflow.name, "Review");
    assert_eq!(workflow.current_conversation().unwrap().lead.name, "Author");
}

#[test]
fn malformed_yaml_is_a_definition_error() {
    let err = WorkflowDefinition::from_yaml("name: [unterminated").unwrap_err();
    assert!(matches!(err, EngineError::Definition(_)));
}

#[test]
fn dangling_references_fail_validation() {
    let yaml = r#"
name: "Broken"
roles:
  - name: A
    description: only role
    model: gpt-4o
artifacts:
  - name: In
    description: input
  - name: Out
    description: output
conversations:
  - name: Chat
    description: chatting
    lead: A
    assistant: Nobody
    input: In
    output: Out
phases:
  - name: Only
    conversations: [Chat]
"#;
    let err = WorkflowDefinition::from_yaml(yaml).unwrap().resolve().unwrap_err();
    assert!(matches!(err, EngineError::Definition(msg) if msg.contains("Nobody")));
}
