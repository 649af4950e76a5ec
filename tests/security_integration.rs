// Security integration tests
// Tests the model-output-to-shell path end-to-end

mod helpers;

use helpers::{translator, FailingLLMClient, ScriptedOperator};
use nlrun::audit::AuditLogger;
use nlrun::llm::Translator;
use nlrun::pipeline::{Instruction, Pipeline, PipelineOutcome, Stage};
use nlrun::shell::ShellExecutor;
use std::fs;
use tempfile::TempDir;

fn instruction(text: &str) -> Instruction {
    Instruction::new(text).unwrap()
}

/// An executor whose shell cannot start: any real execution attempt fails
fn unusable_executor() -> ShellExecutor {
    ShellExecutor::with_shell("/nonexistent/shell")
}

#[tokio::test]
async fn test_malicious_model_output_is_rejected() {
    let malicious_outputs = vec![
        "rm -rf /",
        "```bash\nrm -rf ~\n```",
        "Command: chmod -R 777 /",
        "sudo ls",
        "find / -name '*' -exec rm {} ;",
        "find . -exec ls {} ; -exec rm {} ;",
        "bash -c 'ls'",
        "/bin/ls",
        "```\nls\n```",
        "command: ls",
    ];

    for malicious in malicious_outputs {
        let pipeline = Pipeline::new(translator(malicious), unusable_executor());
        let mut operator = ScriptedOperator::answering("yes");

        let outcome = pipeline.run(&instruction("do something"), &mut operator, false).await;

        assert!(
            matches!(outcome, PipelineOutcome::Rejected { .. }),
            "Should reject model output {:?}, got {:?}",
            malicious,
            outcome
        );
        assert!(operator.shown.is_empty());
        assert_eq!(operator.confirmations, 0);
    }
}

#[tokio::test]
async fn test_valid_model_output_is_accepted() {
    let valid_outputs = vec![
        ("ls -la /tmp", "ls -la /tmp"),
        ("```bash\ndf -h\n```", "df -h"),
        ("Command: uptime", "uptime"),
        ("Sure:\n```bash\nCommand: find . -type f -exec cat {} ;\n```\nDone.", "find . -type f -exec cat {} ;"),
        ("  whoami\n", "whoami"),
    ];

    for (raw, expected) in valid_outputs {
        let pipeline = Pipeline::new(translator(raw), unusable_executor());
        let mut operator = ScriptedOperator::answering("dry-run");

        let outcome = pipeline.run(&instruction("do something"), &mut operator, false).await;

        match outcome {
            PipelineOutcome::DryRun(result) => assert!(result.output.contains(expected)),
            other => panic!("Should accept {:?}, got {:?}", raw, other),
        }
        assert_eq!(operator.shown, vec![expected.to_string()]);
    }
}

#[tokio::test]
async fn test_no_at_confirmation_never_executes() {
    // If the executor were reached, the missing shell would turn this into a failure.
    let pipeline = Pipeline::new(translator("echo hello"), unusable_executor());
    let mut operator = ScriptedOperator::answering("no");

    let outcome = pipeline.run(&instruction("say hello"), &mut operator, false).await;

    assert_eq!(
        outcome,
        PipelineOutcome::Aborted {
            command: "echo hello".to_string()
        }
    );
}

#[tokio::test]
async fn test_no_is_case_insensitive() {
    let pipeline = Pipeline::new(translator("echo hello"), unusable_executor());
    let mut operator = ScriptedOperator::answering("  No\n");

    let outcome = pipeline.run(&instruction("say hello"), &mut operator, false).await;
    assert!(matches!(outcome, PipelineOutcome::Aborted { .. }));
}

#[tokio::test]
async fn test_dry_run_flag_never_prompts_or_executes() {
    let pipeline = Pipeline::new(translator("echo hi"), unusable_executor());
    let mut operator = ScriptedOperator::answering("yes");

    let outcome = pipeline.run(&instruction("say hi"), &mut operator, true).await;

    match outcome {
        PipelineOutcome::DryRun(result) => {
            assert!(result.success);
            assert!(result.simulated);
            assert!(result.output.contains("echo hi"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(operator.confirmations, 0);
}

#[tokio::test]
async fn test_end_to_end_real_execution() {
    let pipeline = Pipeline::new(translator("```bash\necho hello\n```"), ShellExecutor::new());
    let mut operator = ScriptedOperator::answering("yes");

    let outcome = pipeline.run(&instruction("say hello"), &mut operator, false).await;

    match outcome {
        PipelineOutcome::Executed(result) => {
            assert_eq!(result.output, "hello\n");
            assert!(result.success);
            assert!(!result.simulated);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_execution_failure_is_terminal_and_keeps_output() {
    let pipeline = Pipeline::new(translator("ls /no/such/path"), ShellExecutor::new());
    let mut operator = ScriptedOperator::answering("");

    let outcome = pipeline.run(&instruction("list a missing dir"), &mut operator, false).await;

    match outcome {
        PipelineOutcome::Failed {
            stage,
            cause,
            output,
        } => {
            assert_eq!(stage, Stage::Execution);
            assert!(cause.contains("exit code"));
            assert!(output.unwrap().contains("/no/such/path"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(operator.confirmations, 1);
}

#[tokio::test]
async fn test_translation_failure_stops_pipeline() {
    let client = Box::new(FailingLLMClient { status: 500 });
    let pipeline = Pipeline::new(Translator::new(client), unusable_executor());
    let mut operator = ScriptedOperator::answering("yes");

    let outcome = pipeline.run(&instruction("list files"), &mut operator, false).await;

    match outcome {
        PipelineOutcome::Failed { stage, cause, .. } => {
            assert_eq!(stage, Stage::Translation);
            assert!(cause.contains("500"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(operator.shown.is_empty());
}

#[tokio::test]
async fn test_blank_model_response_is_translation_failure() {
    let pipeline = Pipeline::new(translator("   \n"), unusable_executor());
    let mut operator = ScriptedOperator::answering("yes");

    let outcome = pipeline.run(&instruction("list files"), &mut operator, false).await;

    assert!(matches!(
        outcome,
        PipelineOutcome::Failed {
            stage: Stage::Translation,
            ..
        }
    ));
}

#[tokio::test]
async fn test_rejection_is_audited() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("history.log");
    let audit = AuditLogger::open(&log_path).unwrap();

    let pipeline = Pipeline::new(translator("```bash\nrm -rf /tmp/x\n```"), unusable_executor())
        .with_audit(audit);
    let mut operator = ScriptedOperator::answering("yes");

    let outcome = pipeline.run(&instruction("clean temp"), &mut operator, false).await;
    assert!(matches!(outcome, PipelineOutcome::Rejected { .. }));

    let content = fs::read_to_string(&log_path).unwrap();
    assert!(content.contains("VALIDATION-REJECTED"));
    assert!(content.contains("clean temp"));
    assert!(content.contains("rm -rf /tmp/x"));
}

#[tokio::test]
async fn test_execution_is_audited() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("history.log");
    let audit = AuditLogger::open(&log_path).unwrap();

    let pipeline = Pipeline::new(translator("echo audited"), ShellExecutor::new()).with_audit(audit);
    let mut operator = ScriptedOperator::answering("yes");

    let outcome = pipeline.run(&instruction("say audited"), &mut operator, false).await;
    assert!(matches!(outcome, PipelineOutcome::Executed(_)));

    let content = fs::read_to_string(&log_path).unwrap();
    assert!(content.contains("[exit:0] echo audited"));
}

#[tokio::test]
async fn test_non_zero_exit_is_audited_with_code() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("history.log");
    let audit = AuditLogger::open(&log_path).unwrap();

    let pipeline = Pipeline::new(translator("ls /no/such/path"), ShellExecutor::new()).with_audit(audit);
    let mut operator = ScriptedOperator::answering("yes");

    let outcome = pipeline.run(&instruction("list a missing dir"), &mut operator, false).await;
    assert!(matches!(
        outcome,
        PipelineOutcome::Failed {
            stage: Stage::Execution,
            ..
        }
    ));

    let content = fs::read_to_string(&log_path).unwrap();
    assert!(content.contains("[exit:"));
    assert!(content.contains("] ls /no/such/path"));
    assert!(!content.contains("[exit:0]"));
    assert!(!content.contains("[exit:signal]"));
}

#[tokio::test]
async fn test_unstartable_shell_is_not_audited_as_execution() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("history.log");
    let audit = AuditLogger::open(&log_path).unwrap();

    let pipeline = Pipeline::new(translator("echo hi"), unusable_executor()).with_audit(audit);
    let mut operator = ScriptedOperator::answering("yes");

    let outcome = pipeline.run(&instruction("say hi"), &mut operator, false).await;

    match outcome {
        PipelineOutcome::Failed {
            stage,
            cause,
            output,
        } => {
            assert_eq!(stage, Stage::Execution);
            assert!(cause.contains("/nonexistent/shell"));
            assert_eq!(output, None);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    let content = fs::read_to_string(&log_path).unwrap();
    assert!(content.contains("[EXEC-FAILED] echo hi"));
    assert!(!content.contains("[exit:"));
}

#[tokio::test]
async fn test_abort_is_not_audited_as_execution() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("history.log");
    let audit = AuditLogger::open(&log_path).unwrap();

    let pipeline = Pipeline::new(translator("echo never"), unusable_executor()).with_audit(audit);
    let mut operator = ScriptedOperator::answering("no");

    pipeline.run(&instruction("say never"), &mut operator, false).await;

    assert!(!log_path.exists() || fs::read_to_string(&log_path).unwrap().is_empty());
}

#[tokio::test]
async fn test_textual_prefix_limitation_is_documented() {
    // The policy only checks the leading token; shell grammar is not parsed.
    let pipeline = Pipeline::new(translator("ls; rm -rf /"), unusable_executor());
    let mut operator = ScriptedOperator::answering("dry-run");

    let outcome = pipeline.run(&instruction("list"), &mut operator, false).await;
    assert!(matches!(outcome, PipelineOutcome::DryRun(_)));
}
