use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::command::{SanitizedCommand, COMMAND_LABEL};
use crate::security::{APPROVED_BASE_COMMANDS, FIND_COMMAND};

static GLOBAL_POLICY: LazyLock<CommandPolicy> = LazyLock::new(|| {
    CommandPolicy::from_base_commands(APPROVED_BASE_COMMANDS)
        .expect("built-in policy patterns must compile")
});

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Command not allowed by policy: {command}")]
    PolicyRejected { command: String },
}

/// A command that matched at least one policy rule
///
/// Only [`CommandPolicy::validate`] creates these, so holding one proves the
/// text went through the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCommand {
    command: String,
    rule: String,
}

impl ValidatedCommand {
    pub fn as_str(&self) -> &str {
        &self.command
    }

    /// Name of the rule that accepted the command
    pub fn rule(&self) -> &str {
        &self.rule
    }
}

impl fmt::Display for ValidatedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command)
    }
}

enum RuleKind {
    /// Leading token equals an approved base command
    Direct { pattern: Regex },
    /// `find` whose `-exec` clauses all run approved base commands
    FindExec {
        prefix: Regex,
        clause: Regex,
        approved: HashSet<String>,
    },
}

pub struct PolicyRule {
    name: String,
    kind: RuleKind,
}

impl PolicyRule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, command: &str) -> bool {
        match &self.kind {
            RuleKind::Direct { pattern } => pattern.is_match(command),
            RuleKind::FindExec {
                prefix,
                clause,
                approved,
            } => {
                if !prefix.is_match(command) {
                    return false;
                }

                let mut clauses = clause
                    .captures_iter(command)
                    .filter_map(|caps| caps.get(1))
                    .peekable();

                // No -exec at all: plain `find` is not a base command
                if clauses.peek().is_none() {
                    return false;
                }

                clauses.all(|utility| approved.contains(utility.as_str()))
            }
        }
    }
}

/// Ordered allow-list of command patterns
///
/// Built once and read-only afterwards. Anything that matches no rule is
/// refused; there is no deny-list.
///
/// Matching is textual and anchored at the start of the command. It does not
/// understand shell grammar, so `ls; rm -rf /` passes because it starts with
/// `ls`.
pub struct CommandPolicy {
    rules: Vec<PolicyRule>,
}

impl fmt::Debug for CommandPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandPolicy")
            .field("rule_count", &self.rules.len())
            .finish()
    }
}

impl CommandPolicy {
    /// The process-wide policy built from [`APPROVED_BASE_COMMANDS`]
    pub fn global() -> &'static CommandPolicy {
        &GLOBAL_POLICY
    }

    /// Compile one direct rule per base command, then the `find -exec` rule
    pub fn from_base_commands(base_commands: &[&str]) -> Result<Self, regex::Error> {
        // The sanitizer already strips the label; accepting it here as well
        // keeps callers that skip sanitization under the same rules.
        let label = format!(r"^(?:{}\s*)?", regex::escape(COMMAND_LABEL));

        let names: Vec<&str> = base_commands
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .collect();

        let mut rules = Vec::with_capacity(names.len() + 1);
        for name in &names {
            let pattern = Regex::new(&format!(r"{}{}(?:\s|$)", label, regex::escape(name)))?;
            rules.push(PolicyRule {
                name: (*name).to_string(),
                kind: RuleKind::Direct { pattern },
            });
        }

        rules.push(PolicyRule {
            name: format!("{} -exec", FIND_COMMAND),
            kind: RuleKind::FindExec {
                prefix: Regex::new(&format!(r"{}{}\s", label, regex::escape(FIND_COMMAND)))?,
                clause: Regex::new(r"\s-exec\s+(\S+)")?,
                approved: names.iter().map(|name| name.to_string()).collect(),
            },
        });

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[PolicyRule] {
        &self.rules
    }

    /// First rule, in order, that accepts the command
    pub fn evaluate(&self, command: &str) -> Option<&PolicyRule> {
        self.rules.iter().find(|rule| rule.matches(command))
    }

    pub fn is_allowed(&self, command: &str) -> bool {
        self.evaluate(command).is_some()
    }

    pub fn validate(&self, command: SanitizedCommand) -> Result<ValidatedCommand, ValidationError> {
        match self.evaluate(command.as_str()) {
            Some(rule) => Ok(ValidatedCommand {
                rule: rule.name.clone(),
                command: command.into_inner(),
            }),
            None => Err(ValidationError::PolicyRejected {
                command: command.into_inner(),
            }),
        }
    }
}
