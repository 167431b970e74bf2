//! Workflow schema — the declarative graph of who talks to whom, about
//! what, in what order.
//!
//! Two layers live here. `WorkflowDefinition` is the serde-facing shape:
//! roles, artifacts, conversations and phases in flat sections that
//! reference each other by name, loadable from YAML. `resolve()` links it
//! into the runtime model, where conversations share their roles and
//! artifacts (`Arc`) and phases/workflows carry explicit cursors so that
//! "ended" and "advance" stay trivially inspectable state.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A persona in the role-play, with the model that backs its turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub description: String,
    pub model: String,
}

impl Role {
    /// The catalogue line handed to the model in the system instruction.
    pub fn catalog_entry(&self) -> String {
        format!("('role' name:[{}], description:[{}])", self.name, self.description)
    }
}

/// A named conceptual input/output of a conversation. Carries no data —
/// the actual content lives as files in the workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub description: String,
}

impl Artifact {
    pub fn catalog_entry(&self) -> String {
        format!(
            "('artifact' name:[{}], description:[{}])",
            self.name, self.description
        )
    }
}

/// One scripted exchange between two roles, turning the input artifact
/// into the output artifact.
#[derive(Debug, Clone)]
pub struct Conversation {
    pub name: String,
    pub description: String,
    pub lead: Arc<Role>,
    pub assistant: Arc<Role>,
    pub input: Arc<Artifact>,
    pub output: Arc<Artifact>,
}

impl Conversation {
    pub fn catalog_entry(&self) -> String {
        format!(
            "('conversation' name:[{}], description:[{}], lead name:[{}], assistant name:[{}], input name:[{}], output name:[{}])",
            self.name,
            self.description,
            self.lead.name,
            self.assistant.name,
            self.input.name,
            self.output.name
        )
    }
}

/// An ordered group of conversations with a cursor over them.
#[derive(Debug, Clone)]
pub struct Phase {
    pub name: String,
    pub description: String,
    conversations: Vec<Conversation>,
    cursor: usize,
}

impl Phase {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        conversations: Vec<Conversation>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            conversations,
            cursor: 0,
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn ended(&self) -> bool {
        self.cursor >= self.conversations.len()
    }

    pub fn current_conversation(&self) -> Result<&Conversation, EngineError> {
        if self.ended() {
            return Err(EngineError::PhaseEnded(self.name.clone()));
        }
        Ok(&self.conversations[self.cursor])
    }

    pub fn next_conversation(&mut self) -> Result<(), EngineError> {
        if self.ended() {
            return Err(EngineError::PhaseEnded(self.name.clone()));
        }
        self.cursor += 1;
        Ok(())
    }

    pub fn catalog_entry(&self) -> String {
        let names: Vec<&str> = self
            .conversations
            .iter()
            .map(|conversation| conversation.name.as_str())
            .collect();
        format!(
            "('phase' name:[{}], description:[{}], conversation names:[{}])",
            self.name,
            self.description,
            names.join(",")
        )
    }
}

/// An ordered group of phases with a cursor, one level above [`Phase`].
#[derive(Debug, Clone)]
pub struct Workflow {
    pub name: String,
    pub description: String,
    phases: Vec<Phase>,
    cursor: usize,
}

impl Workflow {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        phases: Vec<Phase>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            phases,
            cursor: 0,
        }
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn ended(&self) -> bool {
        self.cursor >= self.phases.len()
    }

    pub fn current_phase(&self) -> Result<&Phase, EngineError> {
        if self.ended() {
            return Err(EngineError::WorkflowEnded(self.name.clone()));
        }
        Ok(&self.phases[self.cursor])
    }

    fn current_phase_mut(&mut self) -> Result<&mut Phase, EngineError> {
        if self.ended() {
            return Err(EngineError::WorkflowEnded(self.name.clone()));
        }
        Ok(&mut self.phases[self.cursor])
    }

    pub fn next_phase(&mut self) -> Result<(), EngineError> {
        if self.ended() {
            return Err(EngineError::WorkflowEnded(self.name.clone()));
        }
        self.cursor += 1;
        Ok(())
    }

    pub fn phase_ended(&self) -> Result<bool, EngineError> {
        Ok(self.current_phase()?.ended())
    }

    pub fn current_conversation(&self) -> Result<&Conversation, EngineError> {
        self.current_phase()?.current_conversation()
    }

    pub fn next_conversation(&mut self) -> Result<(), EngineError> {
        self.current_phase_mut()?.next_conversation()
    }

    /// Every role referenced by the workflow, deduplicated, in first-use
    /// order. Roles are shared across conversations; sharing one role
    /// twice yields one entry.
    pub fn roles(&self) -> Vec<Arc<Role>> {
        let mut seen = Vec::<Arc<Role>>::new();
        for phase in &self.phases {
            for conversation in &phase.conversations {
                for role in [&conversation.lead, &conversation.assistant] {
                    if !seen.iter().any(|known| known.name == role.name) {
                        seen.push(Arc::clone(role));
                    }
                }
            }
        }
        seen
    }

    /// Every artifact referenced by the workflow, deduplicated, in
    /// first-use order.
    pub fn artifacts(&self) -> Vec<Arc<Artifact>> {
        let mut seen = Vec::<Arc<Artifact>>::new();
        for phase in &self.phases {
            for conversation in &phase.conversations {
                for artifact in [&conversation.input, &conversation.output] {
                    if !seen.iter().any(|known| known.name == artifact.name) {
                        seen.push(Arc::clone(artifact));
                    }
                }
            }
        }
        seen
    }

    /// Every conversation of the workflow, deduplicated by name, in
    /// first-use order.
    pub fn conversations(&self) -> Vec<&Conversation> {
        let mut seen = Vec::<&Conversation>::new();
        for phase in &self.phases {
            for conversation in &phase.conversations {
                if !seen.iter().any(|known| known.name == conversation.name) {
                    seen.push(conversation);
                }
            }
        }
        seen
    }
}

// ---------------------------------------------------------------------------
// Serde-facing definition (YAML / built-ins)
// ---------------------------------------------------------------------------

/// A workflow definition as written in YAML (or built in code):
///
/// ```yaml
/// name: "Software Development"
/// description: "Develops a software project"
///
/// roles:
///   - name: Programmer
///     description: "..."
///     model: gpt-4o
///
/// artifacts:
///   - name: Task
///     description: "..."
///
/// conversations:
///   - name: Coding (Code)
///     description: "..."
///     lead: Programmer
///     assistant: Tester
///     input: Task
///     output: Code
///
/// phases:
///   - name: Coding
///     description: "..."
///     conversations: ["Coding (Code)"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub roles: Vec<Role>,
    pub artifacts: Vec<Artifact>,
    pub conversations: Vec<ConversationDef>,
    pub phases: Vec<PhaseDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub lead: String,
    pub assistant: String,
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub conversations: Vec<String>,
}

impl WorkflowDefinition {
    pub fn from_yaml(source: &str) -> Result<Self, EngineError> {
        serde_yaml::from_str(source).map_err(|e| EngineError::Definition(e.to_string()))
    }

    /// Links the by-name references into the runtime model. Duplicate or
    /// unknown names are definition errors.
    pub fn resolve(&self) -> Result<Workflow, EngineError> {
        let roles = unique_by_name(
            self.roles.iter().map(|role| (role.name.clone(), Arc::new(role.clone()))),
            "role",
        )?;
        let artifacts = unique_by_name(
            self.artifacts
                .iter()
                .map(|artifact| (artifact.name.clone(), Arc::new(artifact.clone()))),
            "artifact",
        )?;

        let mut conversations = HashMap::new();
        for def in &self.conversations {
            let conversation = Conversation {
                name: def.name.clone(),
                description: def.description.clone(),
                lead: lookup(&roles, &def.lead, "role")?,
                assistant: lookup(&roles, &def.assistant, "role")?,
                input: lookup(&artifacts, &def.input, "artifact")?,
                output: lookup(&artifacts, &def.output, "artifact")?,
            };
            if conversations.insert(def.name.clone(), conversation).is_some() {
                return Err(EngineError::Definition(format!(
                    "duplicate conversation '{}'",
                    def.name
                )));
            }
        }

        let mut phases = Vec::with_capacity(self.phases.len());
        for def in &self.phases {
            let mut members = Vec::with_capacity(def.conversations.len());
            for name in &def.conversations {
                let conversation = conversations.get(name).ok_or_else(|| {
                    EngineError::Definition(format!("unknown conversation '{name}'"))
                })?;
                members.push(conversation.clone());
            }
            phases.push(Phase::new(def.name.clone(), def.description.clone(), members));
        }

        Ok(Workflow::new(self.name.clone(), self.description.clone(), phases))
    }
}

fn unique_by_name<T>(
    entries: impl Iterator<Item = (String, T)>,
    kind: &str,
) -> Result<HashMap<String, T>, EngineError> {
    let mut map = HashMap::new();
    for (name, value) in entries {
        if map.insert(name.clone(), value).is_some() {
            return Err(EngineError::Definition(format!("duplicate {kind} '{name}'")));
        }
    }
    Ok(map)
}

fn lookup<T: Clone>(
    map: &HashMap<String, T>,
    name: &str,
    kind: &str,
) -> Result<T, EngineError> {
    map.get(name)
        .cloned()
        .ok_or_else(|| EngineError::Definition(format!("unknown {kind} '{name}'")))
}
