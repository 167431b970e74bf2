//! Workflow manager — interprets a workflow as a scripted state machine.
//!
//! The manager feeds sentinel commands into the thread and inspects each
//! reply's text for control tokens, advancing the phase/conversation
//! cursors on top of the conversation loop:
//!
//! sanity check → for each phase: `START PHASE` → for each conversation:
//! `START CONVERSATION` → alternating `SWITCH` exchanges → next cursor.
//!
//! The sanity check and every phase start must be acknowledged with a
//! trailing `SUCCESS`; anything else is an unrecoverable misunderstanding
//! between orchestrator and model and aborts the run. Turn exchanges end
//! on `END CONVERSATION` or after a hard cap of exchanges, whichever
//! comes first — the cap is a silent forced end, not an error.

use std::path::PathBuf;
use std::sync::Arc;

use uuid::Uuid;

use crate::adapters::{AdapterResolver, ProviderAdapter};
use crate::conversation::ConversationLoop;
use crate::error::EngineError;
use crate::models::Thread;
use crate::tools::{ToolExecutor, ToolRegistry};
use crate::workflow::control;
use crate::workflow::schema::{Conversation, Role, Workflow};

/// Hard bound on SWITCH exchanges per conversation, independent of model
/// behavior.
pub const MAX_EXCHANGES: usize = 10;

/// Which of the two conversation roles speaks next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Speaker {
    Lead,
    Assistant,
}

impl Speaker {
    fn other(self) -> Self {
        match self {
            Self::Lead => Self::Assistant,
            Self::Assistant => Self::Lead,
        }
    }

    fn role(self, conversation: &Conversation) -> &Arc<Role> {
        match self {
            Self::Lead => &conversation.lead,
            Self::Assistant => &conversation.assistant,
        }
    }
}

pub struct WorkflowManager<'a> {
    resolver: &'a dyn AdapterResolver,
    registry: ToolRegistry,
    executor: ToolExecutor,
    max_exchanges: usize,
}

impl<'a> WorkflowManager<'a> {
    pub fn new(resolver: &'a dyn AdapterResolver) -> Self {
        Self {
            resolver,
            registry: ToolRegistry::standard(),
            executor: ToolExecutor::new(),
            max_exchanges: MAX_EXCHANGES,
        }
    }

    /// Runs the workflow to completion over `input`, mutating the
    /// workflow's cursors in place and returning the finished thread.
    ///
    /// Without an explicit workspace path the run gets a fresh directory
    /// under `workspaces/`.
    pub async fn execute(
        &self,
        workflow: &mut Workflow,
        input: &str,
        workspace_path: Option<PathBuf>,
    ) -> Result<Thread, EngineError> {
        let workspace = workspace_path.unwrap_or_else(|| {
            PathBuf::from("workspaces").join(Uuid::new_v4().simple().to_string())
        });
        tokio::fs::create_dir_all(&workspace).await?;
        let mut thread = Thread::new(workspace);

        // The first conversation's lead opens the run.
        let mut adapter = self
            .resolver
            .adapter(&workflow.current_conversation()?.lead.model)?;

        thread.append_text_message(instructions(workflow, input));
        self.generate(adapter.as_ref(), &mut thread).await?;
        let reply = thread.last_message_text().unwrap_or_default().to_string();
        if !control::acknowledged(&reply) {
            return Err(EngineError::Protocol(format!(
                "sanity check failed, reply was '{reply}'"
            )));
        }

        while !workflow.ended() {
            let phase_name = workflow.current_phase()?.name.clone();
            tracing::info!(phase = %phase_name, "Starting phase");

            thread.append_text_message(control::start_phase_command(&phase_name));
            self.generate(adapter.as_ref(), &mut thread).await?;
            let reply = thread.last_message_text().unwrap_or_default().to_string();
            if !control::acknowledged(&reply) {
                return Err(EngineError::Protocol(format!(
                    "start of phase '{phase_name}' rejected, reply was '{reply}'"
                )));
            }

            while !workflow.phase_ended()? {
                let conversation = workflow.current_conversation()?.clone();
                tracing::info!(conversation = %conversation.name, "Starting conversation");

                adapter = self.resolver.adapter(&conversation.lead.model)?;
                thread.append_text_message(control::start_conversation_command(&conversation.name));
                self.generate(adapter.as_ref(), &mut thread).await?;
                print_reply(&thread);

                let mut exchanges = 0usize;
                let mut speaker = Speaker::Assistant;
                loop {
                    // Every role may be backed by a different model, so the
                    // adapter is resolved fresh on each SWITCH.
                    adapter = self.resolver.adapter(&speaker.role(&conversation).model)?;
                    thread.append_text_message(control::SWITCH);
                    self.generate(adapter.as_ref(), &mut thread).await?;
                    print_reply(&thread);

                    exchanges += 1;
                    let reply = thread.last_message_text().unwrap_or_default();
                    if control::requests_conversation_end(reply)
                        || exchanges >= self.max_exchanges
                    {
                        break;
                    }
                    speaker = speaker.other();
                }

                workflow.next_conversation()?;
            }
            workflow.next_phase()?;
        }

        Ok(thread)
    }

    async fn generate(
        &self,
        adapter: &dyn ProviderAdapter,
        thread: &mut Thread,
    ) -> Result<(), EngineError> {
        ConversationLoop::new(adapter, &self.registry, &self.executor)
            .generate_response(thread)
            .await
    }
}

fn print_reply(thread: &Thread) {
    println!("{}\n", thread.last_message_text().unwrap_or_default());
    println!("=====\n");
}

/// The system instruction opening every run: the role-play contract, the
/// sentinel command protocol, and the workflow's catalogues.
fn instructions(workflow: &Workflow, input: &str) -> String {
    let roles = workflow
        .roles()
        .iter()
        .map(|role| role.catalog_entry())
        .collect::<Vec<_>>()
        .join("\n");
    let artifacts = workflow
        .artifacts()
        .iter()
        .map(|artifact| artifact.catalog_entry())
        .collect::<Vec<_>>()
        .join("\n");
    let conversations = workflow
        .conversations()
        .iter()
        .map(|conversation| conversation.catalog_entry())
        .collect::<Vec<_>>()
        .join("\n");
    let phases = workflow
        .phases()
        .iter()
        .map(|phase| phase.catalog_entry())
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are roleplaying multiple people in a workflow, e.g. a company working on things in a process.
In each response you always only represent a single person.
The roleplay is structured in phases and each phase has conversations.
Each conversation always has a lead and an assistant role you are to impersonate.
Each conversation has an input type and an output type you will try to create.
Use all existing inputs and outputs created to properly create the respective output.

If requirements or input by the human are unclear, make it up by yourself.

Your main target is to use the tools given to achieve the respective output.
You will read and write files to create and further enhance outputs.
Each output artifact might create one or more new files or modify existing ones.

In my initial message I will provide instructions that are to be handled by the workflow based on the input of the conversation.
I provide you with descriptions of the conversations and the phases they belong to so that you know what to do.

When I say "START PHASE <Phase Name>" you will realize you are now in the named phase of the workflow.
You will respect what the phase is about, what the participating roles are and what the result should be.
If you understood everything in that phase say only "SUCCESS", if not say only "FAILURE"

When I say "START CONVERSATION <Conversation Name>" you will impersonate the lead of the conversation.
You will read the existing thread and everything in it carefully.
You will find an input per description. You answer to the provided assistant in respect to the roles and inputs described.

When I say "SWITCH" you will impersonate the assistant, read the whole thread and answer to the lead.

When I say "SWITCH" again you will impersonate the lead, read the whole thread again and answer to the assistant.

Each impersonation can explain things or ask questions.
If you feel like you are done, your message will only contain the conversation's desired
output and end with "END CONVERSATION". But don't end it just because you can, your target is
to create quality outputs.

Always start your responses with the name of the role, e.g.:

```
CEO:

<the message>
```

These are the roles you are to impersonate:
{roles}

These are the artifacts that are referenced as inputs and outputs in conversations:
{artifacts}

These are the conversations you are to hold. They are referenced in phases:
{conversations}

These are the phases you are going through:
{phases}

Here is a general description of the workflow for context:
{description}

This is the instruction you will handle with the workflow:
({input})

Don't use tools when you respond with any of the commands like SUCCESS, FAILURE, START, SWITCH, END etc.
Make sure that if you want to use tools, you first use the tools, wait for the response and only then answer with commands.

Answer, this once, with only "SUCCESS" if you understood everything and with only "FAILURE" if you didn't."#,
        roles = roles,
        artifacts = artifacts,
        conversations = conversations,
        phases = phases,
        description = workflow.description,
        input = input,
    )
}
