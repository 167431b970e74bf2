//! Built-in workflow definitions.
//!
//! Shipped definitions cover the two bundled scenarios: a minimal
//! software-development run (programmer + tester) and a documentation
//! pass over an existing project. Custom workflows load from YAML files
//! instead (see `schema::WorkflowDefinition::from_yaml`).

use crate::workflow::schema::{
    Artifact, ConversationDef, PhaseDef, Role, WorkflowDefinition,
};

/// All built-in workflow definitions, keyed by [`WorkflowDefinition::name`]
/// slug via [`find`].
pub fn builtin_workflows() -> Vec<WorkflowDefinition> {
    vec![tiny_software_development(), documentation()]
}

/// Looks a built-in up by its slug (`tiny-software-development`,
/// `documentation`).
pub fn find(slug: &str) -> Option<WorkflowDefinition> {
    builtin_workflows()
        .into_iter()
        .find(|definition| slugify(&definition.name) == slug)
}

/// The slugs of every built-in, for CLI listings.
pub fn slugs() -> Vec<String> {
    builtin_workflows()
        .iter()
        .map(|definition| slugify(&definition.name))
        .collect()
}

fn slugify(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn tiny_software_development() -> WorkflowDefinition {
    WorkflowDefinition {
        name: "Tiny Software Development".to_string(),
        description: "Develops a software project".to_string(),
        roles: vec![
            Role {
                name: "Programmer".to_string(),
                description: "You are an intermediate programmer. You can program really well, \
                    but not perfect. You don't understand all best practices yet, but the code \
                    you produce works and is solid. You understand software architecture and can \
                    implement it. You will write fully-fledged software projects."
                    .to_string(),
                model: "gpt-4o".to_string(),
            },
            Role {
                name: "Tester".to_string(),
                description: "You are a software tester. You test code, uncover problems that \
                    the programmer can resolve. You write test concepts that the programmer can \
                    implement. You put your tests in a fitting manner into the software projects \
                    and make sure they can be run normally."
                    .to_string(),
                model: "claude-3-opus-20240229".to_string(),
            },
        ],
        artifacts: vec![
            Artifact {
                name: "Task".to_string(),
                description: "The business task as defined by the customer. It should be \
                    realised as a software product or feature."
                    .to_string(),
            },
            Artifact {
                name: "Code".to_string(),
                description: "The code to be written by the workflow participants".to_string(),
            },
            Artifact {
                name: "Tested Code".to_string(),
                description: "Code that was improved with tests that have been written"
                    .to_string(),
            },
        ],
        conversations: vec![
            ConversationDef {
                name: "Coding (Code)".to_string(),
                description: "The initial implementation of the given use-cases realized as \
                    code. The code is not perfect yet, but it works."
                    .to_string(),
                lead: "Programmer".to_string(),
                assistant: "Tester".to_string(),
                input: "Task".to_string(),
                output: "Code".to_string(),
            },
            ConversationDef {
                name: "Coding (Test)".to_string(),
                description: "The given code is tested if it contains all business cases. \
                    Tests are written by the programmer by the test concept given by the tester."
                    .to_string(),
                lead: "Programmer".to_string(),
                assistant: "Tester".to_string(),
                input: "Code".to_string(),
                output: "Tested Code".to_string(),
            },
        ],
        phases: vec![PhaseDef {
            name: "Coding".to_string(),
            description: "The coding phase. Here the actual code implementation is created. \
                Actual code is output in Markdown code blocks with the file name in bold above \
                the block. A code project will be created in the file system that follows the \
                best practices of the languages the project is written in."
                .to_string(),
            conversations: vec!["Coding (Code)".to_string(), "Coding (Test)".to_string()],
        }],
    }
}

fn documentation() -> WorkflowDefinition {
    WorkflowDefinition {
        name: "Documentation".to_string(),
        description: "Write documentation for an existing project. Your only job is to write \
            documentation, don't change any existing code or logic!"
            .to_string(),
        roles: vec![
            Role {
                name: "Programmer A".to_string(),
                description: "You are a senior programmer that looks at existing code and \
                    documents it properly, depending on the language the code is written in. \
                    You follow a strict format and stick to previously established standards. \
                    You always stick to standards during documentation."
                    .to_string(),
                model: "gpt-4o".to_string(),
            },
            Role {
                name: "Programmer B".to_string(),
                description: "You are a senior programmer that looks at existing code and \
                    documents it properly, depending on the language the code is written in. \
                    You follow a strict format and stick to previously established standards. \
                    You always stick to standards during documentation."
                    .to_string(),
                model: "gpt-4o".to_string(),
            },
        ],
        artifacts: vec![
            Artifact {
                name: "Existing Code".to_string(),
                description: "The existing code that resides in the workspace directory. You \
                    can read, list and write it. Make sure to ignore common ignore patterns, \
                    e.g. node_modules, build/, target/, __pycache__ etc."
                    .to_string(),
            },
            Artifact {
                name: "Documented Code".to_string(),
                description: "The code that was documented by the workflow participants."
                    .to_string(),
            },
        ],
        conversations: vec![ConversationDef {
            name: "Documentation".to_string(),
            description: "In this conversation the documentation for existing code is written. \
                You read existing code, take a look at it and relate it to other code found and \
                write down the respective doc blocks, function and variable documentation and \
                very important comments for parts that stick out. If the code is \
                self-explanatory, don't explain it in detail, only stick to doc blocks."
                .to_string(),
            lead: "Programmer A".to_string(),
            assistant: "Programmer B".to_string(),
            input: "Existing Code".to_string(),
            output: "Documented Code".to_string(),
        }],
        phases: vec![PhaseDef {
            name: "Documentation".to_string(),
            description: "In this phase, documentation for the code is written.".to_string(),
            conversations: vec!["Documentation".to_string()],
        }],
    }
}
