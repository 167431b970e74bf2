//! ChatDev CLI — runs scripted multi-role AI workflows against a
//! workspace directory.
//!
//! Reuses the core domain logic (chatdev-core): workflow definitions,
//! provider adapters and the turn-taking state machine.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use chatdev_core::adapters::ProviderFactory;
use chatdev_core::config::ProviderConfig;
use chatdev_core::error::EngineError;
use chatdev_core::workflow::schema::WorkflowDefinition;
use chatdev_core::workflow::{builtin, WorkflowManager};

/// ChatDev — scripted multi-role AI software workflows
#[derive(Parser)]
#[command(name = "chatdev", version, about = "ChatDev — scripted multi-role AI software workflows")]
struct Cli {
    /// Instruction handled by the workflow.
    /// Example: chatdev -p "Build a todo app with a REST API"
    #[arg(short = 'p', long = "prompt")]
    prompt: Option<String>,

    /// Built-in workflow to run (see `chatdev workflows`)
    #[arg(long, default_value = "tiny-software-development")]
    workflow: String,

    /// Run a workflow definition from a YAML file instead of a built-in
    #[arg(long)]
    file: Option<PathBuf>,

    /// Workspace directory (defaults to workspaces/<generated id>)
    #[arg(long, env = "CHATDEV_WORKSPACE")]
    workspace: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in workflows
    Workflows,

    /// Validate a workflow YAML file without executing it
    Validate {
        /// Path to the workflow YAML file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // dotenv never overrides variables that are already set, so loading
    // .env.local first gives it precedence over .env
    dotenv::from_filename(".env.local").ok();
    dotenv::from_filename(".env").ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatdev_core=info,chatdev=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = if let Some(command) = cli.command {
        match command {
            Commands::Workflows => list_workflows(),
            Commands::Validate { file } => validate(&file).await,
        }
    } else if let Some(prompt) = cli.prompt {
        run(&cli.workflow, cli.file.as_deref(), &prompt, cli.workspace).await
    } else {
        // No prompt and no subcommand — show help
        use clap::CommandFactory;
        Cli::command().print_help().ok();
        println!();
        Ok(())
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn list_workflows() -> Result<(), EngineError> {
    let definitions = builtin::builtin_workflows();
    for (slug, definition) in builtin::slugs().into_iter().zip(&definitions) {
        println!("{:<28} {}", slug, definition.description);
    }
    Ok(())
}

async fn validate(file: &std::path::Path) -> Result<(), EngineError> {
    let definition = load_definition_file(file).await?;
    let workflow = definition.resolve()?;
    println!(
        "OK: '{}' — {} phase(s), {} conversation(s), {} role(s)",
        workflow.name,
        workflow.phases().len(),
        workflow.conversations().len(),
        workflow.roles().len()
    );
    Ok(())
}

async fn run(
    workflow_slug: &str,
    file: Option<&std::path::Path>,
    prompt: &str,
    workspace: Option<PathBuf>,
) -> Result<(), EngineError> {
    let definition = match file {
        Some(path) => load_definition_file(path).await?,
        None => builtin::find(workflow_slug).ok_or_else(|| {
            EngineError::Definition(format!(
                "unknown built-in workflow '{workflow_slug}' (available: {})",
                builtin::slugs().join(", ")
            ))
        })?,
    };
    let mut workflow = definition.resolve()?;

    let factory = ProviderFactory::new(ProviderConfig::from_env());
    let manager = WorkflowManager::new(&factory);
    let thread = manager.execute(&mut workflow, prompt, workspace).await?;

    println!(
        "Workflow '{}' finished — {} message(s), workspace: {}",
        workflow.name,
        thread.len(),
        thread.workspace_path().display()
    );
    Ok(())
}

async fn load_definition_file(path: &std::path::Path) -> Result<WorkflowDefinition, EngineError> {
    let source = tokio::fs::read_to_string(path).await?;
    WorkflowDefinition::from_yaml(&source)
}
