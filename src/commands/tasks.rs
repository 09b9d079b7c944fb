use crate::libs::config::ConfigStore;
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_error, msg_info, msg_print, msg_success};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TasksArgs {
    #[command(subcommand)]
    command: Option<TasksCommand>,
}

#[derive(Debug, Subcommand)]
enum TasksCommand {
    List,
    Add {
        task: String,
    },
    /// Remove by text or by 1-based number
    Remove {
        task: String,
    },
}

pub fn cmd(args: TasksArgs, store: &mut ConfigStore) -> Result<()> {
    match args.command.unwrap_or(TasksCommand::List) {
        TasksCommand::List => {
            let tasks = &store.config().main_tasks;
            if tasks.is_empty() {
                msg_info!(Message::NoMainTasks);
                return Ok(());
            }
            msg_print!(Message::MainTasksHeader, true);
            View::list("TASK", tasks);
        }
        TasksCommand::Add { task } => {
            let task = task.trim().to_string();
            if task.is_empty() {
                msg_error!(Message::EmptyTaskDescription);
                return Ok(());
            }
            if store.config().main_tasks.contains(&task) {
                msg_error!(Message::MainTaskExists(task));
                return Ok(());
            }
            store
                .update(|config| config.main_tasks.push(task.clone()))
                .inspect_err(|e| msg_error!(Message::ConfigSaveError(format!("{:#}", e))))?;
            msg_success!(Message::MainTaskAdded(task));
        }
        TasksCommand::Remove { task } => {
            let tasks = &store.config().main_tasks;
            let position = match task.trim().parse::<usize>() {
                Ok(index) => index.checked_sub(1).filter(|i| *i < tasks.len()),
                Err(_) => tasks.iter().position(|t| t == task.trim()),
            };
            let Some(position) = position else {
                msg_error!(Message::MainTaskNotFound(task));
                return Ok(());
            };
            let mut removed = String::new();
            store
                .update(|config| removed = config.main_tasks.remove(position))
                .inspect_err(|e| msg_error!(Message::ConfigSaveError(format!("{:#}", e))))?;
            msg_success!(Message::MainTaskRemoved(removed));
        }
    }

    Ok(())
}
