//! todo task command implementations.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{format_datetime, NewTask, SortField, Task};
use crate::output::{emit_success, HumanOutput};
use crate::service::TaskFilter;
use crate::validate;

use super::{Context, Session};

pub struct AddOptions {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub due: String,
}

pub struct FilterOptions {
    pub completed: Option<bool>,
    pub priority: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Serialize)]
struct TaskListOutput<'a> {
    total: usize,
    tasks: &'a [Task],
}

#[derive(Serialize)]
struct TaskCompletionOutput {
    id: u64,
    completed: bool,
}

#[derive(Serialize)]
struct TaskDeletedOutput {
    id: u64,
}

pub fn run_add(session: &Session, options: AddOptions) -> Result<()> {
    // Validate raw input before touching storage.
    let title = validate::require_title(&options.title)?;
    let priority = validate::parse_priority(&options.priority)?;
    let due_at = validate::parse_due(&options.due)?;

    let mut ctx = Context::load(&session.home())?;
    let user = ctx.login(session)?;
    let task = ctx.tasks.add_task(
        &user,
        NewTask {
            title,
            description: options.description,
            priority,
            due_at,
        },
    )?;

    let mut human = HumanOutput::new("Task added");
    human.push_summary("ID", task.id.to_string());
    human.push_summary("Priority", task.priority.as_str());
    human.push_summary("Due", format_datetime(&task.due_at));

    emit_success(session.output, "add", &task, Some(&human))
}

pub fn run_list(session: &Session, sort: Option<&str>) -> Result<()> {
    let ctx = Context::load(&session.home())?;
    let user = ctx.login(session)?;

    let field = match sort {
        Some(name) => SortField::from_name(name),
        None => ctx.config.query.sort_field(),
    };
    let tasks = ctx.tasks.sort_tasks(&user, field)?;

    let mut human = task_list_human("Tasks", &tasks);
    human.push_summary("Sorted by", field.as_str());
    if let Some(name) = sort {
        if SortField::parse_known(name).is_none() {
            human.push_warning(format!("unknown sort field '{name}', using createdAt"));
        }
    }
    if tasks.is_empty() {
        human.push_next_step("todo add <title> --due <yyyy-MM-dd>");
    }

    emit_task_list(session, "list", &tasks, &human)
}

pub fn run_show(session: &Session, id: u64) -> Result<()> {
    let ctx = Context::load(&session.home())?;
    let user = ctx.login(session)?;
    let task = ctx
        .tasks
        .find_task(&user, id)?
        .ok_or(Error::TaskNotFound(id))?;

    let mut human = HumanOutput::new(format!("Task #{}", task.id));
    human.push_summary("Title", task.title.as_str());
    if !task.description.is_empty() {
        human.push_summary("Description", task.description.as_str());
    }
    human.push_summary("Priority", task.priority.as_str());
    human.push_summary("Due", format_datetime(&task.due_at));
    human.push_summary("Completed", task.completed.to_string());
    human.push_summary("Created", format_datetime(&task.created_at));

    emit_success(session.output, "show", &task, Some(&human))
}

pub fn run_done(session: &Session, id: u64, completed: bool) -> Result<()> {
    let mut ctx = Context::load(&session.home())?;
    let user = ctx.login(session)?;
    if !ctx.tasks.mark_completed(&user, id, completed)? {
        return Err(Error::TaskNotFound(id));
    }

    let header = if completed {
        "Task completed"
    } else {
        "Task reopened"
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("ID", id.to_string());

    emit_success(
        session.output,
        "done",
        &TaskCompletionOutput { id, completed },
        Some(&human),
    )
}

pub fn run_delete(session: &Session, id: u64) -> Result<()> {
    let mut ctx = Context::load(&session.home())?;
    let user = ctx.login(session)?;
    if !ctx.tasks.delete_task(&user, id)? {
        return Err(Error::TaskNotFound(id));
    }

    let mut human = HumanOutput::new("Task deleted");
    human.push_summary("ID", id.to_string());

    emit_success(session.output, "delete", &TaskDeletedOutput { id }, Some(&human))
}

pub fn run_search(session: &Session, keyword: &str) -> Result<()> {
    let ctx = Context::load(&session.home())?;
    let user = ctx.login(session)?;
    let tasks = ctx.tasks.search_tasks(&user, keyword)?;

    let mut human = task_list_human("Search results", &tasks);
    human.push_summary("Keyword", keyword);

    emit_task_list(session, "search", &tasks, &human)
}

pub fn run_filter(session: &Session, options: FilterOptions) -> Result<()> {
    let filter = build_filter(options)?;
    if filter.is_empty() {
        return Err(Error::InvalidArgument(
            "give at least one of --completed, --priority, --from/--to".to_string(),
        ));
    }

    let ctx = Context::load(&session.home())?;
    let user = ctx.login(session)?;
    let tasks = ctx.tasks.filter_tasks(&user, &filter)?;

    let mut human = task_list_human("Filtered tasks", &tasks);
    if let Some(completed) = filter.completed {
        human.push_summary("Completed", completed.to_string());
    }
    if let Some(priority) = filter.priority {
        human.push_summary("Priority", priority.as_str());
    }
    if let Some((from, to)) = filter.due_range {
        human.push_summary(
            "Due between",
            format!("{} and {}", format_datetime(&from), format_datetime(&to)),
        );
        if from > to {
            human.push_warning("--from is after --to; nothing can match");
        }
    }

    emit_task_list(session, "filter", &tasks, &human)
}

fn build_filter(options: FilterOptions) -> Result<TaskFilter> {
    let priority = options
        .priority
        .as_deref()
        .map(validate::parse_priority)
        .transpose()?;
    let due_range = match (options.from.as_deref(), options.to.as_deref()) {
        (Some(from), Some(to)) => Some((validate::parse_due(from)?, validate::parse_due(to)?)),
        (None, None) => None,
        _ => {
            return Err(Error::InvalidArgument(
                "--from and --to must be given together".to_string(),
            ))
        }
    };

    Ok(TaskFilter {
        keyword: None,
        completed: options.completed,
        priority,
        due_range,
    })
}

fn task_list_human(header: &str, tasks: &[Task]) -> HumanOutput {
    let mut human = HumanOutput::new(header);
    human.push_summary("Total", tasks.len().to_string());
    for task in tasks {
        human.push_detail(task_line(task));
    }
    human
}

fn emit_task_list(session: &Session, command: &str, tasks: &[Task], human: &HumanOutput) -> Result<()> {
    let output = TaskListOutput {
        total: tasks.len(),
        tasks,
    };
    emit_success(session.output, command, &output, Some(human))
}

fn task_line(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    let mut line = format!(
        "[{mark}] #{} [{}] {} (due {})",
        task.id,
        task.priority,
        task.title,
        format_datetime(&task.due_at)
    );
    if !task.description.is_empty() {
        line.push_str(&format!(" - {}", task.description));
    }
    line
}
