use std::io::Write;

use almanac_core::config::AlmanacConfig;
use almanac_core::edit::{EditOutcome, EditRequest, apply_edit};
use almanac_core::gesture::{creation_allowed, resize_task};
use almanac_core::grid::MonthGrid;
use almanac_core::layout::layout_month;
use almanac_core::store::TaskStore;
use almanac_core::task::{Edge, Task};
use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::cli::{Command, FilterArgs};
use crate::datastore::DataStore;
use crate::render::{DEFAULT_CELL_WIDTH, Renderer};

pub struct Session<'a, W: Write> {
    pub store: &'a mut DataStore,
    pub config: &'a AlmanacConfig,
    pub renderer: Renderer,
    pub today: NaiveDate,
    pub out: W,
}

#[tracing::instrument(skip_all, fields(today = %session.today))]
pub fn dispatch<W: Write>(session: &mut Session<'_, W>, command: Option<Command>) -> anyhow::Result<()> {
    let command = command.unwrap_or(Command::Month {
        date: None,
        cell_width: DEFAULT_CELL_WIDTH,
        filter: FilterArgs::default(),
    });
    debug!(?command, "dispatching command");

    match command {
        Command::Month {
            date,
            cell_width,
            filter,
        } => cmd_month(session, date, cell_width, &filter),
        Command::List { filter } => cmd_list(session, &filter),
        Command::Add {
            title,
            start,
            end,
            category,
            description,
        } => {
            if !creation_allowed(start, session.today) {
                return Err(anyhow!(
                    "cannot create a task starting {start}, before today ({})",
                    session.today
                ));
            }
            let request = EditRequest::Create {
                start,
                end: end.unwrap_or(start),
            };
            let next = apply_edit(
                session.store.get_tasks(),
                &request,
                EditOutcome::Submit {
                    title,
                    description,
                    category,
                },
            )?;
            if let Some(task) = next.last() {
                writeln!(session.out, "Created task {}.", task.id)?;
            }
            session.store.set_tasks(next);
            Ok(())
        }
        Command::Edit {
            id,
            title,
            category,
            description,
            no_category,
            clear_description,
        } => {
            let task = find_task(session.store, &id)?;
            let description = if clear_description {
                None
            } else {
                description.or_else(|| task.description.clone())
            };
            let category = if no_category {
                None
            } else {
                category.or(task.category)
            };
            let outcome = EditOutcome::Submit {
                title: title.unwrap_or_else(|| task.title.clone()),
                description,
                category,
            };
            let next = apply_edit(session.store.get_tasks(), &EditRequest::Edit(task.clone()), outcome)?;
            session.store.set_tasks(next);
            writeln!(session.out, "Updated task {}.", task.id)?;
            Ok(())
        }
        Command::Resize { id, start, end } => {
            let task = find_task(session.store, &id)?;
            let (edge, date) = match (start, end) {
                (Some(date), _) => (Edge::Start, date),
                (None, Some(date)) => (Edge::End, date),
                (None, None) => return Err(anyhow!("resize needs --start or --end")),
            };

            match resize_task(session.store.get_tasks(), task.id, edge, date) {
                Some(next) => {
                    if let Some(updated) = next.iter().find(|t| t.id == task.id) {
                        info!(task = %task.id, start = %updated.start, end = %updated.end, "resized task");
                        writeln!(
                            session.out,
                            "Task {} now runs {} to {}.",
                            task.id, updated.start, updated.end
                        )?;
                    }
                    session.store.set_tasks(next);
                }
                None => {
                    writeln!(session.out, "Task {} unchanged.", task.id)?;
                }
            }
            Ok(())
        }
        Command::Delete { id } => {
            let task = find_task(session.store, &id)?;
            let next = apply_edit(session.store.get_tasks(), &EditRequest::Edit(task.clone()), EditOutcome::Delete)?;
            session.store.set_tasks(next);
            writeln!(session.out, "Deleted task {} '{}'.", task.id, task.title)?;
            Ok(())
        }
    }
}

fn find_task(store: &DataStore, raw: &str) -> anyhow::Result<Task> {
    let id = store.resolve_id(raw)?;
    store
        .find(id)
        .cloned()
        .with_context(|| format!("task disappeared: {id}"))
}

fn cmd_month<W: Write>(
    session: &mut Session<'_, W>,
    date: Option<NaiveDate>,
    cell_width: usize,
    filter: &FilterArgs,
) -> anyhow::Result<()> {
    let grid = MonthGrid::build(date.unwrap_or(session.today), session.today);
    let visible = filter.to_filter().apply(session.store.get_tasks(), session.today);
    let layout = layout_month(&grid, &visible);

    session
        .renderer
        .clone()
        .with_cell_width(cell_width)
        .write_month(&mut session.out, &grid, &layout, &visible, session.config)
}

fn cmd_list<W: Write>(session: &mut Session<'_, W>, filter: &FilterArgs) -> anyhow::Result<()> {
    let mut visible = filter.to_filter().apply(session.store.get_tasks(), session.today);
    visible.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.title.cmp(&b.title)));

    if visible.is_empty() {
        writeln!(session.out, "No matching tasks.")?;
        return Ok(());
    }
    session
        .renderer
        .write_task_table(&mut session.out, &visible, session.config)
}
