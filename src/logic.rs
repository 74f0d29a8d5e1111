/*
Task query pipeline and statistics.
Module is written independently from HTTP / Axum for testing.

Every day comparison happens on calendar days in the offset of `now`,
never on full timestamps.
*/

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::models::{FilterOptions, Priority, SortBy, Task, TaskStatus};

// Focus mode never shows more than this many tasks
pub const FOCUS_LIMIT: usize = 3;

pub fn now_fixed_offset() -> DateTime<FixedOffset> {
    chrono::Local::now().fixed_offset()
}

/// Clock and display flags a query runs under.
#[derive(Debug, Clone, Copy)]
pub struct QueryContext {
    pub now: DateTime<FixedOffset>,
    pub focus_mode: bool,
}

impl QueryContext {
    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    // Due timestamp truncated to a calendar day in the local offset
    fn day_of(&self, due: &DateTime<FixedOffset>) -> NaiveDate {
        due.with_timezone(self.now.offset()).date_naive()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskGroups {
    pub overdue: Vec<Task>,
    pub today: Vec<Task>,
    pub upcoming: Vec<Task>,
    #[serde(rename = "no-date")]
    pub no_date: Vec<Task>,
}

/// Either temporal buckets or a flat sorted list, plus completed tasks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TaskView {
    Grouped {
        groups: TaskGroups,
        done: Vec<Task>,
        done_count: usize,
    },
    Sorted {
        tasks: Vec<Task>,
        done: Vec<Task>,
        done_count: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Overdue,
    Today,
    Upcoming,
    NoDate,
}

/// Classification order: no-date, overdue, today, upcoming.
pub fn bucket_of(task: &Task, ctx: &QueryContext) -> Bucket {
    let Some(due) = task.due_date.as_ref() else {
        return Bucket::NoDate;
    };
    let day = ctx.day_of(due);
    let today = ctx.today();
    if day < today {
        Bucket::Overdue
    } else if day == today {
        Bucket::Today
    } else {
        Bucket::Upcoming
    }
}

fn matches_search(task: &Task, needle: &str) -> bool {
    task.title.to_lowercase().contains(needle)
        || task
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}

/// Filter stages 1-5, in order, preserving input order.
pub fn filter_tasks<'a>(
    tasks: &'a [Task],
    search: &str,
    filters: &FilterOptions,
    ctx: &QueryContext,
) -> Vec<&'a Task> {
    let needle = search.to_lowercase();
    // only a single-day range narrows anything
    let single_day = filters
        .date_range
        .filter(|r| r.start == r.end)
        .map(|r| r.start);

    tasks
        .iter()
        .filter(|t| needle.is_empty() || matches_search(t, &needle))
        .filter(|t| filters.status.is_empty() || filters.status.contains(&t.status))
        .filter(|t| filters.priority.is_empty() || filters.priority.contains(&t.priority))
        .filter(|t| {
            filters.projects.is_empty()
                || t
                    .project_id
                    .as_ref()
                    .is_some_and(|p| filters.projects.contains(p))
        })
        .filter(|t| match single_day {
            None => true,
            Some(day) => t.due_date.as_ref().is_some_and(|d| ctx.day_of(d) == day),
        })
        .collect()
}

// Case-insensitive first, raw text as tie-break.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn compare(a: &Task, b: &Task, sort_by: SortBy) -> Ordering {
    match sort_by {
        // missing due dates go last
        SortBy::Date => match (&a.due_date, &b.due_date) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortBy::Name => compare_text(&a.title, &b.title),
        SortBy::Priority => b.priority.weight().cmp(&a.priority.weight()),
        SortBy::Tag => compare_text(
            a.project_id.as_deref().unwrap_or(""),
            b.project_id.as_deref().unwrap_or(""),
        ),
    }
}

/// Stable sort by one key.
pub fn sort_tasks(tasks: &mut [&Task], sort_by: SortBy) {
    tasks.sort_by(|a, b| compare(a, b, sort_by));
}

/// Keep non-done tasks due today, or undated high-priority ones; first three.
pub fn focus_filter<'a>(tasks: Vec<&'a Task>, ctx: &QueryContext) -> Vec<&'a Task> {
    tasks
        .into_iter()
        .filter(|t| t.status != TaskStatus::Done)
        .filter(|t| match t.due_date.as_ref() {
            Some(due) => ctx.day_of(due) == ctx.today(),
            None => t.priority == Priority::High,
        })
        .take(FOCUS_LIMIT)
        .collect()
}

pub fn group_tasks(tasks: &[&Task], ctx: &QueryContext) -> TaskGroups {
    let mut groups = TaskGroups::default();
    for task in tasks.iter().filter(|t| t.status != TaskStatus::Done) {
        let slot = match bucket_of(task, ctx) {
            Bucket::Overdue => &mut groups.overdue,
            Bucket::Today => &mut groups.today,
            Bucket::Upcoming => &mut groups.upcoming,
            Bucket::NoDate => &mut groups.no_date,
        };
        slot.push((*task).clone());
    }
    groups
}

/// Full pipeline: filter -> optional sort -> focus -> group or flat list.
///
/// Completed tasks are reported from the whole collection in input order,
/// independent of search, filters and focus.
pub fn query(tasks: &[Task], search: &str, filters: &FilterOptions, ctx: &QueryContext) -> TaskView {
    let mut selected = filter_tasks(tasks, search, filters, ctx);

    if let Some(sort_by) = filters.sort_by {
        sort_tasks(&mut selected, sort_by);
    }

    if ctx.focus_mode {
        selected = focus_filter(selected, ctx);
    }

    let done: Vec<Task> = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Done)
        .cloned()
        .collect();
    let done_count = done.len();

    match filters.sort_by {
        Some(_) => TaskView::Sorted {
            tasks: selected
                .into_iter()
                .filter(|t| t.status != TaskStatus::Done)
                .cloned()
                .collect(),
            done,
            done_count,
        },
        None => TaskView::Grouped {
            groups: group_tasks(&selected, ctx),
            done,
            done_count,
        },
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatistics {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    pub completion_rate: f64, // 0.0..=1.0
    pub by_priority: PriorityCounts,
    pub by_project: BTreeMap<String, usize>,
}

pub fn statistics(tasks: &[Task], ctx: &QueryContext) -> TaskStatistics {
    let mut stats = TaskStatistics {
        total: tasks.len(),
        ..TaskStatistics::default()
    };

    for task in tasks {
        if task.status == TaskStatus::Done {
            stats.completed += 1;
        } else {
            stats.pending += 1;
            if bucket_of(task, ctx) == Bucket::Overdue {
                stats.overdue += 1;
            }
        }

        match task.priority {
            Priority::High => stats.by_priority.high += 1,
            Priority::Medium => stats.by_priority.medium += 1,
            Priority::Low => stats.by_priority.low += 1,
        }

        if let Some(project) = &task.project_id {
            *stats.by_project.entry(project.clone()).or_default() += 1;
        }
    }

    if stats.total > 0 {
        stats.completion_rate = stats.completed as f64 / stats.total as f64;
    }
    stats
}
