use std::io::{self, IsTerminal, Write};

use chrono::NaiveDate;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::datetime::format_date;
use crate::notify::Notifications;
use crate::task::{Priority, Task};
use crate::view::{CategoryCount, CategoryFilter, Summary};

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    json: bool,
}

impl Renderer {
    pub fn new(cfg: &Config, json: bool) -> Self {
        Self {
            color: cfg.color && io::stdout().is_terminal(),
            json,
        }
    }

    /// No color, tables only. Used where output is captured.
    pub fn plain() -> Self {
        Self {
            color: false,
            json: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn json(&self) -> bool {
        self.json
    }

    pub fn print_json<W: Write, T: Serialize + ?Sized>(
        &self,
        out: &mut W,
        value: &T,
    ) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut *out, value)?;
        writeln!(out)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, out, tasks, today))]
    pub fn print_task_table<W: Write>(
        &self,
        out: &mut W,
        tasks: &[Task],
        today: NaiveDate,
    ) -> anyhow::Result<()> {
        let headers = vec![
            "ID".to_string(),
            "Due".to_string(),
            "Category".to_string(),
            "Priority".to_string(),
            "Title".to_string(),
        ];

        let mut rows = Vec::with_capacity(tasks.len());

        for task in tasks {
            let id = self.paint(&task.id().to_string(), "33");

            let due = format_date(task.due());
            let due = if task.is_overdue(today) {
                self.paint(&due, "31")
            } else if task.days_until_due(today) == 0 && !task.is_completed() {
                self.paint(&due, "33")
            } else {
                due
            };

            let priority = match task.priority() {
                Priority::High => self.paint(task.priority().as_str(), "31"),
                Priority::Medium => self.paint(task.priority().as_str(), "33"),
                Priority::Low => task.priority().as_str().to_string(),
            };

            let title = if task.is_completed() {
                self.paint(task.title(), "9")
            } else {
                task.title().to_string()
            };

            rows.push(vec![
                id,
                due,
                task.category().name().to_string(),
                priority,
                title,
            ]);
        }

        write_table(out, headers, rows)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, out, task, today))]
    pub fn print_task_info<W: Write>(
        &self,
        out: &mut W,
        task: &Task,
        today: NaiveDate,
    ) -> anyhow::Result<()> {
        let state = if task.is_completed() {
            "completed"
        } else if task.is_overdue(today) {
            "overdue"
        } else {
            "active"
        };

        writeln!(out, "id          {}", task.id())?;
        writeln!(out, "uuid        {}", task.uuid())?;
        writeln!(out, "title       {}", task.title())?;
        writeln!(out, "description {}", task.description())?;
        writeln!(out, "category    {}", task.category().name())?;
        writeln!(out, "priority    {}", task.priority())?;
        writeln!(out, "due         {}", format_date(task.due()))?;
        writeln!(out, "created     {}", format_date(task.created()))?;
        writeln!(out, "status      {state}")?;
        Ok(())
    }

    pub fn print_summary<W: Write>(&self, out: &mut W, summary: &Summary) -> anyhow::Result<()> {
        writeln!(out, "Overview")?;
        writeln!(out, "  Total Tasks  {}", summary.total)?;
        writeln!(
            out,
            "  Completed    {}",
            self.paint(&summary.completed.to_string(), "32")
        )?;
        writeln!(
            out,
            "  Overdue      {}",
            self.paint(&summary.overdue.to_string(), "31")
        )?;
        writeln!(
            out,
            "  Due Soon     {}",
            self.paint(&summary.upcoming.to_string(), "33")
        )?;
        Ok(())
    }

    pub fn print_categories<W: Write>(
        &self,
        out: &mut W,
        counts: &[CategoryCount],
        total: usize,
        selected: CategoryFilter,
    ) -> anyhow::Result<()> {
        let marker = |filter: CategoryFilter| if filter == selected { "*" } else { " " };

        let mut rows = Vec::with_capacity(counts.len() + 1);
        rows.push(vec![
            marker(CategoryFilter::All).to_string(),
            "all".to_string(),
            "All Tasks".to_string(),
            total.to_string(),
        ]);
        for entry in counts {
            rows.push(vec![
                marker(CategoryFilter::Only(entry.category)).to_string(),
                entry.category.id().to_string(),
                entry.category.name().to_string(),
                entry.count.to_string(),
            ]);
        }

        write_table(
            out,
            vec![
                " ".to_string(),
                "ID".to_string(),
                "Category".to_string(),
                "Tasks".to_string(),
            ],
            rows,
        )
    }

    pub fn print_notifications<W: Write>(
        &self,
        out: &mut W,
        notes: &Notifications,
    ) -> anyhow::Result<()> {
        if notes.is_empty() {
            writeln!(out, "No deadline notifications.")?;
            return Ok(());
        }

        writeln!(out, "Deadline Notifications")?;
        if let Some(headline) = notes.overdue_headline() {
            writeln!(out, "  {}", self.paint(&headline, "31"))?;
            for task in notes.overdue_preview() {
                writeln!(out, "    • {}", task.title())?;
            }
        }
        if let Some(headline) = notes.upcoming_headline() {
            writeln!(out, "  {}", self.paint(&headline, "33"))?;
            for task in notes.upcoming_preview() {
                writeln!(out, "    • {} (Due: {})", task.title(), format_date(task.due()))?;
            }
        }
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    writer: &mut W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    let mut line = String::new();
    for idx in 0..column_count {
        line.push_str(&format!("{:width$} ", headers[idx], width = widths[idx]));
    }
    writeln!(writer, "{}", line.trim_end())?;

    line.clear();
    for width in &widths {
        line.push_str(&format!("{:-<width$} ", "", width = width));
    }
    writeln!(writer, "{}", line.trim_end())?;

    for row in rows {
        line.clear();
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            line.push_str(&format!("{}{} ", cell, " ".repeat(padding)));
        }
        writeln!(writer, "{}", line.trim_end())?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
