//! services/client/src/view.rs
//!
//! Plain-text rendering of the workflow for the terminal client.

use coursehub_core::domain::ChatRole;
use coursehub_core::workflow::{FileListing, Phase, Workflow};
use coursehub_core::Category;
use std::fmt::Write;

pub fn render(wf: &Workflow) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_view(&mut out, wf);
    out
}

/// Just the course list, whatever else is selected.
pub fn render_courses(wf: &Workflow) -> String {
    let mut out = String::new();
    let _ = write_course_list(&mut out, wf);
    out
}

fn write_course_list(out: &mut String, wf: &Workflow) -> std::fmt::Result {
    if wf.courses_loading() {
        writeln!(out, "Loading courses...")?;
    } else if wf.courses().is_empty() {
        writeln!(out, "No courses loaded.")?;
    }
    for (i, course) in wf.courses().iter().enumerate() {
        let marker = if wf.selected_course().map(|c| &c.id) == Some(&course.id) { "*" } else { " " };
        let code = course.code.as_deref().unwrap_or("");
        writeln!(out, "{marker}{:>3}. {} {} ({})", i + 1, code, course.name, course.id)?;
    }
    Ok(())
}

fn write_view(out: &mut String, wf: &Workflow) -> std::fmt::Result {
    if let Some(notice) = wf.notice() {
        writeln!(out, "! {notice}")?;
    }

    let context = match (wf.phase(), wf.context()) {
        (Phase::Active, Some(context)) => context,
        _ => {
            let semester = if wf.shape().requires_semester() { ", semester" } else { "" };
            return writeln!(out, "Welcome to CourseHub. Choose your major, year{semester} with 'setup'.");
        }
    };

    let mut tags = vec![context.major.label(), context.year.label()];
    if let Some(semester) = context.semester {
        tags.push(semester.label());
    }
    writeln!(out, "[{}]", tags.join(" | "))?;

    match (wf.selected_course(), wf.selected_category()) {
        (Some(course), Some(category)) => {
            writeln!(out, "{} / {}", course.name, category.label())?;
            match wf.file_listing() {
                FileListing::Loading => writeln!(out, "  loading files...")?,
                FileListing::Ready(files) if files.is_empty() => {
                    writeln!(out, "  No files available yet.")?
                }
                FileListing::Ready(files) => {
                    for file in files {
                        let date = file.date.as_deref().unwrap_or("");
                        writeln!(out, "  - {} {} <{}>", file.label, date, file.url)?;
                    }
                }
                FileListing::Failed | FileListing::Idle => {}
            }
        }
        _ => write_course_list(out, wf)?,
    }

    if wf.category_gate_open() {
        if let Some(course) = wf.selected_course() {
            writeln!(out, "{}: what would you like to access?", course.name)?;
            for category in Category::ALL {
                writeln!(out, "  {:<12} {}", category.key(), category.label())?;
            }
        }
    }

    if wf.chat_visible() {
        writeln!(out, "--- chat ---")?;
        if wf.chat_history().is_empty() {
            writeln!(out, "  Ask me anything about your course materials.")?;
        }
        for message in wf.chat_history() {
            let who = match message.role {
                ChatRole::User => "you",
                ChatRole::Assistant => "ai",
            };
            let at = message.sent_at.format("%H:%M");
            writeln!(out, "  [{at}] {who}: {}", message.content)?;
        }
        if wf.answer_pending() {
            writeln!(out, "  ai is thinking...")?;
        }
    }
    Ok(())
}
