//! Courses command implementation.

use super::ensure_ready;
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use crate::rag::open_course_store;
use anyhow::Result;

/// Run the courses command.
pub async fn run_courses(settings: Settings) -> Result<()> {
    ensure_ready(Operation::Local)?;

    let store = open_course_store(&settings)?;
    let courses = store.get_all_courses_metadata().await?;

    if courses.is_empty() {
        Output::info("No courses loaded yet. Use 'syllabus load <files>' to add some.");
        return Ok(());
    }

    Output::header(&format!("Courses ({})", courses.len()));
    println!();
    for course in &courses {
        let mut line = format!("{} ({} lessons)", course.title, course.lessons.len());
        if let Some(instructor) = &course.instructor {
            line.push_str(&format!(", {}", instructor));
        }
        Output::list_item(&line);
    }

    Ok(())
}
