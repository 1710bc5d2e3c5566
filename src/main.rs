use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roll_call::agenda::Agenda;
use roll_call::config::AppConfig;
use roll_call::db::Database;
use roll_call::models::*;
use roll_call::{render, snapshot};

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "Take attendance one student at a time, with undo")]
struct Cli {
    /// SQLite database to use instead of the configured one
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage courses
    Course {
        #[command(subcommand)]
        action: CourseCommand,
    },
    /// Manage the students of a course
    Student {
        /// Course id or name (defaults to the selected course)
        #[arg(short, long)]
        course: Option<String>,

        #[command(subcommand)]
        action: StudentCommand,
    },
    /// Show or set the date marks are recorded against
    Date {
        /// Date as YYYY-MM-DD; "today" resets to the current date
        date: Option<String>,
    },
    /// Run an interactive roll call over a course
    Call {
        /// Course id or name (defaults to the selected course)
        #[arg(short, long)]
        course: Option<String>,

        /// Date to record this pass on, as YYYY-MM-DD (defaults to the selected
        /// date, which stays unchanged)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Show attendance totals for a course
    Report {
        /// Course id or name (defaults to the selected course)
        #[arg(short, long)]
        course: Option<String>,
    },
    /// Write a JSON snapshot of everything
    Export {
        /// Output file (defaults to the configured backup file)
        file: Option<PathBuf>,
    },
    /// Replace everything with a JSON snapshot
    Import { file: PathBuf },
}

#[derive(Subcommand)]
enum CourseCommand {
    /// List courses
    List,
    /// Create a course and select it
    Add { name: String },
    /// Rename a course
    Rename { course: String, name: String },
    /// Delete a course and all its attendance
    Remove { course: String },
    /// Select the course other commands default to
    Select { course: String },
}

#[derive(Subcommand)]
enum StudentCommand {
    /// List students with their history
    List,
    /// Add a student
    Add { name: String },
    /// Rename a student
    Rename { student: String, name: String },
    /// Remove a student
    Remove { student: String },
}

/// Initialize tracing on stderr so stdout stays clean for command output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "roll_call=warn".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_database(cli_path: Option<PathBuf>, config: &AppConfig) -> Result<Database> {
    let db = match cli_path.or_else(|| config.database_path.clone()) {
        Some(path) => Database::open(path)?,
        None => Database::open_default()?,
    };
    db.migrate()?;
    Ok(db)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = AppConfig::load();
    let db = open_database(cli.db, &config)?;
    let state = db.load_state().context("Failed to load attendance data")?;
    let mut agenda = Agenda::new(state).with_store(db);

    match cli.command {
        Some(Commands::Course { action }) => run_course(&mut agenda, action)?,
        Some(Commands::Student { course, action }) => {
            select(&mut agenda, course.as_deref())?;
            run_student(&mut agenda, action)?;
        }
        Some(Commands::Date { date }) => {
            if let Some(date) = date {
                let date = if date == "today" { String::new() } else { date };
                validate_date(&date)?;
                agenda.set_date(&date);
            }
            println!("{}", agenda.selected_date());
        }
        Some(Commands::Call { course, date }) => {
            select(&mut agenda, course.as_deref())?;
            if let Some(date) = date {
                validate_date(&date)?;
                agenda.set_pass_date(&date);
            }
            run_call(&mut agenda)?;
        }
        Some(Commands::Report { course }) => {
            select(&mut agenda, course.as_deref())?;
            print_report(&agenda);
        }
        None => print_report(&agenda),
        Some(Commands::Export { file }) => {
            let path = file.unwrap_or_else(|| PathBuf::from(&config.backup_file));
            let json = snapshot::export(agenda.state())?;
            fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
        Some(Commands::Import { file }) => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let state = snapshot::import(&text)
                .context("Invalid file: expected a JSON snapshot exported by rollcall")?;
            let courses = state.courses.len();
            agenda.replace_state(state);
            tracing::info!(courses, "Imported snapshot from {}", file.display());
            println!("Imported {} courses from {}", courses, file.display());
        }
    }

    Ok(())
}

fn run_course(agenda: &mut Agenda, action: CourseCommand) -> Result<()> {
    match action {
        CourseCommand::List => {
            let selected = agenda.state().selected_course_id.clone();
            for course in agenda.state().courses_by_name() {
                let marker = if Some(&course.id) == selected.as_ref() { '*' } else { ' ' };
                println!(
                    "{} {}  {} ({} students)",
                    marker,
                    course.id,
                    course.name,
                    course.students.len()
                );
            }
        }
        CourseCommand::Add { name } => {
            let id = agenda
                .create_course(&name)
                .ok_or_else(|| anyhow::anyhow!("Course name cannot be empty"))?;
            println!("Created {}", id);
        }
        CourseCommand::Rename { course, name } => {
            let id = find_course(agenda.state(), &course)?;
            agenda.rename_course(&id, &name);
        }
        CourseCommand::Remove { course } => {
            let id = find_course(agenda.state(), &course)?;
            agenda.delete_course(&id);
        }
        CourseCommand::Select { course } => {
            let id = find_course(agenda.state(), &course)?;
            agenda.select_course(&id);
        }
    }
    Ok(())
}

fn run_student(agenda: &mut Agenda, action: StudentCommand) -> Result<()> {
    let course = agenda
        .selected_course()
        .ok_or_else(|| anyhow::anyhow!("No course selected"))?;

    match action {
        StudentCommand::List => {
            for student in course.roster() {
                println!(
                    "{}  {}  {}%  {}",
                    student.id,
                    student.name,
                    roll_call::ledger::Ledger::pct(&student.stats),
                    render::render_history(student, 5)
                );
            }
        }
        StudentCommand::Add { name } => {
            let id = agenda
                .add_student(&name)
                .ok_or_else(|| anyhow::anyhow!("Student name cannot be empty"))?;
            println!("Added {}", id);
        }
        StudentCommand::Rename { student, name } => {
            let id = find_student(course, &student)?;
            agenda.rename_student(&id, &name);
        }
        StudentCommand::Remove { student } => {
            let id = find_student(course, &student)?;
            agenda.delete_student(&id);
        }
    }
    Ok(())
}

fn run_call(agenda: &mut Agenda) -> Result<()> {
    if agenda.selected_course().is_none() {
        anyhow::bail!("No course selected");
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    print_card(&mut stdout, agenda)?;
    for line in stdin.lock().lines() {
        match line?.trim() {
            "p" => {
                agenda.mark(Status::Present);
            }
            "a" => {
                agenda.mark(Status::Absent);
            }
            "l" => {
                agenda.mark(Status::Later);
            }
            "u" => {
                agenda.undo();
            }
            "q" => break,
            "" => {}
            other => writeln!(stdout, "Unknown command {:?}", other)?,
        }
        print_card(&mut stdout, agenda)?;
    }

    Ok(())
}

fn print_card(out: &mut impl Write, agenda: &Agenda) -> Result<()> {
    write!(
        out,
        "{}",
        render::render_card(
            agenda.current_student(),
            agenda.position(),
            agenda.pass_date()
        )
    )?;
    write!(out, "[p]resent [a]bsent [l]ater [u]ndo [q]uit > ")?;
    out.flush()?;
    Ok(())
}

fn print_report(agenda: &Agenda) {
    match agenda.selected_course() {
        Some(course) => print!("{}", render::render_roster(course)),
        None if agenda.state().courses.is_empty() => {
            println!("No courses yet. Create one with `rollcall course add <name>`.")
        }
        None => println!("No course selected. Pick one with `rollcall course select <course>`."),
    }
}

fn select(agenda: &mut Agenda, course: Option<&str>) -> Result<()> {
    if let Some(course) = course {
        let id = find_course(agenda.state(), course)?;
        agenda.select_course(&id);
    }
    Ok(())
}

fn validate_date(date: &str) -> Result<()> {
    if date.is_empty() {
        return Ok(());
    }
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("Invalid date {:?}, expected YYYY-MM-DD", date))?;
    Ok(())
}

/// Resolve a course by id, or by case-insensitive name.
fn find_course(state: &AgendaState, key: &str) -> Result<CourseId> {
    let id = CourseId::from(key);
    if state.courses.contains_key(&id) {
        return Ok(id);
    }
    let wanted = key.to_lowercase();
    state
        .courses
        .values()
        .find(|c| c.name.to_lowercase() == wanted)
        .map(|c| c.id.clone())
        .ok_or_else(|| anyhow::anyhow!("Course not found: {}", key))
}

/// Resolve a student by id, or by case-insensitive name.
fn find_student(course: &Course, key: &str) -> Result<StudentId> {
    let id = StudentId::from(key);
    if course.students.contains_key(&id) {
        return Ok(id);
    }
    let wanted = key.to_lowercase();
    course
        .students
        .values()
        .find(|s| s.name.to_lowercase() == wanted)
        .map(|s| s.id.clone())
        .ok_or_else(|| anyhow::anyhow!("Student not found: {}", key))
}
