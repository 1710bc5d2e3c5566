mod schema;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

use crate::models::*;
use crate::store::Persist;

const SELECTED_COURSE_KEY: &str = "selected_course_id";
const SELECTED_DATE_KEY: &str = "selected_date";

/// SQLite-backed store for the whole [`AgendaState`] tree.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "roll-call")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("roll-call.db"))
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    pub fn migrate(&self) -> Result<()> {
        schema::run_migrations(&self.conn)
    }

    // ============================================================
    // Whole-tree operations
    // ============================================================

    /// Load every course, student and history entry, plus the selection.
    pub fn load_state(&self) -> Result<AgendaState> {
        let mut courses = self.load_courses()?;

        {
            let mut stmt = self.conn.prepare(
                "SELECT course_id, id, name, present, absent, later
                 FROM students ORDER BY course_id, id",
            )?;
            let students = stmt
                .query_map([], |row| {
                    let course_id = CourseId(row.get(0)?);
                    let student = Student {
                        id: StudentId(row.get(1)?),
                        name: row.get(2)?,
                        stats: Stats {
                            present: row.get(3)?,
                            absent: row.get(4)?,
                            later: row.get(5)?,
                        },
                        history: Vec::new(),
                    };
                    Ok((course_id, student))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            for (course_id, student) in students {
                if let Some(course) = courses.get_mut(&course_id) {
                    course.students.insert(student.id.clone(), student);
                }
            }
        }

        let mut stmt = self.conn.prepare(
            "SELECT course_id, student_id, date, status
             FROM attendance_events ORDER BY course_id, student_id, seq",
        )?;
        let events = stmt
            .query_map([], |row| {
                Ok((
                    CourseId(row.get(0)?),
                    StudentId(row.get(1)?),
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        for (course_id, student_id, date, status) in events {
            let Some(status) = Status::from_str(&status) else {
                tracing::warn!("Skipping history entry with unknown status {:?}", status);
                continue;
            };
            if let Some(student) = courses
                .get_mut(&course_id)
                .and_then(|c| c.students.get_mut(&student_id))
            {
                student.history.push(AttendanceEvent { date, status });
            }
        }

        let selected_course_id = self.get_setting(SELECTED_COURSE_KEY)?.map(CourseId);
        let selected_date = self
            .get_setting(SELECTED_DATE_KEY)?
            .filter(|d| !d.is_empty())
            .unwrap_or_else(today_str);

        Ok(AgendaState {
            courses,
            selected_course_id,
            selected_date,
        })
    }

    /// Replace everything stored with `state`, in one transaction.
    pub fn save_state(&self, state: &AgendaState) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute_batch(
            "DELETE FROM attendance_events;
             DELETE FROM students;
             DELETE FROM courses;
             DELETE FROM settings;",
        )?;

        {
            let mut insert_course = tx.prepare("INSERT INTO courses (id, name) VALUES (?, ?)")?;
            let mut insert_student = tx.prepare(
                "INSERT INTO students (course_id, id, name, present, absent, later)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )?;
            let mut insert_event = tx.prepare(
                "INSERT INTO attendance_events (course_id, student_id, seq, date, status)
                 VALUES (?, ?, ?, ?, ?)",
            )?;

            for course in state.courses.values() {
                insert_course.execute((course.id.as_str(), &course.name))?;

                for student in course.students.values() {
                    insert_student.execute((
                        course.id.as_str(),
                        student.id.as_str(),
                        &student.name,
                        student.stats.present,
                        student.stats.absent,
                        student.stats.later,
                    ))?;

                    for (seq, event) in student.history.iter().enumerate() {
                        insert_event.execute((
                            course.id.as_str(),
                            student.id.as_str(),
                            seq as i64,
                            &event.date,
                            event.status.as_str(),
                        ))?;
                    }
                }
            }

            let mut insert_setting = tx.prepare("INSERT INTO settings (key, value) VALUES (?, ?)")?;
            if let Some(id) = &state.selected_course_id {
                insert_setting.execute((SELECTED_COURSE_KEY, id.as_str()))?;
            }
            insert_setting.execute((SELECTED_DATE_KEY, &state.selected_date))?;
        }

        tx.commit()?;
        Ok(())
    }

    fn load_courses(&self) -> Result<BTreeMap<CourseId, Course>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM courses ORDER BY name")?;
        let courses = stmt
            .query_map([], |row| {
                Ok(Course::new(CourseId(row.get(0)?), row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(courses.into_iter().map(|c| (c.id.clone(), c)).collect())
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }
}

impl Persist for Database {
    fn persist(&self, state: &AgendaState) -> Result<()> {
        self.save_state(state)
    }
}
