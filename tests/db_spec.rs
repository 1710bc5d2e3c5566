use roll_call::agenda::Agenda;
use roll_call::db::Database;
use roll_call::models::*;
use roll_call::store::{Persist, SnapshotFile};
use speculate2::speculate;

fn sample_state() -> AgendaState {
    let mut course = Course::new(CourseId::from("curso_1"), "3°B - Matemática");
    let mut ana = Student::new(StudentId::from("alumno_1"), "Ana García");
    ana.history = vec![
        AttendanceEvent { date: "2025-08-01".to_string(), status: Status::Present },
        AttendanceEvent { date: "2025-08-02".to_string(), status: Status::Later },
        AttendanceEvent { date: "2025-08-02".to_string(), status: Status::Absent },
    ];
    ana.stats = Stats::from_history(&ana.history);
    course.students.insert(ana.id.clone(), ana);
    course.students.insert(
        StudentId::from("alumno_2"),
        Student::new(StudentId::from("alumno_2"), "Bruno Díaz"),
    );

    let mut state = AgendaState {
        selected_course_id: Some(course.id.clone()),
        selected_date: "2025-08-02".to_string(),
        ..AgendaState::default()
    };
    state.courses.insert(course.id.clone(), course);
    state.courses.insert(
        CourseId::from("curso_2"),
        Course::new(CourseId::from("curso_2"), "Empty"),
    );
    state
}

speculate! {
    describe "database" {
        before {
            let db = Database::open_memory().expect("Failed to create in-memory database");
            db.migrate().expect("Failed to run migrations");
        }

        it "loads an empty state from a fresh database" {
            let state = db.load_state().expect("Query failed");
            assert!(state.courses.is_empty());
            assert!(state.selected_course_id.is_none());
            assert_eq!(state.selected_date, today_str());
        }

        it "round-trips the whole tree" {
            let state = sample_state();
            db.save_state(&state).expect("Failed to save");

            let loaded = db.load_state().expect("Query failed");
            assert_eq!(loaded, state);
        }

        it "preserves history order" {
            db.save_state(&sample_state()).expect("Failed to save");

            let loaded = db.load_state().expect("Query failed");
            let ana = &loaded.courses[&CourseId::from("curso_1")].students[&StudentId::from("alumno_1")];
            let statuses: Vec<Status> = ana.history.iter().map(|h| h.status).collect();
            assert_eq!(statuses, vec![Status::Present, Status::Later, Status::Absent]);
        }

        it "replaces previous contents on save" {
            db.save_state(&sample_state()).expect("Failed to save");

            let mut smaller = sample_state();
            smaller.courses.remove(&CourseId::from("curso_2"));
            smaller.selected_course_id = None;
            db.save_state(&smaller).expect("Failed to save");

            let loaded = db.load_state().expect("Query failed");
            assert_eq!(loaded, smaller);
        }
    }

    describe "file database" {
        it "keeps data across reopen" {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("roll-call.db");

            {
                let db = Database::open(path.clone()).expect("Failed to open");
                db.migrate().unwrap();
                db.save_state(&sample_state()).unwrap();
            }

            let db = Database::open(path).expect("Failed to reopen");
            db.migrate().unwrap();
            assert_eq!(db.load_state().unwrap(), sample_state());
        }

        it "persists marks made through the agenda" {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("roll-call.db");

            let db = Database::open(path.clone()).expect("Failed to open");
            db.migrate().unwrap();
            let mut agenda = Agenda::new(db.load_state().unwrap()).with_store(db);
            agenda.create_course("3°B").expect("Failed to create course");
            agenda.set_date("2025-08-02");
            agenda.add_student("Ana").expect("Failed to add student");
            agenda.mark(Status::Present);

            let reopened = Database::open(path).expect("Failed to reopen");
            reopened.migrate().unwrap();
            let loaded = reopened.load_state().unwrap();
            assert_eq!(&loaded, agenda.state());

            let ana = loaded.selected_course().unwrap().roster()[0].clone();
            assert_eq!(ana.stats.present, 1);
            assert_eq!(ana.history[0].date, "2025-08-02");
        }
    }

    describe "snapshot file" {
        it "loads an empty state when the file is missing" {
            let dir = tempfile::tempdir().unwrap();
            let store = SnapshotFile::new(dir.path().join("agenda_backup.json"));

            let state = store.load().expect("Failed to load");
            assert!(state.courses.is_empty());
        }

        it "round-trips through disk" {
            let dir = tempfile::tempdir().unwrap();
            let store = SnapshotFile::new(dir.path().join("backups").join("agenda_backup.json"));

            store.persist(&sample_state()).expect("Failed to write");

            assert!(store.path().exists());
            assert_eq!(store.load().unwrap(), sample_state());
        }

        it "reports a corrupt file" {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("agenda_backup.json");
            std::fs::write(&path, "{ not json").unwrap();

            assert!(SnapshotFile::new(path).load().is_err());
        }
    }
}
