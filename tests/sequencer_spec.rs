use roll_call::models::*;
use roll_call::sequencer::{Position, Sequencer, StudentStore};
use speculate2::speculate;

const DATE: &str = "2025-08-02";

fn make_course(names: &[&str]) -> Course {
    let mut course = Course::new(CourseId::from("curso_1"), "3°B");
    for name in names {
        let id = StudentId::from(*name);
        course.students.insert(id.clone(), Student::new(id, *name));
    }
    course
}

fn ids(names: &[&str]) -> Vec<StudentId> {
    names.iter().map(|n| StudentId::from(*n)).collect()
}

fn current_name(seq: &Sequencer, course: &Course) -> Option<String> {
    seq.current_student(course).map(|s| s.name.clone())
}

fn assert_ledger_consistent(course: &Course) {
    for student in course.students.values() {
        assert_eq!(student.stats, Stats::from_history(&student.history), "{}", student.name);
    }
}

speculate! {
    before {
        let mut course = make_course(&["a", "b", "c"]);
        let mut seq = Sequencer::new(course.roster_ids());
    }

    describe "a fresh pass" {
        it "starts at the first student in roster order" {
            assert_eq!(seq.order(), ids(&["a", "b", "c"]).as_slice());
            assert_eq!(seq.position(), Position { index: 0, total: 3 });
            assert_eq!(current_name(&seq, &course), Some("a".to_string()));
            assert!(!seq.is_complete());
            assert!(!seq.can_undo());
        }

        it "is complete immediately for an empty roster" {
            let empty = make_course(&[]);
            let seq = Sequencer::new(empty.roster_ids());
            assert!(seq.is_complete());
            assert!(seq.current_student(&empty).is_none());
        }
    }

    describe "mark" {
        it "advances on present and absent" {
            seq.mark(&mut course, Status::Present, DATE);
            assert_eq!(current_name(&seq, &course), Some("b".to_string()));

            seq.mark(&mut course, Status::Absent, DATE);
            assert_eq!(current_name(&seq, &course), Some("c".to_string()));
            assert_eq!(seq.position().index, 2);
        }

        it "records through the ledger with the pass date" {
            seq.mark(&mut course, Status::Absent, DATE);

            let a = course.student(&StudentId::from("a")).unwrap();
            assert_eq!(a.history, vec![AttendanceEvent { date: DATE.to_string(), status: Status::Absent }]);
            assert_eq!(a.stats.absent, 1);
        }

        it "moves a deferred student to the end without advancing" {
            seq.mark(&mut course, Status::Later, DATE);

            assert_eq!(seq.order(), ids(&["b", "c", "a"]).as_slice());
            assert_eq!(seq.position().index, 0);
            assert_eq!(current_name(&seq, &course), Some("b".to_string()));
            assert_eq!(course.student(&StudentId::from("a")).unwrap().stats.later, 1);
        }

        it "completes exactly when the index reaches the roster size" {
            for _ in 0..2 {
                seq.mark(&mut course, Status::Present, DATE);
                assert!(!seq.is_complete());
            }
            seq.mark(&mut course, Status::Absent, DATE);

            assert!(seq.is_complete());
            assert_eq!(seq.position(), Position { index: 3, total: 3 });
            assert!(seq.current_student(&course).is_none());
        }

        it "is a no-op once the pass is complete" {
            for _ in 0..3 {
                seq.mark(&mut course, Status::Present, DATE);
            }
            let before = course.clone();

            assert!(seq.mark(&mut course, Status::Present, DATE).is_none());

            assert_eq!(course, before);
            assert_eq!(seq.position().index, 3);
        }

        it "revisits deferred students after the rest" {
            seq.mark(&mut course, Status::Later, DATE);
            seq.mark(&mut course, Status::Present, DATE);
            seq.mark(&mut course, Status::Present, DATE);
            assert_eq!(current_name(&seq, &course), Some("a".to_string()));

            seq.mark(&mut course, Status::Absent, DATE);
            assert!(seq.is_complete());

            let a = course.student(&StudentId::from("a")).unwrap();
            assert_eq!(a.stats, Stats { present: 0, absent: 1, later: 1 });
        }
    }

    describe "undo" {
        it "restores the exact order and cursor after a defer" {
            seq.mark(&mut course, Status::Present, DATE);
            seq.mark(&mut course, Status::Later, DATE);
            assert_eq!(seq.order(), ids(&["a", "c", "b"]).as_slice());

            seq.undo(&mut course);

            assert_eq!(seq.order(), ids(&["a", "b", "c"]).as_slice());
            assert_eq!(seq.position().index, 1);
            assert_eq!(current_name(&seq, &course), Some("b".to_string()));
            assert!(course.student(&StudentId::from("b")).unwrap().history.is_empty());
        }

        it "steps back and reverses a present mark" {
            seq.mark(&mut course, Status::Present, DATE);
            seq.undo(&mut course);

            assert_eq!(seq.position().index, 0);
            let a = course.student(&StudentId::from("a")).unwrap();
            assert!(a.history.is_empty());
            assert_eq!(a.stats, Stats::default());
        }

        it "can undo out of a completed pass" {
            for _ in 0..3 {
                seq.mark(&mut course, Status::Absent, DATE);
            }
            seq.undo(&mut course);

            assert!(!seq.is_complete());
            assert_eq!(current_name(&seq, &course), Some("c".to_string()));
        }

        it "unwinds a mixed pass back to the initial state" {
            let initial = course.clone();
            let statuses = [
                Status::Later,
                Status::Present,
                Status::Later,
                Status::Absent,
                Status::Present,
                Status::Later,
                Status::Present,
            ];
            let mut marks = 0;
            for status in statuses {
                if seq.mark(&mut course, status, DATE).is_some() {
                    marks += 1;
                }
                assert_ledger_consistent(&course);
            }

            for _ in 0..marks {
                assert!(seq.undo(&mut course).is_some());
                assert_ledger_consistent(&course);
            }

            assert_eq!(course, initial);
            assert_eq!(seq.order(), ids(&["a", "b", "c"]).as_slice());
            assert_eq!(seq.position().index, 0);
        }

        it "is a no-op beyond the recorded depth" {
            seq.mark(&mut course, Status::Present, DATE);
            seq.undo(&mut course);
            let before = course.clone();

            assert!(seq.undo(&mut course).is_none());
            assert!(seq.undo(&mut course).is_none());

            assert_eq!(course, before);
            assert_eq!(seq.position().index, 0);
            assert_eq!(seq.order(), ids(&["a", "b", "c"]).as_slice());
        }

        it "reverses the date the mark was recorded on" {
            let a = course.student_mut(&StudentId::from("a")).unwrap();
            a.history.push(AttendanceEvent { date: "2025-08-01".to_string(), status: Status::Present });
            a.stats.present = 1;

            seq.mark(&mut course, Status::Present, DATE);
            seq.undo(&mut course);

            let a = course.student(&StudentId::from("a")).unwrap();
            assert_eq!(a.history, vec![AttendanceEvent { date: "2025-08-01".to_string(), status: Status::Present }]);
            assert_eq!(a.stats.present, 1);
        }
    }

    describe "reset" {
        it "detects a changed roster" {
            assert!(!seq.is_stale(&ids(&["a", "b", "c"])));
            assert!(seq.is_stale(&ids(&["a", "c"])));
            assert!(seq.is_stale(&ids(&["a", "c", "b"])));
        }

        it "returns to the initial state and forgets undo history" {
            seq.mark(&mut course, Status::Later, DATE);
            seq.mark(&mut course, Status::Present, DATE);

            seq.reset(ids(&["a", "b"]));

            assert_eq!(seq.order(), ids(&["a", "b"]).as_slice());
            assert_eq!(seq.position(), Position { index: 0, total: 2 });
            assert!(!seq.can_undo());
            assert!(seq.undo(&mut course).is_none());
        }
    }
}
