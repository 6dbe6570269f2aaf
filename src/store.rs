use chrono::Utc;

#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub name: String,
    pub scores: Vec<i64>,
}

#[derive(Debug, Clone)]
pub struct ClassRecord {
    pub name: String,
    pub students: Vec<StudentRecord>,
    /// RFC 3339 stamp of the last successful save, None until then.
    pub saved_at: Option<String>,
}

impl ClassRecord {
    /// Every score of every student, in roster order.
    pub fn all_scores(&self) -> Vec<i64> {
        self.students
            .iter()
            .flat_map(|s| s.scores.iter().copied())
            .collect()
    }
}

/// In-memory store of class records for the process lifetime. Names are
/// the keys; both individual students and classes live in the same
/// namespace, so an individual record is a class named after its student.
#[derive(Debug, Default)]
pub struct GradeBook {
    classes: Vec<ClassRecord>,
}

impl GradeBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(&self, name: &str) -> Option<&ClassRecord> {
        self.classes.iter().find(|c| c.name == name)
    }

    fn class_mut(&mut self, name: &str) -> Option<&mut ClassRecord> {
        self.classes.iter_mut().find(|c| c.name == name)
    }

    /// Inserts an empty class. Returns false if the name is taken.
    pub fn create_class(&mut self, name: &str) -> bool {
        if self.class(name).is_some() {
            return false;
        }
        self.classes.push(ClassRecord {
            name: name.to_string(),
            students: Vec::new(),
            saved_at: None,
        });
        true
    }

    /// Appends a student to an existing class. Returns false if the class
    /// is absent or the student name is already present in it. Callers
    /// validate name format and score range before getting here.
    pub fn add_student(&mut self, class_name: &str, student_name: &str, scores: Vec<i64>) -> bool {
        let Some(class) = self.class_mut(class_name) else {
            return false;
        };
        if class.students.iter().any(|s| s.name == student_name) {
            return false;
        }
        class.students.push(StudentRecord {
            name: student_name.to_string(),
            scores,
        });
        true
    }

    /// Replaces the whole roster of an existing class. A class re-save
    /// discards prior students entirely; there is no merge.
    pub fn replace_students(&mut self, class_name: &str, students: Vec<StudentRecord>) -> bool {
        let Some(class) = self.class_mut(class_name) else {
            return false;
        };
        class.students = students;
        true
    }

    /// Stamps the class with the current time after a successful save.
    pub fn mark_saved(&mut self, class_name: &str) {
        if let Some(class) = self.class_mut(class_name) {
            class.saved_at = Some(Utc::now().to_rfc3339());
        }
    }

    /// Classes sorted by name, for listing.
    pub fn classes_by_name(&self) -> Vec<&ClassRecord> {
        let mut out: Vec<&ClassRecord> = self.classes.iter().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }
}
