use crate::classes;
use crate::model::ClassWithStudents;
use crate::persistence::{KeyValueStore, PersistenceResult, UserManager};
use crate::validation::ValidationError;
use chrono::NaiveDate;

/// Everything a front end needs between two user actions: who is logged in,
/// their classes, which class is open and which date is being marked.
///
/// Every transition returns a new state; the caller keeps the latest one and
/// decides when to [`save`](AppState::save) it.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    username: String,
    classes: Vec<ClassWithStudents>,
    selected_class: Option<String>,
    selected_date: NaiveDate,
}

impl AppState {
    pub fn new(
        username: impl Into<String>,
        classes: Vec<ClassWithStudents>,
        selected_date: NaiveDate,
    ) -> Self {
        Self {
            username: username.into(),
            classes,
            selected_class: None,
            selected_date,
        }
    }

    pub fn load<S: KeyValueStore>(
        users: &UserManager<S>,
        username: &str,
        selected_date: NaiveDate,
    ) -> PersistenceResult<Self> {
        let classes = users.get_classes_for_user(username)?;
        Ok(Self::new(username, classes, selected_date))
    }

    pub fn save<S: KeyValueStore>(&self, users: &UserManager<S>) -> PersistenceResult<()> {
        users.save_classes_for_user(&self.username, &self.classes)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn classes(&self) -> &[ClassWithStudents] {
        &self.classes
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn selected(&self) -> Option<&ClassWithStudents> {
        let class_id = self.selected_class.as_deref()?;
        classes::find_class(&self.classes, class_id)
    }

    /// Unknown ids leave the current selection in place.
    pub fn select_class(&self, class_id: &str) -> Self {
        if classes::find_class(&self.classes, class_id).is_none() {
            return self.clone();
        }
        Self {
            selected_class: Some(class_id.to_string()),
            ..self.clone()
        }
    }

    pub fn clear_selection(&self) -> Self {
        Self {
            selected_class: None,
            ..self.clone()
        }
    }

    pub fn select_date(&self, date: NaiveDate) -> Self {
        Self {
            selected_date: date,
            ..self.clone()
        }
    }

    /// Runs `op` on the selected class and swaps the result into the class list.
    /// Without a selection the state is returned unchanged.
    pub fn apply<F>(&self, op: F) -> Self
    where
        F: FnOnce(&ClassWithStudents) -> ClassWithStudents,
    {
        match self.selected() {
            Some(current) => self.with_class(op(current)),
            None => self.clone(),
        }
    }

    pub fn try_apply<F, E>(&self, op: F) -> Result<Self, E>
    where
        F: FnOnce(&ClassWithStudents) -> Result<ClassWithStudents, E>,
    {
        match self.selected() {
            Some(current) => Ok(self.with_class(op(current)?)),
            None => Ok(self.clone()),
        }
    }

    pub fn add_class(&self, class_name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            classes: classes::add_class(&self.classes, class_name)?,
            ..self.clone()
        })
    }

    /// Removing the open class also clears the selection.
    pub fn remove_class(&self, class_id: &str) -> Self {
        let selected_class = self
            .selected_class
            .clone()
            .filter(|selected| selected != class_id);
        Self {
            classes: classes::remove_class(&self.classes, class_id),
            selected_class,
            ..self.clone()
        }
    }

    fn with_class(&self, updated: ClassWithStudents) -> Self {
        Self {
            classes: classes::replace_class(&self.classes, &updated),
            ..self.clone()
        }
    }
}
