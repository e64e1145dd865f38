use crate::model::ClassWithStudents;
use crate::validation::{self, ValidationError};

pub fn add_class(
    classes: &[ClassWithStudents],
    class_name: &str,
) -> Result<Vec<ClassWithStudents>, ValidationError> {
    validation::validate_class_name(class_name)?;
    let class = ClassWithStudents::new(class_name);
    tracing::debug!(class_id = %class.class_id, class_name = %class.class_name, "adding class");
    let mut updated = classes.to_vec();
    updated.push(class);
    Ok(updated)
}

pub fn remove_class(classes: &[ClassWithStudents], class_id: &str) -> Vec<ClassWithStudents> {
    classes
        .iter()
        .filter(|c| c.class_id != class_id)
        .cloned()
        .collect()
}

/// Swaps in `updated` where the class ids match. Unknown ids leave the list as is.
pub fn replace_class(
    classes: &[ClassWithStudents],
    updated: &ClassWithStudents,
) -> Vec<ClassWithStudents> {
    classes
        .iter()
        .map(|c| {
            if c.class_id == updated.class_id {
                updated.clone()
            } else {
                c.clone()
            }
        })
        .collect()
}

pub fn find_class<'a>(
    classes: &'a [ClassWithStudents],
    class_id: &str,
) -> Option<&'a ClassWithStudents> {
    classes.iter().find(|c| c.class_id == class_id)
}
