use crate::entities::RecordKind;
use crate::error::{PetError, ValidationError};

use super::Notice;

pub struct NotificationTemplates;

impl NotificationTemplates {
    pub fn records_created<T: RecordKind>(count: usize) -> Notice {
        if count > 1 {
            Notice::success(format!("{} added for {} pets!", plural(T::TITLE), count))
        } else {
            Notice::success(format!("{} added!", T::TITLE))
        }
    }

    pub fn record_updated<T: RecordKind>() -> Notice {
        Notice::success(format!("{} updated!", T::TITLE))
    }

    pub fn record_deleted<T: RecordKind>() -> Notice {
        Notice::success(format!("{} deleted!", T::TITLE))
    }

    pub fn form_rejected(error: &ValidationError) -> Notice {
        match error {
            ValidationError::MissingFields(fields) => {
                Notice::error("Please fill all required fields.").with_detail(fields.join(", "))
            }
            ValidationError::FutureDate => Notice::error("Date cannot be in the future."),
            ValidationError::UnknownPets(ids) => {
                Notice::error("Please select pets from your list.").with_detail(ids.join(", "))
            }
        }
    }

    pub fn pet_added(name: &str) -> Notice {
        Notice::success("Pet Added Successfully!").with_detail(name)
    }

    pub fn pet_deleted() -> Notice {
        Notice::success("Pet Deleted Successfully!")
    }

    pub fn pet_rejected(error: &PetError) -> Notice {
        match error {
            PetError::MissingFields(fields) => {
                Notice::error("Please fill in all fields.").with_detail(fields.join(", "))
            }
            PetError::InvalidWeight(_) => Notice::error("Weight must be a number."),
        }
    }
}

fn plural(title: &str) -> String {
    format!("{title}s")
}
