use crate::utils::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};

pub const ID_ATTRIBUTE: &str = "ID";

/// Attribute access on a database object instance.
///
/// Implemented for the driver's object type in the Oracle adapter; kept as a
/// trait so records can be moved in and out of objects without a database.
pub trait ObjectAttributes {
    fn attribute_names(&self) -> Vec<String>;
    fn set_null(&mut self, name: &str) -> Result<()>;
    fn set_i64(&mut self, name: &str, value: i64) -> Result<()>;
    fn get_i64(&self, name: &str) -> Result<Option<i64>>;
}

/// Value side of the `TEST_TYPE` object: `id number(10)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    id: i64,
}

impl TestRecord {
    pub fn new(id: i64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// The record the increment procedure should hand back.
    pub fn incremented(&self) -> Result<Self> {
        self.id
            .checked_add(1)
            .map(Self::new)
            .ok_or_else(|| HarnessError::AttributeError {
                attribute: ID_ATTRIBUTE.to_string(),
                message: format!("{} cannot be incremented", self.id),
            })
    }

    /// Builds a record from an object's attributes.
    pub fn read_from<O: ObjectAttributes + ?Sized>(object: &O) -> Result<Self> {
        let id = object
            .get_i64(ID_ATTRIBUTE)?
            .ok_or_else(|| HarnessError::AttributeError {
                attribute: ID_ATTRIBUTE.to_string(),
                message: "attribute is null".to_string(),
            })?;
        Ok(Self::new(id))
    }

    /// Resets every attribute of `object` to null, then populates it from the record.
    ///
    /// Binding an object with uninitialized attributes fails on the server
    /// (ORA-21525), so the reset must cover attributes the record doesn't know about.
    pub fn write_to<O: ObjectAttributes + ?Sized>(&self, object: &mut O) -> Result<()> {
        for name in object.attribute_names() {
            object.set_null(&name)?;
        }
        object.set_i64(ID_ATTRIBUTE, self.id)
    }
}
