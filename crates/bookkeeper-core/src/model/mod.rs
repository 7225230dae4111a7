pub mod budget;
pub mod category;
pub mod entity;
pub mod expense;
pub mod field;
pub mod record;
pub mod value;

pub use budget::Budget;
pub use category::Category;
pub use entity::{coerce_values, Entity, Pk};
pub use expense::Expense;
pub use field::{FieldDef, FieldType};
pub use record::Record;
pub use value::{FromValue, Value};
